use terravox_geom::{Vec3, lerp, saturate, smoothstep};

use super::UNBOUNDED_SDF;
use crate::feature::LakeParams;

/// Radial skip margin around the shore.
pub(crate) const REJECT_MARGIN: f32 = 25.0;

/// Basin carve. The returned field is the carve shape's own SDF: negative
/// above the bowl surface (terrain there gets removed by the Subtract rule),
/// positive below it, fading to no effect past the shore so the basin blends
/// into the surrounding terrain.
pub(super) fn evaluate(p: Vec3, lake: &LakeParams) -> f32 {
    let dist = (p.xz() - lake.center).length();
    if dist > lake.radius + REJECT_MARGIN {
        return UNBOUNDED_SDF;
    }

    // t = 0 at the deepest point, 1 at the shore.
    let t = saturate(dist / lake.radius);
    let bed_height = lerp(lake.bottom_height, lake.shore_height, t);

    let s = bed_height - p.y;
    let fade = smoothstep(lake.radius * 0.9, lake.radius, dist);
    lerp(s, UNBOUNDED_SDF, fade)
}
