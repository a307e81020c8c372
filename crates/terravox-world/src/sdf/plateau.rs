use terravox_geom::{Vec3, saturate, smoothstep};

use super::UNBOUNDED_SDF;
use crate::feature::PlateauParams;

/// Flat-topped disc of solid terrain for settlements. The plateau mask is 1
/// at the center and fades to 0 between 60% and 100% of the radius, so the
/// platform edge slopes down instead of ending in a cliff. Clipped at y = 0
/// so the disc never extends below the world floor.
pub(super) fn evaluate(p: Vec3, plateau: &PlateauParams) -> f32 {
    let dist = (p.xz() - plateau.center).length();
    if dist > plateau.radius {
        return UNBOUNDED_SDF;
    }

    let t = saturate(dist / plateau.radius);
    let mask = 1.0 - smoothstep(0.6, 1.0, t);
    let height = plateau.plateau_height * mask;

    (p.y - height).max(-p.y)
}
