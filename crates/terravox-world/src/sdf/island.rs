use terravox_geom::{Vec2, Vec3, saturate};

use super::UNBOUNDED_SDF;
use crate::feature::IslandParams;
use crate::noise::NoiseField;

/// Safe margin for the radial early-out; avoids evaluating warp noise far away.
const REJECT_MARGIN: f32 = 20.0;

/// Dome of terrain rising from sea level: a radial falloff warped by
/// low-frequency noise so the coastline is not a perfect circle.
pub(super) fn evaluate(p: Vec3, island: &IslandParams, noise: &NoiseField) -> f32 {
    let local = p.xz() - island.center;
    if local.length() > island.radius + REJECT_MARGIN {
        return UNBOUNDED_SDF;
    }

    let warp = Vec2::new(
        noise.noise2(local * 0.01, 0.1, 10.0),
        noise.noise2(local * 0.01 + Vec2::new(100.0, 100.0), 0.1, 10.0),
    );
    let warped_dist = (local + warp).length();

    let t = saturate(1.0 - warped_dist / island.radius);
    let base_height = t * island.max_height;

    p.y - base_height
}
