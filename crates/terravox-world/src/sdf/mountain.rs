use terravox_geom::{Vec2, Vec3};

use super::UNBOUNDED_SDF;
use crate::feature::MountainParams;
use crate::noise::NoiseField;

/// Horizontal early-reject; the warped ellipse stays well inside this circle.
pub(crate) const REJECT_FACTOR: f32 = 1.6;

/// Ridge-style mountain: an elliptical footprint with a pseudo-random
/// orientation derived from the center position, a power-curve peak profile,
/// and ridged 3D noise that strengthens toward the crest.
pub(super) fn evaluate(p: Vec3, m: &MountainParams, noise: &NoiseField) -> f32 {
    let local = p.xz() - m.center;
    if local.length() > m.radius * REJECT_FACTOR {
        return UNBOUNDED_SDF;
    }

    // Orientation is seeded by the center so it is stable per mountain.
    let orient = noise.noise2(m.center * 0.013, 1.0, 1.0);
    let angle = orient * core::f32::consts::PI;
    let dir = Vec2::new(angle.cos(), angle.sin());
    let perp = dir.perp();

    let mut along = local.dot(dir);
    let mut across = local.dot(perp);

    // Subtle domain warp in ridge space.
    let ridge_pos = Vec2::new(along, across);
    let warp_a = noise.noise2(ridge_pos * 0.05, 1.0, m.warp_strength);
    let warp_b = noise.noise2((ridge_pos + Vec2::new(200.0, 200.0)) * 0.05, 1.0, m.warp_strength);
    along += warp_a * 0.5;
    across += warp_b * 0.5;

    // Elliptical footprint: long axis = radius, short axis = 0.4 * radius.
    let along_norm = along / m.radius;
    let across_norm = across / (m.radius * 0.4);
    let radial = (along_norm * along_norm + across_norm * across_norm).sqrt();
    let t = 1.0 - radial;
    if t <= 0.0 {
        return UNBOUNDED_SDF;
    }

    // Broad base, sharper top.
    let profile = t.powf(1.4);
    let base_height = profile * m.height;

    let ridge = noise.ridged3(
        Vec3::new(along * 0.3 + m.seed, p.y, across * 0.3),
        m.ridge_frequency,
        m.ridge_amplitude * profile,
    );

    let height = (base_height + ridge).clamp(0.0, m.height);
    p.y - height
}
