use terravox_geom::{Vec2, Vec3, lerp, saturate};

use super::UNBOUNDED_SDF;
use crate::feature::RiverParams;
use crate::noise::NoiseField;

/// Flattened meandering channel carve.
///
/// The river is a curve from a start height to an end height, flowing along
/// the local Z axis (the feature's rotation maps local to world) and wandering
/// in local X by 1D-indexed noise. Distance is taken from the query point to
/// the nearest curve sample under an anisotropic metric that scales the
/// vertical axis by width/depth, so the channel carves wider than it is deep.
pub(super) fn evaluate(p: Vec3, river: &RiverParams, noise: &NoiseField) -> f32 {
    let rel = p.xz() - river.center;

    // Rough radial reject: the curve wanders, so keep a meander buffer.
    if rel.length() > river.length + river.meander_amplitude * 2.0 {
        return UNBOUNDED_SDF;
    }

    // Rotate into the river's local frame (flow along local Z).
    let local_x = rel.x * river.cos_rotation - rel.y * river.sin_rotation;
    let local_z = rel.x * river.sin_rotation + rel.y * river.cos_rotation;

    // Tight local rectangle before any noise work.
    let half_length = river.length * 0.5;
    if local_z.abs() > half_length + river.width * 2.0
        || local_x.abs() > river.width * 2.0 + river.meander_amplitude
    {
        return UNBOUNDED_SDF;
    }

    // Project onto the flow axis to estimate the curve parameter; fine for
    // gentle slopes, which is all the meander model produces.
    let t = local_z + half_length;
    let curve_y = lerp(
        river.start_height,
        river.end_height,
        saturate(t / river.length),
    );
    let curve_x = noise.noise2(
        Vec2::new(t * river.meander_frequency + river.seed, river.seed),
        1.0,
        river.meander_amplitude,
    );

    let d_horizontal = (local_x - curve_x).abs();
    let d_vertical = p.y - curve_y;

    // Anisotropic metric: scaling the vertical residual by width/depth
    // flattens the carved tube into a channel profile.
    let vertical_scale = river.width / river.depth;
    Vec2::new(d_horizontal, d_vertical * vertical_scale).length() - river.width * 0.5
}
