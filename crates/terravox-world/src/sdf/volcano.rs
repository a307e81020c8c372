use terravox_geom::{Vec2, Vec3, smoothstep};

use super::UNBOUNDED_SDF;
use crate::feature::VolcanoParams;
use crate::noise::NoiseField;

/// Horizontal early-reject factor.
pub(crate) const REJECT_FACTOR: f32 = 1.4;

/// Warped cone with a smoothed crater bowl, a raised rim lip, noise-twisted
/// lava channels radiating from the center, and ridged rock detail that fades
/// out near the base. Clipped at y = 0 so the cone never extends below the
/// world floor.
pub(super) fn evaluate(p: Vec3, v: &VolcanoParams, noise: &NoiseField) -> f32 {
    let peak_y = v.base_height + v.height;
    if p.y > peak_y + 10.0 {
        return p.y - peak_y;
    }

    let local = p.xz() - v.center;
    if local.length() > v.radius * REJECT_FACTOR {
        return UNBOUNDED_SDF;
    }

    // Broad, low-frequency silhouette warp.
    let warp_freq = 1.5 / v.radius;
    let warp_amp = v.radius * 0.2;
    let warp = Vec2::new(
        noise.noise2(local * warp_freq + Vec2::new(v.seed, v.seed), 1.0, 1.0),
        noise.noise2(
            (local + Vec2::new(100.0, 100.0)) * warp_freq - Vec2::new(v.seed, v.seed),
            1.0,
            1.0,
        ),
    ) * warp_amp;
    let warped = local + warp;
    let warped_dist = warped.length();

    // Cone profile, slightly sharpened.
    let t = warped_dist / v.radius;
    let cone = (1.0 - t).max(0.0).powf(1.2);
    let mut height = v.base_height + v.height * cone;

    // Crater bowl: steep near the rim, flat at the bottom.
    let crater_t = smoothstep(v.crater_radius * 1.1, v.crater_radius * 0.5, warped_dist);
    height -= crater_t.sqrt() * v.crater_depth;

    // Distinct rim lip around the crater edge.
    let rim_width = v.crater_radius * 0.3;
    let rim_dist = (warped_dist - v.crater_radius).abs();
    let rim_profile = 1.0 - smoothstep(0.0, rim_width, rim_dist);
    height += rim_profile * v.height * 0.08;

    // Lava channels: angular sine bands, twisted by noise so they snake
    // downslope, masked to the mid-flank band.
    let angle = warped.y.atan2(warped.x);
    let radius_norm = warped_dist / v.radius;
    let twist_freq = v.path_noise_frequency.max(0.01);
    let twist = noise.noise2(
        warped * twist_freq + Vec2::new(v.seed * 3.0, v.seed * 3.0),
        1.0,
        v.path_noise_amplitude,
    );
    let twisted_angle = angle + twist * radius_norm;
    let path_signal =
        (twisted_angle * 5.0 + v.seed * 133.7).sin() + noise.noise2(warped * 0.1, 1.0, 0.5);
    let path_cut = smoothstep(0.5, 0.9, path_signal);
    let flow_mask = smoothstep(0.15, 0.3, radius_norm) * smoothstep(0.9, 0.6, radius_norm);
    height -= path_cut * v.path_depth * flow_mask;

    // Ridged rock detail, masked so it blends away toward the base.
    let detail = noise.ridged3(p * 0.25 + Vec3::splat(v.seed), 1.0, 1.0) * 2.5;
    let detail_mask = smoothstep(v.base_height, v.base_height + v.height * 0.8, height);
    height += detail * detail_mask;

    (p.y - height).max(-p.y)
}
