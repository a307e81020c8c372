use terravox_geom::Vec3;

use crate::feature::{CaveRoomParams, CaveTunnelParams};
use crate::noise::NoiseField;

/// Noise amplitudes below this are treated as "no noise" to skip the sample.
const NOISE_EPSILON: f32 = 0.001;

/// Sphere-shaped cavity, optionally roughened by 3D noise.
pub(super) fn room(p: Vec3, room: &CaveRoomParams, noise: &NoiseField) -> f32 {
    let mut dist = p.distance(room.center) - room.radius;
    if room.noise_amplitude > NOISE_EPSILON {
        dist += noise.noise3(
            p * room.noise_frequency + Vec3::splat(room.seed),
            1.0,
            room.noise_amplitude,
        );
    }
    dist
}

/// Capsule-shaped cavity between two endpoints, optionally roughened.
pub(super) fn tunnel(p: Vec3, tunnel: &CaveTunnelParams, noise: &NoiseField) -> f32 {
    let pa = p - tunnel.start;
    let ba = tunnel.end - tunnel.start;
    let len_sq = ba.dot(ba);
    // Zero-length segments degenerate to a sphere at the start point.
    let h = if len_sq > 0.0 {
        (pa.dot(ba) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut dist = (pa - ba * h).length() - tunnel.radius;
    if tunnel.noise_amplitude > NOISE_EPSILON {
        dist += noise.noise3(
            p * tunnel.noise_frequency + Vec3::splat(tunnel.seed),
            1.0,
            tunnel.noise_amplitude,
        );
    }
    dist
}
