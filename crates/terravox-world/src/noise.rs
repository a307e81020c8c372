use fastnoise_lite::{FastNoiseLite, NoiseType};
use terravox_geom::{Vec2, Vec3};

/// Shared OpenSimplex2 sampler for a world seed.
///
/// All coordinate scaling happens at the call site (the generator frequency is
/// pinned to 1.0), so two features sampling with different frequencies can share
/// one sampler. Per-feature seeds are applied as coordinate offsets, which keeps
/// every feature deterministic for a given world seed without rebuilding the
/// generator per feature.
pub struct NoiseField {
    generator: FastNoiseLite,
}

impl NoiseField {
    pub fn new(seed: i32) -> Self {
        let mut generator = FastNoiseLite::with_seed(seed);
        generator.set_noise_type(Some(NoiseType::OpenSimplex2));
        generator.set_frequency(Some(1.0));
        Self { generator }
    }

    /// 2D noise in [-amp, amp].
    #[inline]
    pub fn noise2(&self, p: Vec2, frequency: f32, amplitude: f32) -> f32 {
        self.generator.get_noise_2d(p.x * frequency, p.y * frequency) * amplitude
    }

    /// 3D noise in [-amp, amp].
    #[inline]
    pub fn noise3(&self, p: Vec3, frequency: f32, amplitude: f32) -> f32 {
        self.generator
            .get_noise_3d(p.x * frequency, p.y * frequency, p.z * frequency)
            * amplitude
    }

    /// Ridged 2D noise in [0, amp]: sharp creases where the base noise crosses zero.
    #[inline]
    pub fn ridged2(&self, p: Vec2, frequency: f32, amplitude: f32) -> f32 {
        let n = 1.0 - self.noise2(p, frequency, 1.0).abs();
        n * n * amplitude
    }

    /// Ridged 3D noise in [0, amp].
    #[inline]
    pub fn ridged3(&self, p: Vec3, frequency: f32, amplitude: f32) -> f32 {
        let n = 1.0 - self.noise3(p, frequency, 1.0).abs();
        n * n * amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_seed() {
        let a = NoiseField::new(1337);
        let b = NoiseField::new(1337);
        let p = Vec3::new(12.5, -3.0, 47.25);
        assert_eq!(a.noise3(p, 0.05, 10.0), b.noise3(p, 0.05, 10.0));
    }

    #[test]
    fn amplitude_bounds_output() {
        let f = NoiseField::new(7);
        for i in 0..200 {
            let p = Vec2::new(i as f32 * 1.73, i as f32 * -0.61);
            let v = f.noise2(p, 0.1, 5.0);
            assert!(v.abs() <= 5.0 + 1e-4, "noise2 out of range: {v}");
            let r = f.ridged2(p, 0.1, 3.0);
            assert!((0.0..=3.0 + 1e-4).contains(&r), "ridged2 out of range: {r}");
        }
    }
}
