//! Pluggable noise source for organic particle drift
//!
//! The outer shell samples a band-limited scalar field at three offset
//! coordinates per particle per frame. [`PerlinNoise`] is the real thing;
//! [`JitterNoise`] is the degraded fallback when smooth noise is not
//! wanted, trading coherence for plain per-call randomness.

use noise::{NoiseFn, Perlin};
use rand::Rng;

/// A band-limited scalar field sampled at a 3D coordinate
///
/// Values are roughly in [-1, 1]; callers scale the result themselves.
pub trait NoiseSource {
    fn sample(&self, x: f32, y: f32, z: f32) -> f32;
}

/// Perlin noise, seedable and fully deterministic
pub struct PerlinNoise {
    inner: Perlin,
}

impl PerlinNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            inner: Perlin::new(seed),
        }
    }
}

impl NoiseSource for PerlinNoise {
    fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        self.inner.get([x as f64, y as f64, z as f64]) as f32
    }
}

/// Uniform random jitter, ignoring the sample coordinate
///
/// Non-deterministic and much smaller in amplitude than real noise
/// ([-0.05, 0.05]), so the degraded mode stays subtle instead of making
/// the shell shiver violently.
#[derive(Default)]
pub struct JitterNoise;

impl NoiseSource for JitterNoise {
    fn sample(&self, _x: f32, _y: f32, _z: f32) -> f32 {
        rand::thread_rng().gen_range(-0.05..=0.05)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perlin_is_deterministic_per_seed() {
        let a = PerlinNoise::new(7);
        let b = PerlinNoise::new(7);
        for i in 0..20 {
            let t = i as f32 * 0.37;
            assert_eq!(a.sample(t, -t, 2.0 * t), b.sample(t, -t, 2.0 * t));
        }
    }

    #[test]
    fn test_perlin_seeds_differ() {
        let a = PerlinNoise::new(1);
        let b = PerlinNoise::new(2);
        let differs = (0..20).any(|i| {
            let t = 0.31 + i as f32 * 0.49;
            a.sample(t, t, t) != b.sample(t, t, t)
        });
        assert!(differs);
    }

    #[test]
    fn test_perlin_in_range() {
        let n = PerlinNoise::new(99);
        for i in 0..100 {
            let t = i as f32 * 0.113;
            let v = n.sample(t, 1.0 - t, t * 0.5);
            assert!(v.abs() <= 1.0, "sample out of range: {}", v);
        }
    }

    #[test]
    fn test_jitter_in_range() {
        let n = JitterNoise;
        for _ in 0..1000 {
            let v = n.sample(0.0, 0.0, 0.0);
            assert!((-0.05..=0.05).contains(&v));
        }
    }
}
