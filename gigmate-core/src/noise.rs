//! Market-volatility noise added on top of the weighted score.

use rand::Rng;

pub trait NoiseSource {
    /// One noise sample. Called once per zone per prediction.
    fn sample(&self) -> f64;
}

/// Uniform noise in `[-amplitude, +amplitude]`, unseeded.
#[derive(Debug, Clone, Copy)]
pub struct UniformNoise {
    pub amplitude: f64,
}

impl Default for UniformNoise {
    fn default() -> Self {
        Self { amplitude: 1.0 }
    }
}

impl NoiseSource for UniformNoise {
    fn sample(&self) -> f64 {
        if self.amplitude <= 0.0 {
            return 0.0;
        }
        rand::thread_rng().gen_range(-self.amplitude..=self.amplitude)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroNoise;

impl NoiseSource for ZeroNoise {
    fn sample(&self) -> f64 {
        0.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedNoise(pub f64);

impl NoiseSource for FixedNoise {
    fn sample(&self) -> f64 {
        self.0
    }
}
