//! Noise providers for the initial fill
//!
//! The generator only needs one query: a value in `[0, 1]` for a normalized
//! coordinate. Anything coherent works; the default is fractal Perlin noise.

use std::time::{SystemTime, UNIX_EPOCH};

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::error::GenError;

/// A deterministic 2D noise source returning values in `[0, 1]`
pub trait NoiseField {
    fn sample(&self, x: f64, y: f64) -> f64;
}

impl<F: Fn(f64, f64) -> f64> NoiseField for F {
    fn sample(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

/// Parameters of the default Perlin noise field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Omitted from a config file, a fresh clock seed is used
    #[serde(default = "time_seed")]
    pub seed: u32,
    /// Number of layers summed together
    pub octaves: usize,
    /// Pattern repetitions across the map (higher zooms out)
    pub frequency: f64,
    /// Peak height relative to the full range, in `[0, 1]`
    pub amplitude: f64,
    /// Amplitude falloff per octave, in `[0, 1]`; low values look spiky
    pub persistence: f64,
}

impl NoiseConfig {
    /// Same parameters with the seed pinned
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), GenError> {
        if self.octaves == 0 {
            return Err(GenError::InvalidNoise("octaves must be at least 1".into()));
        }
        if !(self.frequency > 0.0) {
            return Err(GenError::InvalidNoise(format!(
                "frequency must be positive, got {}",
                self.frequency
            )));
        }
        if !(0.0..=1.0).contains(&self.amplitude) {
            return Err(GenError::InvalidNoise(format!(
                "amplitude must lie in [0, 1], got {}",
                self.amplitude
            )));
        }
        if !(0.0..=1.0).contains(&self.persistence) {
            return Err(GenError::InvalidNoise(format!(
                "persistence must lie in [0, 1], got {}",
                self.persistence
            )));
        }
        Ok(())
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: time_seed(),
            octaves: 1,
            frequency: 30.0,
            amplitude: 0.9,
            persistence: 0.3,
        }
    }
}

/// Seed derived from the wall clock; maps are not reproducible unless pinned
pub fn time_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u32)
        .unwrap_or(0)
}

/// Shift applied to sample coordinates. Perlin noise is exactly zero on
/// integer lattice points, which would pin those cells to 0.5.
const LATTICE_OFFSET: f64 = 0.123_457;

/// Fractal Perlin noise remapped to `[0, 1]`
pub struct PerlinField {
    fbm: Fbm<Perlin>,
    amplitude: f64,
}

impl PerlinField {
    pub fn new(config: &NoiseConfig) -> Result<Self, GenError> {
        config.validate()?;
        let fbm = Fbm::<Perlin>::new(config.seed)
            .set_octaves(config.octaves)
            .set_frequency(config.frequency)
            .set_persistence(config.persistence);
        Ok(Self {
            fbm,
            amplitude: config.amplitude,
        })
    }
}

impl NoiseField for PerlinField {
    fn sample(&self, x: f64, y: f64) -> f64 {
        let raw = self.fbm.get([x + LATTICE_OFFSET, y + LATTICE_OFFSET]) * self.amplitude;
        ((raw + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}
