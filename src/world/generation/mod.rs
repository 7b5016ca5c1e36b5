//! Procedural woods generation
//!
//! Noise fill, cellular automata smoothing, border stamping, small-region
//! culling and corridor carving, run as one pipeline or step by step.

pub mod automata;
pub mod carve;
pub mod noise_field;

pub use automata::{AutomataConfig, OutOfBoundsPolicy};
pub use noise_field::{NoiseConfig, NoiseField, PerlinField};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::regions::{self, Region};
use super::{Grid, TileType};
use crate::ecs::Position;
use crate::error::GenError;

/// Regions smaller than this are filled in by the full pipeline
pub const DEFAULT_CULL_THRESHOLD: usize = 20;

/// Noise samples above this become walls
const WALL_THRESHOLD: f64 = 0.5;

/// Everything needed to build a generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    pub width: i32,
    pub height: i32,
    pub noise: NoiseConfig,
    pub automata: AutomataConfig,
    pub cull_threshold: usize,
}

impl GeneratorSettings {
    /// Settings for the smoothing, cull and resolve pipeline
    pub fn full_pipeline(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            noise: NoiseConfig::default(),
            automata: AutomataConfig::full_pipeline(),
            cull_threshold: DEFAULT_CULL_THRESHOLD,
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.noise.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), GenError> {
        if self.width < 0 || self.height < 0 {
            return Err(GenError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        self.automata.validate()?;
        self.noise.validate()
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self::full_pipeline(100, 100)
    }
}

/// Summary statistics of one noise fill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseStats {
    pub lowest: f64,
    pub highest: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl NoiseStats {
    fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            lowest: samples.iter().copied().fold(f64::INFINITY, f64::min),
            highest: samples.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean,
            std_dev: variance.sqrt(),
        })
    }
}

/// Owns a grid while it is being generated
pub struct TerrainGenerator {
    settings: GeneratorSettings,
    noise: Option<Box<dyn NoiseField>>,
    rng: StdRng,
    grid: Grid,
}

impl TerrainGenerator {
    /// Generator backed by Perlin noise built from `settings.noise`
    pub fn new(settings: GeneratorSettings) -> Result<Self, GenError> {
        settings.validate()?;
        let field = PerlinField::new(&settings.noise)?;
        Self::with_noise_field(settings, Box::new(field))
    }

    /// Generator backed by a caller-supplied noise field
    pub fn with_noise_field(
        settings: GeneratorSettings,
        field: Box<dyn NoiseField>,
    ) -> Result<Self, GenError> {
        let mut generator = Self::without_noise(settings)?;
        generator.noise = Some(field);
        Ok(generator)
    }

    /// Generator with no noise provider; only the post-fill passes work
    pub fn without_noise(settings: GeneratorSettings) -> Result<Self, GenError> {
        settings.validate()?;
        let grid = Grid::new(settings.width, settings.height)?;
        Ok(Self {
            rng: StdRng::seed_from_u64(settings.noise.seed as u64),
            noise: None,
            settings,
            grid,
        })
    }

    /// Continue working on an existing grid
    pub fn from_grid(grid: Grid, automata: AutomataConfig, cull_threshold: usize) -> Result<Self, GenError> {
        let settings = GeneratorSettings {
            width: grid.width(),
            height: grid.height(),
            noise: NoiseConfig::default(),
            automata,
            cull_threshold,
        };
        let mut generator = Self::without_noise(settings)?;
        generator.grid = grid;
        Ok(generator)
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Reset every cell to open
    pub fn allocate(&mut self) -> Result<(), GenError> {
        self.grid = Grid::new(self.settings.width, self.settings.height)?;
        Ok(())
    }

    /// Threshold one noise sample per cell into wall or open
    pub fn random_fill(&mut self) -> Result<NoiseStats, GenError> {
        let noise = self.noise.as_ref().ok_or(GenError::MissingNoiseProvider)?;
        let (width, height) = (self.grid.width() as f64, self.grid.height() as f64);

        let mut samples = Vec::with_capacity(self.grid.len());
        let cells = (0..self.grid.len())
            .map(|idx| {
                let (x, y) = self.grid.idx_to_xy(idx);
                let value = noise.sample(x as f64 / width, y as f64 / height);
                samples.push(value);
                if value > WALL_THRESHOLD {
                    TileType::Wall
                } else {
                    TileType::Open
                }
            })
            .collect();
        self.grid.replace_cells(cells);

        let stats = NoiseStats::from_samples(&samples).unwrap_or(NoiseStats {
            lowest: 0.0,
            highest: 0.0,
            mean: 0.0,
            std_dev: 0.0,
        });
        log::debug!(
            "Noise fill: lowest {:.3}, highest {:.3}, mid point {:.3}, average {:.3}, std dev {:.3}",
            stats.lowest,
            stats.highest,
            (stats.highest + stats.lowest) / 2.0,
            stats.mean,
            stats.std_dev
        );
        Ok(stats)
    }

    /// One cellular automata pass over the current grid
    pub fn smooth_once(&mut self) {
        self.grid = automata::smooth(&self.grid, &self.settings.automata, &mut self.rng);
    }

    /// Run the configured number of smoothing passes
    pub fn smooth(&mut self) {
        for _ in 0..self.settings.automata.loops {
            self.smooth_once();
        }
    }

    pub fn stamp_border(&mut self) {
        self.grid.stamp_border();
    }

    pub fn regions(&self) -> Vec<Region> {
        regions::identify_regions(&self.grid)
    }

    pub fn region_count(&self) -> usize {
        self.regions().len()
    }

    /// Fill every region smaller than `min_size` with wall. Returns the number culled.
    pub fn cull_small_regions(&mut self, min_size: usize) -> usize {
        let mut culled = 0;
        for region in self.regions().iter().filter(|r| r.len() < min_size) {
            for pos in region.cells() {
                self.grid.set(pos.x, pos.y, TileType::Wall);
            }
            culled += 1;
        }
        log::debug!("Culled {} regions below {} cells", culled, min_size);
        culled
    }

    /// Carve corridors chaining every region together. Returns the corridor count.
    pub fn resolve_regions(&mut self) -> usize {
        let regions = self.regions();
        log::debug!("Resolving {} regions", regions.len());
        carve::connect_sequential(&regions, &mut self.grid);
        regions.len().saturating_sub(1)
    }

    /// Cells that belong to a region smaller than `min_size`
    pub fn highlight_small_regions(&self, min_size: usize) -> Vec<bool> {
        regions::cells_in_small_regions(&self.grid, min_size)
    }

    /// Region label of every cell, for diagnostic colouring
    pub fn highlight_all_regions(&self) -> Vec<Option<usize>> {
        regions::region_labels(&self.grid)
    }

    /// Fill, smooth and stamp the border; regions are left as they fall
    pub fn generate_woods(&mut self) -> Result<Grid, GenError> {
        if self.noise.is_none() {
            return Err(GenError::MissingNoiseProvider);
        }
        self.allocate()?;
        if self.grid.is_empty() {
            return Ok(self.grid.clone());
        }
        self.random_fill()?;
        self.smooth();
        self.stamp_border();
        Ok(self.grid.clone())
    }

    /// Full pipeline: fill, smooth, border, cull, then connect what is left
    pub fn generate(&mut self) -> Result<Grid, GenError> {
        self.generate_woods()?;
        if self.grid.is_empty() {
            log::debug!("Empty {}x{} grid requested", self.grid.width(), self.grid.height());
            return Ok(self.grid.clone());
        }

        let culled = self.cull_small_regions(self.settings.cull_threshold);
        let corridors = self.resolve_regions();

        log::info!(
            "Generated {}x{} woods (seed {}): culled {} regions, carved {} corridors, {} open cells",
            self.grid.width(),
            self.grid.height(),
            self.settings.noise.seed,
            culled,
            corridors,
            self.grid.open_count()
        );
        Ok(self.grid.clone())
    }

    /// Random open cell using the generator's seeded RNG
    pub fn find_random_walkable(&mut self) -> Option<Position> {
        let pos = self.grid.find_random_walkable(&mut self.rng);
        if pos.is_none() {
            log::warn!("No walkable tile available on generated map");
        }
        pos
    }

    pub fn find_first_walkable(&self) -> Option<Position> {
        self.grid.find_first_walkable()
    }
}
