//! # Generation Module
//!
//! Random board generation.
//!
//! A board is generated by picking a palette of distinct type ids from the sprite catalog
//! and filling every cell with a uniform draw from that palette. Generation alone does not
//! guarantee that every type appears an even number of times; when
//! [`GenerationConfig::ensure_solvable`] is set the generator keeps drawing boards until at
//! least one pair connects.

use crate::config::{
    DEFAULT_COLS, DEFAULT_ROWS, DEFAULT_TYPE_COUNT, MAX_GENERATION_ATTEMPTS, SPRITE_CATALOG_SIZE,
};
use crate::{Grid, PairlinkError, PairlinkResult, PathFinder, TypeId, EMPTY};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How cells are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Every cell holds a tile
    Classic,
    /// One extra palette slot stands for EMPTY, so about `1 / (type_count + 1)` of the
    /// cells start empty
    Ingredient,
}

impl std::str::FromStr for GenerationMode {
    type Err = PairlinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" => Ok(GenerationMode::Classic),
            "ingredient" => Ok(GenerationMode::Ingredient),
            other => Err(PairlinkError::InvalidAction(format!(
                "unknown generation mode '{}'",
                other
            ))),
        }
    }
}

/// Configuration for board generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible boards; `None` draws from OS entropy
    pub seed: Option<u64>,
    /// Board height in cells
    pub rows: usize,
    /// Board width in cells
    pub cols: usize,
    /// Number of distinct tile types on the board
    pub type_count: usize,
    /// Type ids are drawn from `0..catalog_size`
    pub catalog_size: usize,
    /// Fill strategy
    pub mode: GenerationMode,
    /// Redraw boards until at least one pair connects
    pub ensure_solvable: bool,
    /// Boards drawn before giving up on a solvable layout
    pub max_attempts: u32,
}

impl GenerationConfig {
    /// Creates an unseeded classic configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairlink::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(4, 6, 4);
    /// assert_eq!(config.rows, 4);
    /// assert!(config.seed.is_none());
    /// ```
    pub fn new(rows: usize, cols: usize, type_count: usize) -> Self {
        Self {
            seed: None,
            rows,
            cols,
            type_count,
            catalog_size: SPRITE_CATALOG_SIZE,
            mode: GenerationMode::Classic,
            ensure_solvable: true,
            max_attempts: MAX_GENERATION_ATTEMPTS,
        }
    }

    /// Creates a small seeded configuration for tests.
    pub fn for_testing(seed: u64) -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS, DEFAULT_TYPE_COUNT).with_seed(seed)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Checks dimensions and palette size.
    pub fn validate(&self) -> PairlinkResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(PairlinkError::GenerationFailed(format!(
                "board must have at least one cell, got {}x{}",
                self.rows, self.cols
            )));
        }
        if self.rows > i32::MAX as usize || self.cols > i32::MAX as usize {
            return Err(PairlinkError::GenerationFailed(format!(
                "board {}x{} is too large",
                self.rows, self.cols
            )));
        }
        if self.type_count == 0 || self.type_count > self.catalog_size {
            return Err(PairlinkError::GenerationFailed(format!(
                "type count {} must be between 1 and the catalog size {}",
                self.type_count, self.catalog_size
            )));
        }
        if self.catalog_size > TypeId::MAX as usize {
            return Err(PairlinkError::GenerationFailed(format!(
                "catalog size {} exceeds the type id range",
                self.catalog_size
            )));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS, DEFAULT_TYPE_COUNT)
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> PairlinkResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> PairlinkResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Fills a grid with uniform draws from a random palette.
#[derive(Debug, Clone, Default)]
pub struct BoardGenerator;

impl BoardGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Picks `type_count` distinct ids from the catalog.
    pub fn palette(&self, config: &GenerationConfig, rng: &mut StdRng) -> Vec<TypeId> {
        index::sample(rng, config.catalog_size, config.type_count)
            .into_iter()
            .map(|i| i as TypeId)
            .collect()
    }

    /// Draws one board without any solvability check.
    pub fn fill(
        &self,
        config: &GenerationConfig,
        palette: &[TypeId],
        rng: &mut StdRng,
    ) -> PairlinkResult<Grid> {
        let slots = match config.mode {
            GenerationMode::Classic => palette.len(),
            GenerationMode::Ingredient => palette.len() + 1,
        };
        let cells = (0..config.rows * config.cols)
            .map(|_| palette.get(rng.gen_range(0..slots)).copied().unwrap_or(EMPTY))
            .collect();
        Grid::from_cells(config.rows, config.cols, cells)
    }
}

impl Generator<Grid> for BoardGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> PairlinkResult<Grid> {
        config.validate()?;

        let attempts = config.max_attempts.max(1);
        for attempt in 1..=attempts {
            let palette = self.palette(config, rng);
            let grid = self.fill(config, &palette, rng)?;

            if !config.ensure_solvable || utils::grid_is_solvable(&grid) {
                self.validate(&grid, config)?;
                info!(
                    "Generated {}x{} {:?} board with {} types after {} attempt(s)",
                    config.rows, config.cols, config.mode, config.type_count, attempt
                );
                return Ok(grid);
            }
            debug!("Board attempt {} has no connectable pair, redrawing", attempt);
        }

        Err(PairlinkError::GenerationFailed(format!(
            "no solvable {}x{} board after {} attempts",
            config.rows, config.cols, attempts
        )))
    }

    fn validate(&self, grid: &Grid, config: &GenerationConfig) -> PairlinkResult<()> {
        if grid.rows() != config.rows || grid.cols() != config.cols {
            return Err(PairlinkError::GenerationFailed(format!(
                "generated {}x{} grid, expected {}x{}",
                grid.rows(),
                grid.cols(),
                config.rows,
                config.cols
            )));
        }
        let catalog = config.catalog_size as TypeId;
        for &value in grid.cells() {
            let valid = match config.mode {
                GenerationMode::Classic => (0..catalog).contains(&value),
                GenerationMode::Ingredient => value == EMPTY || (0..catalog).contains(&value),
            };
            if !valid {
                return Err(PairlinkError::GenerationFailed(format!(
                    "cell value {} is not allowed in {:?} mode",
                    value, config.mode
                )));
            }
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "palette"
    }
}

/// Generates a classic board of `rows × cols` cells with `type_count` types.
///
/// # Examples
///
/// ```
/// use pairlink::generate_grid;
///
/// let a = generate_grid(4, 6, 4, Some(7)).unwrap();
/// let b = generate_grid(4, 6, 4, Some(7)).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn generate_grid(
    rows: usize,
    cols: usize,
    type_count: usize,
    seed: Option<u64>,
) -> PairlinkResult<Grid> {
    let mut config = GenerationConfig::new(rows, cols, type_count);
    config.seed = seed;
    let mut rng = utils::create_rng(&config);
    BoardGenerator::new().generate(&config, &mut rng)
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use rand::SeedableRng;

    /// Creates a random number generator from the config: seeded when a seed is given,
    /// otherwise from OS entropy.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Whether any two same-type cells of the grid connect.
    pub fn grid_is_solvable(grid: &Grid) -> bool {
        let cells: Vec<_> = grid.occupied().collect();
        PathFinder::new(grid).first_pair(&cells).is_some()
    }
}
