//! Configuration loading and typed config structures for the Ameba simulation.
//!
//! The configuration lives in `ameba-config.yaml` at the project root.
//! Every section and every field is optional. Anything left out falls
//! back to the defaults documented on the field.

use std::path::{Path, PathBuf};

use ameba_agents::OrganismConfig;
use ameba_world::Hazard;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `ameba-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Arena, timing and population size.
    #[serde(default)]
    pub world: WorldConfig,

    /// Nutrient replenishment and the population floor.
    #[serde(default)]
    pub balance: BalanceConfig,

    /// Wall placement.
    #[serde(default)]
    pub hazards: HazardConfig,

    /// Every organism tunable.
    #[serde(default)]
    pub organism: OrganismConfig,

    /// Snapshot and dataset output.
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Log filter.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that deserialize but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let points = self.organism.traits.temperament_points;
        if !points.is_finite() || points < 0.0 {
            return Err(ConfigError::Invalid {
                field: "organism.traits.temperament_points",
                reason: format!("must be a finite non-negative number, got {points}"),
            });
        }
        Ok(())
    }
}

/// Arena and timing configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Arena width in world units.
    #[serde(default = "default_arena_size")]
    pub width: f64,

    /// Arena height in world units.
    #[serde(default = "default_arena_size")]
    pub height: f64,

    /// Simulated seconds per tick.
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: f64,

    /// Real-time milliseconds slept between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Stop after this many ticks (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,

    /// Number of fresh organisms spawned at start.
    #[serde(default = "default_initial_organisms")]
    pub initial_organisms: usize,

    /// Maximum live organism slots, corpses included.
    #[serde(default = "default_pool_capacity")]
    pub organism_capacity: usize,

    /// Maximum live nutrient slots.
    #[serde(default = "default_pool_capacity")]
    pub nutrient_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            width: default_arena_size(),
            height: default_arena_size(),
            tick_seconds: default_tick_seconds(),
            tick_interval_ms: default_tick_interval_ms(),
            max_ticks: 0,
            initial_organisms: default_initial_organisms(),
            organism_capacity: default_pool_capacity(),
            nutrient_capacity: default_pool_capacity(),
        }
    }
}

/// World balancing configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BalanceConfig {
    /// Nutrients are replenished up to this count.
    #[serde(default = "default_max_food")]
    pub max_food: usize,

    /// Energy value of each new nutrient.
    #[serde(default = "default_nutrient_energy")]
    pub nutrient_energy: f64,

    /// Simulated seconds between balancing passes.
    #[serde(default = "default_balance_interval")]
    pub interval_seconds: f64,

    /// Respawn fresh organisms up to this many living ones (0 = off).
    #[serde(default)]
    pub min_organisms: usize,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            max_food: default_max_food(),
            nutrient_energy: default_nutrient_energy(),
            interval_seconds: default_balance_interval(),
            min_organisms: 0,
        }
    }
}

/// Wall configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HazardConfig {
    /// Surround the arena with four walls.
    #[serde(default = "default_true")]
    pub enclose: bool,

    /// Thickness of the enclosing walls.
    #[serde(default = "default_wall_thickness")]
    pub wall_thickness: f64,

    /// Extra walls inside the arena.
    #[serde(default)]
    pub walls: Vec<Hazard>,
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            enclose: true,
            wall_thickness: default_wall_thickness(),
            walls: Vec::new(),
        }
    }
}

impl HazardConfig {
    /// Every wall of an arena of the given size.
    pub fn zones(&self, world: &WorldConfig) -> Vec<Hazard> {
        let mut zones = if self.enclose {
            Hazard::enclosure(world.width, world.height, self.wall_thickness)
        } else {
            Vec::new()
        };
        zones.extend_from_slice(&self.walls);
        zones
    }
}

/// Snapshot persistence configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PersistenceConfig {
    /// Write snapshots at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directory holding the session directories and the dataset.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// File name of the cumulative dataset inside `base_dir`.
    #[serde(default = "default_dataset_file")]
    pub dataset_file: String,

    /// Lives at or below this many seconds are not kept.
    #[serde(default = "default_min_time_alive")]
    pub min_time_alive: f64,

    /// Also checkpoint an organism every tick it learns something.
    #[serde(default)]
    pub persist_on_learn: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_dir: default_base_dir(),
            dataset_file: default_dataset_file(),
            min_time_alive: default_min_time_alive(),
            persist_on_learn: false,
        }
    }
}

impl PersistenceConfig {
    /// Full path of the cumulative dataset.
    pub fn dataset_path(&self) -> PathBuf {
        self.base_dir.join(&self.dataset_file)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is unset (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

const fn default_true() -> bool {
    true
}

const fn default_seed() -> u64 {
    42
}

const fn default_arena_size() -> f64 {
    40.0
}

const fn default_tick_seconds() -> f64 {
    0.1
}

const fn default_tick_interval_ms() -> u64 {
    50
}

const fn default_initial_organisms() -> usize {
    30
}

const fn default_pool_capacity() -> usize {
    256
}

const fn default_max_food() -> usize {
    100
}

const fn default_nutrient_energy() -> f64 {
    10.0
}

const fn default_balance_interval() -> f64 {
    0.5
}

const fn default_wall_thickness() -> f64 {
    1.0
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("sim_data")
}

fn default_dataset_file() -> String {
    "Global_Dataset.csv".to_owned()
}

const fn default_min_time_alive() -> f64 {
    1.0
}

fn default_log_level() -> String {
    "info".to_owned()
}
