//! Configuration types for the simulation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// World configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the world grid (East - West)
    pub width: i32,
    /// Height of the world grid (North - South)
    pub height: i32,
}

impl WorldConfig {
    /// Number of cells on the grid
    pub fn capacity(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
        }
    }
}

/// Initial population placed at world creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub initial_fish: usize,
    pub initial_sharks: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_fish: 50,
            initial_sharks: 20,
        }
    }
}

/// Breeding and starvation intervals, in ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeCycleConfig {
    /// Age multiple at which a moving fish leaves a newborn behind
    pub fish_breed_interval: u64,
    /// Age multiple at which a moving shark leaves a newborn behind
    pub shark_breed_interval: u64,
    /// Ticks a shark survives without eating (maximum health)
    pub shark_starvation: u32,
}

impl Default for LifeCycleConfig {
    fn default() -> Self {
        Self {
            fish_breed_interval: 20,
            shark_breed_interval: 40,
            shark_starvation: 15,
        }
    }
}

/// What happens to a fish with no empty neighbouring cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrandedFish {
    /// The fish dies where it stands
    #[default]
    Dies,
    /// The fish stays put and ages normally
    Stays,
}

/// Update rule variants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub stranded_fish: StrandedFish,
}

/// Full run configuration, immutable for the lifetime of a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of ticks to run the simulation
    pub num_ticks: u64,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Ticks between population census log lines (0 disables)
    pub report_interval: u64,
    pub world: WorldConfig,
    pub population: PopulationConfig,
    pub life: LifeCycleConfig,
    pub rules: RuleConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            num_ticks: 1000,
            seed: 0,
            report_interval: 100,
            world: WorldConfig::default(),
            population: PopulationConfig::default(),
            life: LifeCycleConfig::default(),
            rules: RuleConfig::default(),
        }
    }
}

impl RunConfig {
    /// Check the configuration before any world is built
    pub fn validate(&self) -> Result<()> {
        if self.world.width <= 0 || self.world.height <= 0 {
            return Err(Error::Configuration(format!(
                "world dimensions must be positive, got {}x{}",
                self.world.width, self.world.height
            )));
        }

        if self.world.width.checked_mul(self.world.height).is_none() {
            return Err(Error::Configuration(format!(
                "world of {}x{} cells is too large",
                self.world.width, self.world.height
            )));
        }

        if self.life.fish_breed_interval == 0 || self.life.shark_breed_interval == 0 {
            return Err(Error::Configuration(
                "breed intervals must be at least 1 tick".to_string(),
            ));
        }

        if self.life.shark_starvation == 0 {
            return Err(Error::Configuration(
                "shark starvation interval must be at least 1 tick".to_string(),
            ));
        }

        let requested = self.population.initial_fish + self.population.initial_sharks;
        let capacity = self.world.capacity();
        if requested > capacity {
            return Err(Error::Configuration(format!(
                "not enough space for fish and sharks: {} requested, {} cells available",
                requested, capacity
            )));
        }

        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RunConfig = serde_json::from_str(json)?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading run configuration from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let config = RunConfig::default();
        assert_eq!(config.world.width, 20);
        assert_eq!(config.world.height, 20);
        assert_eq!(config.population.initial_fish, 50);
        assert_eq!(config.population.initial_sharks, 20);
        assert_eq!(config.life.fish_breed_interval, 20);
        assert_eq!(config.life.shark_breed_interval, 40);
        assert_eq!(config.life.shark_starvation, 15);
        assert_eq!(config.rules.stranded_fish, StrandedFish::Dies);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_population_must_fit_grid() {
        let mut config = RunConfig::default();
        config.world = WorldConfig {
            width: 3,
            height: 3,
        };
        config.population = PopulationConfig {
            initial_fish: 5,
            initial_sharks: 4,
        };
        assert!(config.validate().is_ok());

        config.population.initial_sharks = 5;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_rejects_degenerate_values() {
        let mut config = RunConfig::default();
        config.world.width = 0;
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        let mut config = RunConfig::default();
        config.life.fish_breed_interval = 0;
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        let mut config = RunConfig::default();
        config.life.shark_starvation = 0;
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_rejects_oversized_world() {
        let mut config = RunConfig::default();
        config.world = WorldConfig {
            width: 50_000,
            height: 50_000,
        };
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        // Just past i32::MAX cells
        config.world = WorldConfig {
            width: 46_341,
            height: 46_341,
        };
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        config.world = WorldConfig {
            width: 40_000,
            height: 50_000,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "seed": 7,
            "world": { "width": 32 },
            "rules": { "stranded_fish": "stays" }
        }"#;
        let config = RunConfig::from_json_str(json).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.world.width, 32);
        assert_eq!(config.world.height, 20);
        assert_eq!(config.rules.stranded_fish, StrandedFish::Stays);
        assert_eq!(config.life, LifeCycleConfig::default());
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let err = RunConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_config_serialization() {
        let config = RunConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
