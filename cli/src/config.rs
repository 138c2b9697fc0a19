//! Simulation configuration from TOML plus command-line overrides
//!
//! A config file uses the same keys as `OrchestratorConfig`; anything it
//! leaves out keeps its default:
//!
//! ```toml
//! num_desks = 4
//! num_customers = 25
//! service_duration = 3.0
//! rng_seed = 42
//! queue_metric = "in_line"
//!
//! [walk_time]
//! min = 0.5
//! max = 2.0
//!
//! [arrivals]
//! type = "uniform_gap"
//! gap = { min = 0.0, max = 1.5 }
//! ```

use std::path::Path;
use thiserror::Error;
use ticket_desk_simulator_core_rs::OrchestratorConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Load configuration from a TOML file at the given path.
pub fn load_config(path: &Path) -> Result<OrchestratorConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        tracing::error!("Failed to read config file '{}': {}", path.display(), e);
        ConfigError::Io(e)
    })?;
    toml::from_str(&contents).map_err(|e| {
        tracing::error!("Failed to parse config TOML: {}", e);
        ConfigError::Toml(e)
    })
}

/// Values given on the command line; each one replaces the file's value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub desks: Option<usize>,
    pub customers: Option<usize>,
    pub service_duration: Option<f64>,
    pub seed: Option<u64>,
}

impl Overrides {
    pub fn apply(&self, config: &mut OrchestratorConfig) {
        if let Some(desks) = self.desks {
            config.num_desks = desks;
        }
        if let Some(customers) = self.customers {
            config.num_customers = customers;
        }
        if let Some(service_duration) = self.service_duration {
            config.service_duration = service_duration;
        }
        if let Some(seed) = self.seed {
            config.rng_seed = Some(seed);
        }
    }
}

/// File config (or defaults) with overrides applied
pub fn resolve(
    path: Option<&Path>,
    overrides: &Overrides,
) -> Result<OrchestratorConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => OrchestratorConfig::default(),
    };
    overrides.apply(&mut config);
    Ok(config)
}
