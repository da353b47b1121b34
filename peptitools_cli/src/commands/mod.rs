pub mod augment;
pub mod peptide;
pub mod simulate;

use crate::error::Result;
use peptitools_core::perturbation::config::SimulationConfig;
use std::path::Path;
use tracing::info;

/// Settings from the given TOML file, or the defaults
fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    match path {
        Some(path) => {
            info!("Loading simulation settings from {:?}", path);
            Ok(SimulationConfig::from_toml_file(path)?)
        }
        None => Ok(SimulationConfig::default()),
    }
}
