use peptitools_core::io::json::JsonError;
use peptitools_core::peptide::PeptideError;
use peptitools_core::perturbation::augment::AugmentError;
use peptitools_core::perturbation::config::ConfigError;
use peptitools_core::perturbation::dose_response::SimulationError;
use peptitools_core::report::ReportError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Unable to load model: {0}")]
    Model(#[from] JsonError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Augmentation failed: {0}")]
    Augment(#[from] AugmentError),

    #[error("Simulation failed: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Unable to write results: {0}")]
    Report(#[from] ReportError),

    #[error("Invalid peptide: {0}")]
    Peptide(#[from] PeptideError),

    #[error("Unable to format output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),
}
