//! One call from a baseline model to dose-response curves
use tracing::instrument;

use crate::metabolic_model::model::Model;
use crate::perturbation::augment::NetworkAugmentor;
use crate::perturbation::config::SimulationConfig;
use crate::perturbation::dose_response::{
    validate_affinity, DoseResponse, DoseResponseEngine, SimulationError,
};

/// Augment a copy of `model` and simulate the subject inhibitor (and optionally the reference)
///
/// Inputs are checked before any work is done; the caller's model is left as it was.
#[instrument(skip(model, config))]
pub fn simulate_growth_inhibition(
    model: &Model,
    config: &SimulationConfig,
    ki_um: f64,
    include_reference: bool,
) -> Result<DoseResponse, SimulationError> {
    validate_affinity(ki_um)?;
    let engine = DoseResponseEngine::new(config.clone())?;
    let augmented = NetworkAugmentor::new(config.augment.clone()).augmented(model.clone())?;
    engine.simulate(&augmented, ki_um, include_reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perturbation::augment::AugmentError;
    use crate::perturbation::config::{AugmentConfig, SweepConfig};
    use crate::perturbation::ic50::Ic50;
    use std::path::PathBuf;

    fn toy_model() -> Model {
        Model::read_json(
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("test_data")
                .join("test_models")
                .join("toy_growth.json"),
        )
        .unwrap()
    }

    #[test]
    fn baseline_model_to_curves() {
        let model = toy_model();
        let response =
            simulate_growth_inhibition(&model, &SimulationConfig::default(), 5.0, true).unwrap();
        assert_eq!(response.curves.len(), 2);
        assert_eq!(response.table.len(), 40);
        assert!(response.curves.iter().all(|c| c.ic50.is_detected()));
        // The baseline model is not augmented
        assert!(!model.has_reaction("DNA_GYRASE"));
    }

    #[test]
    fn weak_inhibitor_over_narrow_range_is_not_detected() {
        let config = SimulationConfig {
            sweep: SweepConfig {
                min_concentration_um: 0.1,
                max_concentration_um: 1.0,
                ..SweepConfig::default()
            },
            ..SimulationConfig::default()
        };
        let response = simulate_growth_inhibition(&toy_model(), &config, 1000.0, false).unwrap();
        assert_eq!(response.curves[0].ic50, Ic50::NotDetected);
    }

    #[test]
    fn errors_surface_before_simulation() {
        let model = toy_model();
        assert!(matches!(
            simulate_growth_inhibition(&model, &SimulationConfig::default(), -3.0, true),
            Err(SimulationError::InvalidAffinity(_))
        ));

        let config = SimulationConfig {
            augment: AugmentConfig {
                oxygen_exchange: "EX_o2_missing".to_string(),
                ..AugmentConfig::default()
            },
            ..SimulationConfig::default()
        };
        assert!(matches!(
            simulate_growth_inhibition(&model, &config, 5.0, true),
            Err(SimulationError::Augment(AugmentError::MissingReaction(_)))
        ));
    }
}
