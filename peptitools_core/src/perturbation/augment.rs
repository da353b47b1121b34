//! Extend a metabolic model with the DNA gyrase inhibition sub-network
//!
//! The sub-network consists of
//! - `DNA_GYRASE`: relaxed DNA to negatively supercoiled DNA, capacity limited
//! - `EX_inhibitor_e`: exchange of the inhibitor with the medium
//! - `INHIBITORt`: transport of the inhibitor into the cytosol
//! - `GYRASE_INHIBITOR_BINDING`: the inhibitor trapping gyrase on relaxed DNA as a cleavage complex
//!
//! When growth is the objective, the biomass reaction is made to consume supercoiled DNA and
//! return relaxed DNA, so limiting gyrase flux limits growth.
use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::model::{Model, ModelError};
use crate::metabolic_model::reaction::{Reaction, ReactionBuilder, ReactionBuilderError};
use crate::perturbation::config::{AugmentConfig, ConfigError};

/// Reaction whose upper flux bound the inhibitor scales down
pub const ENZYME_REACTION: &str = "DNA_GYRASE";
pub const INHIBITOR_EXCHANGE: &str = "EX_inhibitor_e";
pub const INHIBITOR_TRANSPORT: &str = "INHIBITORt";
pub const INHIBITOR_BINDING: &str = "GYRASE_INHIBITOR_BINDING";

/// Substrate of the gyrase reaction
pub const ENZYME_SUBSTRATE: &str = "dna_relaxed_c";
/// Product of the gyrase reaction, consumed by biomass
pub const ENZYME_PRODUCT: &str = "dna_supercoiled_c";
pub const INHIBITOR_EXTRACELLULAR: &str = "inhibitor_e";
pub const INHIBITOR_CYTOSOLIC: &str = "inhibitor_c";
pub const CLEAVAGE_COMPLEX: &str = "gyrase_inhibitor_complex_c";

/// Outcome of [`NetworkAugmentor::augment`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Augmentation {
    /// The sub-network was added
    Applied,
    /// The model already carried the sub-network and was left untouched
    AlreadyAugmented,
}

/// Adds the inhibition sub-network to a model
#[derive(Debug, Clone, Default)]
pub struct NetworkAugmentor {
    config: AugmentConfig,
}

impl NetworkAugmentor {
    pub fn new(config: AugmentConfig) -> Self {
        NetworkAugmentor { config }
    }

    pub fn config(&self) -> &AugmentConfig {
        &self.config
    }

    /// Whether the model already contains the sub-network
    pub fn is_augmented(model: &Model) -> bool {
        model.has_reaction(ENZYME_REACTION)
    }

    /// Augment the model in place
    ///
    /// The model is only modified if every step succeeds. Running this on an augmented model
    /// returns [`Augmentation::AlreadyAugmented`] and changes nothing.
    #[instrument(skip_all, fields(model = model.id.as_deref().unwrap_or("unnamed")))]
    pub fn augment(&self, model: &mut Model) -> Result<Augmentation, AugmentError> {
        if Self::is_augmented(model) {
            debug!("model already carries the gyrase sub-network");
            return Ok(Augmentation::AlreadyAugmented);
        }
        self.config.validate()?;

        let biomass = self.biomass_reaction(model)?;
        for id in [
            self.config.glucose_exchange.as_str(),
            self.config.oxygen_exchange.as_str(),
            biomass.as_str(),
        ] {
            if !model.has_reaction(id) {
                return Err(AugmentError::MissingReaction(id.to_string()));
            }
        }

        // Work on a copy so a failure part way through leaves the caller's model intact
        let mut augmented = model.clone();
        augmented.add_metabolites(self.metabolites())?;
        augmented.add_reactions(self.reactions()?)?;
        limit_uptake(
            &mut augmented,
            &self.config.glucose_exchange,
            self.config.glucose_uptake_bound,
        )?;
        limit_uptake(
            &mut augmented,
            &self.config.oxygen_exchange,
            self.config.oxygen_uptake_bound,
        )?;

        let growth_coupled = augmented
            .objective
            .get(&biomass)
            .is_some_and(|coef| *coef != 0.0);
        if growth_coupled {
            let cost = self.config.enzyme_product_cost;
            let reaction = augmented.reaction_mut(&biomass)?;
            // Supercoiled DNA is consumed and relaxed DNA released, closing the cycle
            reaction
                .metabolites
                .entry(ENZYME_PRODUCT.to_string())
                .or_insert(-cost);
            reaction
                .metabolites
                .entry(ENZYME_SUBSTRATE.to_string())
                .or_insert(cost);
        } else {
            debug!(
                biomass = biomass.as_str(),
                "biomass reaction is not the objective, growth is not coupled to gyrase"
            );
        }

        *model = augmented;
        info!(
            biomass = biomass.as_str(),
            growth_coupled,
            capacity = self.config.enzyme_capacity,
            "added gyrase inhibition sub-network"
        );
        Ok(Augmentation::Applied)
    }

    /// Augment an owned model and hand it back
    pub fn augmented(&self, mut model: Model) -> Result<Model, AugmentError> {
        self.augment(&mut model)?;
        Ok(model)
    }

    /// The configured biomass reaction, or the model's objective reaction
    pub fn biomass_reaction(&self, model: &Model) -> Result<String, AugmentError> {
        match &self.config.biomass_reaction {
            Some(id) => Ok(id.clone()),
            None => model
                .objective_reaction_ids()
                .next()
                .map(str::to_string)
                .ok_or(AugmentError::MissingObjective),
        }
    }

    fn metabolites(&self) -> Vec<Metabolite> {
        vec![
            Metabolite::new(ENZYME_SUBSTRATE, "Relaxed DNA", "c"),
            Metabolite::new(ENZYME_PRODUCT, "Negatively supercoiled DNA", "c"),
            Metabolite::new(INHIBITOR_EXTRACELLULAR, "Gyrase inhibitor", "e"),
            Metabolite::new(INHIBITOR_CYTOSOLIC, "Gyrase inhibitor", "c"),
            Metabolite::new(CLEAVAGE_COMPLEX, "Gyrase-DNA-inhibitor cleavage complex", "c"),
        ]
    }

    fn reactions(&self) -> Result<Vec<Reaction>, AugmentError> {
        let gyrase = ReactionBuilder::default()
            .id(ENZYME_REACTION.to_string())
            .name(Some("DNA gyrase".to_string()))
            .metabolites(stoichiometry(&[(ENZYME_SUBSTRATE, -1.0), (ENZYME_PRODUCT, 1.0)]))
            .lower_bound(0.0)
            .upper_bound(self.config.enzyme_capacity)
            .subsystem(Some("DNA replication".to_string()))
            .build()?;
        let exchange = ReactionBuilder::default()
            .id(INHIBITOR_EXCHANGE.to_string())
            .name(Some("Gyrase inhibitor exchange".to_string()))
            .metabolites(stoichiometry(&[(INHIBITOR_EXTRACELLULAR, -1.0)]))
            .subsystem(Some("Extracellular exchange".to_string()))
            .build()?;
        let transport = ReactionBuilder::default()
            .id(INHIBITOR_TRANSPORT.to_string())
            .name(Some("Gyrase inhibitor transport".to_string()))
            .metabolites(stoichiometry(&[
                (INHIBITOR_EXTRACELLULAR, -1.0),
                (INHIBITOR_CYTOSOLIC, 1.0),
            ]))
            .lower_bound(0.0)
            .subsystem(Some("Transport, outer membrane".to_string()))
            .build()?;
        let binding = ReactionBuilder::default()
            .id(INHIBITOR_BINDING.to_string())
            .name(Some("Gyrase inhibitor binding".to_string()))
            .metabolites(stoichiometry(&[
                (INHIBITOR_CYTOSOLIC, -1.0),
                (ENZYME_SUBSTRATE, -1.0),
                (CLEAVAGE_COMPLEX, 1.0),
            ]))
            .lower_bound(0.0)
            .subsystem(Some("DNA replication".to_string()))
            .build()?;
        Ok(vec![gyrase, exchange, transport, binding])
    }
}

fn limit_uptake(model: &mut Model, exchange: &str, bound: f64) -> Result<(), AugmentError> {
    let reaction = model.reaction_mut(exchange)?;
    if !reaction.is_exchange() {
        warn!(exchange, "uptake limit applied to a reaction that is not an exchange");
    }
    reaction.lower_bound = -bound;
    if reaction.upper_bound < reaction.lower_bound {
        reaction.upper_bound = reaction.lower_bound;
    }
    debug!(exchange, bound, "limited uptake");
    Ok(())
}

fn stoichiometry(entries: &[(&str, f64)]) -> IndexMap<String, f64> {
    entries
        .iter()
        .map(|(id, coef)| (id.to_string(), *coef))
        .collect()
}

#[derive(Debug, Error)]
pub enum AugmentError {
    #[error("Reaction {0} is required for augmentation but missing from the model")]
    MissingReaction(String),
    #[error("No biomass reaction configured and the model has no objective")]
    MissingObjective,
    #[error("Unable to build reaction: {0}")]
    UnableToBuildReaction(#[from] ReactionBuilderError),
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::solvers::ClarabelSolver;
    use crate::optimize::ObjectiveValue;
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
    fn adds_subnetwork() {
        let mut model = toy_model();
        let status = NetworkAugmentor::default().augment(&mut model).unwrap();
        assert_eq!(status, Augmentation::Applied);
        for id in [
            ENZYME_REACTION,
            INHIBITOR_EXCHANGE,
            INHIBITOR_TRANSPORT,
            INHIBITOR_BINDING,
        ] {
            assert!(model.has_reaction(id), "{} missing", id);
        }
        for id in [
            ENZYME_SUBSTRATE,
            ENZYME_PRODUCT,
            INHIBITOR_EXTRACELLULAR,
            INHIBITOR_CYTOSOLIC,
            CLEAVAGE_COMPLEX,
        ] {
            assert!(model.has_metabolite(id), "{} missing", id);
        }
        let gyrase = model.reaction(ENZYME_REACTION).unwrap();
        assert_eq!(gyrase.lower_bound, 0.0);
        assert!((gyrase.upper_bound - 0.01).abs() < 1e-12);
        assert_eq!(gyrase.coefficient(ENZYME_SUBSTRATE), Some(-1.0));
        assert_eq!(gyrase.coefficient(ENZYME_PRODUCT), Some(1.0));
    }

    #[test]
    fn sets_uptake_bounds_and_keeps_objective() {
        let mut model = toy_model();
        let objective_before = model.objective.clone();
        NetworkAugmentor::default().augment(&mut model).unwrap();
        assert_eq!(model.reaction("EX_glc__D_e").unwrap().lower_bound, -10.0);
        assert_eq!(model.reaction("EX_o2_e").unwrap().lower_bound, -20.0);
        assert_eq!(model.objective, objective_before);
        assert!(model.reaction("EX_glc__D_e").unwrap().is_exchange());
    }

    #[test]
    fn uptake_limit_on_a_non_exchange_reaction_still_applies() {
        let mut model = toy_model();
        let augmentor = NetworkAugmentor::new(AugmentConfig {
            glucose_exchange: "RESP".to_string(),
            ..AugmentConfig::default()
        });
        augmentor.augment(&mut model).unwrap();
        let resp = model.reaction("RESP").unwrap();
        assert!(!resp.is_exchange());
        assert_eq!(resp.lower_bound, -10.0);
    }

    #[test]
    fn couples_biomass_to_supercoiled_dna() {
        let mut model = toy_model();
        NetworkAugmentor::default().augment(&mut model).unwrap();
        let biomass = model.reaction("BIOMASS").unwrap();
        assert_eq!(biomass.coefficient(ENZYME_PRODUCT), Some(-0.005));
        assert_eq!(biomass.coefficient(ENZYME_SUBSTRATE), Some(0.005));
        assert_eq!(biomass.coefficient("atp_c"), Some(-100.0));
    }

    #[test]
    fn second_augmentation_changes_nothing() {
        let mut model = toy_model();
        let augmentor = NetworkAugmentor::default();
        augmentor.augment(&mut model).unwrap();
        let once = model.clone();
        assert_eq!(
            augmentor.augment(&mut model).unwrap(),
            Augmentation::AlreadyAugmented
        );
        assert_eq!(model, once);
        assert_eq!(model.reactions.len(), 11);
        assert_eq!(model.metabolites.len(), 10);
    }

    #[test]
    fn missing_exchange_leaves_model_untouched() {
        let mut model = toy_model();
        let before = model.clone();
        let augmentor = NetworkAugmentor::new(AugmentConfig {
            glucose_exchange: "EX_glc_missing".to_string(),
            ..AugmentConfig::default()
        });
        match augmentor.augment(&mut model) {
            Err(AugmentError::MissingReaction(id)) => assert_eq!(id, "EX_glc_missing"),
            other => panic!("expected a missing reaction error, got {:?}", other),
        }
        assert_eq!(model, before);
    }

    #[test]
    fn model_without_objective_needs_explicit_biomass() {
        let mut model = toy_model();
        model.objective.clear();
        assert!(matches!(
            NetworkAugmentor::default().augment(&mut model),
            Err(AugmentError::MissingObjective)
        ));
    }

    #[test]
    fn no_coupling_when_biomass_is_not_objective() {
        let mut model = toy_model();
        model.set_objective("RESP").unwrap();
        let augmentor = NetworkAugmentor::new(AugmentConfig {
            biomass_reaction: Some("BIOMASS".to_string()),
            ..AugmentConfig::default()
        });
        augmentor.augment(&mut model).unwrap();
        let biomass = model.reaction("BIOMASS").unwrap();
        assert_eq!(biomass.coefficient(ENZYME_PRODUCT), None);
        assert!(model.has_reaction(ENZYME_REACTION));
    }

    #[test]
    fn augmented_model_grows() {
        let model = NetworkAugmentor::default().augmented(toy_model()).unwrap();
        match model.slim_optimize(&ClarabelSolver::default()).unwrap() {
            // Respiration capped by oxygen at 20/6, fermentation on the rest of the glucose
            ObjectiveValue::Optimal(growth) => {
                assert!((growth - 1.1333333).abs() < 1e-4, "growth was {}", growth)
            }
            other => panic!("expected growth, got {:?}", other),
        }
    }
}
