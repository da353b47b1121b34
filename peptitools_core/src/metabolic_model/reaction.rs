//! This module provides a struct for representing reactions
use crate::configuration::{default_lower_bound, default_upper_bound};
use derive_builder::Builder;
use indexmap::IndexMap;

/// Represents a reaction in the metabolic model
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Reaction {
    /// Used to identify the reaction
    pub id: String,
    /// Metabolite stoichiometry of the reaction
    #[builder(default = "IndexMap::new()")]
    pub metabolites: IndexMap<String, f64>,
    /// Human-readable reaction name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Lower flux bound
    #[builder(default = "default_lower_bound()")]
    pub lower_bound: f64,
    /// Upper flux bound
    #[builder(default = "default_upper_bound()")]
    pub upper_bound: f64,
    /// Reaction subsystem
    #[builder(default = "None")]
    pub subsystem: Option<String>,
    /// Notes about the reaction
    #[builder(default = "None")]
    pub notes: Option<String>,
    /// Reaction Annotations
    #[builder(default = "None")]
    pub annotation: Option<String>,
    /// Gene-protein-reaction rule, such as `b0001 and b0002`, empty when unknown
    #[builder(default = "String::new()")]
    pub gene_reaction_rule: String,
}

impl Reaction {
    /// Whether this is a boundary reaction exchanging a single metabolite with the environment
    pub fn is_exchange(&self) -> bool {
        self.metabolites.len() == 1
    }

    /// Coefficient of a metabolite in this reaction, if it participates
    pub fn coefficient(&self, metabolite_id: &str) -> Option<f64> {
        self.metabolites.get(metabolite_id).copied()
    }

    /// Whether the bounds describe a non-empty flux interval
    pub(crate) fn has_valid_bounds(&self) -> bool {
        self.lower_bound <= self.upper_bound
    }
}
