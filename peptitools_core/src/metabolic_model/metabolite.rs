//! This module provides the metabolite struct representing a metabolite

use std::hash::Hash;

use derive_builder::Builder;

/// Represents a metabolite
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Metabolite {
    /// Used to identify the metabolite (must be unique)
    pub id: String,
    /// Human Readable name of the metabolite
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Which compartment the metabolite is in
    #[builder(default = "None")]
    pub compartment: Option<String>,
    /// Electrical charge of the Metabolite
    #[builder(default = "0")]
    pub charge: i32,
    /// Chemical Formula of the metabolite
    #[builder(default = "None")]
    pub formula: Option<String>,
    /// Notes about the metabolite
    #[builder(default = "None")]
    pub notes: Option<String>,
    /// Metabolite annotations
    #[builder(default = "None")]
    pub annotation: Option<String>,
}

impl Metabolite {
    /// Create a metabolite with a name, tagged with a compartment
    pub fn new(id: &str, name: &str, compartment: &str) -> Self {
        Metabolite {
            id: id.to_string(),
            name: Some(name.to_string()),
            compartment: Some(compartment.to_string()),
            charge: 0,
            formula: None,
            notes: None,
            annotation: None,
        }
    }
}

impl Hash for Metabolite {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state); // Hash by id
                             // If the metabolite has an associated compartment, also hash by that
        if let Some(ref compartment) = self.compartment {
            compartment.hash(state)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let met = MetaboliteBuilder::default()
            .id("atp_c".to_string())
            .build()
            .unwrap();
        assert_eq!(met.id, "atp_c");
        assert_eq!(met.charge, 0);
        assert!(met.compartment.is_none());
    }

    #[test]
    fn new_sets_compartment() {
        let met = Metabolite::new("inhibitor_e", "Inhibitor (extracellular)", "e");
        assert_eq!(met.compartment.as_deref(), Some("e"));
        assert_eq!(met.name.as_deref(), Some("Inhibitor (extracellular)"));
    }
}
