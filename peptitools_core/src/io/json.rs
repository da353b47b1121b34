//! Module providing JSON IO for Models, using the COBRA json model layout
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::model::{Model, ModelError};
use crate::metabolic_model::reaction::{Reaction, ReactionBuilder, ReactionBuilderError};

// region JSON Model
/// Represents a JSON serialized model, used for reading and writing models in json format
#[derive(Serialize, Deserialize)]
struct JsonModel {
    metabolites: Vec<JsonMetabolite>,
    reactions: Vec<JsonReaction>,
    /// Gene records play no part in simulation but are written back out
    #[serde(default)]
    genes: Vec<Value>,
    id: Option<String>,
    compartments: Option<IndexMap<String, String>>,
    version: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct JsonMetabolite {
    id: String,
    name: Option<String>,
    compartment: Option<String>,
    charge: Option<i32>,
    formula: Option<String>,
    notes: Option<Value>,
    annotation: Option<Value>,
}

#[derive(Serialize, Deserialize)]
struct JsonReaction {
    id: String,
    name: Option<String>,
    metabolites: IndexMap<String, f64>,
    lower_bound: f64,
    upper_bound: f64,
    #[serde(default)]
    gene_reaction_rule: String,
    objective_coefficient: Option<f64>,
    subsystem: Option<String>,
    notes: Option<Value>,
    annotation: Option<Value>,
}
// endregion JSON Model

// region Conversions
/* Notes and annotations are loosely structured, so they are kept as their JSON
string and parsed back into JSON when written. */
fn value_to_string(value: Option<Value>) -> Option<String> {
    value.map(|v| v.to_string())
}

fn string_to_value(string: Option<String>) -> Option<Value> {
    string.map(|s| serde_json::from_str(&s).unwrap_or(Value::String(s)))
}

impl From<JsonMetabolite> for Metabolite {
    fn from(m: JsonMetabolite) -> Self {
        Self {
            id: m.id,
            name: m.name,
            compartment: m.compartment,
            charge: m.charge.unwrap_or_default(),
            formula: m.formula,
            notes: value_to_string(m.notes),
            annotation: value_to_string(m.annotation),
        }
    }
}

impl From<Metabolite> for JsonMetabolite {
    fn from(m: Metabolite) -> Self {
        Self {
            id: m.id,
            name: m.name,
            compartment: m.compartment,
            charge: Some(m.charge),
            formula: m.formula,
            notes: string_to_value(m.notes),
            annotation: string_to_value(m.annotation),
        }
    }
}

impl JsonReaction {
    fn into_reaction(self) -> Result<Reaction, ReactionBuilderError> {
        ReactionBuilder::default()
            .id(self.id)
            .metabolites(self.metabolites)
            .name(self.name)
            .lower_bound(self.lower_bound)
            .upper_bound(self.upper_bound)
            .subsystem(self.subsystem)
            .notes(value_to_string(self.notes))
            .annotation(value_to_string(self.annotation))
            .gene_reaction_rule(self.gene_reaction_rule)
            .build()
    }

    fn from_reaction(r: Reaction, objective_coefficient: Option<f64>) -> Self {
        Self {
            id: r.id,
            name: r.name,
            metabolites: r.metabolites,
            lower_bound: r.lower_bound,
            upper_bound: r.upper_bound,
            gene_reaction_rule: r.gene_reaction_rule,
            objective_coefficient,
            subsystem: r.subsystem,
            notes: string_to_value(r.notes),
            annotation: string_to_value(r.annotation),
        }
    }
}
// endregion Conversions

impl Model {
    /// Read a model from a COBRA json file
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Model, JsonError> {
        let model_str = fs::read_to_string(path.as_ref()).map_err(|err| {
            JsonError::UnableToRead(format!("{}: {}", path.as_ref().display(), err))
        })?;
        Model::from_json_str(&model_str)
    }

    /// Parse a model from a COBRA json string
    pub fn from_json_str(model_str: &str) -> Result<Model, JsonError> {
        let json_model = serde_json::from_str::<JsonModel>(model_str)
            .map_err(|err| JsonError::UnableToParse(err.to_string()))?;
        Model::from_json(json_model)
    }

    /// Write the model to a COBRA json file
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), JsonError> {
        let json_model = self.to_json();
        let model_string = serde_json::to_string_pretty(&json_model)?;
        fs::write(path, model_string)?;
        Ok(())
    }

    fn from_json(json_model: JsonModel) -> Result<Self, JsonError> {
        let mut model = Model::new_empty();
        model.id = json_model.id;
        model.compartments = json_model.compartments;
        model.version = json_model.version;
        model.genes = json_model.genes.iter().map(Value::to_string).collect();

        model.add_metabolites(
            json_model
                .metabolites
                .into_iter()
                .map(Metabolite::from)
                .collect(),
        )?;

        let mut reactions = Vec::with_capacity(json_model.reactions.len());
        for rxn in json_model.reactions {
            if let Some(coef) = rxn.objective_coefficient.filter(|c| *c != 0.0) {
                model.objective.insert(rxn.id.clone(), coef);
            }
            reactions.push(rxn.into_reaction()?);
        }
        model.add_reactions(reactions)?;
        Ok(model)
    }

    fn to_json(&self) -> JsonModel {
        JsonModel {
            metabolites: self
                .metabolites
                .values()
                .cloned()
                .map(JsonMetabolite::from)
                .collect(),
            reactions: self
                .reactions
                .values()
                .cloned()
                .map(|r| {
                    let coef = self.objective.get(&r.id).copied();
                    JsonReaction::from_reaction(r, coef)
                })
                .collect(),
            genes: self
                .genes
                .iter()
                .filter_map(|gene| serde_json::from_str(gene).ok())
                .collect(),
            id: self.id.clone(),
            compartments: self.compartments.clone(),
            version: self.version.clone(),
        }
    }
}

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Unable to read model file: {0}")]
    UnableToRead(String),
    #[error("Unable to parse model json: {0}")]
    UnableToParse(String),
    #[error("Unable to build reaction: {0}")]
    UnableToBuildReaction(#[from] ReactionBuilderError),
    #[error("Model is inconsistent: {0}")]
    InvalidModel(#[from] ModelError),
    #[error("Unable to serialize model: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("Unable to write model file: {0}")]
    UnableToWrite(#[from] std::io::Error),
}
