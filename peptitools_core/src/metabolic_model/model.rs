//! This module provides the Model struct for representing an entire metabolic model
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::reaction::Reaction;
use crate::optimize::problem::{Problem, ProblemError};
use crate::optimize::solvers::{Solver, SolverError};
use crate::optimize::{ObjectiveValue, ProblemSolution};

use indexmap::IndexMap;
use thiserror::Error;

/// Represents a Genome Scale Metabolic Model
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    /// Map of reaction ids to Reactions
    pub reactions: IndexMap<String, Reaction>,
    /// Map of metabolite ids to Metabolites
    pub metabolites: IndexMap<String, Metabolite>,
    /// Map of reaction ids to objective function coefficients
    pub objective: IndexMap<String, f64>,
    /// Id associated with the Model
    pub id: Option<String>,
    /// Compartments in the model
    ///
    /// An IndexMap<String, String> of {short name: long name}
    pub compartments: Option<IndexMap<String, String>>,
    /// A version identifier for the Model, stored as a string
    pub version: Option<String>,
    /// Gene records as JSON text, kept so they can be written back out
    pub genes: Vec<String>,
}

impl Model {
    pub fn new_empty() -> Self {
        Model {
            reactions: IndexMap::new(),
            metabolites: IndexMap::new(),
            objective: IndexMap::new(),
            id: None,
            compartments: None,
            version: None,
            genes: Vec::new(),
        }
    }

    // region Adding Components
    /// Add a metabolite to the model
    ///
    /// # Examples
    /// ```rust
    /// use peptitools_core::metabolic_model::metabolite::Metabolite;
    /// use peptitools_core::metabolic_model::model::Model;
    /// let mut model = Model::new_empty();
    /// model.add_metabolite(Metabolite::new("atp_c", "ATP", "c")).unwrap();
    /// assert!(model.has_metabolite("atp_c"));
    /// assert!(model.add_metabolite(Metabolite::new("atp_c", "ATP", "c")).is_err());
    /// ```
    pub fn add_metabolite(&mut self, metabolite: Metabolite) -> Result<(), ModelError> {
        self.add_metabolites(vec![metabolite])
    }

    /// Add several metabolites, either all of them are added or none are
    pub fn add_metabolites(&mut self, metabolites: Vec<Metabolite>) -> Result<(), ModelError> {
        for (i, met) in metabolites.iter().enumerate() {
            if self.metabolites.contains_key(&met.id)
                || metabolites[..i].iter().any(|m| m.id == met.id)
            {
                return Err(ModelError::DuplicateMetabolite(met.id.clone()));
            }
        }
        for met in metabolites {
            self.metabolites.insert(met.id.clone(), met);
        }
        Ok(())
    }

    /// Add a reaction to the model
    ///
    /// Every metabolite in the reaction must already be part of the model.
    ///
    /// # Examples
    /// ```rust
    /// use peptitools_core::metabolic_model::model::Model;
    /// use peptitools_core::metabolic_model::reaction::ReactionBuilder;
    /// let mut model = Model::new_empty();
    /// let new_reaction = ReactionBuilder::default()
    ///     .id("new_reaction".to_string())
    ///     .build()
    ///     .unwrap();
    /// model.add_reaction(new_reaction).unwrap();
    /// ```
    pub fn add_reaction(&mut self, reaction: Reaction) -> Result<(), ModelError> {
        self.add_reactions(vec![reaction])
    }

    /// Add several reactions, either all of them are added or none are
    pub fn add_reactions(&mut self, reactions: Vec<Reaction>) -> Result<(), ModelError> {
        for (i, rxn) in reactions.iter().enumerate() {
            if self.reactions.contains_key(&rxn.id)
                || reactions[..i].iter().any(|r| r.id == rxn.id)
            {
                return Err(ModelError::DuplicateReaction(rxn.id.clone()));
            }
            if !rxn.has_valid_bounds() {
                return Err(ModelError::InvalidBounds(rxn.id.clone()));
            }
            if let Some(met) = rxn
                .metabolites
                .keys()
                .find(|m| !self.metabolites.contains_key(*m))
            {
                return Err(ModelError::UnknownMetabolite {
                    reaction: rxn.id.clone(),
                    metabolite: met.clone(),
                });
            }
        }
        for rxn in reactions {
            self.reactions.insert(rxn.id.clone(), rxn);
        }
        Ok(())
    }
    // endregion Adding Components

    // region Lookup
    pub fn has_reaction(&self, id: &str) -> bool {
        self.reactions.contains_key(id)
    }

    pub fn has_metabolite(&self, id: &str) -> bool {
        self.metabolites.contains_key(id)
    }

    pub fn reaction(&self, id: &str) -> Result<&Reaction, ModelError> {
        self.reactions
            .get(id)
            .ok_or_else(|| ModelError::MissingReaction(id.to_string()))
    }

    pub fn reaction_mut(&mut self, id: &str) -> Result<&mut Reaction, ModelError> {
        self.reactions
            .get_mut(id)
            .ok_or_else(|| ModelError::MissingReaction(id.to_string()))
    }

    pub fn metabolite(&self, id: &str) -> Result<&Metabolite, ModelError> {
        self.metabolites
            .get(id)
            .ok_or_else(|| ModelError::MissingMetabolite(id.to_string()))
    }
    // endregion Lookup

    // region Objective
    /// Make a single reaction (with coefficient 1) the objective
    pub fn set_objective(&mut self, reaction_id: &str) -> Result<(), ModelError> {
        self.reaction(reaction_id)?;
        self.objective.clear();
        self.objective.insert(reaction_id.to_string(), 1.0);
        Ok(())
    }

    /// Ids of the reactions with a non-zero objective coefficient
    pub fn objective_reaction_ids(&self) -> impl Iterator<Item = &str> {
        self.objective
            .iter()
            .filter(|(_, coef)| **coef != 0.0)
            .map(|(id, _)| id.as_str())
    }
    // endregion Objective

    // region Optimization
    /// Build the flux balance problem for this model
    ///
    /// One variable per reaction carrying its flux bounds, one mass balance row `S v = 0` per
    /// metabolite, and the objective maximized.
    pub fn to_problem(&self) -> Result<Problem, ModelError> {
        let mut problem = Problem::new_maximization();
        for rxn in self.reactions.values() {
            problem.add_new_variable(
                &rxn.id,
                rxn.name.as_deref(),
                rxn.lower_bound,
                rxn.upper_bound,
            )?;
        }

        let mut balances: IndexMap<&str, (Vec<&str>, Vec<f64>)> = self
            .metabolites
            .keys()
            .map(|id| (id.as_str(), (Vec::new(), Vec::new())))
            .collect();
        for rxn in self.reactions.values() {
            for (met, coef) in &rxn.metabolites {
                let (vars, coefs) =
                    balances
                        .get_mut(met.as_str())
                        .ok_or_else(|| ModelError::UnknownMetabolite {
                            reaction: rxn.id.clone(),
                            metabolite: met.clone(),
                        })?;
                vars.push(rxn.id.as_str());
                coefs.push(*coef);
            }
        }
        for (met, (vars, coefs)) in balances {
            problem.add_new_equality_constraint_by_id(met, &vars, &coefs, 0.0)?;
        }

        for (rxn_id, coef) in &self.objective {
            if !self.reactions.contains_key(rxn_id) {
                return Err(ModelError::MissingReaction(rxn_id.clone()));
            }
            problem.add_new_linear_objective_term_by_id(rxn_id, *coef)?;
        }
        Ok(problem)
    }

    /// Optimize the model, returning the full solution
    pub fn optimize(&self, solver: &dyn Solver) -> Result<ProblemSolution, ModelError> {
        let problem = self.to_problem()?;
        Ok(solver.solve(&problem)?)
    }

    /// Optimize the model, returning only the objective readout
    pub fn slim_optimize(&self, solver: &dyn Solver) -> Result<ObjectiveValue, ModelError> {
        let problem = self.to_problem()?;
        Ok(solver.slim_solve(&problem))
    }
    // endregion Optimization
}

/// Errors raised while building or querying a [`Model`]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("Reaction {0} is not present in the model")]
    MissingReaction(String),
    #[error("Metabolite {0} is not present in the model")]
    MissingMetabolite(String),
    #[error("A reaction with id {0} is already present in the model")]
    DuplicateReaction(String),
    #[error("A metabolite with id {0} is already present in the model")]
    DuplicateMetabolite(String),
    #[error("Reaction {reaction} uses metabolite {metabolite} which is not in the model")]
    UnknownMetabolite {
        reaction: String,
        metabolite: String,
    },
    #[error("Reaction {0} has lower_bound > upper_bound")]
    InvalidBounds(String),
    #[error("Unable to build the optimization problem: {0}")]
    Problem(#[from] ProblemError),
    #[error("Solver failed: {0}")]
    Solver(#[from] SolverError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::reaction::ReactionBuilder;
    use crate::optimize::solvers::ClarabelSolver;
    use crate::optimize::OptimizationStatus;

    fn reaction(id: &str, mets: &[(&str, f64)], lb: f64, ub: f64) -> Reaction {
        ReactionBuilder::default()
            .id(id.to_string())
            .metabolites(mets.iter().map(|(m, c)| (m.to_string(), *c)).collect())
            .lower_bound(lb)
            .upper_bound(ub)
            .build()
            .unwrap()
    }

    /// A -> B -> (sink), with uptake of A capped at 5
    fn linear_pathway() -> Model {
        let mut model = Model::new_empty();
        model
            .add_metabolites(vec![
                Metabolite::new("a_c", "A", "c"),
                Metabolite::new("b_c", "B", "c"),
            ])
            .unwrap();
        model
            .add_reactions(vec![
                reaction("EX_a", &[("a_c", 1.)], 0., 5.),
                reaction("A_TO_B", &[("a_c", -1.), ("b_c", 1.)], 0., 1000.),
                reaction("SINK_b", &[("b_c", -1.)], 0., 1000.),
            ])
            .unwrap();
        model.set_objective("SINK_b").unwrap();
        model
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut model = linear_pathway();
        assert_eq!(
            model.add_metabolite(Metabolite::new("a_c", "A", "c")),
            Err(ModelError::DuplicateMetabolite("a_c".to_string()))
        );
        assert_eq!(
            model.add_reaction(reaction("EX_a", &[], 0., 1.)),
            Err(ModelError::DuplicateReaction("EX_a".to_string()))
        );
        // Duplicates within a single batch are rejected and nothing is added
        let res = model.add_reactions(vec![
            reaction("NEW", &[], 0., 1.),
            reaction("NEW", &[], 0., 1.),
        ]);
        assert!(res.is_err());
        assert!(!model.has_reaction("NEW"));
    }

    #[test]
    fn unknown_metabolites_are_rejected() {
        let mut model = linear_pathway();
        let res = model.add_reaction(reaction("BAD", &[("z_c", 1.)], 0., 1.));
        assert_eq!(
            res,
            Err(ModelError::UnknownMetabolite {
                reaction: "BAD".to_string(),
                metabolite: "z_c".to_string()
            })
        );
    }

    #[test]
    fn missing_reaction_lookup() {
        let mut model = linear_pathway();
        assert!(model.reaction("A_TO_B").is_ok());
        assert_eq!(
            model.reaction_mut("NOPE").err(),
            Some(ModelError::MissingReaction("NOPE".to_string()))
        );
        assert!(model.set_objective("NOPE").is_err());
    }

    #[test]
    fn problem_has_one_row_per_metabolite() {
        let model = linear_pathway();
        let problem = model.to_problem().unwrap();
        assert_eq!(problem.num_variables(), 3);
        assert_eq!(problem.num_constraints(), 2);
        assert_eq!(problem.constraints()["a_c"].terms().len(), 2);
        assert_eq!(model.objective_reaction_ids().collect::<Vec<_>>(), vec!["SINK_b"]);
    }

    #[test]
    fn optimize_linear_pathway() {
        let model = linear_pathway();
        let solver = ClarabelSolver::default();
        let solution = model.optimize(&solver).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Optimal);
        assert!((solution.objective_value.unwrap() - 5.0).abs() < 1e-5);

        match model.slim_optimize(&solver).unwrap() {
            ObjectiveValue::Optimal(v) => assert!((v - 5.0).abs() < 1e-5),
            other => panic!("expected optimum, got {:?}", other),
        }
    }
}
