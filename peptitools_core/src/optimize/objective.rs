//! Provides struct for representing an optimization problem's objective

/// Represents the linear objective of an optimization problem
#[derive(Debug, Clone)]
pub struct Objective {
    /// Terms included in the objective (See [`ObjectiveTerm`])
    terms: Vec<ObjectiveTerm>,
    /// Sense of the objective (maximize, or minimize), see [`ObjectiveSense`]
    sense: ObjectiveSense,
}

impl Objective {
    /// Create a new empty objective, with a given sense
    pub fn new(sense: ObjectiveSense) -> Self {
        Self {
            terms: Vec::new(),
            sense,
        }
    }

    /// Create a new empty maximization objective
    pub fn new_maximize() -> Self {
        Self::new(ObjectiveSense::Maximize)
    }

    /// Create a new empty minimization objective
    pub fn new_minimize() -> Self {
        Self::new(ObjectiveSense::Minimize)
    }

    /// Change the sense of the objective
    pub fn set_sense(&mut self, sense: ObjectiveSense) {
        self.sense = sense;
    }

    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    pub fn terms(&self) -> &[ObjectiveTerm] {
        &self.terms
    }

    /// Add a new term to the objective
    pub fn add_term(&mut self, term: ObjectiveTerm) {
        self.terms.push(term);
    }

    /// Add a new linear term to the objective
    pub fn add_linear_term(&mut self, variable: &str, coefficient: f64) {
        self.terms.push(ObjectiveTerm::new(variable, coefficient));
    }

    /// Remove every term from the objective, keeping the sense
    pub fn remove_all_terms(&mut self) {
        self.terms.clear();
    }

    /// Evaluate the objective for the given variable lookup
    pub fn evaluate<F: Fn(&str) -> f64>(&self, value_of: F) -> f64 {
        self.terms
            .iter()
            .map(|t| t.coefficient * value_of(&t.variable))
            .sum()
    }
}

/// Represents the sense of the objective, whether it should be maximized or minimized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveSense {
    /// The objective should be minimized
    Minimize,
    /// The objective should be maximized
    Maximize,
}

/// A linear term in the objective
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveTerm {
    /// Id of the variable in the term
    pub variable: String,
    /// Coefficient for the term
    pub coefficient: f64,
}

impl ObjectiveTerm {
    pub fn new(variable: &str, coefficient: f64) -> Self {
        ObjectiveTerm {
            variable: variable.to_string(),
            coefficient,
        }
    }
}
