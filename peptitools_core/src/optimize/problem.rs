//! Provides struct representing an optimization problem
use crate::optimize::constraint::Constraint;
use crate::optimize::objective::{Objective, ObjectiveSense, ObjectiveTerm};
use crate::optimize::variable::Variable;
use indexmap::IndexMap;
use thiserror::Error;

/// A linear optimization problem over continuous variables
#[derive(Debug, Clone)]
pub struct Problem {
    /// Objective to optimize
    objective: Objective,
    /// Variables of the optimization problem, keyed by id
    variables: IndexMap<String, Variable>,
    /// Constraints of the optimization problem, keyed by id
    constraints: IndexMap<String, Constraint>,
}

impl Problem {
    // region Creation Functions
    /// Create a new optimization problem
    pub fn new(objective_sense: ObjectiveSense) -> Self {
        Self {
            objective: Objective::new(objective_sense),
            variables: IndexMap::new(),
            constraints: IndexMap::new(),
        }
    }

    /// Create a new maximization problem
    pub fn new_maximization() -> Self {
        Self::new(ObjectiveSense::Maximize)
    }

    /// Create a new minimization problem
    pub fn new_minimization() -> Self {
        Self::new(ObjectiveSense::Minimize)
    }
    // endregion Creation Functions

    // region Accessors
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub fn variables(&self) -> &IndexMap<String, Variable> {
        &self.variables
    }

    pub fn constraints(&self) -> &IndexMap<String, Constraint> {
        &self.constraints
    }

    pub fn variable(&self, id: &str) -> Option<&Variable> {
        self.variables.get(id)
    }

    /// Column index of a variable, in insertion order
    pub fn variable_index(&self, id: &str) -> Option<usize> {
        self.variables.get_index_of(id)
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
    // endregion Accessors

    /// Update the objective sense of the problem
    pub fn update_objective_sense(&mut self, sense: ObjectiveSense) {
        self.objective.set_sense(sense);
    }

    // region Adding Variables
    /// Create a new continuous variable and add it to the optimization problem
    pub fn add_new_variable(
        &mut self,
        id: &str,
        name: Option<&str>,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        if self.variables.contains_key(id) {
            return Err(ProblemError::VariableIdAlreadyExists(id.to_string()));
        }
        if lower_bound > upper_bound || lower_bound.is_nan() || upper_bound.is_nan() {
            return Err(ProblemError::InvalidVariableBounds(id.to_string()));
        }
        self.variables.insert(
            id.to_string(),
            Variable::new(id, name, lower_bound, upper_bound),
        );
        Ok(())
    }
    // endregion Adding Variables

    // region Adding Constraints
    /// Create a new equality constraint using variable ids, and add it to the problem
    pub fn add_new_equality_constraint_by_id(
        &mut self,
        id: &str,
        variables: &[&str],
        coefficients: &[f64],
        equals: f64,
    ) -> Result<(), ProblemError> {
        let constraint = Constraint::new_equality(variables, coefficients, equals);
        self.add_constraint(id, constraint)
    }

    /// Create a new inequality constraint using variable ids, and add it to the problem
    pub fn add_new_inequality_constraint_by_id(
        &mut self,
        id: &str,
        variables: &[&str],
        coefficients: &[f64],
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        let constraint =
            Constraint::new_inequality(variables, coefficients, lower_bound, upper_bound);
        self.add_constraint(id, constraint)
    }

    fn add_constraint(&mut self, id: &str, constraint: Constraint) -> Result<(), ProblemError> {
        self.validate_constraint(id, &constraint)?;
        self.constraints.insert(id.to_string(), constraint);
        Ok(())
    }
    // endregion Adding Constraints

    /// Add a new linear term to the objective using the variable id
    pub fn add_new_linear_objective_term_by_id(
        &mut self,
        variable_id: &str,
        coefficient: f64,
    ) -> Result<(), ProblemError> {
        if !self.variables.contains_key(variable_id) {
            return Err(ProblemError::NonExistentVariablesInObjective(
                variable_id.to_string(),
            ));
        }
        self.objective
            .add_term(ObjectiveTerm::new(variable_id, coefficient));
        Ok(())
    }

    /// Update the bounds of a variable
    pub fn update_variable_bounds(
        &mut self,
        id: &str,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        if lower_bound > upper_bound || lower_bound.is_nan() || upper_bound.is_nan() {
            return Err(ProblemError::InvalidVariableBounds(id.to_string()));
        }
        match self.variables.get_mut(id) {
            Some(var) => {
                var.lower_bound = lower_bound;
                var.upper_bound = upper_bound;
            }
            None => return Err(ProblemError::NonExistentVariable(id.to_string())),
        };
        Ok(())
    }

    /// Check that a constraint to be added is valid to add to this Problem
    fn validate_constraint(&self, id: &str, constraint: &Constraint) -> Result<(), ProblemError> {
        if self.constraints.contains_key(id) {
            return Err(ProblemError::ConstraintAlreadyExists(id.to_string()));
        }
        if let Constraint::Inequality {
            lower_bound,
            upper_bound,
            ..
        } = constraint
        {
            if lower_bound > upper_bound {
                return Err(ProblemError::InvalidConstraintBounds(id.to_string()));
            }
        }
        for term in constraint.terms() {
            if !self.variables.contains_key(&term.variable) {
                return Err(ProblemError::NonExistentVariablesInConstraint {
                    constraint: id.to_string(),
                    variable: term.variable.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Errors associated with the Problem
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    /// Error when trying to add a variable with the same id as an existing variable
    #[error("Tried to add variable {0} which has the same id as an existing variable")]
    VariableIdAlreadyExists(String),
    /// Error when trying to add or update a variable with invalid bounds
    #[error("Variable {0} has lower_bound > upper_bound")]
    InvalidVariableBounds(String),
    /// Error when trying to add a constraint with the same id as an existing constraint
    #[error("Tried to add constraint {0} which has the same id as an existing constraint")]
    ConstraintAlreadyExists(String),
    /// Error when trying to add a constraint with invalid bounds
    #[error("Inequality constraint {0} has lower_bound > upper_bound")]
    InvalidConstraintBounds(String),
    /// Error when trying to add a constraint that contains variables not in the problem
    #[error("Constraint {constraint} references variable {variable} which is not in the problem")]
    NonExistentVariablesInConstraint { constraint: String, variable: String },
    /// Error when trying to add an objective term which includes variables not in the problem
    #[error("Objective term references variable {0} which is not in the problem")]
    NonExistentVariablesInObjective(String),
    /// Error when trying to update a variable that doesn't exist
    #[error("Tried to access variable {0} which doesn't exist")]
    NonExistentVariable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_problem() {
        let max_problem = Problem::new_maximization();
        assert_eq!(max_problem.objective.sense(), ObjectiveSense::Maximize);

        let min_problem = Problem::new_minimization();
        assert_eq!(min_problem.objective.sense(), ObjectiveSense::Minimize);
    }

    #[test]
    fn update_objective_sense() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);
        problem.update_objective_sense(ObjectiveSense::Minimize);
        assert_eq!(problem.objective.sense(), ObjectiveSense::Minimize);
        problem.update_objective_sense(ObjectiveSense::Maximize);
        assert_eq!(problem.objective.sense(), ObjectiveSense::Maximize);
    }

    #[test]
    fn add_variables() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);
        problem.add_new_variable("x", None, 64., 100.).unwrap();
        problem.add_new_variable("y", Some("why"), 0., 1.).unwrap();

        let x = problem.variable("x").unwrap();
        assert!((x.lower_bound - 64.0).abs() < 1e-25);
        assert!((x.upper_bound - 100.0).abs() < 1e-25);
        assert_eq!(problem.variable_index("x"), Some(0));
        assert_eq!(problem.variable_index("y"), Some(1));
        assert_eq!(problem.num_variables(), 2);

        // Ids are unique
        assert_eq!(
            problem.add_new_variable("x", None, 0., 1.),
            Err(ProblemError::VariableIdAlreadyExists("x".to_string()))
        );
    }

    #[test]
    fn add_bad_variable() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);
        let res = problem.add_new_variable("x", None, 100., 64.);
        assert_eq!(
            res,
            Err(ProblemError::InvalidVariableBounds("x".to_string()))
        );
    }

    #[test]
    fn add_constraint() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);
        problem.add_new_variable("x", None, 64., 100.).unwrap();
        problem.add_new_variable("y", None, 64., 100.).unwrap();

        problem
            .add_new_equality_constraint_by_id("test_constraint", &["x", "y"], &[2., 3.], 200.)
            .unwrap();
        match problem.constraints.get("test_constraint").unwrap() {
            Constraint::Equality { equals, .. } => assert!((equals - 200.).abs() < 1e-25),
            Constraint::Inequality { .. } => panic!("Incorrect constraint type added"),
        }

        problem
            .add_new_inequality_constraint_by_id(
                "test_inequality",
                &["x", "y"],
                &[2., 3.],
                100.,
                200.,
            )
            .unwrap();
        match problem.constraints.get("test_inequality").unwrap() {
            Constraint::Inequality {
                lower_bound,
                upper_bound,
                ..
            } => {
                assert!((lower_bound - 100.).abs() < 1e-25);
                assert!((upper_bound - 200.).abs() < 1e-25);
            }
            Constraint::Equality { .. } => panic!("Incorrect constraint type added"),
        }
        assert_eq!(problem.num_constraints(), 2);
    }

    #[test]
    fn add_bad_constraint() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);
        problem.add_new_variable("x", None, 64., 100.).unwrap();
        problem.add_new_variable("y", None, 64., 100.).unwrap();

        assert_eq!(
            problem.add_new_inequality_constraint_by_id(
                "bad_constraint",
                &["x", "y"],
                &[2., 3.],
                200.,
                100.,
            ),
            Err(ProblemError::InvalidConstraintBounds(
                "bad_constraint".to_string()
            ))
        );

        assert!(matches!(
            problem.add_new_equality_constraint_by_id("missing", &["x", "z"], &[1., 1.], 0.),
            Err(ProblemError::NonExistentVariablesInConstraint { .. })
        ));
    }

    #[test]
    fn objective_terms_and_bounds() {
        let mut problem = Problem::new_maximization();
        problem.add_new_variable("x", None, 0., 10.).unwrap();
        problem.add_new_linear_objective_term_by_id("x", 2.).unwrap();
        assert!(problem.add_new_linear_objective_term_by_id("q", 1.).is_err());
        assert_eq!(problem.objective().terms().len(), 1);

        problem.update_variable_bounds("x", 0., 5.).unwrap();
        assert!((problem.variable("x").unwrap().upper_bound - 5.).abs() < 1e-25);
        assert_eq!(
            problem.update_variable_bounds("x", 6., 5.),
            Err(ProblemError::InvalidVariableBounds("x".to_string()))
        );
        assert_eq!(
            problem.update_variable_bounds("q", 0., 5.),
            Err(ProblemError::NonExistentVariable("q".to_string()))
        );
    }
}
