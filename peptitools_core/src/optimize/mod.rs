//! Module for constructing and solving optimization problems

pub mod constraint;
pub mod objective;
pub mod problem;
pub mod solvers;
pub mod variable;

use indexmap::IndexMap;

/// Struct representing the solution to an optimization problem
#[derive(Debug, Clone)]
pub struct ProblemSolution {
    /// The status of the optimization problem, representing if the optimization was
    /// completed successfully
    pub status: OptimizationStatus,
    /// Optimized value of the objective
    ///
    /// Some(f64) if the optimization was completed successfully, None otherwise
    pub objective_value: Option<f64>,
    /// Values of the variables at the optimum,
    ///
    /// Some(IndexMap), keyed by variable id, with values corresponding to variable
    /// values at optimum if the problem could be solved, None otherwise
    pub variable_values: Option<IndexMap<String, f64>>,
}

impl ProblemSolution {
    /// A solution carrying no values, for problems the solver could not optimize
    pub fn without_optimum(status: OptimizationStatus) -> Self {
        ProblemSolution {
            status,
            objective_value: None,
            variable_values: None,
        }
    }

    /// Reduce the solution to its objective readout
    pub fn objective(&self) -> ObjectiveValue {
        match (self.status, self.objective_value) {
            (OptimizationStatus::Optimal | OptimizationStatus::AlmostOptimal, Some(value))
                if value.is_finite() =>
            {
                ObjectiveValue::Optimal(value)
            }
            (status, _) => ObjectiveValue::NotFound(status),
        }
    }
}

/// Status of an optimization problem
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OptimizationStatus {
    /// Problem has not yet attempted to be optimized
    Unoptimized,
    /// Problem has been optimized
    Optimal,
    /// Problem can't be optimized because objective value is not bounded
    Unbounded,
    /// Problem can't be solved because it is infeasible (conflicting constraints)
    Infeasible,
    /// An approximate solution has been found
    AlmostOptimal,
    /// A numerical error occurred during solving
    NumericalError,
    /// The solver hit the maximum allowed iterations, or max time, or made insufficient progress
    SolverHalted,
}

/// Objective readout of a single solve
///
/// Solves that do not reach an optimum are a value of this type rather than an error, so
/// callers decide explicitly what a missing optimum means for them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ObjectiveValue {
    /// The optimal (or almost optimal) objective value
    Optimal(f64),
    /// No optimum was found, with the reason reported by the solver
    NotFound(OptimizationStatus),
}

impl ObjectiveValue {
    /// The objective value, or `default` when no optimum was found
    pub fn unwrap_or(self, default: f64) -> f64 {
        match self {
            ObjectiveValue::Optimal(value) => value,
            ObjectiveValue::NotFound(_) => default,
        }
    }

    pub fn status(&self) -> OptimizationStatus {
        match self {
            ObjectiveValue::Optimal(_) => OptimizationStatus::Optimal,
            ObjectiveValue::NotFound(status) => *status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objective_readout() {
        let solved = ProblemSolution {
            status: OptimizationStatus::Optimal,
            objective_value: Some(0.87),
            variable_values: None,
        };
        assert_eq!(solved.objective(), ObjectiveValue::Optimal(0.87));

        let infeasible = ProblemSolution::without_optimum(OptimizationStatus::Infeasible);
        assert_eq!(
            infeasible.objective(),
            ObjectiveValue::NotFound(OptimizationStatus::Infeasible)
        );
        assert_eq!(infeasible.objective().unwrap_or(0.), 0.);
        assert_eq!(
            infeasible.objective().status(),
            OptimizationStatus::Infeasible
        );
        assert_eq!(solved.objective().status(), OptimizationStatus::Optimal);

        // A status claiming optimality without a value is still not an optimum
        let empty = ProblemSolution::without_optimum(OptimizationStatus::Optimal);
        assert!(matches!(empty.objective(), ObjectiveValue::NotFound(_)));
    }
}
