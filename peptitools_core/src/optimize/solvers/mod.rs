//! Solver backends able to optimize a [`Problem`]
pub mod clarabel;

cfg_if::cfg_if! {
    if #[cfg(feature = "minilp")] {
        pub mod microlp;
        pub use self::microlp::MicrolpSolver;
    }
}

pub use self::clarabel::ClarabelSolver;

use crate::configuration::{solver_kind, SolverKind};
use crate::optimize::problem::Problem;
use crate::optimize::{ObjectiveValue, OptimizationStatus, ProblemSolution};
use thiserror::Error;
use tracing::warn;

/// A linear program solver
///
/// Implementors report problems which have no optimum (infeasible, unbounded, halted) through
/// [`ProblemSolution::status`]; an `Err` is reserved for being unable to run the solver at all.
pub trait Solver {
    /// Short name of the backend, used in logs
    fn name(&self) -> &'static str;

    /// Solve the problem
    fn solve(&self, problem: &Problem) -> Result<ProblemSolution, SolverError>;

    /// Solve the problem, reducing the result to the objective readout
    ///
    /// A solver error is absorbed into [`ObjectiveValue::NotFound`] with a
    /// [`OptimizationStatus::NumericalError`] status.
    fn slim_solve(&self, problem: &Problem) -> ObjectiveValue {
        match self.solve(problem) {
            Ok(solution) => solution.objective(),
            Err(err) => {
                warn!(solver = self.name(), error = %err, "solver failed to run");
                ObjectiveValue::NotFound(OptimizationStatus::NumericalError)
            }
        }
    }
}

/// Create the solver selected by the global configuration
pub fn default_solver() -> Box<dyn Solver> {
    match solver_kind() {
        SolverKind::Clarabel => Box::new(ClarabelSolver::default()),
        #[cfg(feature = "minilp")]
        SolverKind::Microlp => Box::new(MicrolpSolver::default()),
    }
}

/// Errors raised while handing a problem to a solver backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The backend rejected its settings
    #[error("Invalid solver settings: {0}")]
    Settings(String),
    /// The problem could not be translated into the backend's representation
    #[error("Unable to translate problem for the solver: {0}")]
    InvalidProblem(String),
}
