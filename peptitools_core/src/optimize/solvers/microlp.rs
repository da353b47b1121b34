//! Implements a solver interface for microlp, a pure rust simplex solver
use indexmap::IndexMap;
use microlp::{ComparisonOp, LinearExpr, OptimizationDirection};
use tracing::warn;

use crate::optimize::constraint::Constraint;
use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::Problem;
use crate::optimize::solvers::{Solver, SolverError};
use crate::optimize::{OptimizationStatus, ProblemSolution};

#[derive(Clone, Debug, Default)]
pub struct MicrolpSolver {}

impl Solver for MicrolpSolver {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn solve(&self, problem: &Problem) -> Result<ProblemSolution, SolverError> {
        let direction = match problem.objective().sense() {
            ObjectiveSense::Maximize => OptimizationDirection::Maximize,
            ObjectiveSense::Minimize => OptimizationDirection::Minimize,
        };
        let mut objective_coefficients = vec![0.0; problem.num_variables()];
        for term in problem.objective().terms() {
            let col = problem.variable_index(&term.variable).ok_or_else(|| {
                SolverError::InvalidProblem(format!(
                    "objective references unknown variable {}",
                    term.variable
                ))
            })?;
            objective_coefficients[col] += term.coefficient;
        }

        let mut lp = microlp::Problem::new(direction);
        let vars: Vec<microlp::Variable> = problem
            .variables()
            .values()
            .zip(objective_coefficients)
            .map(|(v, c)| lp.add_var(c, (v.lower_bound, v.upper_bound)))
            .collect();

        for (id, constraint) in problem.constraints() {
            let mut expr = LinearExpr::empty();
            for term in constraint.terms() {
                let col = problem.variable_index(&term.variable).ok_or_else(|| {
                    SolverError::InvalidProblem(format!(
                        "constraint {} references unknown variable {}",
                        id, term.variable
                    ))
                })?;
                expr.add(vars[col], term.coefficient);
            }
            match constraint {
                Constraint::Equality { equals, .. } => {
                    lp.add_constraint(expr, ComparisonOp::Eq, *equals)
                }
                Constraint::Inequality {
                    lower_bound,
                    upper_bound,
                    ..
                } => {
                    if lower_bound.is_finite() {
                        lp.add_constraint(expr.clone(), ComparisonOp::Ge, *lower_bound);
                    }
                    if upper_bound.is_finite() {
                        lp.add_constraint(expr, ComparisonOp::Le, *upper_bound);
                    }
                }
            }
        }

        match lp.solve() {
            Ok(solution) => {
                let values: IndexMap<String, f64> = problem
                    .variables()
                    .keys()
                    .cloned()
                    .zip(vars.iter().map(|v| solution[*v]))
                    .collect();
                Ok(ProblemSolution {
                    status: OptimizationStatus::Optimal,
                    objective_value: Some(solution.objective()),
                    variable_values: Some(values),
                })
            }
            Err(microlp::Error::Infeasible) => Ok(ProblemSolution::without_optimum(
                OptimizationStatus::Infeasible,
            )),
            Err(microlp::Error::Unbounded) => Ok(ProblemSolution::without_optimum(
                OptimizationStatus::Unbounded,
            )),
            Err(err) => {
                warn!(error = %err, "microlp failed");
                Ok(ProblemSolution::without_optimum(
                    OptimizationStatus::NumericalError,
                ))
            }
        }
    }
}
