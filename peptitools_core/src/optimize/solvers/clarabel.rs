//! Implements a solver interface for Clarabel
//!
//! Clarabel solves conic programs of the form
//!
//! minimize `1/2 x'Px + q'x` subject to `Ax + s = b`, `s ∈ K`
//!
//! A linear program is posed with `P = 0`, a zero cone for every equality row (including
//! variables whose bounds pin them to one value) followed by a nonnegative cone holding one row
//! per finite inequality bound.
use clarabel::algebra::CscMatrix;
use clarabel::solver::{
    DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus, SupportedConeT,
};
use indexmap::IndexMap;
use nalgebra_sparse::{CooMatrix, CscMatrix as SparseCscMatrix};

use crate::optimize::constraint::Constraint;
use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::Problem;
use crate::optimize::solvers::{Solver, SolverError};
use crate::optimize::{OptimizationStatus, ProblemSolution};

/// Interior point solver backed by Clarabel
#[derive(Clone, Debug)]
pub struct ClarabelSolver {
    /// Print solver progress to stdout
    pub verbose: bool,
    /// Maximum number of interior point iterations
    pub max_iter: u32,
}

impl Default for ClarabelSolver {
    fn default() -> Self {
        ClarabelSolver {
            verbose: false,
            max_iter: 200,
        }
    }
}

/// One row of `Ax + s = b`, as sparse (column, coefficient) pairs
struct Row {
    entries: Vec<(usize, f64)>,
    rhs: f64,
}

impl Row {
    fn negated(&self) -> Row {
        Row {
            entries: self.entries.iter().map(|(j, v)| (*j, -v)).collect(),
            rhs: -self.rhs,
        }
    }
}

/// The rows of the conic problem, split by cone
struct ConicRows {
    zero: Vec<Row>,
    nonnegative: Vec<Row>,
}

impl ConicRows {
    fn from_problem(problem: &Problem) -> Result<Self, SolverError> {
        let mut rows = ConicRows {
            zero: Vec::new(),
            nonnegative: Vec::new(),
        };

        for (id, constraint) in problem.constraints() {
            let mut entries = Vec::with_capacity(constraint.terms().len());
            for term in constraint.terms() {
                let col = problem.variable_index(&term.variable).ok_or_else(|| {
                    SolverError::InvalidProblem(format!(
                        "constraint {} references unknown variable {}",
                        id, term.variable
                    ))
                })?;
                entries.push((col, term.coefficient));
            }
            match constraint {
                Constraint::Equality { equals, .. } => rows.zero.push(Row {
                    entries,
                    rhs: *equals,
                }),
                Constraint::Inequality {
                    lower_bound,
                    upper_bound,
                    ..
                } => rows.push_interval(entries, *lower_bound, *upper_bound),
            }
        }

        for (col, variable) in problem.variables().values().enumerate() {
            rows.push_interval(
                vec![(col, 1.0)],
                variable.lower_bound,
                variable.upper_bound,
            );
        }
        Ok(rows)
    }

    /// Add rows for `lower <= a'x <= upper`, skipping infinite sides
    fn push_interval(&mut self, entries: Vec<(usize, f64)>, lower: f64, upper: f64) {
        if lower == upper {
            self.zero.push(Row {
                entries,
                rhs: upper,
            });
            return;
        }
        let upper_row = Row {
            entries,
            rhs: upper,
        };
        if lower.is_finite() {
            let mut lower_row = upper_row.negated();
            lower_row.rhs = -lower;
            self.nonnegative.push(lower_row);
        }
        if upper.is_finite() {
            self.nonnegative.push(upper_row);
        }
    }

    fn len(&self) -> usize {
        self.zero.len() + self.nonnegative.len()
    }

    fn cones(&self) -> Vec<SupportedConeT<f64>> {
        let mut cones = Vec::with_capacity(2);
        if !self.zero.is_empty() {
            cones.push(SupportedConeT::ZeroConeT(self.zero.len()));
        }
        if !self.nonnegative.is_empty() {
            cones.push(SupportedConeT::NonnegativeConeT(self.nonnegative.len()));
        }
        cones
    }

    /// Assemble `A` (in compressed column form) and `b`
    fn assemble(&self, num_variables: usize) -> (CscMatrix<f64>, Vec<f64>) {
        let num_rows = self.len();
        let mut coo = CooMatrix::new(num_rows, num_variables);
        let mut b = Vec::with_capacity(num_rows);
        for (i, row) in self.zero.iter().chain(self.nonnegative.iter()).enumerate() {
            for (j, value) in &row.entries {
                coo.push(i, *j, *value);
            }
            b.push(row.rhs);
        }
        let (col_offsets, row_indices, values) = SparseCscMatrix::from(&coo).disassemble();
        (
            CscMatrix::new(num_rows, num_variables, col_offsets, row_indices, values),
            b,
        )
    }
}

fn translate_status(status: SolverStatus) -> OptimizationStatus {
    match status {
        SolverStatus::Solved => OptimizationStatus::Optimal,
        SolverStatus::AlmostSolved => OptimizationStatus::AlmostOptimal,
        SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
            OptimizationStatus::Infeasible
        }
        SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
            OptimizationStatus::Unbounded
        }
        SolverStatus::NumericalError => OptimizationStatus::NumericalError,
        _ => OptimizationStatus::SolverHalted,
    }
}

impl Solver for ClarabelSolver {
    fn name(&self) -> &'static str {
        "clarabel"
    }

    fn solve(&self, problem: &Problem) -> Result<ProblemSolution, SolverError> {
        let n = problem.num_variables();
        if n == 0 {
            return Err(SolverError::InvalidProblem(
                "problem has no variables".to_string(),
            ));
        }

        // Clarabel always minimizes
        let sign = match problem.objective().sense() {
            ObjectiveSense::Maximize => -1.0,
            ObjectiveSense::Minimize => 1.0,
        };
        let mut q = vec![0.0; n];
        for term in problem.objective().terms() {
            let col = problem.variable_index(&term.variable).ok_or_else(|| {
                SolverError::InvalidProblem(format!(
                    "objective references unknown variable {}",
                    term.variable
                ))
            })?;
            q[col] += sign * term.coefficient;
        }

        let rows = ConicRows::from_problem(problem)?;
        let (a, b) = rows.assemble(n);
        let cones = rows.cones();
        let p = CscMatrix::new(n, n, vec![0; n + 1], Vec::new(), Vec::new());

        let settings = DefaultSettingsBuilder::default()
            .verbose(self.verbose)
            .max_iter(self.max_iter)
            .build()
            .map_err(|e| SolverError::Settings(e.to_string()))?;

        let mut solver = DefaultSolver::new(&p, &q, &a, &b, &cones, settings);
        solver.solve();

        let status = translate_status(solver.solution.status);
        match status {
            OptimizationStatus::Optimal | OptimizationStatus::AlmostOptimal => {
                let values: IndexMap<String, f64> = problem
                    .variables()
                    .keys()
                    .cloned()
                    .zip(solver.solution.x.iter().copied())
                    .collect();
                let objective_value = problem
                    .objective()
                    .evaluate(|id| values.get(id).copied().unwrap_or(0.0));
                Ok(ProblemSolution {
                    status,
                    objective_value: Some(objective_value),
                    variable_values: Some(values),
                })
            }
            _ => Ok(ProblemSolution::without_optimum(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::ObjectiveValue;

    /// maximize x + 2y subject to x + y <= 4, x - y = 0, 0 <= x, y <= 10
    fn small_problem() -> Problem {
        let mut problem = Problem::new_maximization();
        problem.add_new_variable("x", None, 0., 10.).unwrap();
        problem.add_new_variable("y", None, 0., 10.).unwrap();
        problem
            .add_new_inequality_constraint_by_id(
                "cap",
                &["x", "y"],
                &[1., 1.],
                f64::NEG_INFINITY,
                4.,
            )
            .unwrap();
        problem
            .add_new_equality_constraint_by_id("balance", &["x", "y"], &[1., -1.], 0.)
            .unwrap();
        problem.add_new_linear_objective_term_by_id("x", 1.).unwrap();
        problem.add_new_linear_objective_term_by_id("y", 2.).unwrap();
        problem
    }

    #[test]
    fn solves_small_lp() {
        let solution = ClarabelSolver::default().solve(&small_problem()).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Optimal);
        let objective = solution.objective_value.unwrap();
        assert!((objective - 6.0).abs() < 1e-5, "objective was {}", objective);
        let values = solution.variable_values.unwrap();
        assert!((values["x"] - 2.0).abs() < 1e-5);
        assert!((values["y"] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn fixed_variable_is_respected() {
        let mut problem = small_problem();
        problem.update_variable_bounds("x", 0., 0.).unwrap();
        let objective = ClarabelSolver::default().slim_solve(&problem);
        match objective {
            ObjectiveValue::Optimal(value) => assert!(value.abs() < 1e-5),
            other => panic!("expected an optimum, got {:?}", other),
        }
    }

    #[test]
    fn reports_infeasible() {
        let mut problem = small_problem();
        // x = y and x >= 3 contradicts x + y <= 4
        problem.update_variable_bounds("x", 3., 10.).unwrap();
        let objective = ClarabelSolver::default().slim_solve(&problem);
        assert_eq!(
            objective,
            ObjectiveValue::NotFound(OptimizationStatus::Infeasible)
        );
    }

    #[test]
    fn empty_problem_is_an_error() {
        let problem = Problem::new_maximization();
        assert!(ClarabelSolver::default().solve(&problem).is_err());
    }
}
