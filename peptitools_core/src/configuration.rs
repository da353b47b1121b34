//! Process wide defaults used when building reactions and solving problems
use std::sync::{LazyLock, RwLock};

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

const DEFAULT_LOWER_BOUND: f64 = -1000.;
const DEFAULT_UPPER_BOUND: f64 = 1000.;
const DEFAULT_TOLERANCE: f64 = 1e-07;

/// Molar per micromolar
pub const MICROMOLAR: f64 = 1e-6;

pub struct Configuration {
    /// Lower flux bound given to reactions which don't specify one
    pub lower_bound: f64,
    /// Upper flux bound given to reactions which don't specify one
    pub upper_bound: f64,
    /// Objective values with a magnitude below this are treated as zero
    pub tolerance: f64,
    /// Backend used by [`crate::optimize::solvers::default_solver`]
    pub solver: SolverKind,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            lower_bound: DEFAULT_LOWER_BOUND,
            upper_bound: DEFAULT_UPPER_BOUND,
            tolerance: DEFAULT_TOLERANCE,
            solver: SolverKind::Clarabel,
        }
    }
}

/// Enum used to specify the default solver to use
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverKind {
    /// Use the Clarabel interior point solver
    Clarabel,
    /// Use the microlp simplex solver, requires the minilp feature to be enabled
    #[cfg(feature = "minilp")]
    Microlp,
}

// A poisoned lock only means another thread panicked mid-write, the
// fallbacks below are the values the lock was created with.
pub(crate) fn default_lower_bound() -> f64 {
    CONFIGURATION
        .read()
        .map(|c| c.lower_bound)
        .unwrap_or(DEFAULT_LOWER_BOUND)
}

pub(crate) fn default_upper_bound() -> f64 {
    CONFIGURATION
        .read()
        .map(|c| c.upper_bound)
        .unwrap_or(DEFAULT_UPPER_BOUND)
}

pub(crate) fn tolerance() -> f64 {
    CONFIGURATION
        .read()
        .map(|c| c.tolerance)
        .unwrap_or(DEFAULT_TOLERANCE)
}

pub(crate) fn solver_kind() -> SolverKind {
    CONFIGURATION
        .read()
        .map(|c| c.solver)
        .unwrap_or(SolverKind::Clarabel)
}
