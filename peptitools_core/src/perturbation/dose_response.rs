//! Simulated growth of an augmented model across inhibitor concentrations
//!
//! Inhibition is competitive: at concentration `[I]` an inhibitor with constant `Ki` scales
//! the gyrase upper flux bound to `ub * Ki / (Ki + [I])`. Every sample perturbs a fresh copy
//! of the baseline problem, so no sample can see the bounds of another.
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::configuration::tolerance;
use crate::metabolic_model::model::{Model, ModelError};
use crate::optimize::problem::{Problem, ProblemError};
use crate::optimize::solvers::{default_solver, Solver};
use crate::optimize::{ObjectiveValue, OptimizationStatus};
use crate::perturbation::augment::{AugmentError, ENZYME_REACTION};
use crate::perturbation::config::{ConfigError, SimulationConfig};
use crate::perturbation::ic50::{estimate_ic50, Ic50};
use crate::perturbation::table::DoseResponseTable;

/// Upper flux bound of the enzyme under competitive inhibition
///
/// Both concentrations are given in µM. The law only depends on their ratio, so no conversion
/// to molar is needed and tiny constants keep their precision. A non-positive (or NaN)
/// `ki_um` blocks the enzyme entirely, while a zero concentration leaves the bound as is.
///
/// # Examples
/// ```rust
/// use peptitools_core::perturbation::dose_response::competitive_upper_bound;
/// assert!((competitive_upper_bound(0.01, 5.0, 0.0) - 0.01).abs() < 1e-15);
/// assert!((competitive_upper_bound(0.01, 5.0, 5.0) - 0.005).abs() < 1e-15);
/// assert_eq!(competitive_upper_bound(0.01, 0.0, 5.0), 0.0);
/// ```
pub fn competitive_upper_bound(upper_bound: f64, ki_um: f64, concentration_um: f64) -> f64 {
    if ki_um.is_nan() || ki_um <= 0.0 {
        return 0.0;
    }
    if concentration_um <= 0.0 || ki_um.is_infinite() {
        return upper_bound;
    }
    upper_bound * (ki_um / (ki_um + concentration_um))
}

/// Check an inhibition constant can be simulated
pub fn validate_affinity(ki_um: f64) -> Result<f64, SimulationError> {
    if ki_um.is_finite() && ki_um > 0.0 {
        Ok(ki_um)
    } else {
        Err(SimulationError::InvalidAffinity(ki_um))
    }
}

/// Plotting color of a curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLUE: Rgb = Rgb(31, 119, 180);
    pub const GREEN: Rgb = Rgb(44, 160, 44);
}

/// A compound acting on the gyrase reaction
#[derive(Debug, Clone, PartialEq)]
pub struct Inhibitor {
    pub name: String,
    /// Inhibition constant (µM)
    pub ki_um: f64,
    pub color: Rgb,
}

impl Inhibitor {
    pub fn new(name: &str, ki_um: f64, color: Rgb) -> Self {
        Inhibitor {
            name: name.to_string(),
            ki_um,
            color,
        }
    }
}

/// Growth at one inhibitor concentration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponsePoint {
    /// Inhibitor concentration (µM)
    pub concentration_um: f64,
    /// Optimal growth rate (1/h), zero when no optimum was found
    pub growth_rate: f64,
    /// Solver status of the sample, anything but optimal means the growth rate was defaulted
    pub status: OptimizationStatus,
}

/// The dose-response curve of one inhibitor
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseCurve {
    pub inhibitor: Inhibitor,
    /// Samples in ascending concentration order
    pub points: Vec<ResponsePoint>,
    pub ic50: Ic50,
}

impl ResponseCurve {
    fn new(inhibitor: Inhibitor, points: Vec<ResponsePoint>) -> Self {
        let ic50 = estimate_ic50(&series(&points));
        ResponseCurve {
            inhibitor,
            points,
            ic50,
        }
    }

    /// The curve as `(concentration, growth)` pairs
    pub fn series(&self) -> Vec<(f64, f64)> {
        series(&self.points)
    }

    /// Growth at the lowest concentration
    pub fn baseline(&self) -> Option<f64> {
        self.points.first().map(|p| p.growth_rate)
    }

    /// Number of samples whose growth rate was defaulted to zero
    pub fn failed_samples(&self) -> usize {
        self.points
            .iter()
            .filter(|p| p.status != OptimizationStatus::Optimal)
            .count()
    }
}

fn series(points: &[ResponsePoint]) -> Vec<(f64, f64)> {
    points
        .iter()
        .map(|p| (p.concentration_um, p.growth_rate))
        .collect()
}

/// Curves of every simulated inhibitor, with the same data in long table form
#[derive(Debug, Clone, PartialEq)]
pub struct DoseResponse {
    pub curves: Vec<ResponseCurve>,
    pub table: DoseResponseTable,
}

impl DoseResponse {
    pub fn curve(&self, inhibitor: &str) -> Option<&ResponseCurve> {
        self.curves.iter().find(|c| c.inhibitor.name == inhibitor)
    }
}

/// Gyrase flux bounds of the unperturbed model
#[derive(Debug, Clone, Copy)]
struct EnzymeBounds {
    lower: f64,
    upper: f64,
}

impl EnzymeBounds {
    fn of(model: &Model) -> Result<Self, SimulationError> {
        let enzyme = model
            .reaction(ENZYME_REACTION)
            .map_err(|_| SimulationError::NotAugmented)?;
        Ok(EnzymeBounds {
            lower: enzyme.lower_bound,
            upper: enzyme.upper_bound,
        })
    }
}

/// Runs concentration sweeps on an augmented model
pub struct DoseResponseEngine {
    config: SimulationConfig,
    solver: Box<dyn Solver>,
}

impl DoseResponseEngine {
    /// Engine using the globally configured solver
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        Self::with_solver(config, default_solver())
    }

    pub fn with_solver(
        config: SimulationConfig,
        solver: Box<dyn Solver>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(DoseResponseEngine { config, solver })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The inhibitors simulated for a subject constant, subject first
    pub fn inhibitors(&self, subject_ki_um: f64, include_reference: bool) -> Vec<Inhibitor> {
        let mut inhibitors = vec![Inhibitor::new("Peptide", subject_ki_um, Rgb::BLUE)];
        if include_reference {
            let reference = &self.config.reference;
            inhibitors.push(Inhibitor::new(&reference.name, reference.ki_um, Rgb::GREEN));
        }
        inhibitors
    }

    /// Simulate the dose-response curves of the subject and, optionally, the reference inhibitor
    ///
    /// The model must already be augmented. It is never modified.
    #[instrument(skip(self, model), fields(solver = self.solver.name()))]
    pub fn simulate(
        &self,
        model: &Model,
        subject_ki_um: f64,
        include_reference: bool,
    ) -> Result<DoseResponse, SimulationError> {
        validate_affinity(subject_ki_um)?;
        let concentrations = self.config.sweep.concentrations()?;
        let bounds = EnzymeBounds::of(model)?;
        let baseline = model.to_problem()?;

        let inhibitors = self.inhibitors(subject_ki_um, include_reference);
        info!(
            inhibitors = inhibitors.len(),
            samples = concentrations.len(),
            "simulating dose-response"
        );

        let mut curves = Vec::with_capacity(inhibitors.len());
        for inhibitor in inhibitors {
            let points = concentrations
                .iter()
                .map(|c| self.sample(&baseline, bounds, inhibitor.ki_um, *c))
                .collect::<Result<Vec<_>, _>>()?;
            let curve = ResponseCurve::new(inhibitor, points);
            if curve.failed_samples() > 0 {
                warn!(
                    inhibitor = curve.inhibitor.name.as_str(),
                    failed = curve.failed_samples(),
                    "some samples had no optimum, their growth was set to zero"
                );
            }
            info!(
                inhibitor = curve.inhibitor.name.as_str(),
                ki_um = curve.inhibitor.ki_um,
                ic50 = %curve.ic50,
                "estimated IC50"
            );
            curves.push(curve);
        }

        let table = DoseResponseTable::from_curves(&curves);
        Ok(DoseResponse { curves, table })
    }

    /// Growth of the augmented model at a single concentration
    pub fn growth_at(
        &self,
        model: &Model,
        ki_um: f64,
        concentration_um: f64,
    ) -> Result<ResponsePoint, SimulationError> {
        validate_affinity(ki_um)?;
        let bounds = EnzymeBounds::of(model)?;
        let baseline = model.to_problem()?;
        self.sample(&baseline, bounds, ki_um, concentration_um)
    }

    fn sample(
        &self,
        baseline: &Problem,
        bounds: EnzymeBounds,
        ki_um: f64,
        concentration_um: f64,
    ) -> Result<ResponsePoint, SimulationError> {
        let upper = competitive_upper_bound(bounds.upper, ki_um, concentration_um);
        let mut perturbed = baseline.clone();
        perturbed.update_variable_bounds(ENZYME_REACTION, bounds.lower.min(upper), upper)?;

        let objective = self.solver.slim_solve(&perturbed);
        let status = objective.status();
        let growth_rate = match objective {
            // Solver noise can leave a blocked model with a tiny (even negative) growth
            ObjectiveValue::Optimal(value) if value > tolerance() => value,
            _ => 0.0,
        };
        debug!(
            concentration_um,
            enzyme_upper_bound = upper,
            growth_rate,
            ?status,
            "sampled growth"
        );
        Ok(ResponsePoint {
            concentration_um,
            growth_rate,
            status,
        })
    }
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Inhibition constant must be a positive finite number of µM, got {0}")]
    InvalidAffinity(f64),
    #[error("Model has no {} reaction, augment it before simulating", ENZYME_REACTION)]
    NotAugmented,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Augment(#[from] AugmentError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Problem(#[from] ProblemError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::solvers::ClarabelSolver;
    use crate::perturbation::augment::NetworkAugmentor;
    use crate::perturbation::config::{Spacing, SweepConfig};
    use std::path::PathBuf;

    fn augmented_toy_model() -> Model {
        let model = Model::read_json(
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("test_data")
                .join("test_models")
                .join("toy_growth.json"),
        )
        .unwrap();
        NetworkAugmentor::default().augmented(model).unwrap()
    }

    fn engine() -> DoseResponseEngine {
        DoseResponseEngine::with_solver(
            SimulationConfig::default(),
            Box::new(ClarabelSolver::default()),
        )
        .unwrap()
    }

    #[test]
    fn competitive_law() {
        assert!((competitive_upper_bound(0.01, 1.0, 0.0) - 0.01).abs() < 1e-15);
        // Half activity when the concentration equals Ki
        assert!((competitive_upper_bound(0.01, 1.3, 1.3) - 0.005).abs() < 1e-15);
        assert!(competitive_upper_bound(0.01, 1.0, 1000.0) < 1e-4);
        assert_eq!(competitive_upper_bound(0.01, -2.0, 1.0), 0.0);
        assert_eq!(competitive_upper_bound(0.01, f64::NAN, 1.0), 0.0);
    }

    #[test]
    fn tiny_affinity_keeps_precision() {
        assert_eq!(competitive_upper_bound(0.01, 1e-320, 0.0), 0.01);
        let bound = competitive_upper_bound(0.01, 1e-320, 1.0);
        assert!(bound.is_finite() && (0.0..1e-300).contains(&bound));
        // Saturating concentrations approach but never pass zero
        let saturated = competitive_upper_bound(0.01, 1e-3, 1e300);
        assert!(saturated.is_finite() && saturated >= 0.0);
        assert_eq!(competitive_upper_bound(0.01, f64::INFINITY, 5.0), 0.01);
    }

    #[test]
    fn tiny_affinity_on_linear_sweep_from_zero() {
        let config = SimulationConfig {
            sweep: SweepConfig {
                min_concentration_um: 0.0,
                max_concentration_um: 10.0,
                sample_count: 11,
                spacing: Spacing::Linear,
            },
            ..SimulationConfig::default()
        };
        let engine =
            DoseResponseEngine::with_solver(config, Box::new(ClarabelSolver::default())).unwrap();
        let model = augmented_toy_model();

        let response = engine.simulate(&model, 1e-300, false).unwrap();
        let curve = &response.curves[0];
        assert_eq!(curve.points.len(), 11);
        let baseline = curve.baseline().unwrap();
        assert!((baseline - 1.1333333).abs() < 1e-4, "baseline was {}", baseline);
        assert!(curve.points[1..]
            .iter()
            .all(|p| p.growth_rate.is_finite() && p.growth_rate < 1e-6));
        assert!(curve.ic50.is_detected());
    }

    #[test]
    fn subject_and_reference_curves() {
        let model = augmented_toy_model();
        let response = engine().simulate(&model, 5.0, true).unwrap();

        assert_eq!(response.curves.len(), 2);
        assert_eq!(response.curves[0].inhibitor.name, "Peptide");
        assert_eq!(response.curves[1].inhibitor.name, "Nalidixic acid");
        assert_eq!(response.table.len(), 40);
        for curve in &response.curves {
            assert_eq!(curve.points.len(), 20);
            assert_eq!(curve.failed_samples(), 0);
            let baseline = curve.baseline().unwrap();
            assert!((baseline - 1.1333333).abs() < 1e-4, "baseline was {}", baseline);
            // Growth never increases with concentration
            assert!(curve
                .points
                .windows(2)
                .all(|w| w[1].growth_rate <= w[0].growth_rate + 1e-6));
        }

        // growth = min(1.1333, 2 Ki / (Ki + c)), half growth near c = 2 Ki / 0.5667 - Ki
        let peptide = response.curve("Peptide").unwrap().ic50.value().unwrap();
        assert!(peptide > 12.0 && peptide < 13.5, "peptide IC50 was {}", peptide);
        let reference = response
            .curve("Nalidixic acid")
            .unwrap()
            .ic50
            .value()
            .unwrap();
        assert!(
            reference > 2.5 && reference < 4.5,
            "reference IC50 was {}",
            reference
        );
    }

    #[test]
    fn subject_only() {
        let model = augmented_toy_model();
        let response = engine().simulate(&model, 5.0, false).unwrap();
        assert_eq!(response.curves.len(), 1);
        assert_eq!(response.table.len(), 20);
    }

    #[test]
    fn samples_are_independent_of_order() {
        let model = augmented_toy_model();
        let engine = engine();
        let response = engine.simulate(&model, 5.0, false).unwrap();
        for point in response.curves[0].points.iter().rev() {
            let resampled = engine.growth_at(&model, 5.0, point.concentration_um).unwrap();
            assert!((resampled.growth_rate - point.growth_rate).abs() < 1e-6);
        }
    }

    #[test]
    fn model_is_not_modified() {
        let model = augmented_toy_model();
        let before = model.clone();
        engine().simulate(&model, 0.5, true).unwrap();
        assert_eq!(model, before);
    }

    #[test]
    fn rejects_invalid_affinity() {
        let model = augmented_toy_model();
        for ki in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                engine().simulate(&model, ki, false),
                Err(SimulationError::InvalidAffinity(_))
            ));
        }
    }

    #[test]
    fn requires_augmented_model() {
        let mut model = augmented_toy_model();
        model.reactions.shift_remove(ENZYME_REACTION);
        assert!(matches!(
            engine().simulate(&model, 5.0, false),
            Err(SimulationError::NotAugmented)
        ));
    }

    #[test]
    fn infeasible_sample_reports_zero_growth() {
        let mut model = augmented_toy_model();
        // Demand a growth rate the inhibited enzyme can't support
        model.reaction_mut("BIOMASS").unwrap().lower_bound = 1.0;
        let engine = engine();

        let uninhibited = engine.growth_at(&model, 5.0, 0.1).unwrap();
        assert_eq!(uninhibited.status, OptimizationStatus::Optimal);
        assert!(uninhibited.growth_rate > 1.0);

        let blocked = engine.growth_at(&model, 5.0, 100.0).unwrap();
        assert_eq!(blocked.status, OptimizationStatus::Infeasible);
        assert_eq!(blocked.growth_rate, 0.0);
    }
}
