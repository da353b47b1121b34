use std::collections::HashMap;
use std::fmt::Display;
use std::path::PathBuf;

use peptitools_core::metabolic_model::model::Model;
use peptitools_core::peptide;
use peptitools_core::perturbation::config::SimulationConfig;
use peptitools_core::perturbation::dose_response::ResponseCurve;
use peptitools_core::pipeline::simulate_growth_inhibition;
use peptitools_core::report::{render_svg, write_csv_file};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn value_error<E: Display>(err: E) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Dose-response curve of one inhibitor
#[pyclass(name = "ResponseCurve", frozen)]
struct PyResponseCurve {
    #[pyo3(get)]
    inhibitor: String,
    #[pyo3(get)]
    ki_um: f64,
    #[pyo3(get)]
    concentrations_um: Vec<f64>,
    #[pyo3(get)]
    growth_rates: Vec<f64>,
    /// IC50 in µM, None when not detected
    #[pyo3(get)]
    ic50_um: Option<f64>,
}

impl From<&ResponseCurve> for PyResponseCurve {
    fn from(curve: &ResponseCurve) -> Self {
        let (concentrations_um, growth_rates) = curve.series().into_iter().unzip();
        PyResponseCurve {
            inhibitor: curve.inhibitor.name.clone(),
            ki_um: curve.inhibitor.ki_um,
            concentrations_um,
            growth_rates,
            ic50_um: curve.ic50.value(),
        }
    }
}

#[pymethods]
impl PyResponseCurve {
    fn __repr__(&self) -> String {
        format!(
            "ResponseCurve(inhibitor={:?}, ki_um={}, samples={}, ic50_um={:?})",
            self.inhibitor,
            self.ki_um,
            self.concentrations_um.len(),
            self.ic50_um
        )
    }
}

/// Sequence properties of a peptide
#[pyclass(name = "PeptideProperties", frozen, get_all)]
struct PyPeptideProperties {
    sequence: String,
    net_charge: f64,
    hydrophobicity: f64,
    cleavage_sites: HashMap<String, Vec<usize>>,
    stability: f64,
    outer_membrane_permeability: String,
    cytoplasmic_translocation: String,
    combined_score: f64,
}

impl From<peptide::PeptideProperties> for PyPeptideProperties {
    fn from(p: peptide::PeptideProperties) -> Self {
        PyPeptideProperties {
            cleavage_sites: p
                .cleavage_sites
                .into_iter()
                .map(|(protease, sites)| (protease.to_string(), sites))
                .collect(),
            sequence: p.sequence,
            net_charge: p.net_charge,
            hydrophobicity: p.hydrophobicity,
            stability: p.stability,
            outer_membrane_permeability: p.outer_membrane_permeability.to_string(),
            cytoplasmic_translocation: p.cytoplasmic_translocation.to_string(),
            combined_score: p.combined_score,
        }
    }
}

#[pymethods]
impl PyPeptideProperties {
    fn __repr__(&self) -> String {
        format!(
            "PeptideProperties(sequence={:?}, net_charge={}, combined_score={})",
            self.sequence, self.net_charge, self.combined_score
        )
    }
}

/// Simulate the dose-response of a gyrase inhibitor on the model in `model_path`
#[pyfunction]
#[pyo3(signature = (
    model_path,
    ki_um,
    compare = false,
    config_path = None,
    csv_path = None,
    plot_path = None
))]
fn simulate(
    model_path: PathBuf,
    ki_um: f64,
    compare: bool,
    config_path: Option<PathBuf>,
    csv_path: Option<PathBuf>,
    plot_path: Option<PathBuf>,
) -> PyResult<Vec<PyResponseCurve>> {
    let config = match config_path {
        Some(path) => SimulationConfig::from_toml_file(path).map_err(value_error)?,
        None => SimulationConfig::default(),
    };
    let model = Model::read_json(model_path).map_err(value_error)?;
    let response =
        simulate_growth_inhibition(&model, &config, ki_um, compare).map_err(value_error)?;
    if let Some(path) = csv_path {
        write_csv_file(&response.table, path).map_err(value_error)?;
    }
    if let Some(path) = plot_path {
        render_svg(&response.curves, path).map_err(value_error)?;
    }
    Ok(response.curves.iter().map(PyResponseCurve::from).collect())
}

#[pyfunction]
fn analyze_peptide(sequence: &str) -> PyResult<PyPeptideProperties> {
    peptide::analyze(sequence)
        .map(PyPeptideProperties::from)
        .map_err(value_error)
}

#[pyfunction]
fn molar_to_micromolar(kd: f64) -> f64 {
    peptide::molar_to_micromolar(kd)
}

/// A Python module implemented in Rust. The name of this function must match
/// the `lib.name` setting in the `Cargo.toml`, else Python will not be able to
/// import the module.
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(simulate, m)?)?;
    m.add_function(wrap_pyfunction!(analyze_peptide, m)?)?;
    m.add_function(wrap_pyfunction!(molar_to_micromolar, m)?)?;
    m.add_class::<PyResponseCurve>()?;
    m.add_class::<PyPeptideProperties>()?;
    Ok(())
}
