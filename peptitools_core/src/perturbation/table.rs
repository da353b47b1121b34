//! Long form table of dose-response curves, one row per sample
use serde::Serialize;

use crate::perturbation::dose_response::ResponseCurve;
use crate::perturbation::ic50::Ic50;

/// One sample of one curve, the curve's IC50 is repeated on each of its rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoseResponseRow {
    pub inhibitor: String,
    #[serde(rename = "concentration_uM")]
    pub concentration_um: f64,
    #[serde(rename = "growth_rate_per_h")]
    pub growth_rate: f64,
    pub ic50: Ic50,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DoseResponseTable {
    pub rows: Vec<DoseResponseRow>,
}

impl DoseResponseTable {
    /// Rows of every curve, curve by curve in ascending concentration
    pub fn from_curves(curves: &[ResponseCurve]) -> Self {
        let rows = curves
            .iter()
            .flat_map(|curve| {
                curve.points.iter().map(|point| DoseResponseRow {
                    inhibitor: curve.inhibitor.name.clone(),
                    concentration_um: point.concentration_um,
                    growth_rate: point.growth_rate,
                    ic50: curve.ic50,
                })
            })
            .collect();
        DoseResponseTable { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows belonging to one inhibitor
    pub fn rows_for<'a>(&'a self, inhibitor: &'a str) -> impl Iterator<Item = &'a DoseResponseRow> {
        self.rows.iter().filter(move |r| r.inhibitor == inhibitor)
    }
}
