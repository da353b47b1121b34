//! Half-maximal inhibitory concentration from a sampled dose-response curve
use std::fmt;

use serde::{Serialize, Serializer};

/// Estimated IC50 of a curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ic50 {
    /// Concentration (µM) at which growth falls to half the baseline
    Detected(f64),
    /// Growth never crosses half the baseline within the sampled range
    NotDetected,
}

impl Ic50 {
    pub fn value(&self) -> Option<f64> {
        match self {
            Ic50::Detected(value) => Some(*value),
            Ic50::NotDetected => None,
        }
    }

    pub fn is_detected(&self) -> bool {
        matches!(self, Ic50::Detected(_))
    }
}

impl fmt::Display for Ic50 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ic50::Detected(value) => write!(f, "{:.2} µM", value),
            Ic50::NotDetected => write!(f, "not detected"),
        }
    }
}

impl Serialize for Ic50 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Estimate the IC50 of `(concentration, growth)` samples in ascending concentration order
///
/// The baseline is the growth at the first sample. Walking the samples in order, the first
/// neighbouring pair bracketing half the baseline (inclusively) is linearly interpolated.
///
/// # Examples
/// ```rust
/// use peptitools_core::perturbation::ic50::{estimate_ic50, Ic50};
/// let curve = [(0.0, 1.0), (10.0, 0.0)];
/// assert_eq!(estimate_ic50(&curve), Ic50::Detected(5.0));
/// assert_eq!(estimate_ic50(&curve[..1]), Ic50::NotDetected);
/// ```
pub fn estimate_ic50(curve: &[(f64, f64)]) -> Ic50 {
    let Some(&(_, baseline)) = curve.first() else {
        return Ic50::NotDetected;
    };
    let half = 0.5 * baseline;
    for pair in curve.windows(2) {
        let (x1, y1) = pair[0];
        let (x2, y2) = pair[1];
        let brackets = (y1 >= half && half >= y2) || (y1 <= half && half <= y2);
        if !brackets {
            continue;
        }
        if y1 == y2 {
            return Ic50::NotDetected;
        }
        return Ic50::Detected(x1 + (half - y1) * (x2 - x1) / (y2 - y1));
    }
    Ic50::NotDetected
}
