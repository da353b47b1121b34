//! Explicit configuration of a growth inhibition simulation
//!
//! Every setting has a default, so a TOML file only needs to list what it overrides:
//!
//! ```toml
//! [augment]
//! biomass_reaction = "BIOMASS_Ec_iML1515_core_75p37M"
//! glucose_uptake_bound = 8.0
//!
//! [sweep]
//! sample_count = 30
//! spacing = "linear"
//! ```
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the baseline network is prepared and the inhibition sub-network parameterized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AugmentConfig {
    /// Glucose exchange reaction, uptake is negative flux
    pub glucose_exchange: String,
    /// Oxygen exchange reaction, uptake is negative flux
    pub oxygen_exchange: String,
    /// Biomass reaction, when absent the model's objective reaction is used
    pub biomass_reaction: Option<String>,
    /// Maximum glucose uptake (mmol/gDW/h)
    pub glucose_uptake_bound: f64,
    /// Maximum oxygen uptake (mmol/gDW/h)
    pub oxygen_uptake_bound: f64,
    /// Uninhibited upper flux bound of the gyrase reaction
    pub enzyme_capacity: f64,
    /// Supercoiled DNA consumed per unit of biomass flux
    pub enzyme_product_cost: f64,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        AugmentConfig {
            glucose_exchange: "EX_glc__D_e".to_string(),
            oxygen_exchange: "EX_o2_e".to_string(),
            biomass_reaction: None,
            glucose_uptake_bound: 10.0,
            oxygen_uptake_bound: 20.0,
            enzyme_capacity: 0.01,
            enzyme_product_cost: 0.005,
        }
    }
}

impl AugmentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("augment.glucose_uptake_bound", self.glucose_uptake_bound)?;
        non_negative("augment.oxygen_uptake_bound", self.oxygen_uptake_bound)?;
        positive("augment.enzyme_capacity", self.enzyme_capacity)?;
        positive("augment.enzyme_product_cost", self.enzyme_product_cost)?;
        Ok(())
    }
}

/// Spacing of the concentration samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spacing {
    Linear,
    Logarithmic,
}

/// The inhibitor concentrations every curve is sampled at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Lowest concentration (µM), also the baseline of the IC50 estimate
    pub min_concentration_um: f64,
    /// Highest concentration (µM)
    pub max_concentration_um: f64,
    /// Number of samples, at least two
    pub sample_count: usize,
    pub spacing: Spacing,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            min_concentration_um: 0.1,
            max_concentration_um: 100.0,
            sample_count: 20,
            spacing: Spacing::Logarithmic,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_count < 2 {
            return Err(ConfigError::Invalid(format!(
                "sweep.sample_count must be at least 2, got {}",
                self.sample_count
            )));
        }
        match self.spacing {
            Spacing::Linear => {
                non_negative("sweep.min_concentration_um", self.min_concentration_um)?
            }
            Spacing::Logarithmic => {
                positive("sweep.min_concentration_um", self.min_concentration_um)?
            }
        }
        positive("sweep.max_concentration_um", self.max_concentration_um)?;
        if self.max_concentration_um <= self.min_concentration_um {
            return Err(ConfigError::Invalid(format!(
                "sweep.max_concentration_um ({}) must exceed sweep.min_concentration_um ({})",
                self.max_concentration_um, self.min_concentration_um
            )));
        }
        // A range too narrow for the sample count collapses neighbours after rounding
        if !self.series().windows(2).all(|w| w[0] < w[1]) {
            return Err(ConfigError::Invalid(format!(
                "sweep range {}..{} µM is too narrow for {} distinct samples",
                self.min_concentration_um, self.max_concentration_um, self.sample_count
            )));
        }
        Ok(())
    }

    /// The ascending concentration series (µM)
    ///
    /// # Examples
    /// ```rust
    /// use peptitools_core::perturbation::config::{Spacing, SweepConfig};
    /// let sweep = SweepConfig {
    ///     min_concentration_um: 1.0,
    ///     max_concentration_um: 100.0,
    ///     sample_count: 3,
    ///     spacing: Spacing::Logarithmic,
    /// };
    /// let concentrations = sweep.concentrations().unwrap();
    /// assert!((concentrations[1] - 10.0).abs() < 1e-9);
    /// ```
    pub fn concentrations(&self) -> Result<Vec<f64>, ConfigError> {
        self.validate()?;
        Ok(self.series())
    }

    fn series(&self) -> Vec<f64> {
        let (lo, hi) = (self.min_concentration_um, self.max_concentration_um);
        let last = self.sample_count - 1;
        (0..self.sample_count)
            .map(|i| {
                // Pin the endpoints so they don't pick up rounding error
                if i == 0 {
                    return lo;
                }
                if i == last {
                    return hi;
                }
                let t = i as f64 / last as f64;
                match self.spacing {
                    Spacing::Linear => lo + (hi - lo) * t,
                    Spacing::Logarithmic => {
                        let (a, b) = (lo.log10(), hi.log10());
                        10f64.powf(a + (b - a) * t)
                    }
                }
            })
            .collect()
    }
}

/// The literature inhibitor optionally simulated next to the peptide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReferenceInhibitor {
    pub name: String,
    /// Inhibition constant (µM)
    pub ki_um: f64,
}

impl Default for ReferenceInhibitor {
    fn default() -> Self {
        ReferenceInhibitor {
            name: "Nalidixic acid".to_string(),
            ki_um: 1.3,
        }
    }
}

/// Complete configuration of a simulation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub augment: AugmentConfig,
    pub sweep: SweepConfig,
    pub reference: ReferenceInhibitor,
}

impl SimulationConfig {
    /// Parse and validate a TOML configuration
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML configuration file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.augment.validate()?;
        self.sweep.validate()?;
        positive("reference.ki_um", self.reference.ki_um)?;
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} must be a positive finite number, got {}",
            name, value
        )))
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} must be a non-negative finite number, got {}",
            name, value
        )))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to read configuration file '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to parse configuration: {0}")]
    Parse(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
