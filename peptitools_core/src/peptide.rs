//! Sequence-level properties of a candidate antimicrobial peptide
//!
//! Everything here is a quick heuristic computed from the primary sequence: net charge,
//! hydrophobicity, protease cleavage sites and the membrane passage classes derived from them.
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use crate::configuration::MICROMOLAR;

/// Convert a dissociation constant in molar to µM
///
/// # Examples
/// ```rust
/// use peptitools_core::peptide::molar_to_micromolar;
/// assert!((molar_to_micromolar(2.5e-6) - 2.5).abs() < 1e-12);
/// ```
pub fn molar_to_micromolar(molar: f64) -> f64 {
    molar / MICROMOLAR
}

/// Kyte-Doolittle hydropathy
fn hydropathy(residue: char) -> Option<f64> {
    let value = match residue {
        'A' => 1.8,
        'C' => 2.5,
        'D' => -3.5,
        'E' => -3.5,
        'F' => 2.8,
        'G' => -0.4,
        'H' => -3.2,
        'I' => 4.5,
        'K' => -3.9,
        'L' => 3.8,
        'M' => 1.9,
        'N' => -3.5,
        'P' => -1.6,
        'Q' => -3.5,
        'R' => -4.5,
        'S' => -0.8,
        'T' => -0.7,
        'V' => 4.2,
        'W' => -0.9,
        'Y' => -1.3,
        _ => return None,
    };
    Some(value)
}

const N_TERMINUS_PKA: f64 = 9.0;
const C_TERMINUS_PKA: f64 = 2.0;

/// Side chain pKa and whether the protonated form is charged
fn side_chain_pka(residue: char) -> Option<(f64, bool)> {
    match residue {
        'K' => Some((10.5, true)),
        'R' => Some((12.5, true)),
        'H' => Some((6.0, true)),
        'D' => Some((3.9, false)),
        'E' => Some((4.1, false)),
        'C' => Some((8.3, false)),
        'Y' => Some((10.1, false)),
        _ => None,
    }
}

fn positive_fraction(pka: f64, ph: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf(ph - pka))
}

fn negative_fraction(pka: f64, ph: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf(pka - ph))
}

/// Net charge at the given pH, Henderson-Hasselbalch over side chains and both termini
pub fn net_charge(sequence: &str, ph: f64) -> f64 {
    let termini = positive_fraction(N_TERMINUS_PKA, ph) - negative_fraction(C_TERMINUS_PKA, ph);
    sequence
        .chars()
        .filter_map(side_chain_pka)
        .fold(termini, |charge, (pka, basic)| {
            if basic {
                charge + positive_fraction(pka, ph)
            } else {
                charge - negative_fraction(pka, ph)
            }
        })
}

/// Mean Kyte-Doolittle hydropathy, residues outside the scale count as zero
pub fn mean_hydropathy(sequence: &str) -> f64 {
    let len = sequence.chars().count();
    if len == 0 {
        return 0.0;
    }
    sequence
        .chars()
        .map(|r| hydropathy(r).unwrap_or(0.0))
        .sum::<f64>()
        / len as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Protease {
    Trypsin,
    Chymotrypsin,
    Elastase,
    /// Only active at pH below 3
    Pepsin,
}

impl Protease {
    pub const ALL: [Protease; 4] = [
        Protease::Trypsin,
        Protease::Chymotrypsin,
        Protease::Elastase,
        Protease::Pepsin,
    ];

    /// Residues after which the protease cuts
    fn targets(&self) -> &'static [char] {
        match self {
            Protease::Trypsin => &['K', 'R'],
            Protease::Chymotrypsin => &['F', 'W', 'Y'],
            Protease::Elastase => &['A', 'G', 'V'],
            Protease::Pepsin => &['F', 'L'],
        }
    }

    fn blocked_by_proline(&self) -> bool {
        !matches!(self, Protease::Pepsin)
    }

    /// Contribution of one site to instability
    fn weight(&self) -> f64 {
        match self {
            Protease::Trypsin => 1.0,
            Protease::Chymotrypsin => 0.8,
            Protease::Elastase => 0.6,
            Protease::Pepsin => 0.5,
        }
    }

    /// 1-based positions of the residues the protease cuts after
    pub fn cleavage_sites(&self, sequence: &str) -> Vec<usize> {
        let residues: Vec<char> = sequence.chars().collect();
        residues
            .iter()
            .enumerate()
            .filter(|(i, r)| {
                self.targets().contains(*r)
                    && !(self.blocked_by_proline() && residues.get(i + 1) == Some(&'P'))
            })
            .map(|(i, _)| i + 1)
            .collect()
    }
}

impl fmt::Display for Protease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Protease::Trypsin => "trypsin",
            Protease::Chymotrypsin => "chymotrypsin",
            Protease::Elastase => "elastase",
            Protease::Pepsin => "pepsin (pH < 3)",
        };
        f.write_str(name)
    }
}

/// Score in `[0, 1]`, 1 for a sequence no protease cuts
///
/// Five weighted sites per protease saturate the score at 0.
pub fn stability_score(sites: &IndexMap<Protease, Vec<usize>>) -> f64 {
    let total: f64 = Protease::ALL
        .iter()
        .map(|p| sites.get(p).map_or(0, Vec::len) as f64 * p.weight())
        .sum();
    let saturation: f64 = Protease::ALL.iter().map(|p| 5.0 * p.weight()).sum();
    1.0 - (total / saturation).min(1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Likelihood {
    High,
    Low,
}

impl Likelihood {
    fn from_bool(high: bool) -> Self {
        if high {
            Likelihood::High
        } else {
            Likelihood::Low
        }
    }

    fn score(&self) -> f64 {
        match self {
            Likelihood::High => 1.0,
            Likelihood::Low => 0.0,
        }
    }
}

impl fmt::Display for Likelihood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Likelihood::High => f.write_str("high probability"),
            Likelihood::Low => f.write_str("low probability"),
        }
    }
}

/// Summary of a peptide sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeptideProperties {
    pub sequence: String,
    /// Net charge at pH 7, two decimals
    pub net_charge: f64,
    /// Mean Kyte-Doolittle hydropathy, two decimals
    pub hydrophobicity: f64,
    pub cleavage_sites: IndexMap<Protease, Vec<usize>>,
    /// Resistance to extracellular proteases, three decimals
    pub stability: f64,
    /// Passage through the outer membrane
    pub outer_membrane_permeability: Likelihood,
    /// Passage through the cytoplasmic membrane
    pub cytoplasmic_translocation: Likelihood,
    /// Mean of stability and the two membrane classes, three decimals
    pub combined_score: f64,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Compute the properties of a sequence of one letter amino acid codes
///
/// Surrounding whitespace is ignored and lower case is accepted.
pub fn analyze(sequence: &str) -> Result<PeptideProperties, PeptideError> {
    let sequence = sequence.trim().to_uppercase();
    if sequence.is_empty() {
        return Err(PeptideError::EmptySequence);
    }
    if let Some((position, residue)) = sequence
        .chars()
        .enumerate()
        .find(|(_, r)| hydropathy(*r).is_none())
    {
        return Err(PeptideError::NonStandardResidue {
            residue,
            position: position + 1,
        });
    }

    let net_charge = round_to(net_charge(&sequence, 7.0), 2);
    let hydrophobicity = round_to(mean_hydropathy(&sequence), 2);
    let length = sequence.chars().count();
    let cleavage_sites: IndexMap<Protease, Vec<usize>> = Protease::ALL
        .iter()
        .map(|p| (*p, p.cleavage_sites(&sequence)))
        .collect();
    let stability = round_to(stability_score(&cleavage_sites), 3);

    let outer_membrane_permeability = Likelihood::from_bool(
        net_charge >= 2.0 && (-1.0..=1.5).contains(&hydrophobicity) && length <= 30,
    );
    let cytoplasmic_translocation = Likelihood::from_bool(
        net_charge > 0.0 && (0.0..=2.0).contains(&hydrophobicity) && length <= 30,
    );
    let combined_score = round_to(
        (stability + outer_membrane_permeability.score() + cytoplasmic_translocation.score())
            / 3.0,
        3,
    );

    Ok(PeptideProperties {
        sequence,
        net_charge,
        hydrophobicity,
        cleavage_sites,
        stability,
        outer_membrane_permeability,
        cytoplasmic_translocation,
        combined_score,
    })
}

#[derive(Debug, Error, PartialEq)]
pub enum PeptideError {
    #[error("Peptide sequence is empty")]
    EmptySequence,
    #[error("Residue '{residue}' at position {position} is not a standard amino acid")]
    NonStandardResidue { residue: char, position: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magainin_2() {
        let props = analyze("GIGKFLHSAKKFGKAFVGEIMNS").unwrap();
        assert!((props.net_charge - 3.08).abs() < 1e-9);
        assert!((props.hydrophobicity - 0.08).abs() < 1e-9);
        assert_eq!(props.cleavage_sites[&Protease::Trypsin], vec![4, 10, 11, 14]);
        assert_eq!(props.cleavage_sites[&Protease::Chymotrypsin], vec![5, 12, 16]);
        assert_eq!(
            props.cleavage_sites[&Protease::Elastase],
            vec![1, 3, 9, 13, 15, 17, 18]
        );
        assert_eq!(props.cleavage_sites[&Protease::Pepsin], vec![5, 6, 12, 16]);
        assert!((props.stability - 0.131).abs() < 1e-9);
        assert_eq!(props.outer_membrane_permeability, Likelihood::High);
        assert_eq!(props.cytoplasmic_translocation, Likelihood::High);
        assert!((props.combined_score - 0.71).abs() < 1e-9);
    }

    #[test]
    fn proline_blocks_cleavage() {
        assert_eq!(Protease::Trypsin.cleavage_sites("KRKP"), vec![1, 2]);
        // Pepsin ignores the following residue
        assert_eq!(Protease::Pepsin.cleavage_sites("FLP"), vec![1, 2]);
        assert_eq!(Protease::Chymotrypsin.cleavage_sites("FLP"), vec![1]);
    }

    #[test]
    fn charged_but_hydrophilic() {
        let props = analyze("krkp").unwrap();
        assert_eq!(props.sequence, "KRKP");
        assert!((props.net_charge - 2.99).abs() < 1e-9);
        assert!((props.hydrophobicity + 3.48).abs() < 1e-9);
        assert!((props.stability - 0.862).abs() < 1e-9);
        assert_eq!(props.outer_membrane_permeability, Likelihood::Low);
        assert_eq!(props.cytoplasmic_translocation, Likelihood::Low);
        assert!((props.combined_score - 0.287).abs() < 1e-9);
    }

    #[test]
    fn acidic_peptide() {
        let props = analyze(" DDEE ").unwrap();
        assert!((props.net_charge + 4.01).abs() < 1e-9);
        assert_eq!(props.stability, 1.0);
    }

    #[test]
    fn rejects_bad_sequences() {
        assert_eq!(analyze("   "), Err(PeptideError::EmptySequence));
        assert_eq!(
            analyze("KWKXL"),
            Err(PeptideError::NonStandardResidue {
                residue: 'X',
                position: 4
            })
        );
    }

    #[test]
    fn unit_conversion() {
        assert!((molar_to_micromolar(1e-3) - 1000.0).abs() < 1e-9);
    }
}
