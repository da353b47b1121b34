//! Core of peptitools, simulating how strongly an antimicrobial peptide that inhibits DNA gyrase
//! suppresses bacterial growth.
//!
//! A constraint based metabolic model is augmented with a gyrase sub-network, the gyrase flux is
//! scaled down by competitive inhibition across a range of concentrations, and the resulting
//! dose-response curves are summarized by their IC50.

pub mod configuration;
pub mod io;
pub mod metabolic_model;
pub mod optimize;
pub mod peptide;
pub mod perturbation;
pub mod pipeline;
pub mod report;
