//! Simulating the effect of a DNA gyrase inhibitor on growth
//!
//! A model is first given the gyrase sub-network by the [`augment::NetworkAugmentor`], then the
//! [`dose_response::DoseResponseEngine`] sweeps inhibitor concentrations and estimates the
//! IC50 of each curve.
pub mod augment;
pub mod config;
pub mod dose_response;
pub mod ic50;
pub mod table;
