//! # Energy Module
//!
//! The normalized energy shapes exchanged between the adapter layer and the refinement
//! engine.
//!
//! - [`components`] - The fixed nine-entry component vector, the per-term breakdown reported
//!   by a live force-field process, and its topology term counters
//! - [`result`] - `EnergyResult`, the immutable outcome of one `energies_sites` call, with its
//!   gradient-RMS accessor and human-readable summary

pub mod components;
pub mod result;
