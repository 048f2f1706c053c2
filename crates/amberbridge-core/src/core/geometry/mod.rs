//! # Geometry Module
//!
//! Diagnostics over Cartesian sites that do not need a force-field evaluator.

pub mod deviation;
pub mod sites;
