//! # Engine Module
//!
//! The stateful machinery behind one energy/gradient evaluation: expand the asymmetric
//! unit, hand the unit cell to an external force-field evaluator, and fold the results
//! back into the frame the refinement engine works in.
//!
//! ## Architecture
//!
//! - **Backends** ([`backend`]) - The `EnergyBackend` capability trait, the live-process and
//!   embedded-library adapters implementing it, and the `BackendContext` sum type that
//!   selects between them
//! - **Gradient Reduction** ([`reduction`]) - How expanded-cell gradients are mapped back
//!   onto the asymmetric unit
//! - **Configuration** ([`config`]) - Adapter settings and their builder
//! - **Evaluation** ([`evaluation`]) - The expand → evaluate → reduce sequence producing an
//!   `EnergyResult`
//! - **Error Handling** ([`error`]) - Engine-level error aggregation
//!
//! Evaluations are synchronous and strictly sequential per context: a live-process backend
//! holds a single "current positions" state that each call overwrites.

pub mod backend;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod reduction;
