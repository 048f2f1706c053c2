//! # Workflows Module
//!
//! The entry points a refinement engine calls while minimizing.
//!
//! ## Overview
//!
//! - **Geometry Manager** ([`geometry_manager`]) - Owns the current asymmetric-unit
//!   coordinates together with a force-field backend context and evaluates them once per
//!   minimizer step through `energies_sites`.
//!
//! A manager performs no iteration of its own; each call is one blocking round trip to
//! exactly one external evaluator.

pub mod geometry_manager;
