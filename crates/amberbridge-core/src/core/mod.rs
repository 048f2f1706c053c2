//! # Core Module
//!
//! Stateless building blocks shared by every evaluation path.
//!
//! - **Crystal Symmetry** ([`symmetry`]) - Unit cells, symmetry operations, space groups,
//!   and the expansion/collapse of per-atom data between the asymmetric unit and the
//!   full unit cell
//! - **Energy Results** ([`energy`]) - The fixed-order component vector and the
//!   `EnergyResult` handed back to the refinement engine
//! - **Geometry Diagnostics** ([`geometry`]) - Bond and angle deviations, site formatting
//!
//! Nothing in this module performs I/O or holds state between calls.

pub mod energy;
pub mod geometry;
pub mod symmetry;
