//! # Symmetry Module
//!
//! Crystal symmetry descriptions and the coordinate transformations built on them.
//!
//! A [`space_group::SpaceGroup`] stores its operations as an ordered list. That order is a
//! stable, public property: [`expand::expand`] lays out the unit cell as one contiguous
//! block per operation in exactly that order, and [`expand::collapse`] relies on the same
//! order to map each block back onto the asymmetric unit. No operation identity travels
//! alongside expanded data.
//!
//! ## Key Components
//!
//! - [`cell`] - Unit cell metric with fractional/orthogonal conversion
//! - [`operation`] - A single rotation plus fractional translation, parsed from xyz notation
//! - [`space_group`] - Ordered operation lists and the `CrystalSymmetry` pair
//! - [`expand`] - Asymmetric unit to unit cell, and averaged gradient reduction

pub mod cell;
pub mod error;
pub mod expand;
pub mod operation;
pub mod space_group;
