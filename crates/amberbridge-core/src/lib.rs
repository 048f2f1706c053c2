//! # amberbridge Core Library
//!
//! An energy and gradient adapter that lets a crystallographic refinement engine use an
//! external molecular-mechanics force field as the source of its geometry restraints.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three-layer split used throughout the project:
//!
//! - **[`core`]: The Foundation.** Stateless data models and pure mathematics: unit cells,
//!   space groups and the symmetry expansion of coordinates (`symmetry`), the normalized
//!   energy result (`energy`), and geometry diagnostics (`geometry`).
//!
//! - **[`engine`]: The Logic Core.** The stateful evaluation machinery. It holds the two
//!   backend adapters (a live external process and an embedded native library), the
//!   `BackendContext` that selects between them, and the policy used to fold expanded-cell
//!   gradients back onto the asymmetric unit.
//!
//! - **[`workflows`]: The Public API.** The `GeometryManager` façade and its
//!   `energies_sites` entry point, called once per energy/gradient evaluation by an
//!   external minimizer.

pub mod core;
pub mod engine;
pub mod workflows;
