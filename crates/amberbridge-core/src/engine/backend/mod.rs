//! Force-field backends.
//!
//! Both backends implement [`EnergyBackend`]: given the expanded unit-cell sites, produce a
//! component vector and (optionally) expanded-cell gradients already converted from forces.
//! Which one runs is decided by the variant of [`context::BackendContext`].

pub mod context;
pub mod embedded;
pub mod error;
pub mod live;

use self::error::BackendError;
use crate::core::energy::components::EnergyComponents;
use nalgebra::{Point3, Vector3};
use std::fmt;

/// Error type raised by an external evaluator, carried through unchanged.
pub type EvaluatorError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    LiveProcess,
    EmbeddedLibrary,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::LiveProcess => write!(f, "live-process"),
            BackendKind::EmbeddedLibrary => write!(f, "embedded-library"),
        }
    }
}

/// Inputs to a single backend evaluation.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationRequest<'a> {
    pub expanded_sites: &'a [Point3<f64>],
    pub want_gradients: bool,
    /// Initial contents of the native energy buffer; only read by the embedded backend.
    pub seed_components: &'a [f64],
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackendEvaluation {
    pub residual_sum: f64,
    pub energy_components: EnergyComponents,
    /// Gradients (negated forces) for every expanded site, `None` when not requested.
    pub gradients: Option<Vec<Vector3<f64>>>,
}

pub trait EnergyBackend {
    fn kind(&self) -> BackendKind;

    fn evaluate(
        &mut self,
        request: &EvaluationRequest<'_>,
    ) -> Result<BackendEvaluation, BackendError>;
}

/// Reshapes a flat `[x0, y0, z0, x1, ...]` buffer into 3-vectors, multiplying by -1.
pub(crate) fn negated_vectors(
    flat: &[f64],
    buffer: &'static str,
) -> Result<Vec<Vector3<f64>>, BackendError> {
    if flat.len() % 3 != 0 {
        return Err(BackendError::ShapeMismatch {
            buffer,
            expected: flat.len() - flat.len() % 3,
            actual: flat.len(),
        });
    }
    Ok(flat
        .chunks_exact(3)
        .map(|v| Vector3::new(-v[0], -v[1], -v[2]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negated_vectors_flips_sign_elementwise() {
        let vectors = negated_vectors(&[1.0, -2.0, 0.5, 0.0, 3.0, -4.0], "forces").unwrap();
        assert_eq!(
            vectors,
            vec![Vector3::new(-1.0, 2.0, -0.5), Vector3::new(-0.0, -3.0, 4.0)]
        );
    }

    #[test]
    fn negated_vectors_rejects_partial_triplets() {
        let result = negated_vectors(&[1.0, 2.0, 3.0, 4.0], "forces");
        assert!(matches!(
            result,
            Err(BackendError::ShapeMismatch {
                buffer: "forces",
                expected: 3,
                actual: 4
            })
        ));
    }

    #[test]
    fn backend_kind_displays_kebab_case() {
        assert_eq!(BackendKind::LiveProcess.to_string(), "live-process");
        assert_eq!(BackendKind::EmbeddedLibrary.to_string(), "embedded-library");
    }
}
