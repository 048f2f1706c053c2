use super::backend::BackendKind;
use super::backend::error::BackendError;
use super::error::EngineError;
use crate::core::symmetry::expand::collapse;
use crate::core::symmetry::space_group::CrystalSymmetry;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// How gradients over the expanded unit cell are mapped back onto the asymmetric unit.
///
/// Both policies return exactly one gradient per asymmetric-unit atom and agree bit for bit
/// when the space group holds a single operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientReduction {
    /// Keep the first symmetry block and discard the other images.
    FirstImage,
    /// Map every image back through its inverse rotation and average.
    #[default]
    SymmetryAverage,
}

impl fmt::Display for GradientReduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradientReduction::FirstImage => write!(f, "first-image"),
            GradientReduction::SymmetryAverage => write!(f, "symmetry-average"),
        }
    }
}

impl GradientReduction {
    pub fn reduce(
        self,
        expanded: Vec<Vector3<f64>>,
        n_atoms: usize,
        symmetry: &CrystalSymmetry,
        backend: BackendKind,
    ) -> Result<Vec<Vector3<f64>>, EngineError> {
        let n_operations = symmetry.space_group().n_operations();
        let expected = n_atoms * n_operations;
        if expanded.len() != expected {
            return Err(EngineError::Backend {
                backend,
                source: BackendError::ShapeMismatch {
                    buffer: "gradients",
                    expected: 3 * expected,
                    actual: 3 * expanded.len(),
                },
            });
        }

        debug!(policy = %self, n_operations, "Reducing expanded-cell gradients.");
        match self {
            GradientReduction::FirstImage => {
                if n_operations > 1 {
                    warn!(
                        "First-image gradient reduction discards {} of {} symmetry images.",
                        n_operations - 1,
                        n_operations
                    );
                }
                let mut gradients = expanded;
                gradients.truncate(n_atoms);
                Ok(gradients)
            }
            GradientReduction::SymmetryAverage => Ok(collapse(&expanded, symmetry)?),
        }
    }
}
