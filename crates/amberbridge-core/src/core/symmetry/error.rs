use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SymmetryError {
    #[error("Invalid unit cell parameters {parameters:?}: {reason}")]
    InvalidCell {
        parameters: [f64; 6],
        reason: &'static str,
    },

    #[error("Invalid symmetry operation '{operation}': {reason}")]
    InvalidOperation { operation: String, reason: String },

    #[error("Space group must contain at least one operation (the identity)")]
    EmptySpaceGroup,

    #[error("Rotation part of symmetry operation {index} is singular and cannot be inverted")]
    SingularRotation { index: usize },

    #[error("{len} expanded entries cannot be split into {n_operations} equal symmetry blocks")]
    IncommensurateImages { len: usize, n_operations: usize },
}
