use super::backend::BackendKind;
use super::backend::error::BackendError;
use crate::core::symmetry::error::SymmetryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(
        "No force-field backend is selectable: neither a live-process session nor an embedded-library context was supplied"
    )]
    NoBackend,

    #[error(
        "Ambiguous force-field backend: both a live-process session and an embedded-library context were supplied"
    )]
    AmbiguousBackend,

    #[error("Symmetry operation failed: {source}")]
    Symmetry {
        #[from]
        source: SymmetryError,
    },

    #[error("{backend} backend failed: {source}")]
    Backend {
        backend: BackendKind,
        #[source]
        source: BackendError,
    },
}
