use crate::process::ProcessError;
use amberbridge::core::symmetry::error::SymmetryError;
use amberbridge::engine::backend::error::BackendError;
use amberbridge::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    AmberbridgeCore(#[from] EngineError),

    #[error("Invalid crystal symmetry: {0}")]
    Symmetry(#[from] SymmetryError),

    #[error("Force-field backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Force-field process error: {0}")]
    Process(#[from] ProcessError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
