use super::embedded::EmbeddedLibraryContext;
use super::live::LiveProcessSession;
use super::{BackendKind, EnergyBackend};
use crate::engine::error::EngineError;
use tracing::info;

/// The per-run force-field handle, one variant per backend.
pub enum BackendContext {
    LiveProcess(LiveProcessSession),
    EmbeddedLibrary(EmbeddedLibraryContext),
}

impl BackendContext {
    /// Picks the backend from whichever handle was supplied.
    ///
    /// Exactly one of the two must be present; supplying neither or both is a configuration
    /// error rather than a silent preference.
    pub fn select(
        live_process: Option<LiveProcessSession>,
        embedded_library: Option<EmbeddedLibraryContext>,
    ) -> Result<Self, EngineError> {
        let context = match (live_process, embedded_library) {
            (Some(session), None) => Self::LiveProcess(session),
            (None, Some(library)) => Self::EmbeddedLibrary(library),
            (None, None) => return Err(EngineError::NoBackend),
            (Some(_), Some(_)) => return Err(EngineError::AmbiguousBackend),
        };
        info!("Selected {} force-field backend.", context.kind());
        Ok(context)
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Self::LiveProcess(_) => BackendKind::LiveProcess,
            Self::EmbeddedLibrary(_) => BackendKind::EmbeddedLibrary,
        }
    }

    pub fn backend_mut(&mut self) -> &mut dyn EnergyBackend {
        match self {
            Self::LiveProcess(session) => session,
            Self::EmbeddedLibrary(library) => library,
        }
    }
}

impl From<LiveProcessSession> for BackendContext {
    fn from(session: LiveProcessSession) -> Self {
        Self::LiveProcess(session)
    }
}

impl From<EmbeddedLibraryContext> for BackendContext {
    fn from(library: EmbeddedLibraryContext) -> Self {
        Self::EmbeddedLibrary(library)
    }
}
