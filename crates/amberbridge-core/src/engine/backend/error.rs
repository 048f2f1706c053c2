use super::EvaluatorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("External evaluator call '{call}' failed: {source}")]
    Evaluation {
        call: &'static str,
        #[source]
        source: EvaluatorError,
    },

    #[error("Backend buffer '{buffer}' holds {actual} values, expected {expected}")]
    ShapeMismatch {
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Live-process session has already been released")]
    SessionReleased,
}

impl BackendError {
    pub(crate) fn evaluation(call: &'static str) -> impl FnOnce(EvaluatorError) -> Self {
        move |source| Self::Evaluation { call, source }
    }
}
