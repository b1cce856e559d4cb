use thiserror::Error;

use crate::surface::SurfaceError;

/// Per-unit failure taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// No new or stable response arrived within the configured bound.
    #[error("timed out waiting for a new response")]
    Timeout,
    /// User-requested stop; unwinds the whole run instead of retrying.
    #[error("run aborted")]
    Aborted,
    /// The stabilized response failed length validation.
    #[error("response too short ({length} chars, minimum {minimum})")]
    TooShort { length: usize, minimum: usize },
    /// The surface had no usable input affordance at submit time.
    #[error("chat input unavailable")]
    InputUnavailable,
}

impl GenerationError {
    /// Everything except an abort is worth another attempt with the same
    /// backoff; even a missing input box may be transient UI state.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Aborted)
    }
}

impl From<SurfaceError> for GenerationError {
    fn from(err: SurfaceError) -> Self {
        match err {
            SurfaceError::InputUnavailable => Self::InputUnavailable,
        }
    }
}
