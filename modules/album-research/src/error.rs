use thiserror::Error;

/// Terminal failures of a research request. Source-level fetch problems never
/// surface here; they degrade to missing data inside the context.
#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Could not interpret the model response: {0}")]
    Parse(String),

    #[error("Model response contained no usable research (genre, artist bio and album summary all empty)")]
    EmptyResult,

    #[error(transparent)]
    Generation(#[from] anyhow::Error),
}

/// Why one source produced no data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("request timed out")]
    Timeout,

    #[error("non-success status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unreadable body: {0}")]
    Body(String),

    #[error("extracted {chars} chars, need at least {min}")]
    InsufficientContent { chars: usize, min: usize },
}

impl From<reqwest::Error> for FetchFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchFailure::Timeout
        } else if err.is_body() || err.is_decode() {
            FetchFailure::Body(err.to_string())
        } else {
            FetchFailure::Transport(err.to_string())
        }
    }
}
