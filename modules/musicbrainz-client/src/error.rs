use thiserror::Error;

pub type Result<T> = std::result::Result<T, MusicBrainzError>;

#[derive(Debug, Error)]
pub enum MusicBrainzError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for MusicBrainzError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MusicBrainzError::Timeout
        } else if err.is_decode() {
            MusicBrainzError::Parse(err.to_string())
        } else {
            MusicBrainzError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for MusicBrainzError {
    fn from(err: serde_json::Error) -> Self {
        MusicBrainzError::Parse(err.to_string())
    }
}
