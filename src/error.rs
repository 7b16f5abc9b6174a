use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid credentials: enter an email address and a password of at least 6 characters")]
    InvalidCredentials,
}

/// A bundled dataset never made it into process state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("bundled dataset `{dataset}` is not loaded")]
pub struct DataMissingError {
    pub dataset: &'static str,
}

/// Everything that can go wrong talking to the scoreboard endpoint. The data
/// provider absorbs all of these into a demo fallback.
#[derive(Debug, Error)]
pub enum NetworkFailure {
    #[error("network client unavailable: {0}")]
    Unavailable(String),
    #[error("transport error: {0}")]
    Transport(#[from] anyhow::Error),
    #[error("http {0}")]
    Status(u16),
    #[error("malformed scoreboard payload: {0}")]
    Malformed(String),
    #[error("scoreboard returned no events")]
    Empty,
}
