use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The backend could not be reached or opened. Never retried here.
    #[error("search backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The backend rejected a compound query (unknown field, bad pattern,
    /// unparsable query string). Factories do not validate in advance.
    #[error("malformed query: {0}")]
    MalformedQuery(String),
}

pub type Result<T> = std::result::Result<T, Error>;
