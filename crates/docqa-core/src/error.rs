use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Vector retrieval unavailable: {0}")]
    RetrievalUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Lexical index failure: {0}")]
    Index(String),
}

pub type Result<T> = std::result::Result<T, Error>;
