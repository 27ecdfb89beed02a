use thiserror::Error;

/// Error type shared by the bankqa data contracts.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller supplied arguments that cannot be honoured.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
