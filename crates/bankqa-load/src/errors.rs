use thiserror::Error;

/// Errors emitted while loading a table into SQLite.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("invalid source: {0}")]
    InvalidSource(String),
    #[error("invalid table: {0}")]
    InvalidTable(String),
}
