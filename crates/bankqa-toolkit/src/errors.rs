use thiserror::Error;

/// Errors surfaced by the SQL toolkit.
#[derive(Debug, Error)]
pub enum ToolkitError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("table_names {0} not found in database")]
    TableNotFound(String),
    #[error("unknown tool '{name}', available tools: {available}")]
    UnknownTool { name: String, available: String },
    #[error("language model error: {0}")]
    Model(String),
}
