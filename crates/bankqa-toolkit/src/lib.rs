//! SQL tools exposed to an externally supplied reasoning agent.
//!
//! The agent loop and the language model live outside this crate; the
//! toolkit configures which tools are exposed and dispatches calls to them.

pub mod agent;
pub mod database;
pub mod errors;
pub mod llm;
pub mod prompts;
pub mod toolkit;
pub mod tools;

pub use agent::{create_sql_agent, AgentOptions, ParsingErrorPolicy, SqlAgent};
pub use database::{SqlDatabase, SqlDatabaseOptions, SqlValue};
pub use errors::ToolkitError;
pub use llm::LanguageModel;
pub use toolkit::{SqlDatabaseToolkit, ToolSelection};
pub use tools::{
    InfoSqlDatabaseTool, ListSqlDatabaseTool, QuerySqlCheckerTool, QuerySqlDatabaseTool, Tool,
};
