mod checker;
mod query;
mod schema;

pub use checker::QuerySqlCheckerTool;
pub use query::QuerySqlDatabaseTool;
pub use schema::{InfoSqlDatabaseTool, ListSqlDatabaseTool};

use async_trait::async_trait;

use crate::errors::ToolkitError;

/// A named callable exposed to the agent.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Run the tool on the agent's raw input and return the observation.
    async fn run(&self, input: &str) -> Result<String, ToolkitError>;
}
