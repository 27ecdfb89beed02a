use std::sync::Arc;

use async_trait::async_trait;

use crate::database::SqlDatabase;
use crate::errors::ToolkitError;
use crate::tools::Tool;

/// Executes a query; database errors are returned as the observation so the
/// agent can rewrite the query.
pub struct QuerySqlDatabaseTool {
    db: Arc<SqlDatabase>,
    description: String,
}

impl QuerySqlDatabaseTool {
    pub const NAME: &'static str = "sql_db_query";

    pub fn new(db: Arc<SqlDatabase>, description: impl Into<String>) -> Self {
        Self {
            db,
            description: description.into(),
        }
    }
}

#[async_trait]
impl Tool for QuerySqlDatabaseTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn run(&self, input: &str) -> Result<String, ToolkitError> {
        Ok(self.db.run_no_throw(input.trim()).await)
    }
}
