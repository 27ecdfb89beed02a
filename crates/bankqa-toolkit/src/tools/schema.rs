use std::sync::Arc;

use async_trait::async_trait;

use crate::database::SqlDatabase;
use crate::errors::ToolkitError;
use crate::tools::Tool;

/// Lists the usable tables as a comma-separated string.
pub struct ListSqlDatabaseTool {
    db: Arc<SqlDatabase>,
}

impl ListSqlDatabaseTool {
    pub const NAME: &'static str = "sql_db_list_tables";
    pub const DESCRIPTION: &'static str =
        "Input is an empty string, output is a comma-separated list of tables in the database.";

    pub fn new(db: Arc<SqlDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for ListSqlDatabaseTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    async fn run(&self, _input: &str) -> Result<String, ToolkitError> {
        Ok(self.db.usable_table_names().await?.join(", "))
    }
}

/// Returns schema and sample rows for a comma-separated list of tables.
pub struct InfoSqlDatabaseTool {
    db: Arc<SqlDatabase>,
    description: String,
}

impl InfoSqlDatabaseTool {
    pub const NAME: &'static str = "sql_db_schema";

    pub fn new(db: Arc<SqlDatabase>, description: impl Into<String>) -> Self {
        Self {
            db,
            description: description.into(),
        }
    }
}

#[async_trait]
impl Tool for InfoSqlDatabaseTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn run(&self, input: &str) -> Result<String, ToolkitError> {
        let tables = parse_table_list(input);
        Ok(self.db.table_info_no_throw(Some(tables.as_slice())).await)
    }
}

fn parse_table_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|name| name.trim().trim_matches(|c| c == '\'' || c == '"' || c == '`'))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
