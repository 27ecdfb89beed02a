use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::database::SqlDatabase;
use crate::errors::ToolkitError;
use crate::llm::LanguageModel;
use crate::prompts::render_query_checker;
use crate::tools::Tool;

/// Asks the language model to double check a query before it is executed.
pub struct QuerySqlCheckerTool {
    db: Arc<SqlDatabase>,
    llm: Arc<dyn LanguageModel>,
    description: String,
}

impl QuerySqlCheckerTool {
    pub const NAME: &'static str = "sql_db_query_checker";

    pub fn new(
        db: Arc<SqlDatabase>,
        llm: Arc<dyn LanguageModel>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            db,
            llm,
            description: description.into(),
        }
    }
}

#[async_trait]
impl Tool for QuerySqlCheckerTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn run(&self, input: &str) -> Result<String, ToolkitError> {
        let prompt = render_query_checker(self.db.dialect(), input.trim());
        debug!(model = %self.llm.name(), "checking query");
        self.llm.complete(&prompt).await
    }
}
