use std::sync::Arc;

use crate::database::SqlDatabase;
use crate::llm::LanguageModel;
use crate::tools::{
    InfoSqlDatabaseTool, ListSqlDatabaseTool, QuerySqlCheckerTool, QuerySqlDatabaseTool, Tool,
};

/// Which optional tools the toolkit exposes. Query execution and query
/// checking are always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSelection {
    pub include_schema: bool,
    pub include_list_tables: bool,
}

impl ToolSelection {
    /// Query and checker only.
    pub fn custom() -> Self {
        Self {
            include_schema: false,
            include_list_tables: false,
        }
    }

    /// All four tools.
    pub fn all() -> Self {
        Self {
            include_schema: true,
            include_list_tables: true,
        }
    }
}

impl Default for ToolSelection {
    fn default() -> Self {
        Self::custom()
    }
}

/// Toolkit for interacting with a SQL database.
#[derive(Clone)]
pub struct SqlDatabaseToolkit {
    db: Arc<SqlDatabase>,
    llm: Arc<dyn LanguageModel>,
    selection: ToolSelection,
}

impl SqlDatabaseToolkit {
    pub fn new(db: Arc<SqlDatabase>, llm: Arc<dyn LanguageModel>, selection: ToolSelection) -> Self {
        Self { db, llm, selection }
    }

    pub fn dialect(&self) -> &'static str {
        self.db.dialect()
    }

    pub fn database(&self) -> &Arc<SqlDatabase> {
        &self.db
    }

    pub fn llm(&self) -> &Arc<dyn LanguageModel> {
        &self.llm
    }

    pub fn selection(&self) -> ToolSelection {
        self.selection
    }

    /// Build the tool set, in the order the agent sees it.
    pub fn get_tools(&self) -> Vec<Box<dyn Tool>> {
        let info_description = format!(
            "Input to this tool is a comma-separated list of tables, output is the \
             schema and sample rows for those tables. \
             Be sure that the tables actually exist by calling {} first! \
             Example Input: 'table1, table2, table3'",
            ListSqlDatabaseTool::NAME
        );
        let query_description = format!(
            "Input to this tool is a detailed and correct SQL query, output is a \
             result from the database. If the query is not correct, an error message \
             will be returned. If an error is returned, rewrite the query, check the \
             query, and try again. If you encounter an issue with Unknown column \
             'xxxx' in 'field list', using {} to query the correct table fields.",
            InfoSqlDatabaseTool::NAME
        );
        let checker_description = format!(
            "Use this tool to double check if your query is correct before executing \
             it. Always use this tool before executing a query with {}!",
            QuerySqlDatabaseTool::NAME
        );

        let mut tools: Vec<Box<dyn Tool>> = vec![Box::new(QuerySqlDatabaseTool::new(
            Arc::clone(&self.db),
            query_description,
        ))];
        if self.selection.include_schema {
            tools.push(Box::new(InfoSqlDatabaseTool::new(
                Arc::clone(&self.db),
                info_description,
            )));
        }
        if self.selection.include_list_tables {
            tools.push(Box::new(ListSqlDatabaseTool::new(Arc::clone(&self.db))));
        }
        tools.push(Box::new(QuerySqlCheckerTool::new(
            Arc::clone(&self.db),
            Arc::clone(&self.llm),
            checker_description,
        )));
        tools
    }
}
