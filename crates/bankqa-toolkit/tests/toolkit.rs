use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use bankqa_core::{CellValue, Frame};
use bankqa_load::{create_sqlite_db_from_csv, TableSource};
use bankqa_toolkit::{
    create_sql_agent, AgentOptions, LanguageModel, ParsingErrorPolicy, SqlDatabase,
    SqlDatabaseOptions, SqlDatabaseToolkit, ToolSelection, ToolkitError,
};

/// Echoes a fixed answer and records every prompt it receives.
struct RecordingModel {
    answer: String,
    prompts: Mutex<Vec<String>>,
}

impl RecordingModel {
    fn new(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock").clone()
    }
}

#[async_trait]
impl LanguageModel for RecordingModel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn complete(&self, prompt: &str) -> Result<String, ToolkitError> {
        self.prompts
            .lock()
            .map_err(|_| ToolkitError::Model("poisoned".to_string()))?
            .push(prompt.to_string());
        Ok(self.answer.clone())
    }
}

fn accounts_frame() -> Frame {
    let mut frame = Frame::new(vec![
        "AccountID".to_string(),
        "CustomerID".to_string(),
        "AccountType".to_string(),
        "Balance".to_string(),
    ]);
    for (id, owner, kind, balance) in [
        (101, 7, "Checking", 1500.25),
        (102, 9, "Savings", 18000.0),
        (103, 7, "Savings", 2500.5),
    ] {
        frame
            .push_row(vec![
                CellValue::Int(id),
                CellValue::Int(owner),
                kind.into(),
                CellValue::Float(balance),
            ])
            .expect("push row");
    }
    frame
}

async fn seeded_database(label: &str) -> Result<PathBuf> {
    let mut dir = std::env::temp_dir();
    dir.push(format!("bankqa_toolkit_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir)?;
    let db_path = dir.join("bank.db");

    create_sqlite_db_from_csv(&db_path, "accounts", TableSource::Frame(accounts_frame())).await?;
    let mut customers = Frame::new(vec!["CustomerID".to_string(), "Email".to_string()]);
    customers.push_row(vec![CellValue::Int(7), "ana@example.com".into()])?;
    create_sqlite_db_from_csv(&db_path, "customers", TableSource::Frame(customers)).await?;

    Ok(db_path)
}

async fn open(db_path: &PathBuf, sample_rows: usize) -> Result<Arc<SqlDatabase>> {
    let db = SqlDatabase::from_path(
        db_path,
        SqlDatabaseOptions::default().with_sample_rows(sample_rows),
    )
    .await?;
    Ok(Arc::new(db))
}

#[tokio::test]
async fn custom_selection_exposes_query_and_checker_only() -> Result<()> {
    let db_path = seeded_database("custom").await?;
    let toolkit = SqlDatabaseToolkit::new(
        open(&db_path, 3).await?,
        RecordingModel::new("SELECT 1"),
        ToolSelection::default(),
    );

    let tools = toolkit.get_tools();
    let names: Vec<&str> = tools.iter().map(|tool| tool.name()).collect();
    assert_eq!(names, vec!["sql_db_query", "sql_db_query_checker"]);
    assert_eq!(toolkit.dialect(), "sqlite");
    assert!(tools[1].description().contains("sql_db_query!"));

    Ok(())
}

#[tokio::test]
async fn full_selection_exposes_four_tools() -> Result<()> {
    let db_path = seeded_database("all").await?;
    let toolkit = SqlDatabaseToolkit::new(
        open(&db_path, 3).await?,
        RecordingModel::new("SELECT 1"),
        ToolSelection::all(),
    );

    let names: Vec<String> = toolkit
        .get_tools()
        .iter()
        .map(|tool| tool.name().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "sql_db_query",
            "sql_db_schema",
            "sql_db_list_tables",
            "sql_db_query_checker"
        ]
    );

    Ok(())
}

#[tokio::test]
async fn query_tool_renders_rows_and_errors() -> Result<()> {
    let db_path = seeded_database("query").await?;
    let db = open(&db_path, 3).await?;

    let rows = db
        .run("SELECT AccountID, AccountType FROM accounts WHERE CustomerID = 7 ORDER BY AccountID")
        .await?;
    assert_eq!(rows, "[(101, 'Checking'), (103, 'Savings')]");

    let single = db.run("SELECT COUNT(*) FROM accounts").await?;
    assert_eq!(single, "[(3,)]");

    let empty = db.run("SELECT * FROM accounts WHERE AccountID = 0").await?;
    assert_eq!(empty, "");

    let failed = db.run_no_throw("SELECT missing FROM accounts").await;
    assert!(failed.starts_with("Error: "), "got {failed}");

    Ok(())
}

#[tokio::test]
async fn schema_tool_reports_create_statement_and_samples() -> Result<()> {
    let db_path = seeded_database("schema").await?;
    let db = open(&db_path, 2).await?;

    assert_eq!(db.usable_table_names().await?, vec!["accounts", "customers"]);

    let info = db.table_info(Some(&["accounts".to_string()][..])).await?;
    assert!(info.starts_with("CREATE TABLE \"accounts\""));
    assert!(info.contains("2 rows from accounts table:"));
    assert!(info.contains("AccountID\tCustomerID\tAccountType\tBalance"));
    assert!(info.contains("101\t7\tChecking\t1500.25"));
    assert!(!info.contains("103\t"));

    let missing = db
        .table_info_no_throw(Some(&["ledger".to_string(), "accounts".to_string()][..]))
        .await;
    assert_eq!(missing, "Error: table_names {'ledger'} not found in database");

    Ok(())
}

#[tokio::test]
async fn ignored_tables_are_hidden() -> Result<()> {
    let db_path = seeded_database("ignore").await?;
    let options = SqlDatabaseOptions {
        ignore_tables: vec!["customers".to_string()],
        ..SqlDatabaseOptions::default()
    };
    let db = SqlDatabase::from_path(&db_path, options).await?;

    assert_eq!(db.usable_table_names().await?, vec!["accounts"]);

    Ok(())
}

#[tokio::test]
async fn checker_sends_dialect_and_query_to_model() -> Result<()> {
    let db_path = seeded_database("checker").await?;
    let model = RecordingModel::new("SELECT AccountID FROM accounts;");
    let agent = create_sql_agent(
        "unused",
        Some(SqlDatabaseToolkit::new(
            open(&db_path, 1).await?,
            model.clone(),
            ToolSelection::custom(),
        )),
        model.clone(),
        AgentOptions::default(),
    )
    .await?;

    let checked = agent
        .call_tool("sql_db_query_checker", "SELECT AccountID FROM accounts")
        .await?;
    assert_eq!(checked, "SELECT AccountID FROM accounts;");

    let prompts = model.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("SELECT AccountID FROM accounts"));
    assert!(prompts[0].contains("Double check the sqlite query above"));

    Ok(())
}

#[tokio::test]
async fn default_agent_builds_full_toolkit_from_uri() -> Result<()> {
    let db_path = seeded_database("agent").await?;
    let uri = format!("sqlite://{}", db_path.display());
    let agent = create_sql_agent(&uri, None, RecordingModel::new("ok"), AgentOptions::default())
        .await?;

    assert_eq!(agent.tools().len(), 4);
    assert!(agent.system_prompt().contains("syntactically correct sqlite query"));
    assert!(agent.system_prompt().contains("at most 10 results"));
    assert!(agent.system_prompt().contains("sql_db_list_tables: "));

    let tables = agent.call_tool("sql_db_list_tables", "").await?;
    assert_eq!(tables, "accounts, customers");

    Ok(())
}

#[tokio::test]
async fn unknown_tool_follows_parsing_error_policy() -> Result<()> {
    let db_path = seeded_database("policy").await?;
    let db = open(&db_path, 1).await?;
    let model = RecordingModel::new("ok");

    let observing = create_sql_agent(
        "unused",
        Some(SqlDatabaseToolkit::new(db.clone(), model.clone(), ToolSelection::custom())),
        model.clone(),
        AgentOptions::default(),
    )
    .await?;
    let observation = observing.call_tool("sql_db_drop", "").await?;
    assert_eq!(
        observation,
        "sql_db_drop is not a valid tool, try one of [sql_db_query, sql_db_query_checker]."
    );

    let raising = create_sql_agent(
        "unused",
        Some(SqlDatabaseToolkit::new(db, model.clone(), ToolSelection::custom())),
        model,
        AgentOptions {
            handle_parsing_errors: ParsingErrorPolicy::Raise,
            ..AgentOptions::default()
        },
    )
    .await?;
    assert!(matches!(
        raising.call_tool("sql_db_drop", "").await,
        Err(ToolkitError::UnknownTool { .. })
    ));

    Ok(())
}
