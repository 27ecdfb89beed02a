mod registry;
mod workspace;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use uuid::Uuid;

use bankqa_generate::{BankDataGenerator, DatasetTable, GenerateOptions, GenerationError, RowCounts};
use bankqa_load::{create_sqlite_db_from_csv, LoadError, TableSource};
use bankqa_toolkit::{
    create_sql_agent, AgentOptions, LanguageModel, SqlDatabase, SqlDatabaseOptions,
    SqlDatabaseToolkit, ToolSelection, ToolkitError,
};
use registry::{init_run_logging, start_run, write_artifact, RunContext};
use workspace::{load_or_create_settings, WorkspaceError, WorkspacePaths, WorkspaceSettings};

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("workspace error: {0}")]
    Workspace(#[from] WorkspaceError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("load error: {0}")]
    Load(#[from] LoadError),
    #[error("toolkit error: {0}")]
    Toolkit(#[from] ToolkitError),
}

#[derive(Parser, Debug)]
#[command(name = "bankqa", version, about = "Synthetic bank data and SQL agent tooling")]
struct Cli {
    /// Workspace root holding config, runs, models and CSV output.
    #[arg(long, global = true, default_value = ".")]
    workspace: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the workspace directories and default settings.
    Init,
    /// Create (or reuse) the folder for a model.
    ModelDir(ModelDirArgs),
    /// Generate customers, accounts and transactions as CSV.
    Generate(GenerateArgs),
    /// Load a CSV or a freshly generated table into SQLite.
    Load(LoadArgs),
    /// List the tools exposed to the agent.
    Tools(ToolsArgs),
    /// Run a SQL query and print the rows.
    Query(QueryArgs),
    /// Print CREATE statements and sample rows.
    Schema(SchemaArgs),
    /// Call one tool directly.
    Call(CallArgs),
}

#[derive(Args, Debug)]
struct ModelDirArgs {
    name: String,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[arg(long)]
    customers: Option<u64>,
    #[arg(long)]
    accounts: Option<u64>,
    #[arg(long)]
    transactions: Option<u64>,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Output directory (defaults to the configured CSV folder).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct LoadArgs {
    /// SQLite database file.
    #[arg(long)]
    db: Option<PathBuf>,
    /// Target table, replaced if it exists.
    #[arg(long)]
    table: Option<String>,
    /// CSV path or file:// URL.
    #[arg(long, conflicts_with = "generated", required_unless_present = "generated")]
    csv: Option<String>,
    /// Generate this table (customers, accounts or transactions) instead of reading CSV.
    #[arg(long)]
    generated: Option<DatasetTable>,
    /// Seed used with --generated.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct ToolsArgs {
    #[arg(long)]
    db: Option<PathBuf>,
    /// Include the schema and table-listing tools.
    #[arg(long, default_value_t = false)]
    all: bool,
}

#[derive(Args, Debug)]
struct QueryArgs {
    #[arg(long)]
    db: Option<PathBuf>,
    sql: String,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    #[arg(long)]
    db: Option<PathBuf>,
    /// Tables to describe; all usable tables when omitted.
    tables: Vec<String>,
}

#[derive(Args, Debug)]
struct CallArgs {
    #[arg(long)]
    db: Option<PathBuf>,
    /// Tool name, e.g. sql_db_query.
    tool: String,
    /// Raw tool input.
    #[arg(default_value = "")]
    input: String,
}

/// Stand-in model for the CLI, which has no language model provider.
struct OfflineModel;

#[async_trait]
impl LanguageModel for OfflineModel {
    fn name(&self) -> &str {
        "offline"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, ToolkitError> {
        Err(ToolkitError::Model(
            "no language model is configured for the CLI".to_string(),
        ))
    }
}

struct Workspace {
    paths: WorkspacePaths,
    settings: WorkspaceSettings,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    let mut paths = WorkspacePaths::new(cli.workspace);
    let settings = load_or_create_settings(&paths)?;
    paths.apply_settings(&settings);
    paths.ensure_dirs()?;
    let ws = Workspace { paths, settings };

    let (name, options) = describe(&cli.command);
    let run_id = Uuid::new_v4().to_string();
    let run_paths = start_run(&RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        command: name.to_string(),
        workspace: ws.paths.root.clone(),
        runs_dir: ws.paths.runs_dir.clone(),
        options,
        settings: serde_json::to_value(&ws.settings).map_err(registry::RegistryError::from)?,
    })?;
    init_run_logging(&run_paths.logs_path)?;

    tracing::info!(event = "run_started", run_id = %run_id, command = name);
    let timer = Instant::now();

    let artifact = match cli.command {
        Command::Init => run_init(&ws),
        Command::ModelDir(args) => run_model_dir(&ws, args),
        Command::Generate(args) => run_generate(&ws, args),
        Command::Load(args) => run_load(&ws, args).await,
        Command::Tools(args) => run_tools(&ws, args).await,
        Command::Query(args) => run_query(&ws, args).await,
        Command::Schema(args) => run_schema(&ws, args).await,
        Command::Call(args) => run_call(&ws, args).await,
    };
    let artifact = match artifact {
        Ok(artifact) => artifact,
        Err(err) => {
            tracing::warn!(event = "run_finished", status = "failed", error = %err);
            return Err(err);
        }
    };

    if let Some(artifact) = artifact {
        let path = write_artifact(&run_paths, "result.json", &artifact)?;
        tracing::info!(event = "artifact_written", path = %path.display());
    }

    let duration_ms = timer.elapsed().as_millis();
    tracing::info!(event = "run_finished", status = "success", duration_ms = duration_ms);

    Ok(())
}

fn describe(command: &Command) -> (&'static str, serde_json::Value) {
    match command {
        Command::Init => ("init", serde_json::json!({})),
        Command::ModelDir(args) => ("model-dir", serde_json::json!({ "name": args.name })),
        Command::Generate(args) => (
            "generate",
            serde_json::json!({
                "customers": args.customers,
                "accounts": args.accounts,
                "transactions": args.transactions,
                "seed": args.seed,
                "out": args.out,
            }),
        ),
        Command::Load(args) => (
            "load",
            serde_json::json!({
                "db": args.db,
                "table": args.table,
                "csv": args.csv,
                "generated": args.generated,
                "seed": args.seed,
            }),
        ),
        Command::Tools(args) => ("tools", serde_json::json!({ "db": args.db, "all": args.all })),
        Command::Query(args) => ("query", serde_json::json!({ "db": args.db, "sql": args.sql })),
        Command::Schema(args) => (
            "schema",
            serde_json::json!({ "db": args.db, "tables": args.tables }),
        ),
        Command::Call(args) => (
            "call",
            serde_json::json!({ "db": args.db, "tool": args.tool }),
        ),
    }
}

fn run_init(ws: &Workspace) -> Result<Option<serde_json::Value>, CliError> {
    println!("workspace={}", ws.paths.root.display());
    println!("models={}", ws.paths.models_dir.display());
    println!("csv={}", ws.paths.csv_dir.display());
    println!("settings={}", ws.paths.settings_path().display());
    Ok(None)
}

fn run_model_dir(ws: &Workspace, args: ModelDirArgs) -> Result<Option<serde_json::Value>, CliError> {
    let path = ws.paths.make_folder_for_model_name(&args.name)?;
    println!("{}", path.display());
    Ok(None)
}

fn run_generate(ws: &Workspace, args: GenerateArgs) -> Result<Option<serde_json::Value>, CliError> {
    let defaults = ws.settings.rows;
    let counts = RowCounts {
        customers: args.customers.unwrap_or(defaults.customers),
        accounts: args.accounts.unwrap_or(defaults.accounts),
        transactions: args.transactions.unwrap_or(defaults.transactions),
    };
    let out_dir = args
        .out
        .map(|out| ws.paths.resolve(&out))
        .unwrap_or_else(|| ws.paths.csv_dir.clone());

    let generator = BankDataGenerator::new(GenerateOptions {
        seed: args.seed.or(ws.settings.seed),
        today: None,
    });
    let result = generator.run(counts, &out_dir)?;

    println!("out_dir={}", result.out_dir.display());
    for table in &result.report.tables {
        println!("{}={}", table.table, table.rows_generated);
    }
    Ok(Some(serde_json::to_value(&result.report).map_err(registry::RegistryError::from)?))
}

async fn run_load(ws: &Workspace, args: LoadArgs) -> Result<Option<serde_json::Value>, CliError> {
    let db_path = database_path(ws, args.db.as_ref());
    let table = args
        .table
        .unwrap_or_else(|| ws.settings.default_table.clone());

    let source = match (args.csv, args.generated) {
        (Some(location), _) => TableSource::Csv(location),
        (None, Some(which)) => {
            let generator = BankDataGenerator::new(GenerateOptions {
                seed: args.seed.or(ws.settings.seed),
                today: None,
            });
            TableSource::Frame(generator.generate(ws.settings.rows)?.frame(which))
        }
        (None, None) => {
            return Err(LoadError::InvalidSource("either --csv or --generated is required".to_string()).into());
        }
    };

    let report = create_sqlite_db_from_csv(&db_path, &table, source).await?;
    println!(
        "Database {} with table {} created successfully!",
        db_path.display(),
        report.table
    );
    Ok(Some(serde_json::to_value(&report).map_err(registry::RegistryError::from)?))
}

async fn run_tools(ws: &Workspace, args: ToolsArgs) -> Result<Option<serde_json::Value>, CliError> {
    let selection = if args.all {
        ToolSelection::all()
    } else {
        ToolSelection::custom()
    };
    let toolkit = open_toolkit(ws, args.db.as_ref(), selection).await?;

    for tool in toolkit.get_tools() {
        println!("{}: {}", tool.name(), tool.description());
    }
    Ok(None)
}

async fn run_query(ws: &Workspace, args: QueryArgs) -> Result<Option<serde_json::Value>, CliError> {
    let db = open_database(ws, args.db.as_ref()).await?;
    let rows = db.run(&args.sql).await;
    db.close().await;
    let rows = rows?;
    println!("{rows}");
    Ok(Some(serde_json::json!({ "sql": args.sql, "result": rows })))
}

async fn run_schema(ws: &Workspace, args: SchemaArgs) -> Result<Option<serde_json::Value>, CliError> {
    let db = open_database(ws, args.db.as_ref()).await?;
    let tables = (!args.tables.is_empty()).then_some(args.tables.as_slice());
    let info = db.table_info(tables).await;
    db.close().await;
    let info = info?;
    println!("{info}");
    Ok(None)
}

async fn run_call(ws: &Workspace, args: CallArgs) -> Result<Option<serde_json::Value>, CliError> {
    let toolkit = open_toolkit(ws, args.db.as_ref(), ToolSelection::all()).await?;
    let llm = Arc::clone(toolkit.llm());
    let agent = create_sql_agent("", Some(toolkit), llm, AgentOptions::default()).await?;

    let observation = agent.call_tool(&args.tool, &args.input).await?;
    println!("{observation}");
    Ok(Some(serde_json::json!({
        "tool": args.tool,
        "input": args.input,
        "observation": observation,
    })))
}

async fn open_toolkit(
    ws: &Workspace,
    db: Option<&PathBuf>,
    selection: ToolSelection,
) -> Result<SqlDatabaseToolkit, CliError> {
    let db = open_database(ws, db).await?;
    Ok(SqlDatabaseToolkit::new(
        Arc::new(db),
        Arc::new(OfflineModel),
        selection,
    ))
}

async fn open_database(ws: &Workspace, db: Option<&PathBuf>) -> Result<SqlDatabase, CliError> {
    let db_path = database_path(ws, db);
    let options =
        SqlDatabaseOptions::default().with_sample_rows(ws.settings.sample_rows_in_table_info);
    Ok(SqlDatabase::from_path(&db_path, options).await?)
}

fn database_path(ws: &Workspace, db: Option<&PathBuf>) -> PathBuf {
    ws.paths
        .resolve(db.unwrap_or(&ws.settings.database_path))
}
