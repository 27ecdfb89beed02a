use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::RegistryResult;

const RECORD_FILE: &str = "config.json";
const LOG_FILE: &str = "logs.ndjson";

/// What the CLI knows about an invocation before it does any work.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub command: String,
    pub workspace: PathBuf,
    pub runs_dir: PathBuf,
    /// Command-line arguments as given.
    pub options: serde_json::Value,
    /// Effective workspace settings for this run.
    pub settings: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct RunRecord<'a> {
    run_id: &'a str,
    command: &'a str,
    started_at: String,
    bankqa_version: &'static str,
    workspace: &'a Path,
    options: &'a serde_json::Value,
    settings: &'a serde_json::Value,
    git: Option<GitRevision>,
}

#[derive(Debug, Serialize)]
struct GitRevision {
    commit: String,
    dirty: bool,
}

/// Location of one run under `runs/`.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub logs_path: PathBuf,
}

impl RunPaths {
    pub fn record_path(&self) -> PathBuf {
        self.root.join(RECORD_FILE)
    }
}

/// Create `runs/<timestamp>__run_<id>/` with its `config.json` and an empty
/// log file.
pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let dir_name = format!(
        "{}__run_{}",
        ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ"),
        ctx.run_id
    );
    let paths = RunPaths {
        root: ctx.runs_dir.join(dir_name),
        logs_path: PathBuf::new(),
    };
    fs::create_dir_all(&paths.root)?;

    let record = RunRecord {
        run_id: &ctx.run_id,
        command: &ctx.command,
        started_at: ctx.started_at.to_rfc3339(),
        bankqa_version: env!("CARGO_PKG_VERSION"),
        workspace: &ctx.workspace,
        options: &ctx.options,
        settings: &ctx.settings,
        git: git_revision(&ctx.workspace),
    };
    fs::write(paths.record_path(), serde_json::to_vec_pretty(&record)?)?;

    let logs_path = paths.root.join(LOG_FILE);
    fs::File::create(&logs_path)?;
    Ok(RunPaths { logs_path, ..paths })
}

/// Store `value` as pretty JSON in the run directory.
pub fn write_artifact<T: Serialize>(
    paths: &RunPaths,
    name: &str,
    value: &T,
) -> RegistryResult<PathBuf> {
    let path = paths.root.join(name);
    fs::write(&path, serde_json::to_vec_pretty(value)?)?;
    Ok(path)
}

fn git_revision(dir: &Path) -> Option<GitRevision> {
    let commit = git(dir, &["rev-parse", "HEAD"])?;
    let commit = String::from_utf8_lossy(&commit).trim().to_string();
    if commit.is_empty() {
        return None;
    }
    let dirty = git(dir, &["status", "--porcelain"]).is_some_and(|status| !status.is_empty());
    Some(GitRevision { commit, dirty })
}

fn git(dir: &Path, args: &[&str]) -> Option<Vec<u8>> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .ok()?;
    output.status.success().then_some(output.stdout)
}
