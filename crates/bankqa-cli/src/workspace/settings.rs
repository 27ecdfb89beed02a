use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use bankqa_generate::RowCounts;
use bankqa_load::DEFAULT_TABLE_NAME;

use super::atomic::write_bytes_atomic;
use super::{WorkspacePaths, WorkspaceResult};

/// Persistent settings stored in `config/settings.toml`. Relative paths are
/// resolved against the workspace root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSettings {
    pub models_path: PathBuf,
    pub csv_folder: PathBuf,
    pub database_path: PathBuf,
    pub default_table: String,
    pub sample_rows_in_table_info: usize,
    pub seed: Option<u64>,
    pub rows: RowCounts,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            models_path: PathBuf::from("models"),
            csv_folder: PathBuf::from("csv"),
            database_path: PathBuf::from("synthetic-sqlite.db"),
            default_table: DEFAULT_TABLE_NAME.to_string(),
            sample_rows_in_table_info: 1,
            seed: None,
            rows: RowCounts::default(),
        }
    }
}

pub fn load_or_create_settings(paths: &WorkspacePaths) -> WorkspaceResult<WorkspaceSettings> {
    let path = paths.settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path)?;
        let settings: WorkspaceSettings = toml::from_str(&content)?;
        return Ok(settings);
    }

    let settings = WorkspaceSettings::default();
    save_settings(paths, &settings)?;
    Ok(settings)
}

pub fn save_settings(paths: &WorkspacePaths, settings: &WorkspaceSettings) -> WorkspaceResult<()> {
    let path = paths.settings_path();
    let encoded = toml::to_string_pretty(settings)?;
    write_bytes_atomic(&path, encoded.as_bytes())
}
