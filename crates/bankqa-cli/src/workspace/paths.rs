use std::path::{Component, Path, PathBuf};

use tracing::info;

use super::{WorkspaceError, WorkspaceResult, WorkspaceSettings};

#[derive(Debug, Clone)]
pub struct WorkspacePaths {
    pub root: PathBuf,
    pub config_dir: PathBuf,
    pub runs_dir: PathBuf,
    pub models_dir: PathBuf,
    pub csv_dir: PathBuf,
}

impl WorkspacePaths {
    pub fn new(root: PathBuf) -> Self {
        let config_dir = root.join("config");
        let runs_dir = root.join("runs");
        let models_dir = root.join("models");
        let csv_dir = root.join("csv");
        Self {
            root,
            config_dir,
            runs_dir,
            models_dir,
            csv_dir,
        }
    }

    /// Point the models and CSV directories at the configured locations.
    pub fn apply_settings(&mut self, settings: &WorkspaceSettings) {
        self.models_dir = self.resolve(&settings.models_path);
        self.csv_dir = self.resolve(&settings.csv_folder);
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join("settings.toml")
    }

    /// Create every workspace directory that does not exist yet.
    pub fn ensure_dirs(&self) -> WorkspaceResult<()> {
        create_if_missing(&self.root)?;
        create_if_missing(&self.config_dir)?;
        create_if_missing(&self.runs_dir)?;
        create_if_missing(&self.models_dir)?;
        create_if_missing(&self.csv_dir)?;
        Ok(())
    }

    /// Return `<models>/<model_name>/`, creating it on first use.
    pub fn make_folder_for_model_name(&self, model_name: &str) -> WorkspaceResult<PathBuf> {
        let name = Path::new(model_name);
        let single_component = matches!(
            name.components().collect::<Vec<_>>().as_slice(),
            [Component::Normal(_)]
        );
        if model_name.trim().is_empty() || !single_component {
            return Err(WorkspaceError::Invalid(format!(
                "invalid model name '{model_name}'"
            )));
        }

        let model_path = self.models_dir.join(model_name);
        if model_path.is_dir() {
            info!(model = %model_name, path = %model_path.display(), "folder is already present for model");
        } else {
            info!(model = %model_name, path = %model_path.display(), "creating a new folder for this model");
            std::fs::create_dir_all(&model_path)?;
        }
        Ok(model_path)
    }
}

fn create_if_missing(path: &Path) -> WorkspaceResult<()> {
    if path.exists() {
        return Ok(());
    }
    std::fs::create_dir_all(path).map_err(WorkspaceError::from)
}
