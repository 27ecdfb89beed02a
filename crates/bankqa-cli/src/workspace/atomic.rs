use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{WorkspaceError, WorkspaceResult};

/// Replace `path` with `data` so readers see either the old or the new file.
///
/// The bytes go to a uniquely named sibling first and are renamed into place
/// once synced; the sibling is removed if any step fails.
pub fn write_bytes_atomic(path: &Path, data: &[u8]) -> WorkspaceResult<()> {
    let staging = staging_path(path)?;
    if let Some(parent) = staging.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let written = File::create(&staging)
        .and_then(|mut file| {
            file.write_all(data)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&staging, path));

    if let Err(err) = written {
        let _ = fs::remove_file(&staging);
        return Err(err.into());
    }
    Ok(())
}

fn staging_path(path: &Path) -> WorkspaceResult<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        WorkspaceError::Invalid(format!("cannot write to '{}'", path.display()))
    })?;
    Ok(path.with_file_name(format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        uuid::Uuid::new_v4().simple()
    )))
}
