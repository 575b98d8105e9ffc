use eyre::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::ports::fs::FileSystem;

/// Turns the requested output location into the file to write.
///
/// `~` is expanded. An existing directory gets `file_name` appended; any
/// other path is taken as the file itself and its missing parent
/// directories are created.
pub async fn resolve_output_path(fs: &dyn FileSystem, requested: &Path, file_name: &str) -> Result<PathBuf> {
    let path = expanduser::expanduser(requested.to_string_lossy().as_ref())
        .wrap_err_with(|| format!("Invalid output path: {}", requested.display()))?;

    if fs.is_dir(&path).await {
        return Ok(path.join(file_name));
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !fs.exists(parent).await
    {
        debug!("Creating {}", parent.display());
        fs.create_dir_all(parent)
            .await
            .wrap_err_with(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    Ok(path)
}

/// The configured default location is always a directory, even before it
/// exists; it is created and `file_name` placed inside it.
pub async fn default_output_path(fs: &dyn FileSystem, directory: &Path, file_name: &str) -> Result<PathBuf> {
    if !fs.is_dir(directory).await {
        debug!("Creating {}", directory.display());
        fs.create_dir_all(directory)
            .await
            .wrap_err_with(|| format!("Failed to create directory: {}", directory.display()))?;
    }
    Ok(directory.join(file_name))
}

/// Writes the fully generated script in one atomic step.
pub async fn write_script(fs: &dyn FileSystem, path: &Path, script: &str) -> Result<()> {
    info!("Writing completions to {}", path.display());
    fs.replace(path, script.as_bytes())
        .await
        .wrap_err_with(|| format!("Failed to write completions to {}", path.display()))
}
