use async_trait::async_trait;
use eyre::Result;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Filesystem abstraction for dependency injection
#[async_trait]
pub trait FileSystem: Send + Sync {
    async fn exists(&self, path: &Path) -> bool;
    async fn is_dir(&self, path: &Path) -> bool;
    async fn read_to_string(&self, path: &Path) -> Result<String>;
    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Atomically replaces `path` with `contents`: either the old file (if
    /// any) or the complete new one is visible, never a partial write.
    async fn replace(&self, path: &Path, contents: &[u8]) -> Result<()>;
}

/// Real filesystem implementation using tokio::fs
#[derive(Debug, Clone, Default)]
pub struct RealFs;

#[async_trait]
impl FileSystem for RealFs {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn is_dir(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false)
    }

    async fn read_to_string(&self, path: &Path) -> Result<String> {
        Ok(tokio::fs::read_to_string(path).await?)
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        Ok(tokio::fs::create_dir_all(path).await?)
    }

    async fn replace(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let path = path.to_path_buf();
        let contents = contents.to_vec();

        tokio::task::spawn_blocking(move || -> Result<()> {
            use std::io::Write;

            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };

            // Temp file in the destination directory so the rename stays on one filesystem
            let mut temp = tempfile::NamedTempFile::new_in(dir)?;
            temp.write_all(&contents)?;
            temp.as_file().sync_all()?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                temp.as_file().set_permissions(std::fs::Permissions::from_mode(0o644))?;
            }

            temp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await?
    }
}

/// In-memory filesystem for testing
#[derive(Debug, Clone, Default)]
pub struct MemFs {
    files: Arc<RwLock<HashMap<PathBuf, Vec<u8>>>>,
    dirs: Arc<RwLock<HashSet<PathBuf>>>,
    read_only: Arc<RwLock<HashSet<PathBuf>>>,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory (and its parents) for testing
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.dirs.write().unwrap().insert(path.clone());

        if let Some(parent) = path.parent()
            && parent != Path::new("")
        {
            self.add_dir(parent);
        }
    }

    /// Make writes and directory creation under `path` fail
    pub fn set_read_only(&self, path: impl AsRef<Path>) {
        self.read_only.write().unwrap().insert(path.as_ref().to_path_buf());
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files.read().unwrap().get(path.as_ref()).cloned()
    }

    fn check_writable(&self, path: &Path) -> Result<()> {
        let read_only = self.read_only.read().unwrap();
        match read_only.iter().find(|ro| path.starts_with(ro)) {
            Some(ro) => Err(eyre::eyre!("Permission denied: {} is read-only", ro.display())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl FileSystem for MemFs {
    async fn exists(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path) || self.dirs.read().unwrap().contains(path)
    }

    async fn is_dir(&self, path: &Path) -> bool {
        self.dirs.read().unwrap().contains(path)
    }

    async fn read_to_string(&self, path: &Path) -> Result<String> {
        let files = self.files.read().unwrap();
        let content = files
            .get(path)
            .ok_or_else(|| eyre::eyre!("File not found: {}", path.display()))?;
        Ok(String::from_utf8_lossy(content).to_string())
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.check_writable(path)?;
        self.add_dir(path);
        Ok(())
    }

    async fn replace(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.check_writable(path)?;
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.dirs.read().unwrap().contains(parent) => {
                Err(eyre::eyre!("No such directory: {}", parent.display()))
            }
            _ => {
                self.files.write().unwrap().insert(path.to_path_buf(), contents.to_vec());
                Ok(())
            }
        }
    }
}
