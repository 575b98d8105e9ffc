//! HTTP abstraction for dependency injection.
//!
//! The loader only needs two things from the network: the text of the SDK
//! install page and the SDK archive itself. Tests swap in
//! [`MockSdkFetcher`] instead of making real requests.

use async_trait::async_trait;
use eyre::Result;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::loader::error::LoadError;

/// An archive on disk. Downloads live in a temporary directory that is
/// removed when this value is dropped; local archives are left alone.
#[derive(Debug)]
pub struct DownloadedArchive {
    path: PathBuf,
    _dir: Option<TempDir>,
}

impl DownloadedArchive {
    pub fn temporary(dir: TempDir, path: PathBuf) -> Self {
        Self { path, _dir: Some(dir) }
    }

    pub fn existing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _dir: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
pub trait SdkFetcher: Send + Sync {
    /// Fetch a page as text
    async fn fetch_page(&self, url: &str) -> Result<String>;

    /// Download an archive into a temporary location
    async fn download_archive(&self, url: &str) -> Result<DownloadedArchive>;
}

/// Real implementation that makes HTTP requests via reqwest
pub struct HttpSdkFetcher {
    client: reqwest::Client,
    show_progress: bool,
}

impl HttpSdkFetcher {
    pub fn new(show_progress: bool) -> Self {
        HttpSdkFetcher {
            client: reqwest::Client::new(),
            show_progress,
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, LoadError> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", concat!("fgc/", env!("CARGO_PKG_VERSION")))
            .send()
            .await
            .map_err(|e| LoadError::Network {
                url: url.to_string(),
                error: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(LoadError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }
}

impl Default for HttpSdkFetcher {
    fn default() -> Self {
        Self::new(false)
    }
}

#[async_trait]
impl SdkFetcher for HttpSdkFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self.get(url).await?;
        let text = response.text().await.map_err(|e| LoadError::Network {
            url: url.to_string(),
            error: e.to_string(),
        })?;
        Ok(text)
    }

    async fn download_archive(&self, url: &str) -> Result<DownloadedArchive> {
        use eyre::Context;
        use futures_util::StreamExt;
        use indicatif::{ProgressBar, ProgressStyle};
        use std::fs::File;
        use std::io::Write;

        let response = self.get(url).await?;

        let pb = if self.show_progress {
            let pb = ProgressBar::new(response.content_length().unwrap_or(0));
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")?
                    .progress_chars("█▓▒░ "),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        let temp_dir = tempfile::tempdir()?;
        let file_path = temp_dir.path().join("google-cloud-sdk.tar.gz");
        let mut file = File::create(&file_path).context("Failed to create temp file")?;

        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| LoadError::Network {
                url: url.to_string(),
                error: e.to_string(),
            })?;
            file.write_all(&chunk)?;
            downloaded += chunk.len() as u64;
            pb.set_position(downloaded);
        }
        file.flush()?;

        pb.finish_and_clear();

        Ok(DownloadedArchive::temporary(temp_dir, file_path))
    }
}

/// Mock implementation for testing
#[derive(Clone, Default)]
pub struct MockSdkFetcher {
    page: Arc<Mutex<Option<String>>>,
    archive: Arc<Mutex<Option<Vec<u8>>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockSdkFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text returned by fetch_page
    pub fn with_page(self, page: impl Into<String>) -> Self {
        *self.page.lock().unwrap() = Some(page.into());
        self
    }

    /// Set the bytes written by download_archive
    pub fn with_archive(self, content: Vec<u8>) -> Self {
        *self.archive.lock().unwrap() = Some(content);
        self
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SdkFetcher for MockSdkFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.requests.lock().unwrap().push(url.to_string());
        let page = self.page.lock().unwrap().clone();
        page.ok_or_else(|| {
            LoadError::HttpStatus {
                url: url.to_string(),
                status: 404,
            }
            .into()
        })
    }

    async fn download_archive(&self, url: &str) -> Result<DownloadedArchive> {
        self.requests.lock().unwrap().push(url.to_string());
        let content = self.archive.lock().unwrap().clone().ok_or_else(|| LoadError::HttpStatus {
            url: url.to_string(),
            status: 404,
        })?;

        let temp_dir = tempfile::tempdir()?;
        let file_path = temp_dir.path().join("google-cloud-sdk.tar.gz");
        std::fs::write(&file_path, content)?;

        Ok(DownloadedArchive::temporary(temp_dir, file_path))
    }
}
