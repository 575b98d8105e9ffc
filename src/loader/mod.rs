pub mod archive;
pub mod document;
pub mod error;
pub mod version;

use eyre::{Context, Result};
use log::{debug, info};
use semver::Version;
use std::path::{Path, PathBuf};

use crate::cfg::config::SourceSpec;
use crate::completion::tree::CommandTree;
use crate::ports::fs::FileSystem;
use crate::ports::http::SdkFetcher;

pub use error::LoadError;
pub use version::{VersionScraper, archive_url};

/// Where to take the command tree from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeSource {
    /// Download the latest SDK archive
    Remote,
    /// A local SDK archive
    Archive(PathBuf),
    /// A tree document: strict JSON for `.json` files, YAML otherwise
    Document(PathBuf),
}

pub struct TreeLoader<F: SdkFetcher> {
    fetcher: F,
    source: SourceSpec,
}

impl<F: SdkFetcher> TreeLoader<F> {
    pub fn new(fetcher: F, source: SourceSpec) -> Self {
        Self { fetcher, source }
    }

    pub async fn load(&self, source: &TreeSource, fs: &dyn FileSystem) -> Result<CommandTree> {
        match source {
            TreeSource::Remote => self.load_remote().await,
            TreeSource::Archive(path) => self.load_archive(path),
            TreeSource::Document(path) => self.load_document(path, fs).await,
        }
    }

    pub async fn latest_version(&self) -> Result<Version> {
        info!("Determining latest version");
        let scraper = VersionScraper::new(&self.source.version_pattern)?;
        let page = self.fetcher.fetch_page(&self.source.version_page).await?;
        let version = scraper.find_version(&self.source.version_page, &page)?;
        debug!("Latest version is {}", version);
        Ok(version)
    }

    /// The downloaded archive is removed once the tree has been read.
    pub async fn load_remote(&self) -> Result<CommandTree> {
        let version = self.latest_version().await?;
        let url = archive_url(&self.source.archive_url, &version);

        info!("Downloading version {}", version);
        debug!("Archive URL: {}", url);
        let archive = self.fetcher.download_archive(&url).await?;

        self.load_archive(archive.path())
    }

    pub fn load_archive(&self, path: &Path) -> Result<CommandTree> {
        info!("Extracting completions file");
        let text = archive::read_member(path, &self.source.archive_member)?;
        let origin = format!("{}:{}", path.display(), self.source.archive_member);
        Ok(document::parse_tree(&origin, &text, Some(&self.source.tree_variable))?)
    }

    pub async fn load_document(&self, path: &Path, fs: &dyn FileSystem) -> Result<CommandTree> {
        info!("Reading command tree from {}", path.display());
        let text = fs
            .read_to_string(path)
            .await
            .wrap_err_with(|| format!("Failed to read command tree: {}", path.display()))?;
        let origin = path.display().to_string();

        let tree = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => document::parse_json_tree(&origin, &text)?,
            _ => document::parse_tree(&origin, &text, Some(&self.source.tree_variable))?,
        };
        Ok(tree)
    }
}
