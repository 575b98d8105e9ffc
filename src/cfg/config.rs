use eyre::{Context, eyre};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cfg::error::{ConfigResult, config_load_error, serde_yaml_error};
use crate::completion::fish::{DEFAULT_PROGRAM, PreambleCommands};

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

fn default_version_page() -> String {
    "https://cloud.google.com/sdk/docs/install-sdk".to_string()
}

pub fn default_version_pattern() -> String {
    r"Installing the latest gcloud CLI version \(([0-9]+\.[0-9]+\.[0-9]+)\)".to_string()
}

fn default_archive_url() -> String {
    "https://dl.google.com/dl/cloudsdk/channels/rapid/downloads/google-cloud-sdk-{version}-linux-x86_64.tar.gz"
        .to_string()
}

fn default_archive_member() -> String {
    "google-cloud-sdk/data/cli/gcloud_completions.py".to_string()
}

fn default_tree_variable() -> String {
    "STATIC_COMPLETION_CLI_TREE".to_string()
}

fn default_file_name() -> String {
    "gcloud.fish".to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSpec {
    #[serde(default = "default_program")]
    pub program: String,

    #[serde(default)]
    pub preamble_commands: PreambleCommands,

    #[serde(default)]
    pub source: SourceSpec,

    #[serde(default)]
    pub output: OutputSpec,
}

impl Default for ConfigSpec {
    fn default() -> Self {
        Self {
            program: default_program(),
            preamble_commands: PreambleCommands::default(),
            source: SourceSpec::default(),
            output: OutputSpec::default(),
        }
    }
}

/// Where the command tree comes from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Page the latest version is scraped from
    #[serde(default = "default_version_page")]
    pub version_page: String,

    /// Regex whose first group captures the version
    #[serde(default = "default_version_pattern")]
    pub version_pattern: String,

    /// Archive URL template; `{version}` is substituted
    #[serde(default = "default_archive_url")]
    pub archive_url: String,

    /// Path of the tree document inside the archive
    #[serde(default = "default_archive_member")]
    pub archive_member: String,

    /// Name the tree literal is assigned to in the archive member
    #[serde(default = "default_tree_variable")]
    pub tree_variable: String,
}

impl Default for SourceSpec {
    fn default() -> Self {
        Self {
            version_page: default_version_page(),
            version_pattern: default_version_pattern(),
            archive_url: default_archive_url(),
            archive_member: default_archive_member(),
            tree_variable: default_tree_variable(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    /// Default output location; the fish completions dir under the user config dir when unset
    #[serde(default)]
    pub directory: Option<String>,

    /// File name used when the output path is a directory
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: default_file_name(),
        }
    }
}

impl ConfigSpec {
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        serde_yaml::from_str(content).map_err(serde_yaml_error)
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(config_load_error)
            .wrap_err_with(|| format!("Cannot read config file: {}", path.display()))?;
        Self::from_yaml(&content).wrap_err_with(|| format!("Invalid config file: {}", path.display()))
    }

    /// An explicit path must exist; otherwise `<config dir>/fgc/fgc.yml` is
    /// used when present, falling back to the defaults.
    pub fn discover(explicit: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::user_config_path() {
            Some(path) if path.is_file() => {
                log::debug!("Loading config from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fgc").join("fgc.yml"))
    }

    pub fn default_output_dir(&self) -> ConfigResult<PathBuf> {
        if let Some(ref dir) = self.output.directory {
            return expanduser::expanduser(dir).wrap_err_with(|| format!("Invalid output directory: {}", dir));
        }

        dirs::config_dir()
            .map(|dir| dir.join("fish").join("completions"))
            .ok_or_else(|| eyre!("Could not determine the user config directory"))
    }
}
