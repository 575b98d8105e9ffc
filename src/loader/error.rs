use colored::Colorize;
use std::fmt;
use std::path::PathBuf;

/// Failures while obtaining the command tree. All of them abort the run
/// before anything is generated.
#[derive(Debug, Clone)]
pub enum LoadError {
    Network {
        url: String,
        error: String,
    },
    HttpStatus {
        url: String,
        status: u16,
    },
    VersionNotFound {
        url: String,
        pattern: String,
    },
    InvalidVersion {
        version: String,
        error: String,
    },
    Archive {
        path: PathBuf,
        error: String,
    },
    MissingMember {
        archive: PathBuf,
        member: String,
    },
    MalformedTree {
        origin: String,
        error: String,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Network { url, error } => {
                write!(f, "{}: Request to {} failed: {}", "error".red().bold(), url.cyan(), error)
            }
            LoadError::HttpStatus { url, status } => {
                write!(
                    f,
                    "{}: {} returned HTTP status {}",
                    "error".red().bold(),
                    url.cyan(),
                    status.to_string().yellow()
                )
            }
            LoadError::VersionNotFound { url, pattern } => {
                write!(
                    f,
                    "{}: Cannot determine latest version\n\nNo line of {} matched: {}",
                    "error".red().bold(),
                    url.cyan(),
                    pattern.yellow()
                )
            }
            LoadError::InvalidVersion { version, error } => {
                write!(f, "{}: Invalid version '{}': {}", "error".red().bold(), version.yellow(), error)
            }
            LoadError::Archive { path, error } => {
                write!(
                    f,
                    "{}: Cannot read archive {}: {}",
                    "error".red().bold(),
                    path.display().to_string().cyan(),
                    error
                )
            }
            LoadError::MissingMember { archive, member } => {
                write!(
                    f,
                    "{}: Member '{}' not found in archive {}",
                    "error".red().bold(),
                    member.yellow(),
                    archive.display().to_string().cyan()
                )
            }
            LoadError::MalformedTree { origin, error } => {
                write!(
                    f,
                    "{}: Malformed command tree in {}\n\n{}",
                    "error".red().bold(),
                    origin.cyan(),
                    error
                )
            }
        }
    }
}

impl std::error::Error for LoadError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_member_message() {
        let error = LoadError::MissingMember {
            archive: PathBuf::from("/tmp/sdk.tar.gz"),
            member: "google-cloud-sdk/data/cli/gcloud_completions.py".to_string(),
        };

        let message = error.to_string();
        assert!(message.contains("not found in archive"));
        assert!(message.contains("gcloud_completions.py"));
        assert!(message.contains("/tmp/sdk.tar.gz"));
    }

    #[test]
    fn test_version_not_found_message() {
        let error = LoadError::VersionNotFound {
            url: "https://example.com/install".to_string(),
            pattern: "version ([0-9.]+)".to_string(),
        };

        assert!(error.to_string().contains("Cannot determine latest version"));
    }
}
