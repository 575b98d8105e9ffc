use eyre::{Context, Result};
use regex::Regex;
use semver::Version;

use crate::loader::error::LoadError;

/// Pulls the latest SDK version out of a download page.
#[derive(Debug, Clone)]
pub struct VersionScraper {
    pattern: Regex,
}

impl VersionScraper {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).wrap_err_with(|| format!("Invalid version pattern: {}", pattern))?;
        Ok(Self { pattern })
    }

    /// Scans `page` line by line and returns the first match. The first
    /// capture group is the version; a pattern without groups uses the whole match.
    pub fn find_version(&self, url: &str, page: &str) -> Result<Version, LoadError> {
        for line in page.lines() {
            let Some(caps) = self.pattern.captures(line) else {
                continue;
            };
            let raw = caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str()).unwrap_or_default();
            return Version::parse(raw).map_err(|e| LoadError::InvalidVersion {
                version: raw.to_string(),
                error: e.to_string(),
            });
        }

        Err(LoadError::VersionNotFound {
            url: url.to_string(),
            pattern: self.pattern.as_str().to_string(),
        })
    }
}

/// Substitutes `{version}` in the archive URL template.
pub fn archive_url(template: &str, version: &Version) -> String {
    template.replace("{version}", &version.to_string())
}
