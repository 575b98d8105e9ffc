use flate2::read::GzDecoder;
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tar::Archive;

use crate::loader::error::LoadError;

/// Reads a single member of a gzip'd tarball as text. Only that member is
/// decoded; nothing is unpacked to disk.
pub fn read_member(archive_path: &Path, member: &str) -> Result<String, LoadError> {
    let archive_error = |error: std::io::Error| LoadError::Archive {
        path: archive_path.to_path_buf(),
        error: error.to_string(),
    };

    let file = File::open(archive_path).map_err(archive_error)?;
    let mut archive = Archive::new(GzDecoder::new(file));
    let wanted = Path::new(member);

    for entry in archive.entries().map_err(archive_error)? {
        let mut entry = entry.map_err(archive_error)?;
        let is_member = {
            let path = entry.path().map_err(archive_error)?;
            path.strip_prefix(".").unwrap_or(&path) == wanted
        };
        if !is_member {
            continue;
        }

        debug!("Found {} in {}", member, archive_path.display());
        let mut text = String::new();
        entry.read_to_string(&mut text).map_err(archive_error)?;
        return Ok(text);
    }

    Err(LoadError::MissingMember {
        archive: archive_path.to_path_buf(),
        member: member.to_string(),
    })
}
