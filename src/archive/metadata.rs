//! Reading `attachments_*.json` metadata files

use crate::archive::{ArchiveError, METADATA_FILE_PATTERN};
use crate::core::Attachment;
use glob::Pattern;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Find every metadata file directly under `root`, sorted by name
pub fn find_metadata_files(root: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
    // glob patterns are strings; a lossy conversion would match nothing
    let root_str = root.to_str().ok_or_else(|| ArchiveError::Io {
        path: root.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, "archive path is not valid UTF-8"),
    })?;

    // The root itself may contain glob metacharacters
    let pattern = format!("{}/{}", Pattern::escape(root_str), METADATA_FILE_PATTERN);

    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry.map_err(|e| ArchiveError::Io {
            path: e.path().to_path_buf(),
            source: e.into(),
        })?;
        files.push(path);
    }
    files.sort();

    debug!(count = files.len(), "Found metadata files");
    Ok(files)
}

/// Parse a single metadata file
pub fn read_metadata_file(path: &Path) -> Result<Vec<Attachment>, ArchiveError> {
    let content = std::fs::read_to_string(path).map_err(|source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ArchiveError::Metadata {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse and concatenate several metadata files, preserving order
pub fn read_metadata_files(paths: &[PathBuf]) -> Result<Vec<Attachment>, ArchiveError> {
    let mut attachments = Vec::new();
    for path in paths {
        let mut file_attachments = read_metadata_file(path)?;
        debug!(
            file = %path.display(),
            records = file_attachments.len(),
            "Read metadata file"
        );
        attachments.append(&mut file_attachments);
    }
    Ok(attachments)
}
