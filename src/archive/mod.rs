//! Extracted migration archive: layout checks, metadata loading and scanning

pub mod metadata;
pub mod scanner;

pub use scanner::{EventHandler, ScanEvent, ScanOptions, Scanner};

use crate::core::Attachment;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Name of the first metadata file; present in every archive with attachments
pub const FIRST_METADATA_FILE: &str = "attachments_000001.json";

/// Directory holding the attachment blobs
pub const ATTACHMENTS_DIR: &str = "attachments";

/// Glob matching every metadata file
pub const METADATA_FILE_PATTERN: &str = "attachments_*.json";

/// Errors raised while reading an archive
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error(
        "Could not find `{}` file and/or `{}/` directory. This suggests that either (a) your archive contains no attachments or (b) you're not in a directory created when you extract a GitHub archive.",
        .metadata.display(),
        .directory.display()
    )]
    NotAnArchive { metadata: PathBuf, directory: PathBuf },

    #[error("Could not read `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not read attachments metadata file `{}`", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid metadata file pattern")]
    Pattern(#[from] glob::PatternError),

    #[error(
        "Could not find listed attachment file `{}`. Please make sure you're running this tool in the directory created when you extract a GitHub archive.",
        .path.display()
    )]
    MissingAsset { path: PathBuf },
}

/// An extracted archive whose layout has been checked
#[derive(Debug, Clone)]
pub struct Archive {
    root: PathBuf,
}

impl Archive {
    /// Open an archive rooted at `root`.
    ///
    /// Fails unless both the first metadata file and the attachments
    /// directory exist.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ArchiveError> {
        let root = root.into();
        let metadata = root.join(FIRST_METADATA_FILE);
        let directory = root.join(ATTACHMENTS_DIR);

        if !metadata.exists() || !directory.exists() {
            return Err(ArchiveError::NotAnArchive {
                metadata,
                directory,
            });
        }

        debug!(root = %root.display(), "Opened archive");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All metadata files, in lexical order
    pub fn metadata_files(&self) -> Result<Vec<PathBuf>, ArchiveError> {
        metadata::find_metadata_files(&self.root)
    }

    /// Every attachment record, in metadata file order
    pub fn read_attachments(&self) -> Result<Vec<Attachment>, ArchiveError> {
        metadata::read_metadata_files(&self.metadata_files()?)
    }

    /// Where the blob for `attachment` lives on disk, if inside the archive
    pub fn asset_path(&self, attachment: &Attachment) -> Option<PathBuf> {
        attachment.path_in(&self.root)
    }
}
