//! Sizing, filtering and ordering the attachments of an archive

use crate::archive::{Archive, ArchiveError};
use crate::core::{MissingAsset, ParentKind, ScanReport, SizedAttachment};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Events emitted while scanning
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    ReadingMetadata {
        files: usize,
    },
    AttachmentsFound {
        count: usize,
    },
    Processing {
        index: usize,
        total: usize,
        asset_name: String,
    },
    OrphanSkipped {
        asset_name: String,
    },
    AssetMissing {
        asset_name: String,
        path: PathBuf,
    },
    Sorting,
    Finished {
        listed: usize,
        orphans: usize,
        missing: usize,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(&ScanEvent) + Send + Sync>;

/// Filters and behaviour switches for a scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOptions {
    /// Drop attachments smaller than this many bytes
    pub min_size: Option<u64>,

    /// Keep only the N largest attachments
    pub limit: Option<usize>,

    /// Keep only these parent kinds; empty keeps all
    pub kinds: Vec<ParentKind>,

    /// Record missing blobs instead of failing on the first one
    pub allow_missing: bool,
}

impl ScanOptions {
    fn accepts(&self, kind: ParentKind, size: u64) -> bool {
        let kind_ok = self.kinds.is_empty() || self.kinds.contains(&kind);
        let size_ok = self.min_size.map_or(true, |min| size >= min);
        kind_ok && size_ok
    }
}

/// Walks an archive's metadata and measures every listed blob
pub struct Scanner {
    options: ScanOptions,
    event_handlers: Vec<EventHandler>,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            event_handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&ScanEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    fn emit(&self, event: ScanEvent) {
        for handler in &self.event_handlers {
            handler(&event);
        }
    }

    /// Scan `archive`, returning listed attachments largest first.
    ///
    /// Equal sizes are ordered by asset name, then by asset URL, so the
    /// output does not depend on metadata file order.
    pub fn scan(&self, archive: &Archive) -> Result<ScanReport, ArchiveError> {
        let files = archive.metadata_files()?;
        self.emit(ScanEvent::ReadingMetadata { files: files.len() });

        let attachments = super::metadata::read_metadata_files(&files)?;
        let total = attachments.len();
        self.emit(ScanEvent::AttachmentsFound { count: total });
        info!(attachments = total, files = files.len(), "Read attachments metadata");

        let mut report = ScanReport {
            metadata_files: files.len(),
            total_records: total,
            ..Default::default()
        };

        for (index, attachment) in attachments.into_iter().enumerate() {
            self.emit(ScanEvent::Processing {
                index: index + 1,
                total,
                asset_name: attachment.asset_name.clone(),
            });

            let Some(path) = archive.asset_path(&attachment) else {
                debug!(asset_url = %attachment.asset_url, "Asset URL points outside the archive");
                let path = attachment.relative_path().to_path_buf();
                self.record_missing(&mut report, attachment.asset_name, path)?;
                continue;
            };
            let size = match std::fs::metadata(&path) {
                Ok(meta) if meta.is_file() => Some(meta.len()),
                Ok(_) => None,
                Err(e) if e.kind() == ErrorKind::NotFound => None,
                Err(source) => return Err(ArchiveError::Io { path, source }),
            };
            let Some(size) = size else {
                self.record_missing(&mut report, attachment.asset_name, path)?;
                continue;
            };

            let Some(parent) = attachment.parent() else {
                debug!(asset = %attachment.asset_name, "Attachment has no parent");
                self.emit(ScanEvent::OrphanSkipped {
                    asset_name: attachment.asset_name.clone(),
                });
                report.orphans.push(attachment);
                continue;
            };

            if !self.options.accepts(parent.kind, size) {
                debug!(asset = %attachment.asset_name, size, "Filtered out");
                continue;
            }

            report.entries.push(SizedAttachment {
                attachment,
                parent,
                path,
                size,
            });
        }

        self.emit(ScanEvent::Sorting);
        report.entries.sort_by(|a, b| {
            b.size
                .cmp(&a.size)
                .then_with(|| a.attachment.asset_name.cmp(&b.attachment.asset_name))
                .then_with(|| a.attachment.asset_url.cmp(&b.attachment.asset_url))
        });

        if let Some(limit) = self.options.limit {
            report.entries.truncate(limit);
        }

        self.emit(ScanEvent::Finished {
            listed: report.entries.len(),
            orphans: report.orphans.len(),
            missing: report.missing.len(),
        });

        Ok(report)
    }

    /// Record a missing blob, or fail if missing blobs aren't allowed
    fn record_missing(
        &self,
        report: &mut ScanReport,
        asset_name: String,
        path: PathBuf,
    ) -> Result<(), ArchiveError> {
        if !self.options.allow_missing {
            return Err(ArchiveError::MissingAsset { path });
        }

        debug!(asset = %asset_name, path = %path.display(), "Attachment file missing");
        self.emit(ScanEvent::AssetMissing {
            asset_name: asset_name.clone(),
            path: path.clone(),
        });
        report.missing.push(MissingAsset { asset_name, path });
        Ok(())
    }
}
