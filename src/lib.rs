//! gh-attachments - inspect the attachments of an extracted GitHub migration archive

pub mod archive;
pub mod cli;
pub mod core;

// Re-export commonly used types
pub use crate::archive::{Archive, ArchiveError, ScanEvent, ScanOptions, Scanner};
pub use crate::core::config::{ConfigError, ScanConfig};
pub use crate::core::{Attachment, Parent, ParentKind, ScanReport, SizedAttachment, Summary};
