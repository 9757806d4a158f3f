//! Core domain models
//!
//! Attachment records, configuration, size formatting and the reports
//! produced by scanning an archive.

pub mod attachment;
pub mod config;
pub mod report;
pub mod size;

pub use attachment::*;
pub use report::*;
