//! CLI command definitions

use crate::core::config::ScanConfig;
use crate::core::ParentKind;
use byte_unit::Byte;
use clap::Args;
use std::path::PathBuf;

/// Filters shared by the listing commands
#[derive(Debug, Args, Clone, Default)]
pub struct FilterArgs {
    /// Only show the N largest attachments
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Skip attachments smaller than this (e.g. 2048, 500KB, 1MiB)
    #[arg(long, value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Only show attachments uploaded to this kind of parent (repeatable)
    #[arg(long = "kind", value_enum)]
    pub kinds: Vec<ParentKindArg>,

    /// Report missing attachment files instead of failing
    #[arg(long)]
    pub allow_missing: bool,
}

impl FilterArgs {
    /// Command-line layer of the scan configuration
    pub fn to_config(&self, directory: Option<PathBuf>) -> ScanConfig {
        ScanConfig {
            directory,
            min_size: self.min_size,
            limit: self.limit,
            kinds: if self.kinds.is_empty() {
                None
            } else {
                Some(self.kinds.iter().copied().map(ParentKind::from).collect())
            },
            allow_missing: self.allow_missing.then_some(true),
        }
    }
}

/// List attachments, largest first
#[derive(Debug, Args, Clone, Default)]
pub struct ListCommand {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Summarize attachments by parent kind and repository
#[derive(Debug, Args, Clone, Default)]
pub struct SummaryCommand {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Verify the archive layout and attachment files
#[derive(Debug, Args, Clone, Default)]
pub struct CheckCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Parent kind argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ParentKindArg {
    PullRequest,
    Issue,
    IssueComment,
}

impl From<ParentKindArg> for ParentKind {
    fn from(arg: ParentKindArg) -> Self {
        match arg {
            ParentKindArg::PullRequest => ParentKind::PullRequest,
            ParentKindArg::Issue => ParentKind::Issue,
            ParentKindArg::IssueComment => ParentKind::IssueComment,
        }
    }
}

/// Parse a byte count with an optional unit
pub fn parse_size(s: &str) -> Result<u64, String> {
    let byte = Byte::from_str(s).map_err(|e| format!("Invalid size '{}': {}", s, e))?;
    u64::try_from(byte.get_bytes()).map_err(|_| format!("Size too large: {}", s))
}
