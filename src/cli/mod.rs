//! Command-line interface

pub mod commands;
pub mod output;

use crate::archive::ArchiveError;
use crate::core::config::ConfigError;
use clap::{Parser, Subcommand};
use commands::{CheckCommand, ListCommand, SummaryCommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Inspect the attachments of an extracted GitHub migration archive
#[derive(Debug, Parser, Clone)]
#[command(name = "gh-attachments")]
#[command(version)]
#[command(about = "Inspect the attachments of an extracted GitHub migration archive", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Root of the extracted archive (defaults to the current directory)
    #[arg(short, long, global = true)]
    pub directory: Option<PathBuf>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// List attachments, largest first (the default)
    List(ListCommand),

    /// Show totals by parent kind and repository
    Summary(SummaryCommand),

    /// Verify that every listed attachment file exists
    Check(CheckCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }

    /// The requested command; running without one lists attachments
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::List(ListCommand::default()))
    }
}

/// Map an error to a sysexits-style process exit code
pub fn exit_code_for(error: &anyhow::Error) -> exitcode::ExitCode {
    for cause in error.chain() {
        if cause.is::<ArchiveError>() {
            return exitcode::DATAERR;
        }
        if cause.is::<ConfigError>() {
            return exitcode::CONFIG;
        }
    }
    exitcode::SOFTWARE
}
