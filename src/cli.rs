//! Command-line interface definitions for dupepurge.
//!
//! This module defines all CLI arguments using the clap derive API.
//!
//! # Example
//!
//! ```bash
//! # List every duplicate under two trees
//! dupepurge --report ~/photos /mnt/backup
//!
//! # Dry run: announce which copies under /mnt/backup would go
//! dupepurge --delete-prefix /mnt/backup ~/photos /mnt/backup
//!
//! # Actually remove them
//! dupepurge --delete-prefix /mnt/backup --for-real ~/photos /mnt/backup
//!
//! # Skip editor leftovers
//! dupepurge --report --ignore-suffixes .swp,.tmp ~/src
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::actions::PurgeMode;

/// Find files duplicated across directory trees and remove redundant copies.
///
/// Files are first matched by name and size, then confirmed by BLAKE3
/// digest. Only copies under `--delete-prefix` are ever removed, and never
/// every copy of a file.
#[derive(Debug, Parser)]
#[command(name = "dupepurge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root directories to scan
    #[arg(value_name = "ROOT")]
    pub roots: Vec<PathBuf>,

    /// Duplicates whose path starts with PREFIX are candidates for deletion
    ///
    /// Turns on the duplicate listing unless --for-real is given.
    #[arg(long, value_name = "PREFIX")]
    pub delete_prefix: Option<String>,

    /// Print every duplicate path and never delete
    #[arg(long)]
    pub report: bool,

    /// Actually delete (otherwise the run only announces) and log less
    #[arg(long, visible_alias = "quiet")]
    pub for_real: bool,

    /// Comma-separated filename suffixes to exclude (e.g. .swp,.tmp)
    #[arg(long, value_name = "SUFFIXES", value_delimiter = ',')]
    pub ignore_suffixes: Vec<String>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file to use instead of the platform default
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Move files to the system trash instead of unlinking them
    #[arg(long)]
    pub trash: bool,

    /// Fail the run when any removal fails
    #[arg(long)]
    pub strict: bool,

    /// Number of I/O threads for hashing
    ///
    /// Lower values reduce disk thrashing on HDDs.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub io_threads: Option<u32>,
}

impl Cli {
    /// The delete prefix, empty when none was given.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.delete_prefix.as_deref().unwrap_or("")
    }

    /// Files are removed only with `--for-real` and without `--report`.
    #[must_use]
    pub fn mode(&self) -> PurgeMode {
        if self.for_real && !self.report {
            PurgeMode::Execute
        } else {
            PurgeMode::ReportOnly
        }
    }

    /// Whether every duplicate path should be printed.
    #[must_use]
    pub fn lists_duplicates(&self) -> bool {
        self.report || (self.delete_prefix.is_some() && !self.for_real)
    }
}
