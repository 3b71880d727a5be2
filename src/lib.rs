//! dupepurge - duplicate file finder and purger
//!
//! Finds files duplicated across one or more directory trees, first by
//! `(name, size)` and then by BLAKE3 digest, and removes the redundant copies
//! that live under a chosen path prefix. At least one copy of every file is
//! always kept.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod scanner;
pub mod stats;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::CommandFactory;

use crate::actions::{PermanentRemover, PurgeMode, Remover, TrashRemover};
use crate::cli::Cli;
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::scanner::WalkerConfig;
use crate::stats::RunStatistics;

/// Run the application with parsed arguments.
///
/// With no roots the usage text is printed and the run succeeds. The final
/// report is printed even when strict deletion aborts the run.
///
/// # Errors
///
/// Returns an error if a root is invalid, the thread pool cannot be built,
/// stdout cannot be written, or a removal fails in strict mode.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.for_real);

    if cli.roots.is_empty() {
        Cli::command().print_help()?;
        println!();
        return Ok(ExitCode::Success);
    }

    let mut config = Config::load(cli.config.as_deref());
    config.apply_cli(&cli);
    log::debug!("Effective configuration: {:?}", config);

    let finder_config = FinderConfig::default()
        .with_walker_config(WalkerConfig::new(config.ignore_suffixes.clone()))
        .with_delete_prefix(cli.prefix())
        .with_mode(cli.mode())
        .with_list_duplicates(cli.lists_duplicates())
        .with_strict_delete(config.strict_delete)
        .with_io_threads(config.io_threads);
    let finder = DuplicateFinder::new(finder_config)?;

    let mut remover: Box<dyn Remover> = if config.use_trash {
        Box::new(TrashRemover)
    } else {
        Box::new(PermanentRemover)
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut stats = RunStatistics::default();

    match finder.run_into(&cli.roots, remover.as_mut(), &mut out, &mut stats) {
        Err(e) if e.is_invalid_root() => Err(e.into()),
        result => {
            write_report(&mut out, &stats, finder.config().mode)
                .context("Failed to write report")?;
            result?;
            Ok(ExitCode::Success)
        }
    }
}

fn write_report<W: Write + ?Sized>(
    out: &mut W,
    stats: &RunStatistics,
    mode: PurgeMode,
) -> io::Result<()> {
    writeln!(out, "{}", stats.report())?;
    if mode == PurgeMode::ReportOnly && stats.duplicates_removed > 0 {
        writeln!(out, "(dry run: nothing was deleted)")?;
    }
    out.flush()
}
