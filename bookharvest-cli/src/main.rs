//! bookharvest CLI
//!
//! Collects book metadata from the Hardcover API genre by genre and stores it
//! in a local SQLite catalog.

mod cli_types;
mod commands;
mod error;
mod spinner;

use std::io::Write;

use clap::Parser;
use log::LevelFilter;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cli_types::Cli;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    if let Err(e) = commands::harvest::run_harvest(&cli) {
        log::error!(
            "{} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            e,
        );
        std::process::exit(1);
    }
}

/// Install the logger.
///
/// Normal runs print bare messages to stdout at `info`. `--verbose` switches
/// to timestamped `debug` output and `--quiet` keeps only warnings and errors.
/// `RUST_LOG` still overrides the level when set.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stdout);

    if !verbose {
        builder.format(|buf, record| writeln!(buf, "{}", record.args()));
    }

    builder.init();
}

/// Emit an empty line through the logger so it respects `--quiet`.
pub(crate) fn log_blank() {
    log::info!("");
}
