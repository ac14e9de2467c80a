//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "bookharvest")]
#[command(
    about = "Collect book metadata from Hardcover by genre into a SQLite catalog",
    long_about = None
)]
pub(crate) struct Cli {
    /// Config file to read instead of the default location
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Catalog database path (overrides $BOOKHARVEST_DATABASE and the config file)
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_overrides() {
        let cli = Cli::try_parse_from([
            "bookharvest",
            "--config",
            "/etc/bookharvest.toml",
            "-d",
            "books.db",
            "--verbose",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/bookharvest.toml")));
        assert_eq!(cli.database, Some(PathBuf::from("books.db")));
        assert!(cli.verbose);
        assert!(!cli.quiet);
    }
}
