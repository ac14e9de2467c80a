use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use bookharvest_db::SqliteRepository;
use bookharvest_hardcover::{ApiConfig, ConfigSource, HardcoverClient, config_sources};
use bookharvest_import::{HarvestSettings, IngestSummary, run_sweeps};

use crate::cli_types::Cli;
use crate::error::CliError;
use crate::spinner::SpinnerProgress;

use super::check::run_connection_check;

/// Load configuration, check connectivity, then run every configured sweep.
pub(crate) fn run_harvest(cli: &Cli) -> Result<(), CliError> {
    let config_file = cli.config.as_deref();

    let api = ApiConfig::load(config_file).map_err(|e| CliError::config(e.to_string()))?;
    let settings = HarvestSettings::load(config_file, cli.database.clone())
        .map_err(|e| CliError::config(e.to_string()))?;

    let sources = config_sources(config_file);
    log::debug!("Endpoint: {} ({})", api.endpoint, sources.endpoint);
    log::debug!("Timeout: {}s ({})", api.timeout.as_secs(), sources.timeout);
    if sources.authorization == ConfigSource::Missing {
        log::warn!(
            "{} No authorization configured; requests will be anonymous",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
        );
    }

    let client = HardcoverClient::new(api).map_err(|e| CliError::config(e.to_string()))?;
    let rt = tokio::runtime::Runtime::new().map_err(|e| CliError::runtime(e.to_string()))?;
    rt.block_on(run_connection_check(&client));

    let repo = SqliteRepository::open(&settings.database).map_err(|e| {
        CliError::database(format!(
            "Failed to open {}: {}",
            settings.database.display(),
            e
        ))
    })?;
    warn_if_no_genres(&repo)?;

    let progress = SpinnerProgress::new(cli.quiet);
    let result = rt.block_on(run_sweeps(
        &client,
        &repo,
        &settings.sweeps,
        &settings.collect,
        &progress,
    ));
    progress.finish();

    let summary = result?;
    print_summary(&repo, &summary)
}

fn warn_if_no_genres(repo: &SqliteRepository) -> Result<(), CliError> {
    let conn = repo
        .connect()
        .map_err(|e| CliError::database(e.to_string()))?;
    let genres =
        bookharvest_db::list_genres(&conn).map_err(|e| CliError::database(e.to_string()))?;
    if genres.is_empty() {
        log::warn!(
            "{} The genres table is empty; books will be stored without genre links",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
        );
    } else {
        log::debug!("{} reference genres loaded", genres.len());
    }
    Ok(())
}

fn print_summary(repo: &SqliteRepository, summary: &IngestSummary) -> Result<(), CliError> {
    let totals = &summary.totals;

    crate::log_blank();
    log::info!(
        "{} Harvest complete",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
    );
    log::info!("  Genres:         {:>8}", totals.genres);
    log::info!("  Fetched:        {:>8}", totals.fetched);
    log::info!("  Processed:      {:>8}", totals.processed);
    log::info!("  New books:      {:>8}", totals.new_books);
    log::info!("  Genre links:    {:>8}", totals.associations_added);

    let conn = repo
        .connect()
        .map_err(|e| CliError::database(e.to_string()))?;
    let stats = bookharvest_db::catalog_stats(&conn)
        .map_err(|e| CliError::database(format!("Failed to query catalog stats: {}", e)))?;

    crate::log_blank();
    log::info!(
        "{}",
        "Catalog".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Database: {}", repo.path().display());
    log::info!("  Books:          {:>8}", stats.books);
    log::info!("  Genres:         {:>8}", stats.genres);
    log::info!("  Genre links:    {:>8}", stats.associations);
    log::info!("  Unrated:        {:>8}", stats.unrated);

    Ok(())
}
