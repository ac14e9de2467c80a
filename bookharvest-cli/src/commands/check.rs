use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use bookharvest_hardcover::{CheckOutcome, HardcoverClient};

/// Query a few titles and report what came back.
///
/// Failures are reported and otherwise ignored; the harvest proceeds either way.
pub(crate) async fn run_connection_check(client: &HardcoverClient) {
    log::info!("Checking connection to {}...", client.config().endpoint);

    let check = match client.check_connection().await {
        Ok(check) => check,
        Err(e) => {
            log::warn!(
                "{} Connection check failed: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            return;
        }
    };

    match check.outcome {
        CheckOutcome::Titles(titles) => {
            log::info!(
                "{} HTTP {}: API reachable",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                check.status,
            );
            for title in titles {
                log::info!("    {}", title);
            }
        }
        CheckOutcome::ApiErrors(errors) => {
            log::warn!(
                "{} HTTP {}: API returned errors",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                check.status,
            );
            for line in errors.lines() {
                log::warn!("    {}", line);
            }
        }
        CheckOutcome::NoData => {
            log::warn!(
                "{} HTTP {}: no data returned",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                check.status,
            );
        }
    }
}
