//! Spinner-backed ingestion progress.
//!
//! One spinner line shows the genre being collected; finished genres are
//! logged above it so the spinner always stays at the bottom.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use bookharvest_hardcover::StopReason;
use bookharvest_import::{GenreReport, IngestProgress, IngestTotals, Sweep};

pub(crate) struct SpinnerProgress {
    pb: ProgressBar,
}

impl SpinnerProgress {
    /// When `quiet` is true the spinner is never drawn.
    pub(crate) fn new(quiet: bool) -> Self {
        let pb = ProgressBar::new_spinner();
        if quiet {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        pb.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                .expect("static pattern")
                .tick_chars("/-\\|"),
        );
        Self { pb }
    }

    /// Stop ticking and remove the spinner line.
    pub(crate) fn finish(&self) {
        self.pb.disable_steady_tick();
        self.pb.finish_and_clear();
    }
}

impl IngestProgress for SpinnerProgress {
    fn on_sweep_start(&self, sweep: &Sweep) {
        self.pb.suspend(|| {
            crate::log_blank();
            log::info!(
                "{} ({} genres, up to {} books each)",
                sweep.name.if_supports_color(Stdout, |t| t.bold()),
                sweep.genres.len(),
                sweep.per_genre,
            );
        });
    }

    fn on_genre_start(&self, genre: &str, index: usize, total: usize) {
        self.pb.set_message(format!("[{}/{}] Collecting {}...", index, total, genre));
        self.pb
            .enable_steady_tick(std::time::Duration::from_millis(100));
    }

    fn on_genre_done(&self, report: &GenreReport) {
        let note = match report.stop {
            StopReason::TargetReached => "",
            StopReason::Exhausted => " (results exhausted)",
            StopReason::PageLimit => " (page limit reached)",
        };
        self.pb.suspend(|| {
            log::info!(
                "  {} {}: {} fetched, {} new, {} processed, {} genre links{}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                report.genre,
                report.fetched,
                report.stats.new_books,
                report.stats.processed,
                report.stats.associations_added,
                note.if_supports_color(Stdout, |t| t.dimmed()),
            );
        });
        self.pb.set_message("");
    }

    fn on_sweep_done(&self, name: &str, totals: &IngestTotals) {
        self.pb.disable_steady_tick();
        self.pb.suspend(|| {
            log::info!(
                "  {} done: {} genres, {} processed, {} new",
                name,
                totals.genres,
                totals.processed,
                totals.new_books,
            );
        });
    }
}
