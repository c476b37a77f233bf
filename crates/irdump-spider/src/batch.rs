use crate::fetch::Fetch;
use crate::fs::ensure_dir;
use crate::publish::Publish;
use crate::roster::Roster;
use crate::scrape::{ScrapeOutcome, Spider};
use crate::tui::BatchProgress;
use crate::SpiderError;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tracing::{error, info};

/// Tally of one batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Passes that reached the download stage.
    pub completed: usize,
    /// Passes that ended because the IR page could not be fetched.
    pub page_unavailable: usize,
    /// Passes that ended because no document links were found.
    pub no_links: usize,
    /// Companies whose pass failed outright, with the reason.
    pub failed: Vec<(String, String)>,
    /// Files newly downloaded across the batch.
    pub downloaded: usize,
    /// Individual file downloads that failed across the batch.
    pub download_failures: usize,
}

/// Scrapes every company of a roster, in roster order, one at a time.
pub struct BatchRunner<F, P> {
    roster: Roster,
    spider: Spider<F, P>,
    tui: bool,
}

impl<F: Fetch, P: Publish> BatchRunner<F, P> {
    pub fn new(roster: Roster, spider: Spider<F, P>) -> Self {
        Self {
            roster,
            spider,
            tui: false,
        }
    }

    /// Show progress bars instead of relying on log output.
    pub fn with_tui(mut self, tui: bool) -> Self {
        self.tui = tui;
        self
    }

    /// Scrape the whole roster once.
    ///
    /// A company whose pass errors, or panics, is logged and counted; the batch moves on to
    /// the next company. Only an unusable data root fails the batch.
    pub async fn run(&self) -> Result<BatchReport, SpiderError> {
        let time = std::time::Instant::now();
        info!("starting scrape of {} companies", self.roster.len());
        ensure_dir(self.spider.data_root()).await.map_err(|err| {
            error!(
                "failed to create data root {}, error({err})",
                self.spider.data_root().display()
            );
            err
        })?;

        let progress = if self.tui {
            BatchProgress::new(self.roster.len())
        } else {
            BatchProgress::hidden()
        };

        let mut report = BatchReport::default();
        for company in &self.roster {
            progress.total.set_message(company.name.clone());

            let pass = AssertUnwindSafe(self.spider.scrape(company))
                .catch_unwind()
                .await;

            match pass {
                Ok(Ok(ScrapeOutcome::Completed(pass))) => {
                    report.completed += 1;
                    report.downloaded += pass.downloaded.len();
                    report.download_failures += pass.failed.len();
                    progress.success.inc(1);
                }
                Ok(Ok(ScrapeOutcome::PageUnavailable)) => {
                    report.page_unavailable += 1;
                    progress.fails.inc(1);
                }
                Ok(Ok(ScrapeOutcome::NoLinks)) => {
                    report.no_links += 1;
                    progress.fails.inc(1);
                }
                Ok(Err(err)) => {
                    error!("scrape of {} failed, error({err})", company.name);
                    report.failed.push((company.name.clone(), err.to_string()));
                    progress.fails.inc(1);
                }
                Err(panic) => {
                    let reason = panic_message(panic.as_ref());
                    error!("scrape of {} panicked: {reason}", company.name);
                    report.failed.push((company.name.clone(), reason));
                    progress.fails.inc(1);
                }
            }
            progress.total.inc(1);
        }
        progress.finish();

        info!(
            "batch finished: {} completed, {} unreachable, {} without links, {} failed; \
            {} files downloaded. {}",
            report.completed,
            report.page_unavailable,
            report.no_links,
            report.failed.len(),
            report.downloaded,
            crate::time_elapsed(time)
        );
        Ok(report)
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
