//! One watch run: load, crawl, diff, persist, notify.

use crate::config::Config;
use crate::diff::{diff, Delta};
use crate::error::Result;
use crate::models::{Field, Snapshot};
use crate::notify::{render, Notifier};
use crate::scrapers::{PageSource, SuumoScraper};
use crate::store::SnapshotStore;
use tracing::{info, warn};

/// Caller-level switches for a run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Send notifications even when there was no previous snapshot
    pub notify_on_first_run: bool,
    /// Render messages without saving the snapshot or sending anything
    pub dry_run: bool,
}

impl RunOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            notify_on_first_run: config.notify_on_first_run,
            dry_run: false,
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub pages: u32,
    pub previous_count: Option<usize>,
    pub current_count: usize,
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
    pub notifications_sent: usize,
    pub notifications_failed: usize,
    pub notifications_skipped: bool,
}

pub struct Watcher<S> {
    scraper: SuumoScraper<S>,
    store: SnapshotStore,
    notifier: Box<dyn Notifier>,
    options: RunOptions,
}

impl<S: PageSource> Watcher<S> {
    pub fn new(
        scraper: SuumoScraper<S>,
        store: SnapshotStore,
        notifier: Box<dyn Notifier>,
        options: RunOptions,
    ) -> Self {
        Self {
            scraper,
            store,
            notifier,
            options,
        }
    }

    /// Run once. Store, fetch and extraction failures end the run before
    /// anything is written; notification failures are logged only.
    pub async fn run(&self) -> Result<RunReport> {
        let previous = self.store.load()?;
        match &previous {
            Some(snapshot) => info!(
                count = snapshot.len(),
                captured_at = %snapshot.capture_time(),
                "Read property data"
            ),
            None => info!("No previous property data, this is the first run"),
        }

        let crawl = self.scraper.scrape().await?;
        let current = Snapshot::new(crawl.records);
        info!(pages = crawl.pages, count = current.len(), "Collected property information");

        let empty = Snapshot::empty();
        let baseline = previous.as_ref().unwrap_or(&empty);
        let delta = diff(baseline, &current, Field::Price);
        log_delta(&delta);

        if self.options.dry_run {
            info!("Dry run, snapshot not saved");
        } else {
            self.store.save(&current)?;
            info!(path = %self.store.path().display(), count = current.len(), "Saved property data");
        }

        let mut report = RunReport {
            pages: crawl.pages,
            previous_count: previous.as_ref().map(Snapshot::len),
            current_count: current.len(),
            added: delta.added.len(),
            removed: delta.removed.len(),
            changed: delta.changed.len(),
            ..RunReport::default()
        };

        if previous.is_none() && !self.options.notify_on_first_run {
            info!("First run, notifications suppressed");
            report.notifications_skipped = true;
            return Ok(report);
        }

        for notification in render(&delta, baseline, &current) {
            if self.options.dry_run {
                info!(category = %notification.category, "Would send:\n{}", notification.text);
                continue;
            }
            match self.notifier.notify(&notification.text).await {
                Ok(()) => {
                    report.notifications_sent += 1;
                    info!(
                        category = %notification.category,
                        channel = self.notifier.channel_name(),
                        "Sent notification:\n{}",
                        notification.text
                    );
                }
                Err(e) => {
                    report.notifications_failed += 1;
                    warn!(
                        category = %notification.category,
                        channel = self.notifier.channel_name(),
                        error = %e,
                        "Notification failed"
                    );
                }
            }
        }

        Ok(report)
    }
}

fn log_delta(delta: &Delta) {
    if delta.added.is_empty() {
        info!("No listings added since last run");
    } else {
        info!(ids = ?delta.added, "Listings added since last run");
    }

    if delta.removed.is_empty() {
        info!("No listings removed since last run");
    } else {
        info!(ids = ?delta.removed, "Listings removed since last run");
    }

    if delta.changed.is_empty() {
        info!("No price changes since last run");
    } else {
        for change in &delta.changed {
            info!(id = %change.id, old = %change.old, new = %change.new, "Price changed");
        }
    }
}
