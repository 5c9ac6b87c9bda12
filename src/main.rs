use anyhow::Context;
use clap::Parser;
use property_watch::config::{Config, DEFAULT_CONFIG_PATH};
use property_watch::logging::{self, LogFile};
use property_watch::notify::{LineNotifier, LogNotifier, Notifier};
use property_watch::scrapers::{HttpPageSource, SuumoScraper};
use property_watch::{RunOptions, SnapshotStore, Watcher};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the JSON configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Crawl and diff, but neither save the snapshot nor send notifications
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    logging::init(Some(&LogFile::from_config(&config))).context("Failed to initialize logging")?;

    info!("🏠 Property Watch - SUUMO search results");
    info!("==========================================");

    let source = HttpPageSource::new(&config)?;
    let scraper = SuumoScraper::new(source, &config)?;
    let store = SnapshotStore::new(&config);

    let notifier: Box<dyn Notifier> = if config.has_push_credentials() {
        Box::new(LineNotifier::new(&config)?)
    } else {
        warn!("No LINE Notify token configured, notifications go to the log only");
        Box::new(LogNotifier)
    };

    let options = RunOptions {
        dry_run: args.dry_run,
        ..RunOptions::from_config(&config)
    };

    let report = Watcher::new(scraper, store, notifier, options)
        .run()
        .await
        .context("Watch run failed")?;

    info!(
        pages = report.pages,
        listings = report.current_count,
        added = report.added,
        removed = report.removed,
        changed = report.changed,
        sent = report.notifications_sent,
        failed = report.notifications_failed,
        "✅ Run complete"
    );

    Ok(())
}
