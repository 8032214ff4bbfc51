use std::fs;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use feedkeeper::cli::{Cli, Commands};
use feedkeeper::config::Config;
use feedkeeper::domain::{FeedSyncOutcome, SyncReport};
use feedkeeper::errors::KeeperError;
use feedkeeper::services::{FeedService, ImportExportService, ItemService, SyncService};
use feedkeeper::sources::RssAtomSource;
use feedkeeper::storage::sqlite::{SqliteFeedRepository, SqliteItemRepository, SqliteStorage};

type Syncer = SyncService<SqliteFeedRepository, SqliteItemRepository, RssAtomSource>;

fn main() {
    // Only warnings and errors unless RUST_LOG says otherwise
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize storage
    let storage = SqliteStorage::new(&config.db_path)
        .with_context(|| format!("opening database {}", config.db_path))?;

    match cli.command {
        Commands::Add { url, no_sync } => cmd_add(&url, no_sync, &storage, &config),
        Commands::Remove { id } => cmd_remove(id, &storage),
        Commands::List { json } => cmd_list(json, &storage),
        Commands::Import { path, no_sync } => cmd_import(&path, no_sync, &storage, &config),
        Commands::Export { output } => cmd_export(output, &storage),
        Commands::Sync { workers } => {
            let workers = workers.unwrap_or(config.sync_workers);
            cmd_sync(workers, &storage, &config)
        }
        Commands::Items { json, limit } => cmd_items(json, limit, &storage),
        Commands::Show { id } => cmd_show(id, &storage),
    }
}

fn syncer(storage: &SqliteStorage, config: &Config, workers: usize) -> anyhow::Result<Syncer> {
    let source = RssAtomSource::new(config.fetch_timeout)?;
    Ok(SyncService::new(
        SqliteFeedRepository::new(storage.clone()),
        SqliteItemRepository::new(storage.clone()),
        source,
    )
    .with_workers(workers))
}

fn cmd_add(url: &str, no_sync: bool, storage: &SqliteStorage, config: &Config) -> anyhow::Result<()> {
    let service = FeedService::new(SqliteFeedRepository::new(storage.clone()));

    let feed = match service.add(url) {
        Ok(feed) => feed,
        Err(KeeperError::DuplicateSubscription(url)) => {
            println!("Already subscribed: {}", url);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Subscribed: [{}] {}", feed.id, feed.url);

    if !no_sync {
        let outcome = syncer(storage, config, 1)?.sync_feed(&feed)?;
        print_outcome(&outcome);
    }

    Ok(())
}

fn cmd_remove(id: i64, storage: &SqliteStorage) -> anyhow::Result<()> {
    let service = FeedService::new(SqliteFeedRepository::new(storage.clone()));
    let feed = service.get(id)?;

    service.remove(id)?;

    match feed {
        Some(feed) => println!("Removed: [{}] {}", feed.id, feed.url),
        None => println!("Removed feed {}", id),
    }

    Ok(())
}

fn cmd_list(json: bool, storage: &SqliteStorage) -> anyhow::Result<()> {
    let service = FeedService::new(SqliteFeedRepository::new(storage.clone()));
    let feeds = service.list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&feeds)?);
        return Ok(());
    }

    if feeds.is_empty() {
        println!("No feeds configured.");
        return Ok(());
    }

    println!("Configured feeds:\n");
    for feed in feeds {
        println!("  [{}] {}", feed.id, feed.url);
    }

    Ok(())
}

fn cmd_import(
    path: &str,
    no_sync: bool,
    storage: &SqliteStorage,
    config: &Config,
) -> anyhow::Result<()> {
    let content = fs::read(path).with_context(|| format!("reading {}", path))?;
    let service = ImportExportService::new(SqliteFeedRepository::new(storage.clone()));

    println!("Importing feeds from {}...\n", path);

    let result = service.import_opml(&content)?;

    if !result.added.is_empty() {
        println!("Added {} feeds:", result.added.len());
        for feed in &result.added {
            println!("  + [{}] {}", feed.id, feed.url);
        }
        println!();
    }

    if !result.duplicates.is_empty() {
        println!("Skipped {} duplicates:", result.duplicates.len());
        for url in &result.duplicates {
            println!("  - {}", url);
        }
        println!();
    }

    println!(
        "Import complete: {} added, {} duplicates",
        result.added.len(),
        result.duplicates.len()
    );

    if !no_sync {
        println!();
        cmd_sync(config.sync_workers, storage, config)?;
    }

    Ok(())
}

fn cmd_export(output: Option<String>, storage: &SqliteStorage) -> anyhow::Result<()> {
    let service = ImportExportService::new(SqliteFeedRepository::new(storage.clone()));
    let opml = service.export_opml()?;

    match output {
        Some(path) => {
            fs::write(&path, &opml).with_context(|| format!("writing {}", path))?;
            println!("Exported feeds to {}", path);
        }
        None => {
            println!("{}", opml);
        }
    }

    Ok(())
}

fn cmd_sync(workers: usize, storage: &SqliteStorage, config: &Config) -> anyhow::Result<()> {
    println!("Fetching feeds...\n");

    let report = syncer(storage, config, workers)?.sync_all()?;

    if report.feeds.is_empty() {
        println!("No feeds configured.");
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn cmd_items(json: bool, limit: Option<usize>, storage: &SqliteStorage) -> anyhow::Result<()> {
    let service = ItemService::new(SqliteItemRepository::new(storage.clone()));
    let mut items = service.list()?;

    if let Some(limit) = limit {
        items.truncate(limit);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No items found.");
        return Ok(());
    }

    let shown = items.len();
    for item in items {
        let date = item.published_at.as_deref().unwrap_or("undated");
        println!("  [{}] {} ({})", item.id, item.title, date);
        if !item.link.is_empty() {
            println!("    {}", item.link);
        }
    }

    let total = service.count()?;
    if shown < total {
        println!("\nShowing {} of {} items", shown, total);
    }

    Ok(())
}

fn cmd_show(id: i64, storage: &SqliteStorage) -> anyhow::Result<()> {
    let service = ItemService::new(SqliteItemRepository::new(storage.clone()));

    match service.description(id)? {
        Some(text) => println!("{}", text),
        None => println!("(no description)"),
    }

    Ok(())
}

fn print_outcome(outcome: &FeedSyncOutcome) {
    match &outcome.error {
        Some(e) => println!("  ! {}: {}", outcome.url, e),
        None => println!(
            "  {}: {} new, {} already stored",
            outcome.url, outcome.created, outcome.duplicates
        ),
    }
}

fn print_report(report: &SyncReport) {
    for outcome in &report.feeds {
        print_outcome(outcome);
    }

    println!();
    println!(
        "Sync complete: {} new items, {} already stored, {} feeds failed",
        report.total_created(),
        report.total_duplicates(),
        report.failures().count()
    );
}
