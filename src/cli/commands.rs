use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "feedkeeper")]
#[command(about = "Feed aggregator that keeps a deduplicated local store of feed items")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Subscribe to a feed URL
    Add {
        /// Feed URL to add
        url: String,

        /// Only subscribe, don't fetch the feed now
        #[arg(long)]
        no_sync: bool,
    },

    /// Unsubscribe from a feed and delete its items
    Remove {
        /// Feed ID as shown by `list`
        id: i64,
    },

    /// List subscribed feeds
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Subscribe to every feed in an OPML file
    Import {
        /// Path to OPML file
        path: String,

        /// Only subscribe, don't fetch the feeds now
        #[arg(long)]
        no_sync: bool,
    },

    /// Export subscriptions to OPML format
    Export {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Fetch all feeds and store new items
    Sync {
        /// Number of feeds fetched at once
        #[arg(long, env = "FEEDKEEPER_SYNC_WORKERS")]
        workers: Option<usize>,
    },

    /// List stored items, newest first
    Items {
        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Show at most this many items
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print the description of a stored item
    Show {
        /// Item ID as shown by `items`
        id: i64,
    },
}
