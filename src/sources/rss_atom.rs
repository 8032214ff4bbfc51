use std::time::Duration;

use feed_rs::parser;
use reqwest::blocking::Client;
use url::Url;

use crate::domain::Entry;
use crate::errors::{KeeperError, KeeperResult};
use crate::sources::traits::FeedSource;

const USER_AGENT: &str = concat!("feedkeeper/", env!("CARGO_PKG_VERSION"));

/// Fetches RSS, Atom and JSON feeds over HTTP and parses them with feed-rs.
pub struct RssAtomSource {
    client: Client,
}

impl RssAtomSource {
    pub fn new(timeout: Duration) -> KeeperResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    fn parse_url(url: &str) -> KeeperResult<Url> {
        let parsed =
            Url::parse(url).map_err(|e| KeeperError::InvalidUrl(format!("{}: {}", url, e)))?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(KeeperError::InvalidUrl(format!(
                "{}: unsupported scheme '{}'",
                url, other
            ))),
        }
    }

    fn fetch_bytes(&self, url: &str) -> KeeperResult<Vec<u8>> {
        let target = Self::parse_url(url)?;
        let response = self.client.get(target).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(KeeperError::Fetch(format!("{} returned HTTP {}", url, status)));
        }

        Ok(response.bytes()?.to_vec())
    }

    /// Parse entries from raw feed bytes. Entries without a usable title are
    /// skipped instead of failing the whole feed.
    pub fn entries_from_bytes(bytes: &[u8]) -> KeeperResult<Vec<Entry>> {
        let parsed = parser::parse(bytes).map_err(|e| KeeperError::FeedParse(e.to_string()))?;

        let total = parsed.entries.len();
        let entries: Vec<Entry> = parsed.entries.into_iter().filter_map(convert_entry).collect();

        if entries.len() < total {
            tracing::debug!("Skipped {} untitled entries", total - entries.len());
        }

        Ok(entries)
    }
}

fn convert_entry(entry: feed_rs::model::Entry) -> Option<Entry> {
    let title = entry
        .title
        .map(|t| t.content)
        .filter(|t| !t.trim().is_empty())?;

    let link = entry
        .links
        .into_iter()
        .next()
        .map(|l| l.href)
        .unwrap_or_default();

    let summary = entry
        .summary
        .map(|s| s.content)
        .or_else(|| entry.content.and_then(|c| c.body));

    let published = entry
        .published
        .or(entry.updated)
        .map(|dt| dt.to_rfc3339());

    Some(
        Entry::new(title, link)
            .with_summary(summary)
            .with_published(published),
    )
}

impl FeedSource for RssAtomSource {
    fn fetch_entries(&self, url: &str) -> KeeperResult<Vec<Entry>> {
        let bytes = self.fetch_bytes(url)?;
        Self::entries_from_bytes(&bytes)
    }
}
