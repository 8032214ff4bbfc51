use opml::{Outline, OPML};

use crate::domain::Feed;
use crate::errors::{KeeperError, KeeperResult};
use crate::storage::traits::FeedRepository;

#[derive(Debug, Default)]
pub struct ImportResult {
    pub added: Vec<Feed>,
    pub duplicates: Vec<String>,
}

pub struct ImportExportService<R: FeedRepository> {
    repository: R,
}

impl<R: FeedRepository> ImportExportService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Parse an OPML document into the feed URLs it lists, in document order.
    /// Folders are flattened. Nothing is stored.
    ///
    /// The `<opml>` root must carry a `version` of 1.0, 1.1 or 2.0. An empty
    /// `<body>` yields no URLs.
    pub fn import_list(content: &[u8]) -> KeeperResult<Vec<String>> {
        let text = std::str::from_utf8(content)
            .map_err(|e| KeeperError::MalformedDocument(e.to_string()))?;

        let opml = match OPML::from_str(text) {
            Ok(opml) => opml,
            Err(opml::Error::BodyHasNoOutlines) => return Ok(Vec::new()),
            Err(e) => return Err(KeeperError::MalformedDocument(e.to_string())),
        };

        let mut urls = Vec::new();
        collect_feed_urls(&opml.body.outlines, &mut urls);
        Ok(urls)
    }

    /// Subscribe to every feed listed in an OPML document.
    ///
    /// A malformed document fails before anything is written. URLs that are
    /// already subscribed are reported in `duplicates` and the rest continue.
    pub fn import_opml(&self, content: &[u8]) -> KeeperResult<ImportResult> {
        let urls = Self::import_list(content)?;
        tracing::debug!("Found {} feeds in subscription list", urls.len());

        let mut result = ImportResult::default();

        for url in urls {
            match self.repository.add(&url) {
                Ok(id) => result.added.push(Feed::new(id, url)),
                Err(KeeperError::DuplicateSubscription(url)) => result.duplicates.push(url),
                Err(e) => return Err(e),
            }
        }

        Ok(result)
    }

    /// Export feeds to OPML format
    pub fn export_opml(&self) -> KeeperResult<String> {
        let feeds = self.repository.get_all()?;

        let mut opml = OPML::default();
        opml.head = Some(opml::Head {
            title: Some("Feedkeeper Subscriptions".to_string()),
            ..Default::default()
        });

        for feed in feeds {
            let outline = Outline {
                text: feed.url.clone(),
                r#type: Some("rss".to_string()),
                xml_url: Some(feed.url),
                ..Default::default()
            };
            opml.body.outlines.push(outline);
        }

        opml.to_string()
            .map_err(|e| KeeperError::MalformedDocument(e.to_string()))
    }
}

fn collect_feed_urls(outlines: &[Outline], urls: &mut Vec<String>) {
    for outline in outlines {
        if let Some(url) = &outline.xml_url {
            let url = url.trim();
            if !url.is_empty() {
                urls.push(url.to_string());
            }
        }

        collect_feed_urls(&outline.outlines, urls);
    }
}
