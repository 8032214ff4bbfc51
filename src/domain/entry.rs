use serde::{Deserialize, Serialize};

/// One item as produced by a feed source, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    pub link: String,
    pub summary: Option<String>,
    pub published: Option<String>,
}

impl Entry {
    pub fn new(title: String, link: String) -> Self {
        Self {
            title,
            link,
            summary: None,
            published: None,
        }
    }

    pub fn with_summary(mut self, summary: Option<String>) -> Self {
        self.summary = summary;
        self
    }

    pub fn with_published(mut self, published: Option<String>) -> Self {
        self.published = published;
        self
    }
}
