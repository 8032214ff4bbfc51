use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeeperError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Subscription errors
    #[error("Already subscribed to feed: {0}")]
    DuplicateSubscription(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    // Parsing errors
    #[error("Feed parsing failed: {0}")]
    FeedParse(String),

    #[error("Malformed subscription list: {0}")]
    MalformedDocument(String),

    // Storage errors
    #[error("Database error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Database connection unusable after a panic: {0}")]
    StorePoisoned(String),

    // User input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl KeeperError {
    /// Errors a single feed can produce while being fetched or parsed.
    /// A sync pass records these against the feed and moves on.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            KeeperError::Http(_)
                | KeeperError::Fetch(_)
                | KeeperError::FeedParse(_)
                | KeeperError::InvalidUrl(_)
        )
    }
}

pub type KeeperResult<T> = Result<T, KeeperError>;
