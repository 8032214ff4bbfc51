use crate::domain::Entry;
use crate::errors::KeeperResult;

/// Turns a feed URL into the entries currently published there.
///
/// Implementations return whatever entries they could extract. A feed that
/// cannot be reached or parsed at all is reported as an error for that feed
/// only; callers never treat it as fatal to a sync pass.
#[cfg_attr(test, mockall::automock)]
pub trait FeedSource: Send + Sync {
    fn fetch_entries(&self, url: &str) -> KeeperResult<Vec<Entry>>;
}
