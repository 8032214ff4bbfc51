use rusqlite::{ErrorCode, Row};

use crate::domain::Feed;
use crate::errors::{KeeperError, KeeperResult};
use crate::storage::traits::FeedRepository;
use crate::storage::sqlite::SqliteStorage;

use super::item_repository::delete_items;

pub struct SqliteFeedRepository {
    storage: SqliteStorage,
}

impl SqliteFeedRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }
}

fn feed_from_row(row: &Row<'_>) -> rusqlite::Result<Feed> {
    Ok(Feed {
        id: row.get(0)?,
        url: row.get(1)?,
        created_at: row.get(2)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

impl FeedRepository for SqliteFeedRepository {
    fn add(&self, url: &str) -> KeeperResult<i64> {
        let conn = self.storage.connection()?;

        // The unique index decides; no separate existence check.
        match conn.execute("INSERT INTO feeds (url) VALUES (?1)", [url]) {
            Ok(_) => Ok(conn.last_insert_rowid()),
            Err(e) if is_unique_violation(&e) => {
                Err(KeeperError::DuplicateSubscription(url.to_string()))
            }
            Err(e) => Err(KeeperError::from(e)),
        }
    }

    fn remove(&self, id: i64) -> KeeperResult<()> {
        let mut conn = self.storage.connection()?;
        let tx = conn.transaction()?;

        delete_items(&tx, id)?;
        let removed = tx.execute("DELETE FROM feeds WHERE id = ?1", [id])?;

        if removed == 0 {
            // Dropping the transaction rolls it back.
            return Err(KeeperError::NotFound(format!("feed {}", id)));
        }

        tx.commit()?;
        Ok(())
    }

    fn get_all(&self) -> KeeperResult<Vec<Feed>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare("SELECT id, url, created_at FROM feeds ORDER BY id ASC")?;

        let feeds = stmt.query_map([], feed_from_row)?;

        feeds.collect::<Result<Vec<_>, _>>().map_err(KeeperError::from)
    }

    fn get_by_id(&self, id: i64) -> KeeperResult<Option<Feed>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare("SELECT id, url, created_at FROM feeds WHERE id = ?1")?;

        match stmt.query_row([id], feed_from_row) {
            Ok(f) => Ok(Some(f)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(KeeperError::from(e)),
        }
    }
}
