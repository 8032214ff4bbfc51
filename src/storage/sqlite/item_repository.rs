use rusqlite::{params, Connection, ErrorCode};

use crate::domain::{Entry, Headline, InsertResult, NewItem};
use crate::errors::{KeeperError, KeeperResult};
use crate::storage::traits::ItemRepository;
use crate::storage::sqlite::SqliteStorage;

pub struct SqliteItemRepository {
    storage: SqliteStorage,
}

impl SqliteItemRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }
}

/// Insert one row, letting the `(feed_id, title)` constraint reject
/// duplicates atomically.
fn insert_row(conn: &Connection, item: &NewItem) -> rusqlite::Result<InsertResult> {
    let changed = conn.execute(
        "INSERT INTO items (feed_id, title, link, summary, published_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (feed_id, title) DO NOTHING",
        params![
            item.feed_id,
            item.title,
            item.link,
            item.summary,
            item.published_at,
        ],
    )?;

    if changed == 0 {
        Ok(InsertResult::Duplicate)
    } else {
        Ok(InsertResult::Created(conn.last_insert_rowid()))
    }
}

/// Delete every item owned by `feed_id`. `conn` may be an open transaction.
pub(super) fn delete_items(conn: &Connection, feed_id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM items WHERE feed_id = ?1", [feed_id])
}

fn feed_exists(conn: &Connection, feed_id: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM feeds WHERE id = ?1)",
        [feed_id],
        |row| row.get(0),
    )
}

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

impl ItemRepository for SqliteItemRepository {
    fn insert(&self, item: &NewItem) -> KeeperResult<InsertResult> {
        let conn = self.storage.connection()?;

        match insert_row(&conn, item) {
            Ok(result) => Ok(result),
            Err(e) if is_foreign_key_violation(&e) => {
                Err(KeeperError::NotFound(format!("feed {}", item.feed_id)))
            }
            Err(e) => Err(KeeperError::from(e)),
        }
    }

    fn insert_batch(&self, feed_id: i64, entries: &[Entry]) -> KeeperResult<Vec<InsertResult>> {
        let mut conn = self.storage.connection()?;
        let tx = conn.transaction()?;

        // The feed may have been removed while its entries were being fetched.
        if !feed_exists(&tx, feed_id)? {
            return Err(KeeperError::NotFound(format!("feed {}", feed_id)));
        }

        let mut results = Vec::with_capacity(entries.len());
        for entry in entries {
            let item = NewItem::from_entry(feed_id, entry);
            results.push(insert_row(&tx, &item)?);
        }

        tx.commit()?;
        Ok(results)
    }

    fn list(&self) -> KeeperResult<Vec<Headline>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, feed_id, title, link, published_at FROM items
             ORDER BY published_at DESC NULLS LAST, id ASC",
        )?;

        let items = stmt.query_map([], |row| {
            Ok(Headline {
                id: row.get(0)?,
                feed_id: row.get(1)?,
                title: row.get(2)?,
                link: row.get(3)?,
                published_at: row.get(4)?,
            })
        })?;

        items.collect::<Result<Vec<_>, _>>().map_err(KeeperError::from)
    }

    fn get_description(&self, id: i64) -> KeeperResult<Option<String>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare("SELECT summary FROM items WHERE id = ?1")?;

        match stmt.query_row([id], |row| row.get::<_, Option<String>>(0)) {
            Ok(summary) => Ok(summary),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(KeeperError::NotFound(format!("item {}", id)))
            }
            Err(e) => Err(KeeperError::from(e)),
        }
    }

    fn delete_for_feed(&self, feed_id: i64) -> KeeperResult<usize> {
        let conn = self.storage.connection()?;
        Ok(delete_items(&conn, feed_id)?)
    }

    fn count(&self) -> KeeperResult<usize> {
        let conn = self.storage.connection()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
