//! SQLite-backed mapping store

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use slack_translator_core::{MappingStore, MessageIdentity, Result};

use crate::schema;
use crate::PersistenceError;

/// Mapping store persisted in a single SQLite table
///
/// The connection is shared behind a mutex and every query runs on the
/// blocking pool, so async callers never stall the runtime on disk I/O.
#[derive(Clone)]
pub struct SqliteMappingStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMappingStore {
    /// Open (or create) the database file and ensure the schema exists
    pub fn open(path: impl AsRef<Path>) -> std::result::Result<Self, PersistenceError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PersistenceError::Open {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        }

        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Fresh private database, mostly for tests
    pub fn open_in_memory() -> std::result::Result<Self, PersistenceError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> std::result::Result<Self, PersistenceError> {
        conn.execute_batch(schema::CREATE_MESSAGE_MAP)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn run<T, F>(&self, f: F) -> std::result::Result<T, PersistenceError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> std::result::Result<T, rusqlite::Error> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let value = tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            f(&guard)
        })
        .await??;
        Ok(value)
    }
}

#[async_trait]
impl MappingStore for SqliteMappingStore {
    async fn get(&self, source: &MessageIdentity) -> Result<Option<MessageIdentity>> {
        let key = source.clone();
        let found = self
            .run(move |conn| {
                conn.query_row(
                    schema::SELECT_DESTINATION,
                    params![key.channel, key.timestamp],
                    |row| Ok(MessageIdentity::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
                )
                .optional()
            })
            .await?;
        Ok(found)
    }

    async fn put(&self, source: &MessageIdentity, destination: &MessageIdentity) -> Result<()> {
        let key = source.clone();
        let value = destination.clone();
        self.run(move |conn| {
            conn.execute(
                schema::UPSERT_MAPPING,
                params![key.channel, key.timestamp, value.channel, value.timestamp],
            )
        })
        .await?;
        tracing::debug!(source = %source, destination = %destination, "Stored mapping");
        Ok(())
    }

    async fn delete(&self, source: &MessageIdentity) -> Result<()> {
        let key = source.clone();
        let removed = self
            .run(move |conn| conn.execute(schema::DELETE_MAPPING, params![key.channel, key.timestamp]))
            .await?;
        tracing::debug!(source = %source, removed, "Deleted mapping");
        Ok(())
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(channel: &str, ts: &str) -> MessageIdentity {
        MessageIdentity::new(channel, ts)
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = SqliteMappingStore::open_in_memory().unwrap();
        let src = id("C1", "100.000");

        assert!(store.get(&src).await.unwrap().is_none());

        store.put(&src, &id("C1", "101.000")).await.unwrap();
        assert_eq!(store.get(&src).await.unwrap(), Some(id("C1", "101.000")));

        store.delete(&src).await.unwrap();
        assert!(store.get(&src).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_is_last_write_wins() {
        let store = SqliteMappingStore::open_in_memory().unwrap();
        let src = id("C1", "100");

        store.put(&src, &id("C1", "200")).await.unwrap();
        store.put(&src, &id("C1", "300")).await.unwrap();

        assert_eq!(store.get(&src).await.unwrap(), Some(id("C1", "300")));
    }

    #[tokio::test]
    async fn test_delete_absent_is_ok() {
        let store = SqliteMappingStore::open_in_memory().unwrap();
        assert!(store.delete(&id("C9", "1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_keys_are_channel_scoped() {
        let store = SqliteMappingStore::open_in_memory().unwrap();
        store.put(&id("C1", "100"), &id("C1", "101")).await.unwrap();

        assert!(store.get(&id("C2", "100")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("translation.db");

        {
            let store = SqliteMappingStore::open(&path).unwrap();
            store.put(&id("C1", "100"), &id("C1", "101")).await.unwrap();
        }

        let reopened = SqliteMappingStore::open(&path).unwrap();
        assert_eq!(reopened.get(&id("C1", "100")).await.unwrap(), Some(id("C1", "101")));
    }
}
