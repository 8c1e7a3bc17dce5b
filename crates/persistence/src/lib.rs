//! Mapping store backends
//!
//! Provides persistent storage for the source -> destination message map:
//! - SQLite (file-backed, survives restarts)
//! - In-memory (tests and throwaway deployments)

pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;

pub use error::PersistenceError;
pub use memory::InMemoryMappingStore;
pub use sqlite::SqliteMappingStore;

use std::sync::Arc;

use slack_translator_config::{StoreBackend, StoreConfig};
use slack_translator_core::MappingStore;

/// Create the mapping store selected by config
pub fn create_mapping_store(config: &StoreConfig) -> Result<Arc<dyn MappingStore>, PersistenceError> {
    match config.backend {
        StoreBackend::Sqlite => {
            let store = SqliteMappingStore::open(&config.sqlite_path)?;
            tracing::info!(path = %config.sqlite_path, "Using SQLite mapping store");
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory mapping store; mappings are lost on restart");
            Ok(Arc::new(InMemoryMappingStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_selects_backend() {
        let mut config = StoreConfig::default();
        config.backend = StoreBackend::Memory;
        assert_eq!(create_mapping_store(&config).unwrap().name(), "memory");

        let dir = tempfile::tempdir().unwrap();
        config.backend = StoreBackend::Sqlite;
        config.sqlite_path = dir.path().join("map.db").to_string_lossy().into_owned();
        assert_eq!(create_mapping_store(&config).unwrap().name(), "sqlite");
    }
}
