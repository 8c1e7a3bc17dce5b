//! In-memory mapping store

use async_trait::async_trait;
use dashmap::DashMap;

use slack_translator_core::{MappingStore, MessageIdentity, Result};

/// Process-local mapping store
#[derive(Debug, Default)]
pub struct InMemoryMappingStore {
    entries: DashMap<MessageIdentity, MessageIdentity>,
}

impl InMemoryMappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl MappingStore for InMemoryMappingStore {
    async fn get(&self, source: &MessageIdentity) -> Result<Option<MessageIdentity>> {
        Ok(self.entries.get(source).map(|entry| entry.value().clone()))
    }

    async fn put(&self, source: &MessageIdentity, destination: &MessageIdentity) -> Result<()> {
        self.entries.insert(source.clone(), destination.clone());
        Ok(())
    }

    async fn delete(&self, source: &MessageIdentity) -> Result<()> {
        self.entries.remove(source);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_basic_operations() {
        let store = InMemoryMappingStore::new();
        let src = MessageIdentity::new("C1", "100");
        let dst = MessageIdentity::new("C1", "101");

        store.put(&src, &dst).await.unwrap();
        assert_eq!(store.get(&src).await.unwrap(), Some(dst));
        assert_eq!(store.len(), 1);

        store.delete(&src).await.unwrap();
        store.delete(&src).await.unwrap();
        assert!(store.is_empty());
    }
}
