//! Capability traits
//!
//! The coordinator only talks to these; concrete backends are chosen at
//! startup and injected.

use async_trait::async_trait;

use crate::{LanguageCode, MessageIdentity, Result, TranslationRequest, TranslationResponse};

/// Durable source -> destination message mapping
///
/// Implementations must keep each operation atomic per key. `put` is
/// last-write-wins.
#[async_trait]
pub trait MappingStore: Send + Sync {
    async fn get(&self, source: &MessageIdentity) -> Result<Option<MessageIdentity>>;

    async fn put(&self, source: &MessageIdentity, destination: &MessageIdentity) -> Result<()>;

    /// Removing an absent key is not an error
    async fn delete(&self, source: &MessageIdentity) -> Result<()>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Language detection and multi-target translation
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Fails with [`crate::Error::Detection`] on empty or unusable input
    async fn detect_language(&self, text: &str) -> Result<LanguageCode>;

    /// Fails with [`crate::Error::Translation`] on backend failure
    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Destination-side operations against the chat platform
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    async fn post_threaded_reply(
        &self,
        channel: &str,
        parent_timestamp: &str,
        text: &str,
    ) -> Result<MessageIdentity>;

    async fn update_message(&self, identity: &MessageIdentity, text: &str) -> Result<()>;

    async fn delete_message(&self, identity: &MessageIdentity) -> Result<()>;
}
