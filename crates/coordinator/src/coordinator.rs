//! Translation lifecycle coordinator

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use slack_translator_core::{
    ChatPlatform, Error, EventKind, LanguageCode, LanguageModel, MappingStore, MessageEvent,
    MessageIdentity, Result, TranslationRequest,
};

use crate::locks::KeyedLocks;
use crate::metrics;
use crate::outcome::{Outcome, SkipReason};

/// Coordinator configuration
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Ordered target languages
    pub target_languages: Vec<LanguageCode>,
    /// Bound on every external call made while handling an event
    pub operation_timeout: Duration,
}

impl CoordinatorConfig {
    pub fn new(target_languages: Vec<LanguageCode>) -> Self {
        Self {
            target_languages,
            operation_timeout: Duration::from_secs(90),
        }
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }
}

/// Drives create/edit/delete events through detection, translation, the
/// chat platform and the mapping store
///
/// Per source message the state is either untracked (no mapping) or tracked
/// (mapping to one reply). Every handler is safe to run again on redelivery:
/// duplicates hit the mapping and turn into skips or in-place updates.
pub struct TranslationCoordinator {
    config: CoordinatorConfig,
    store: Arc<dyn MappingStore>,
    model: Arc<dyn LanguageModel>,
    platform: Arc<dyn ChatPlatform>,
    locks: KeyedLocks,
}

impl TranslationCoordinator {
    pub fn new(
        config: CoordinatorConfig,
        store: Arc<dyn MappingStore>,
        model: Arc<dyn LanguageModel>,
        platform: Arc<dyn ChatPlatform>,
    ) -> Self {
        tracing::info!(
            targets = ?config.target_languages.iter().map(LanguageCode::as_str).collect::<Vec<_>>(),
            store = store.name(),
            model = model.name(),
            "Translation coordinator ready"
        );

        Self {
            config,
            store,
            model,
            platform,
            locks: KeyedLocks::new(),
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Handle any lifecycle event, recording metrics for the result
    pub async fn handle(&self, event: MessageEvent) -> Result<Outcome> {
        let kind = event.kind;
        let identity = event.identity.clone();

        let result = match kind {
            EventKind::Created => self.on_message_created(event).await,
            EventKind::Edited => self.on_message_edited(event).await,
            EventKind::Deleted => self.on_message_deleted(&identity).await,
        };

        match &result {
            Ok(outcome) => {
                metrics::record_event(kind.as_str(), outcome.label());
                match outcome {
                    Outcome::Skipped(reason) => {
                        tracing::debug!(kind = kind.as_str(), source = %identity, %reason, "Event skipped");
                    }
                    _ => tracing::info!(kind = kind.as_str(), source = %identity, ?outcome, "Event handled"),
                }
            }
            Err(e) => {
                metrics::record_event(kind.as_str(), "failed");
                metrics::record_error(e.kind());
                tracing::error!(kind = kind.as_str(), source = %identity, error = %e, "Event failed");
            }
        }

        result
    }

    /// New message: translate and post a threaded reply
    pub async fn on_message_created(&self, event: MessageEvent) -> Result<Outcome> {
        let _guard = self.locks.acquire(&event.identity).await;
        self.create_locked(&event).await
    }

    /// Edited message: rewrite the tracked reply, or translate from scratch
    pub async fn on_message_edited(&self, event: MessageEvent) -> Result<Outcome> {
        let _guard = self.locks.acquire(&event.identity).await;

        if let Some(reason) = Self::authorship_skip(&event) {
            return Ok(Outcome::Skipped(reason));
        }

        let Some(destination) = self.bounded("mapping lookup", self.store.get(&event.identity)).await? else {
            tracing::debug!(source = %event.identity, "Edit for untracked message, translating as new");
            return self.create_locked(&event).await;
        };

        // Keep the old reply; a later non-empty edit will refresh it
        let Some(text) = event.normalized_text() else {
            return Ok(Outcome::Skipped(SkipReason::EmptyText));
        };

        let source = self.bounded("language detection", self.model.detect_language(text)).await?;
        let targets = self.effective_targets(&source);

        if targets.is_empty() {
            tracing::info!(
                source = %event.identity,
                language = %source,
                "Edited into target language, removing translation"
            );
            return self.remove_locked(&event.identity, destination).await;
        }

        let body = self.translate(text, source, targets).await?;

        if let Err(e) = self
            .bounded("update message", self.platform.update_message(&destination, &body))
            .await
        {
            tracing::warn!(
                source = %event.identity,
                destination = %destination,
                error = %e,
                "Failed to update translation, leaving stale reply"
            );
            return Err(e);
        }

        Ok(Outcome::Updated(destination))
    }

    /// Deleted message: remove the reply and forget the mapping
    pub async fn on_message_deleted(&self, source: &MessageIdentity) -> Result<Outcome> {
        let _guard = self.locks.acquire(source).await;

        match self.bounded("mapping lookup", self.store.get(source)).await? {
            Some(destination) => self.remove_locked(source, destination).await,
            None => Ok(Outcome::Skipped(SkipReason::Untracked)),
        }
    }

    async fn create_locked(&self, event: &MessageEvent) -> Result<Outcome> {
        if let Some(reason) = Self::authorship_skip(event) {
            return Ok(Outcome::Skipped(reason));
        }

        let Some(text) = event.normalized_text() else {
            return Ok(Outcome::Skipped(SkipReason::EmptyText));
        };

        if self.bounded("mapping lookup", self.store.get(&event.identity)).await?.is_some() {
            return Ok(Outcome::Skipped(SkipReason::AlreadyTranslated));
        }

        let source = self.bounded("language detection", self.model.detect_language(text)).await?;
        let targets = self.effective_targets(&source);
        if targets.is_empty() {
            return Ok(Outcome::Skipped(SkipReason::SameLanguage));
        }

        let body = self.translate(text, source, targets).await?;

        let destination = self
            .bounded(
                "post reply",
                self.platform
                    .post_threaded_reply(&event.identity.channel, &event.identity.timestamp, &body),
            )
            .await?;

        if let Err(e) = self
            .bounded("mapping write", self.store.put(&event.identity, &destination))
            .await
        {
            // An untracked reply would be duplicated on redelivery; take it back
            if let Err(cleanup) = self
                .bounded("delete message", self.platform.delete_message(&destination))
                .await
            {
                tracing::error!(
                    destination = %destination,
                    error = %cleanup,
                    "Failed to remove untracked reply"
                );
            }
            return Err(e);
        }

        Ok(Outcome::Posted(destination))
    }

    /// Delete the reply, then drop the mapping whatever the platform said
    async fn remove_locked(&self, source: &MessageIdentity, destination: MessageIdentity) -> Result<Outcome> {
        if let Err(e) = self
            .bounded("delete message", self.platform.delete_message(&destination))
            .await
        {
            tracing::warn!(
                source = %source,
                destination = %destination,
                error = %e,
                "Failed to delete translation reply, dropping mapping anyway"
            );
        }

        self.bounded("mapping delete", self.store.delete(source)).await?;
        Ok(Outcome::Removed(destination))
    }

    async fn translate(&self, text: &str, source: LanguageCode, targets: Vec<LanguageCode>) -> Result<String> {
        let request = TranslationRequest::new(text, source, targets);

        let started = Instant::now();
        let response = self.bounded("translation", self.model.translate(&request)).await?;
        metrics::record_translation_latency(started.elapsed().as_secs_f64());

        // Backends build responses through `decorated`, but a third-party
        // implementation could still hand back the wrong count
        if response.translations.len() != request.targets.len() {
            return Err(Error::ContractViolation(format!(
                "requested {} translations, received {}",
                request.targets.len(),
                response.translations.len()
            )));
        }

        Ok(response.compose())
    }

    /// Configured targets minus the source language, order preserved
    fn effective_targets(&self, source: &LanguageCode) -> Vec<LanguageCode> {
        self.config
            .target_languages
            .iter()
            .filter(|target| *target != source)
            .cloned()
            .collect()
    }

    fn authorship_skip(event: &MessageEvent) -> Option<SkipReason> {
        if event.author_is_bot {
            Some(SkipReason::BotMessage)
        } else if event.is_thread_reply() {
            Some(SkipReason::ThreadReply)
        } else {
            None
        }
    }

    async fn bounded<T, F>(&self, operation: &str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let limit = self.config.operation_timeout;
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                operation: operation.to_string(),
                after_ms: limit.as_millis() as u64,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use slack_translator_core::TranslationResponse;
    use slack_translator_persistence::InMemoryMappingStore;

    struct FixedModel(&'static str);

    #[async_trait]
    impl LanguageModel for FixedModel {
        async fn detect_language(&self, _text: &str) -> Result<LanguageCode> {
            LanguageCode::parse(self.0)
        }

        async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse> {
            TranslationResponse::decorated(request, request.targets.iter().map(|t| t.to_string()).collect())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct NoPlatform;

    #[async_trait]
    impl ChatPlatform for NoPlatform {
        async fn post_threaded_reply(&self, channel: &str, _parent: &str, _text: &str) -> Result<MessageIdentity> {
            Ok(MessageIdentity::new(channel, "reply"))
        }

        async fn update_message(&self, _identity: &MessageIdentity, _text: &str) -> Result<()> {
            Ok(())
        }

        async fn delete_message(&self, _identity: &MessageIdentity) -> Result<()> {
            Ok(())
        }
    }

    fn coordinator(detected: &'static str, targets: &[&str]) -> TranslationCoordinator {
        let targets = targets.iter().map(|t| LanguageCode::parse(t).unwrap()).collect();
        TranslationCoordinator::new(
            CoordinatorConfig::new(targets),
            Arc::new(InMemoryMappingStore::new()),
            Arc::new(FixedModel(detected)),
            Arc::new(NoPlatform),
        )
    }

    #[test]
    fn test_effective_targets_keep_order() {
        let c = coordinator("ko", &["en", "ko", "th"]);
        let source = LanguageCode::parse("ko").unwrap();
        let targets: Vec<String> = c.effective_targets(&source).iter().map(|t| t.to_string()).collect();
        assert_eq!(targets, vec!["en", "th"]);
    }

    #[test]
    fn test_authorship_skip() {
        let id = MessageIdentity::new("C1", "100");
        let event = MessageEvent::created(id.clone(), "hi").from_bot();
        assert_eq!(TranslationCoordinator::authorship_skip(&event), Some(SkipReason::BotMessage));

        let event = MessageEvent::created(id.clone(), "hi").in_thread("50");
        assert_eq!(TranslationCoordinator::authorship_skip(&event), Some(SkipReason::ThreadReply));

        let event = MessageEvent::created(id, "hi").in_thread("100");
        assert_eq!(TranslationCoordinator::authorship_skip(&event), None);
    }

    #[tokio::test]
    async fn test_single_target_same_language_skips() {
        let c = coordinator("en", &["en"]);
        let outcome = c
            .handle(MessageEvent::created(MessageIdentity::new("C1", "1"), "Hello"))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Skipped(SkipReason::SameLanguage));
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let c = TranslationCoordinator {
            config: CoordinatorConfig::new(vec![]).with_operation_timeout(Duration::from_millis(10)),
            ..coordinator("en", &["ko"])
        };

        let result: Result<()> = c
            .bounded("slow call", async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(Error::Timeout { ref operation, after_ms: 10 }) if operation == "slow call"));
    }
}
