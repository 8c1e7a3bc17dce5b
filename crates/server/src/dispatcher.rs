//! Sequential event dispatcher

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use slack_translator_coordinator::TranslationCoordinator;
use slack_translator_core::MessageEvent;

use crate::state::DispatchStats;

/// Handle events one at a time in delivery order
///
/// A failed event is logged by the coordinator and counted here; it never
/// stops the loop. The task ends when every sender is dropped.
pub fn spawn_dispatcher(
    coordinator: Arc<TranslationCoordinator>,
    mut events: mpsc::Receiver<MessageEvent>,
    stats: Arc<DispatchStats>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let result = coordinator.handle(event).await;
            stats.record(result.is_ok());
        }
        tracing::debug!("Dispatcher stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use slack_translator_coordinator::CoordinatorConfig;
    use slack_translator_core::{
        ChatPlatform, Error, LanguageCode, LanguageModel, MappingStore, MessageIdentity, Result,
        TranslationRequest, TranslationResponse,
    };
    use slack_translator_persistence::InMemoryMappingStore;

    struct KoreanOnly;

    #[async_trait]
    impl LanguageModel for KoreanOnly {
        async fn detect_language(&self, text: &str) -> Result<LanguageCode> {
            if text == "fail" {
                return Err(Error::Detection("scripted".into()));
            }
            LanguageCode::parse("ko")
        }

        async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse> {
            TranslationResponse::decorated(request, vec!["hi".to_string(); request.targets.len()])
        }

        fn name(&self) -> &str {
            "korean-only"
        }
    }

    struct Echo;

    #[async_trait]
    impl ChatPlatform for Echo {
        async fn post_threaded_reply(&self, channel: &str, parent: &str, _text: &str) -> Result<MessageIdentity> {
            Ok(MessageIdentity::new(channel, format!("{parent}.reply")))
        }

        async fn update_message(&self, _identity: &MessageIdentity, _text: &str) -> Result<()> {
            Ok(())
        }

        async fn delete_message(&self, _identity: &MessageIdentity) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_dispatches_in_order_and_survives_failures() {
        let store = Arc::new(InMemoryMappingStore::new());
        let coordinator = Arc::new(TranslationCoordinator::new(
            CoordinatorConfig::new(vec![LanguageCode::parse("en").unwrap()]),
            store.clone(),
            Arc::new(KoreanOnly),
            Arc::new(Echo),
        ));
        let stats = Arc::new(DispatchStats::default());
        let (tx, rx) = mpsc::channel(8);
        let handle = spawn_dispatcher(coordinator, rx, stats.clone());

        let id = MessageIdentity::new("C1", "1");
        tx.send(MessageEvent::created(MessageIdentity::new("C1", "0"), "fail")).await.unwrap();
        tx.send(MessageEvent::created(id.clone(), "안녕")).await.unwrap();
        tx.send(MessageEvent::deleted(id.clone())).await.unwrap();
        drop(tx);
        handle.await.unwrap();

        assert_eq!(stats.handled(), 3);
        assert_eq!(stats.failed(), 1);
        assert!(store.get(&id).await.unwrap().is_none());
    }
}
