//! Slack translation bot server
//!
//! Wires configuration, backends and the coordinator together, feeds Socket
//! Mode events through a sequential dispatcher and exposes health and
//! Prometheus endpoints.

pub mod dispatcher;
pub mod http;
pub mod metrics;
pub mod state;

pub use dispatcher::spawn_dispatcher;
pub use http::create_router;
pub use metrics::{get_metrics_handle, init_metrics};
pub use state::{AppState, DispatchStats};

use std::sync::Arc;

use slack_translator_config::Settings;
use slack_translator_coordinator::{CoordinatorConfig, TranslationCoordinator};
use slack_translator_core::{ChatPlatform, Result};
use slack_translator_llm::create_language_model;
use slack_translator_persistence::create_mapping_store;

/// Build the coordinator from settings, with the given chat platform
pub fn build_coordinator(settings: &Settings, platform: Arc<dyn ChatPlatform>) -> Result<TranslationCoordinator> {
    let targets = settings.translation.target_codes()?;
    let store = create_mapping_store(&settings.store)?;
    let model = create_language_model(&settings.llm)?;

    let config = CoordinatorConfig::new(targets)
        .with_operation_timeout(settings.translation.operation_timeout());

    Ok(TranslationCoordinator::new(config, store, model, platform))
}
