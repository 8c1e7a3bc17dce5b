//! Application State
//!
//! Shared state across HTTP handlers and the dispatcher.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use slack_translator_config::Settings;

/// Counters maintained by the dispatcher
#[derive(Debug, Default)]
pub struct DispatchStats {
    handled: AtomicU64,
    failed: AtomicU64,
}

impl DispatchStats {
    pub fn record(&self, ok: bool) {
        self.handled.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn handled(&self) -> u64 {
        self.handled.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: Arc<Settings>,
    /// Event counters
    pub stats: Arc<DispatchStats>,
}

impl AppState {
    pub fn new(config: Settings, stats: Arc<DispatchStats>) -> Self {
        Self {
            config: Arc::new(config),
            stats,
        }
    }
}
