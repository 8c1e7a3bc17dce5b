//! Message translation lifecycle coordinator
//!
//! Turns create/edit/delete events into translated threaded replies and keeps
//! the source -> reply mapping consistent under duplicate or replayed
//! delivery.

pub mod coordinator;
pub mod locks;
pub mod metrics;
pub mod outcome;

pub use coordinator::{CoordinatorConfig, TranslationCoordinator};
pub use locks::{KeyGuard, KeyedLocks};
pub use outcome::{Outcome, SkipReason};
