//! Core traits and types for the translation bot
//!
//! This crate provides the types shared by every other crate:
//! - Message identities and normalized lifecycle events
//! - Language codes and the flag lookup table
//! - Translation request/response types
//! - Capability traits (mapping store, language model, chat platform)
//! - Error types

pub mod error;
pub mod language;
pub mod message;
pub mod traits;
pub mod translation;

pub use error::{Error, Result};
pub use language::{flag_for, LanguageCode, NEUTRAL_FLAG};
pub use message::{EventKind, MessageEvent, MessageIdentity};
pub use traits::{ChatPlatform, LanguageModel, MappingStore};
pub use translation::{TranslationRequest, TranslationResponse};
