//! Slack platform adapter
//!
//! - [`SlackClient`]: Web API calls (`chat.*`, `apps.connections.open`),
//!   implementing [`slack_translator_core::ChatPlatform`]
//! - [`SocketModeClient`]: receives events over Socket Mode and forwards
//!   normalized [`slack_translator_core::MessageEvent`]s
//! - [`events`]: raw payload to lifecycle event mapping

pub mod client;
pub mod error;
pub mod events;
pub mod socket;

pub use client::SlackClient;
pub use error::SlackError;
pub use socket::SocketModeClient;
