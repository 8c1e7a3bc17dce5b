//! Message identities and normalized lifecycle events

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a message on the chat platform
///
/// `timestamp` is an opaque token issued by the platform. It is compared as a
/// string and never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageIdentity {
    pub channel: String,
    pub timestamp: String,
}

impl MessageIdentity {
    pub fn new(channel: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            timestamp: timestamp.into(),
        }
    }
}

impl fmt::Display for MessageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.channel, self.timestamp)
    }
}

/// Lifecycle event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Created,
    Edited,
    Deleted,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Created => "created",
            EventKind::Edited => "edited",
            EventKind::Deleted => "deleted",
        }
    }
}

/// Platform-agnostic message event consumed by the coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    pub kind: EventKind,
    pub identity: MessageIdentity,
    /// Timestamp of the thread root when the message lives inside a thread
    pub thread_parent: Option<String>,
    pub text: Option<String>,
    pub author_is_bot: bool,
}

impl MessageEvent {
    pub fn created(identity: MessageIdentity, text: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Created,
            identity,
            thread_parent: None,
            text: Some(text.into()),
            author_is_bot: false,
        }
    }

    pub fn edited(identity: MessageIdentity, text: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Edited,
            ..Self::created(identity, text)
        }
    }

    pub fn deleted(identity: MessageIdentity) -> Self {
        Self {
            kind: EventKind::Deleted,
            identity,
            thread_parent: None,
            text: None,
            author_is_bot: false,
        }
    }

    pub fn in_thread(mut self, parent: impl Into<String>) -> Self {
        self.thread_parent = Some(parent.into());
        self
    }

    pub fn from_bot(mut self) -> Self {
        self.author_is_bot = true;
        self
    }

    /// Trimmed text, or `None` when nothing is left to translate
    pub fn normalized_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// True for replies posted inside someone else's thread
    ///
    /// A thread root carries its own timestamp as the parent, so it is not a reply.
    pub fn is_thread_reply(&self) -> bool {
        self.thread_parent
            .as_deref()
            .is_some_and(|parent| parent != self.identity.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_text() {
        let id = MessageIdentity::new("C1", "100.1");
        assert_eq!(MessageEvent::created(id.clone(), "  hi  ").normalized_text(), Some("hi"));
        assert_eq!(MessageEvent::created(id.clone(), " \n\t").normalized_text(), None);
        assert_eq!(MessageEvent::deleted(id).normalized_text(), None);
    }

    #[test]
    fn test_thread_reply_detection() {
        let id = MessageIdentity::new("C1", "100.1");
        assert!(!MessageEvent::created(id.clone(), "root").is_thread_reply());
        assert!(!MessageEvent::created(id.clone(), "root").in_thread("100.1").is_thread_reply());
        assert!(MessageEvent::created(id, "reply").in_thread("99.0").is_thread_reply());
    }

    #[test]
    fn test_identity_display() {
        assert_eq!(MessageIdentity::new("C1", "1.2").to_string(), "C1/1.2");
    }
}
