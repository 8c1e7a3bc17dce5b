//! Result of handling one event

use std::fmt;

use slack_translator_core::MessageIdentity;

/// What the coordinator did with an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new translation reply was posted and tracked
    Posted(MessageIdentity),
    /// The existing reply was rewritten in place
    Updated(MessageIdentity),
    /// The reply was removed and the mapping dropped
    Removed(MessageIdentity),
    /// Nothing to do
    Skipped(SkipReason),
}

impl Outcome {
    /// Metric label
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Posted(_) => "posted",
            Outcome::Updated(_) => "updated",
            Outcome::Removed(_) => "removed",
            Outcome::Skipped(_) => "skipped",
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped(_))
    }
}

/// Why an event was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Authored by a bot, including our own replies
    BotMessage,
    /// Posted inside a thread
    ThreadReply,
    /// Nothing left after trimming
    EmptyText,
    /// Duplicate delivery of a create that is already tracked
    AlreadyTranslated,
    /// Every configured target equals the source language
    SameLanguage,
    /// Delete for a message that has no mapping
    Untracked,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::BotMessage => "bot_message",
            SkipReason::ThreadReply => "thread_reply",
            SkipReason::EmptyText => "empty_text",
            SkipReason::AlreadyTranslated => "already_translated",
            SkipReason::SameLanguage => "same_language",
            SkipReason::Untracked => "untracked",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
