//! Slack `message` events to lifecycle events
//!
//! | subtype            | result                                   |
//! |--------------------|------------------------------------------|
//! | none               | created                                  |
//! | `bot_message`      | created, flagged as bot                  |
//! | `message_changed`  | edited, fields from nested `message`;    |
//! |                    | ignored when the text did not change     |
//! | `message_deleted`  | deleted, ts from `previous_message`      |
//! | anything else      | ignored                                  |

use serde_json::Value;

use slack_translator_core::{EventKind, MessageEvent, MessageIdentity};

/// Text Slack leaves behind when a thread root with replies is deleted
pub const DELETED_TOMBSTONE: &str = "This message was deleted.";

/// Map an Events API `event` object to a lifecycle event
///
/// Returns `None` for non-message events, unsupported subtypes and payloads
/// missing a channel or timestamp.
pub fn normalize(event: &Value) -> Option<MessageEvent> {
    if str_field(event, "type")? != "message" {
        return None;
    }
    let channel = str_field(event, "channel")?;

    match str_field(event, "subtype") {
        None | Some("bot_message") => message_event(EventKind::Created, channel, event),
        Some("message_changed") => {
            let message = event.get("message")?;
            if str_field(message, "text") == Some(DELETED_TOMBSTONE) {
                let ts = str_field(message, "ts")?;
                return Some(MessageEvent {
                    author_is_bot: is_bot(message),
                    ..MessageEvent::deleted(MessageIdentity::new(channel, ts))
                });
            }
            // Reply counts and other metadata also arrive as `message_changed`
            let previous_text = event.get("previous_message").and_then(|p| str_field(p, "text"));
            if previous_text.is_some() && previous_text == str_field(message, "text") {
                return None;
            }
            message_event(EventKind::Edited, channel, message)
        }
        Some("message_deleted") => {
            let previous = event.get("previous_message");
            let ts = previous
                .and_then(|p| str_field(p, "ts"))
                .or_else(|| str_field(event, "deleted_ts"))?;
            Some(MessageEvent {
                author_is_bot: previous.is_some_and(is_bot),
                ..MessageEvent::deleted(MessageIdentity::new(channel, ts))
            })
        }
        Some(other) => {
            tracing::trace!(subtype = other, "Ignoring message subtype");
            None
        }
    }
}

fn message_event(kind: EventKind, channel: &str, message: &Value) -> Option<MessageEvent> {
    let ts = str_field(message, "ts")?;
    Some(MessageEvent {
        kind,
        identity: MessageIdentity::new(channel, ts),
        thread_parent: str_field(message, "thread_ts").map(str::to_string),
        text: Some(str_field(message, "text").unwrap_or_default().to_string()),
        author_is_bot: is_bot(message),
    })
}

/// Bot-authored, including our own translation replies
fn is_bot(message: &Value) -> bool {
    str_field(message, "subtype") == Some("bot_message")
        || message.get("bot_id").is_some_and(|id| !id.is_null())
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}
