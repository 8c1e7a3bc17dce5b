//! Slack Socket Mode connection
//!
//! Every envelope is acknowledged as soon as it is read; the work happens
//! downstream. Slack redelivers anything left unacknowledged, and the
//! coordinator tolerates the duplicates that reconnects produce anyway.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use slack_translator_config::SlackConfig;
use slack_translator_core::{Error, MessageEvent, Result};

use crate::events;
use crate::{SlackClient, SlackError};

/// Socket Mode envelope
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    envelope_id: Option<String>,
    #[serde(default)]
    payload: Value,
    #[serde(default)]
    reason: Option<String>,
}

/// Why a single connection ended
#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    /// Slack asked us to reconnect
    Disconnect,
    /// Socket closed or stream ended
    Closed,
    /// Nobody is consuming events anymore
    ReceiverGone,
}

/// Receives Slack events and forwards normalized message events in order
pub struct SocketModeClient {
    web: SlackClient,
    app_token: String,
    reconnect_delay: Duration,
}

impl SocketModeClient {
    pub fn new(web: SlackClient, app_token: &str, reconnect_delay: Duration) -> Self {
        Self {
            web,
            app_token: app_token.to_string(),
            reconnect_delay,
        }
    }

    pub fn from_config(web: SlackClient, config: &SlackConfig) -> Result<Self> {
        let app_token = config
            .app_token
            .as_deref()
            .ok_or_else(|| Error::config("SLACK_APP_TOKEN is not set"))?;
        Ok(Self::new(web, app_token, config.reconnect_delay()))
    }

    /// Run until the receiving side of `sink` is dropped
    ///
    /// Connection failures are logged and retried after the reconnect delay.
    pub async fn run(&self, sink: mpsc::Sender<MessageEvent>) {
        loop {
            match self.session(&sink).await {
                Ok(SessionEnd::ReceiverGone) => {
                    tracing::info!("Event receiver closed, stopping Socket Mode");
                    return;
                }
                Ok(SessionEnd::Disconnect) => tracing::info!("Slack requested reconnect"),
                Ok(SessionEnd::Closed) => tracing::warn!("Socket Mode connection closed"),
                Err(e) => tracing::error!(error = %e, "Socket Mode connection failed"),
            }

            if sink.is_closed() {
                return;
            }
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }

    async fn session(&self, sink: &mpsc::Sender<MessageEvent>) -> std::result::Result<SessionEnd, SlackError> {
        let url = self.web.open_connection(&self.app_token).await?;
        let (stream, _) = connect_async(url.as_str()).await?;
        tracing::info!("Socket Mode connected");

        let (mut write, mut read) = stream.split();

        while let Some(frame) = read.next().await {
            let text = match frame? {
                Message::Text(text) => text,
                Message::Close(frame) => {
                    tracing::debug!(?frame, "Close frame received");
                    return Ok(SessionEnd::Closed);
                }
                _ => continue,
            };

            let envelope: Envelope = match serde_json::from_str(&text) {
                Ok(envelope) => envelope,
                Err(e) => {
                    tracing::warn!(error = %e, "Unparseable Socket Mode frame");
                    continue;
                }
            };

            if let Some(id) = &envelope.envelope_id {
                write.send(Message::Text(ack(id))).await?;
            }

            match envelope.kind.as_str() {
                "hello" => tracing::debug!("Socket Mode hello"),
                "disconnect" => {
                    tracing::debug!(reason = ?envelope.reason, "Disconnect envelope");
                    return Ok(SessionEnd::Disconnect);
                }
                "events_api" => {
                    let Some(event) = envelope.payload.get("event").and_then(events::normalize) else {
                        continue;
                    };
                    tracing::debug!(kind = event.kind.as_str(), source = %event.identity, "Event received");
                    if sink.send(event).await.is_err() {
                        return Ok(SessionEnd::ReceiverGone);
                    }
                }
                other => tracing::debug!(kind = other, "Ignoring envelope"),
            }
        }

        Ok(SessionEnd::Closed)
    }
}

/// Acknowledgement frame for an envelope
fn ack(envelope_id: &str) -> String {
    json!({ "envelope_id": envelope_id }).to_string()
}
