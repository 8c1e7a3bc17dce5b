//! Slack Web API client

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use slack_translator_config::SlackConfig;
use slack_translator_core::{ChatPlatform, Error, MessageIdentity, Result};

use crate::SlackError;

/// Error code Slack returns when the target message is already gone
const MESSAGE_NOT_FOUND: &str = "message_not_found";

#[derive(Debug, Deserialize)]
struct PostedMessage {
    channel: String,
    ts: String,
}

#[derive(Debug, Deserialize)]
struct ConnectionInfo {
    url: String,
}

/// Thin Web API client authenticated with the bot token
#[derive(Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
}

impl SlackClient {
    pub fn new(api_base: &str, bot_token: &str, timeout: Duration) -> std::result::Result<Self, SlackError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token: bot_token.to_string(),
        })
    }

    pub fn from_config(config: &SlackConfig) -> Result<Self> {
        let token = config
            .bot_token
            .as_deref()
            .ok_or_else(|| Error::config("SLACK_BOT_TOKEN is not set"))?;
        Ok(Self::new(&config.api_base, token, config.request_timeout())?)
    }

    /// POST a JSON body to a Web API method and unwrap the `ok` envelope
    pub async fn call(&self, method: &str, body: &Value) -> std::result::Result<Value, SlackError> {
        self.call_with_token(method, &self.bot_token, Some(body)).await
    }

    /// Request a Socket Mode WebSocket URL using the app-level token
    pub async fn open_connection(&self, app_token: &str) -> std::result::Result<String, SlackError> {
        let response = self
            .call_with_token("apps.connections.open", app_token, None)
            .await?;
        let info: ConnectionInfo = parse_field("apps.connections.open", response)?;
        Ok(info.url)
    }

    async fn call_with_token(
        &self,
        method: &str,
        token: &str,
        body: Option<&Value>,
    ) -> std::result::Result<Value, SlackError> {
        let mut request = self
            .http
            .post(format!("{}/{}", self.api_base, method))
            .bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response: Value = request.send().await?.error_for_status()?.json().await?;
        check_envelope(method, response)
    }
}

/// Slack reports failures as HTTP 200 with `ok: false`
fn check_envelope(method: &str, response: Value) -> std::result::Result<Value, SlackError> {
    match response.get("ok").and_then(Value::as_bool) {
        Some(true) => Ok(response),
        Some(false) => Err(SlackError::Api {
            method: method.to_string(),
            error: response
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error")
                .to_string(),
        }),
        None => Err(SlackError::Protocol {
            context: method.to_string(),
            message: "missing `ok` field".to_string(),
        }),
    }
}

fn parse_field<T: for<'de> Deserialize<'de>>(method: &str, response: Value) -> std::result::Result<T, SlackError> {
    serde_json::from_value(response).map_err(|e| SlackError::Protocol {
        context: method.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl ChatPlatform for SlackClient {
    async fn post_threaded_reply(
        &self,
        channel: &str,
        parent_timestamp: &str,
        text: &str,
    ) -> Result<MessageIdentity> {
        let body = json!({
            "channel": channel,
            "thread_ts": parent_timestamp,
            "text": text,
            "mrkdwn": true,
            "unfurl_links": false,
            "unfurl_media": false,
        });

        let response = self.call("chat.postMessage", &body).await?;
        let posted: PostedMessage = parse_field("chat.postMessage", response)?;
        tracing::debug!(channel = %posted.channel, ts = %posted.ts, "Posted translation reply");

        Ok(MessageIdentity::new(posted.channel, posted.ts))
    }

    async fn update_message(&self, identity: &MessageIdentity, text: &str) -> Result<()> {
        let body = json!({
            "channel": identity.channel,
            "ts": identity.timestamp,
            "text": text,
        });
        self.call("chat.update", &body).await?;
        Ok(())
    }

    async fn delete_message(&self, identity: &MessageIdentity) -> Result<()> {
        let body = json!({
            "channel": identity.channel,
            "ts": identity.timestamp,
        });

        match self.call("chat.delete", &body).await {
            Ok(_) => Ok(()),
            Err(e) if e.api_code() == Some(MESSAGE_NOT_FOUND) => {
                tracing::debug!(destination = %identity, "Reply already gone");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_ok() {
        let value = json!({"ok": true, "channel": "C1", "ts": "1.2"});
        let value = check_envelope("chat.postMessage", value).unwrap();
        let posted: PostedMessage = parse_field("chat.postMessage", value).unwrap();
        assert_eq!(posted.channel, "C1");
        assert_eq!(posted.ts, "1.2");
    }

    #[test]
    fn test_envelope_error_code() {
        let err = check_envelope("chat.delete", json!({"ok": false, "error": "message_not_found"})).unwrap_err();
        assert_eq!(err.api_code(), Some(MESSAGE_NOT_FOUND));
        assert_eq!(err.to_string(), "chat.delete failed: message_not_found");
    }

    #[test]
    fn test_envelope_missing_ok() {
        let err = check_envelope("chat.update", json!({"channel": "C1"})).unwrap_err();
        assert!(matches!(err, SlackError::Protocol { .. }));
        assert!(err.api_code().is_none());
    }

    #[test]
    fn test_connection_info() {
        let value = json!({"ok": true, "url": "wss://wss-primary.slack.com/link/?ticket=abc"});
        let info: ConnectionInfo = parse_field("apps.connections.open", value).unwrap();
        assert!(info.url.starts_with("wss://"));
    }

    #[test]
    fn test_from_config_requires_token() {
        assert!(SlackClient::from_config(&SlackConfig::default()).is_err());

        let config = SlackConfig {
            bot_token: Some("xoxb-test".to_string()),
            api_base: "https://slack.example/api/".to_string(),
            ..Default::default()
        };
        let client = SlackClient::from_config(&config).unwrap();
        assert_eq!(client.api_base, "https://slack.example/api");
    }
}
