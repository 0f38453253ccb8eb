//! Slack Web API implementation of [`ChatGateway`].
//!
//! Only the outbound half of the platform lives here; the socket-mode
//! event transport that produces [`InboundMessage`] and
//! [`SelectionAction`] values is wired up outside this crate.

use std::borrow::Cow;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::chat::{Block, ChatGateway, FileUpload, MessageRef, OutboundMessage};
use crate::error::BotError;

const SLACK_BASE: &str = "https://slack.com/api";
const SLACK_API: &str = "slack";
const SLACK_BASE_ENV: &str = "FILINGS_BOT_SLACK_BASE";
const TOKEN_ENV: &str = "SLACK_BOT_TOKEN";

pub struct SlackGateway {
    client: reqwest_middleware::ClientWithMiddleware,
    base: Cow<'static, str>,
    token: String,
}

#[derive(Debug, Deserialize)]
struct SlackAck {
    ok: bool,
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl SlackGateway {
    pub fn new() -> Result<Self, BotError> {
        let token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| BotError::Config(format!("{TOKEN_ENV} is not set")))?;
        Ok(Self {
            client: crate::sources::shared_client()?,
            base: crate::sources::env_base(SLACK_BASE, SLACK_BASE_ENV),
            token,
        })
    }

    #[cfg(test)]
    pub(crate) fn new_for_test(base: String) -> Result<Self, BotError> {
        Ok(Self {
            client: crate::sources::shared_client()?,
            base: Cow::Owned(base),
            token: "xoxb-test".to_string(),
        })
    }

    fn endpoint(&self, api_method: &str) -> String {
        format!("{}/{}", self.base.as_ref().trim_end_matches('/'), api_method)
    }

    async fn ack(&self, resp: reqwest::Response) -> Result<SlackAck, BotError> {
        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            let excerpt = crate::sources::body_excerpt(&bytes);
            return Err(BotError::Api {
                api: SLACK_API.to_string(),
                message: format!("HTTP {status}: {excerpt}"),
            });
        }
        let ack: SlackAck = serde_json::from_slice(&bytes).map_err(|source| BotError::ApiJson {
            api: SLACK_API.to_string(),
            source,
        })?;
        if !ack.ok {
            return Err(BotError::Api {
                api: SLACK_API.to_string(),
                message: ack.error.unwrap_or_else(|| "unknown error".to_string()),
            });
        }
        Ok(ack)
    }

    async fn call(&self, api_method: &str, body: Value) -> Result<SlackAck, BotError> {
        let resp = self
            .client
            .post(self.endpoint(api_method))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        self.ack(resp).await
    }
}

#[async_trait]
impl ChatGateway for SlackGateway {
    async fn post_message(
        &self,
        channel: &str,
        message: &OutboundMessage,
    ) -> Result<MessageRef, BotError> {
        let mut body = Map::new();
        body.insert("channel".to_string(), json!(channel));
        if let Some(text) = &message.text {
            body.insert("text".to_string(), json!(text));
        }
        if !message.blocks.is_empty() {
            body.insert("blocks".to_string(), serde_json::to_value(&message.blocks)?);
        }
        if let Some(thread_ts) = &message.thread_ts {
            body.insert("thread_ts".to_string(), json!(thread_ts));
        }

        let ack = self.call("chat.postMessage", Value::Object(body)).await?;
        Ok(MessageRef {
            channel: ack.channel.unwrap_or_else(|| channel.to_string()),
            ts: ack.ts.unwrap_or_default(),
        })
    }

    async fn update_message(&self, target: &MessageRef, blocks: &[Block]) -> Result<(), BotError> {
        self.call(
            "chat.update",
            json!({
                "channel": target.channel,
                "ts": target.ts,
                "blocks": blocks,
            }),
        )
        .await?;
        Ok(())
    }

    async fn add_reaction(&self, target: &MessageRef, name: &str) -> Result<(), BotError> {
        self.call(
            "reactions.add",
            json!({
                "channel": target.channel,
                "timestamp": target.ts,
                "name": name,
            }),
        )
        .await?;
        Ok(())
    }

    async fn remove_reaction(&self, target: &MessageRef, name: &str) -> Result<(), BotError> {
        self.call(
            "reactions.remove",
            json!({
                "channel": target.channel,
                "timestamp": target.ts,
                "name": name,
            }),
        )
        .await?;
        Ok(())
    }

    async fn upload_file(&self, channel: &str, upload: &FileUpload) -> Result<(), BotError> {
        let mut form = reqwest::multipart::Form::new()
            .text("channels", channel.to_string())
            .text("filename", upload.filename.clone())
            .text("initial_comment", upload.caption.clone());
        if let Some(thread_ts) = &upload.thread_ts {
            form = form.text("thread_ts", thread_ts.clone());
        }
        form = form.part(
            "file",
            reqwest::multipart::Part::bytes(upload.bytes.clone())
                .file_name(upload.filename.clone()),
        );

        let resp = self
            .client
            .post(self.endpoint("files.upload"))
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await?;
        self.ack(resp).await?;
        Ok(())
    }
}
