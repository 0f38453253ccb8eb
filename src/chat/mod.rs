//! Chat-platform boundary.
//!
//! The bot only ever talks to the platform through [`ChatGateway`]; the
//! concrete Slack implementation lives in [`slack`], and tests use an
//! in-memory recording gateway.

use async_trait::async_trait;

use crate::error::BotError;

pub mod blocks;
pub mod reactions;
pub mod slack;

pub use blocks::{Block, Element, TextObject};

/// Address of one rendered message, used for reactions and in-place
/// rewrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef {
    pub channel: String,
    pub ts: String,
}

/// Inbound message event, as delivered by the platform transport.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub channel: String,
    pub ts: String,
    pub thread_ts: Option<String>,
    pub subtype: Option<String>,
    pub text: String,
}

impl InboundMessage {
    /// A reply inside an existing thread (thread anchor present and
    /// distinct from the event itself).
    pub fn is_threaded_reply(&self) -> bool {
        self.thread_ts.as_deref().is_some_and(|anchor| anchor != self.ts)
    }
}

/// A selection on a previously rendered result page. Carries the
/// opaque payload (the chosen identifier) and the originating message
/// with its current block list; the transport acknowledges the action
/// before the handler runs.
#[derive(Debug, Clone)]
pub struct SelectionAction {
    pub channel: String,
    pub message_ts: String,
    pub thread_ts: Option<String>,
    pub value: String,
    pub blocks: Vec<Block>,
}

/// One outbound message: display blocks plus an optional plain-text
/// fallback, anchored to a thread.
#[derive(Debug, Clone, Default)]
pub struct OutboundMessage {
    pub text: Option<String>,
    pub blocks: Vec<Block>,
    pub thread_ts: Option<String>,
}

/// One document relayed into a thread.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub caption: String,
    pub thread_ts: Option<String>,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn post_message(
        &self,
        channel: &str,
        message: &OutboundMessage,
    ) -> Result<MessageRef, BotError>;

    /// Rewrite a rendered message's block list in place.
    async fn update_message(&self, target: &MessageRef, blocks: &[Block]) -> Result<(), BotError>;

    async fn add_reaction(&self, target: &MessageRef, name: &str) -> Result<(), BotError>;

    async fn remove_reaction(&self, target: &MessageRef, name: &str) -> Result<(), BotError>;

    async fn upload_file(&self, channel: &str, upload: &FileUpload) -> Result<(), BotError>;
}
