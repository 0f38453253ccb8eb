//! Event handlers: the message pipeline and the selection relay.
//!
//! Each inbound event is handled independently; the only state shared
//! across events is what the rendered messages themselves carry (the
//! identifier payload inside each entry's button).

use std::time::Instant;

use tracing::{debug, info};

use crate::chat::reactions::{Outcome, pick};
use crate::chat::{ChatGateway, InboundMessage, MessageRef, OutboundMessage};
use crate::config::BotConfig;
use crate::entities::{NO_RECORDS_TEXT, is_no_records};
use crate::error::BotError;
use crate::query;
use crate::render::compose_pages;
use crate::sources::registry::RegistryClient;
use crate::transform::dedupe_records;

pub mod selection;

const JOIN_SUBTYPE: &str = "channel_join";
const EDIT_SUBTYPE: &str = "message_changed";

pub struct Bot<G> {
    gateway: G,
    registry: RegistryClient,
    config: BotConfig,
}

impl<G: ChatGateway> Bot<G> {
    pub fn new(gateway: G, registry: RegistryClient, config: BotConfig) -> Self {
        Self {
            gateway,
            registry,
            config,
        }
    }

    /// Full message pipeline: filter, interpret, look up (with name
    /// fan-out), dedupe, paginate, post.
    ///
    /// Every interpretable request ends in exactly one outcome: a "no
    /// results" reply plus failure reaction, or one or more result pages
    /// plus success reaction. Transport failures swap in the failure
    /// reaction and propagate.
    pub async fn handle_message(&self, msg: &InboundMessage) -> Result<(), BotError> {
        let started = Instant::now();

        if msg.channel != self.config.channel {
            debug!(channel = %msg.channel, "ignoring message outside configured channel");
            return Ok(());
        }
        if msg.is_threaded_reply() {
            debug!("ignoring threaded reply");
            return Ok(());
        }

        let origin = MessageRef {
            channel: msg.channel.clone(),
            ts: msg.ts.clone(),
        };

        match msg.subtype.as_deref() {
            Some(JOIN_SUBTYPE) => {
                debug!("reacting to channel join");
                return self.gateway.add_reaction(&origin, pick(Outcome::Welcome)).await;
            }
            Some(EDIT_SUBTYPE) => {
                debug!("ignoring edited message");
                return Ok(());
            }
            _ => {}
        }

        let text = msg.text.trim();
        if text.is_empty() || text.starts_with('#') || text.starts_with("//") {
            debug!("ignoring comment message");
            return Ok(());
        }

        let loading = pick(Outcome::Loading);
        self.gateway.add_reaction(&origin, loading).await?;

        let query = query::interpret(&query::normalize(text));
        debug!(?query, "interpreted query");

        let records = match self.registry.lookup_with_variants(&query).await {
            Ok(records) => records,
            Err(err) => {
                self.gateway.remove_reaction(&origin, loading).await?;
                self.gateway
                    .add_reaction(&origin, pick(Outcome::Failure))
                    .await?;
                return Err(err);
            }
        };

        let entries = if is_no_records(&records) {
            Vec::new()
        } else {
            dedupe_records(&records)
        };

        if entries.is_empty() {
            info!("lookup matched no records");
            self.gateway.remove_reaction(&origin, loading).await?;
            self.gateway
                .add_reaction(&origin, pick(Outcome::Failure))
                .await?;
            self.gateway
                .post_message(
                    &msg.channel,
                    &OutboundMessage {
                        text: Some(NO_RECORDS_TEXT.to_string()),
                        blocks: Vec::new(),
                        thread_ts: Some(msg.ts.clone()),
                    },
                )
                .await?;
            return Ok(());
        }

        self.gateway.remove_reaction(&origin, loading).await?;
        self.gateway
            .add_reaction(&origin, pick(Outcome::Success))
            .await?;

        let pages = compose_pages(&entries, text, started.elapsed());
        info!(matches = entries.len(), pages = pages.len(), "posting results");
        for page in pages {
            self.gateway
                .post_message(
                    &msg.channel,
                    &OutboundMessage {
                        text: None,
                        blocks: page.blocks,
                        thread_ts: Some(msg.ts.clone()),
                    },
                )
                .await?;
        }

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{Call, RecordingGateway};
    use super::*;
    use crate::chat::Block;
    use crate::chat::reactions::choices;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn bot_for(server: &MockServer) -> Bot<RecordingGateway> {
        Bot::new(
            RecordingGateway::new(),
            RegistryClient::new_for_test(server.uri()).unwrap(),
            BotConfig {
                channel: "C1".to_string(),
            },
        )
    }

    fn message(text: &str) -> InboundMessage {
        InboundMessage {
            channel: "C1".to_string(),
            ts: "100.1".to_string(),
            thread_ts: None,
            subtype: None,
            text: text.to_string(),
        }
    }

    fn actions_count(blocks: &[Block]) -> usize {
        blocks
            .iter()
            .filter(|b| matches!(b, Block::Actions { .. }))
            .count()
    }

    #[tokio::test]
    async fn identifier_lookup_posts_one_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("identifier", "123456789"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"EIN": "123456789", "Organization Name": "Acme Fund", "State": "CA"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let bot = bot_for(&server);
        bot.handle_message(&message("123-456-789")).await.unwrap();

        let calls = bot.gateway.calls();
        assert!(matches!(&calls[0], Call::AddReaction { name, .. } if name == "beachball"));
        assert!(matches!(&calls[1], Call::RemoveReaction { name, .. } if name == "beachball"));
        assert!(
            matches!(&calls[2], Call::AddReaction { name, .. } if choices(Outcome::Success).contains(&name.as_str()))
        );
        match &calls[3] {
            Call::Post { blocks, thread_ts, .. } => {
                assert_eq!(thread_ts.as_deref(), Some("100.1"));
                assert_eq!(actions_count(blocks), 1);
            }
            other => panic!("unexpected call: {other:?}"),
        }
        assert_eq!(calls.len(), 4);
    }

    #[tokio::test]
    async fn name_lookup_fans_out_merges_and_dedupes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("organizationName", "Red Cross"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"EIN": "1", "Organization Name": "Red Cross", "State": "CA"},
                {"EIN": "2", "Organization Name": "Red Cross of X", "State": "NY"}
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("organizationName", "The Red Cross"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"EIN": "2", "Organization Name": "Red Cross of X", "State": "NY"},
                {"EIN": "3", "Organization Name": "The Red Cross", "State": "DC"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let bot = bot_for(&server);
        bot.handle_message(&message("Red Cross")).await.unwrap();

        let calls = bot.gateway.calls();
        let posts: Vec<&Call> = calls
            .iter()
            .filter(|c| matches!(c, Call::Post { .. }))
            .collect();
        assert_eq!(posts.len(), 1);
        match posts[0] {
            Call::Post { blocks, .. } => assert_eq!(actions_count(blocks), 3),
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn comment_messages_produce_nothing() {
        let server = MockServer::start().await;
        let bot = bot_for(&server);

        bot.handle_message(&message("# just a note")).await.unwrap();
        bot.handle_message(&message("// ignore me")).await.unwrap();

        assert!(bot.gateway.calls().is_empty());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sentinel_response_yields_no_results_reply() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"0": NO_RECORDS_TEXT}
            ])))
            .mount(&server)
            .await;

        let bot = bot_for(&server);
        bot.handle_message(&message("000000000")).await.unwrap();

        let calls = bot.gateway.calls();
        assert!(
            matches!(&calls[2], Call::AddReaction { name, .. } if choices(Outcome::Failure).contains(&name.as_str()))
        );
        match &calls[3] {
            Call::Post { text, blocks, thread_ts, .. } => {
                assert_eq!(text.as_deref(), Some(NO_RECORDS_TEXT));
                assert!(blocks.is_empty());
                assert_eq!(thread_ts.as_deref(), Some("100.1"));
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[tokio::test]
    async fn other_channels_and_threads_are_ignored() {
        let server = MockServer::start().await;
        let bot = bot_for(&server);

        let mut other_channel = message("Red Cross");
        other_channel.channel = "C9".to_string();
        bot.handle_message(&other_channel).await.unwrap();

        let mut threaded = message("Red Cross");
        threaded.thread_ts = Some("50.0".to_string());
        bot.handle_message(&threaded).await.unwrap();

        let mut edited = message("Red Cross");
        edited.subtype = Some("message_changed".to_string());
        bot.handle_message(&edited).await.unwrap();

        assert!(bot.gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn channel_join_gets_a_welcome_reaction() {
        let server = MockServer::start().await;
        let bot = bot_for(&server);

        let mut join = message("");
        join.subtype = Some("channel_join".to_string());
        bot.handle_message(&join).await.unwrap();

        let calls = bot.gateway.calls();
        assert_eq!(calls.len(), 1);
        assert!(
            matches!(&calls[0], Call::AddReaction { name, .. } if choices(Outcome::Welcome).contains(&name.as_str()))
        );
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lookup_failure_swaps_in_failure_reaction_and_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let bot = bot_for(&server);
        let err = bot.handle_message(&message("123456789")).await.unwrap_err();
        assert!(matches!(err, BotError::Api { .. }));

        let calls = bot.gateway.calls();
        assert!(matches!(&calls[1], Call::RemoveReaction { name, .. } if name == "beachball"));
        assert!(
            matches!(&calls[2], Call::AddReaction { name, .. } if choices(Outcome::Failure).contains(&name.as_str()))
        );
        assert_eq!(calls.len(), 3);
    }
}
