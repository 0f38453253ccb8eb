//! Selection handling: rewrite the chosen entry in place, then fetch
//! and relay that organization's filings in chronological order.

use futures::future::try_join_all;
use tracing::{debug, info, warn};

use crate::chat::blocks::mark_selected;
use crate::chat::{ChatGateway, FileUpload, MessageRef, SelectionAction};
use crate::entities::is_no_records;
use crate::error::BotError;
use crate::query::Query;
use crate::transform::filings_from_records;

use super::Bot;

impl<G: ChatGateway> Bot<G> {
    /// Selection pipeline. The transport has already acknowledged the
    /// action; the message rewrite is issued before the filings fetch
    /// so the user sees the choice land immediately.
    ///
    /// Documents are fetched concurrently but relayed strictly in
    /// sorted order: `try_join_all` keeps results position-indexed, so
    /// the emit loop below never depends on completion order.
    pub async fn handle_selection(&self, action: &SelectionAction) -> Result<(), BotError> {
        let origin = MessageRef {
            channel: action.channel.clone(),
            ts: action.message_ts.clone(),
        };

        match mark_selected(&action.blocks, &action.value) {
            Some(rewritten) => self.gateway.update_message(&origin, &rewritten).await?,
            // Stale action against a message that no longer renders the
            // entry; nothing to rewrite, but the relay still runs.
            None => warn!(value = %action.value, "selection payload not found in message"),
        }

        let records = self
            .registry
            .lookup(&Query::identifier(action.value.clone()))
            .await?;
        if is_no_records(&records) {
            debug!(identifier = %action.value, "no filings to relay");
            return Ok(());
        }

        let filings = filings_from_records(&records);
        if filings.is_empty() {
            return Ok(());
        }

        let documents = try_join_all(
            filings
                .iter()
                .map(|filing| self.registry.fetch_document(&filing.document_link)),
        )
        .await?;

        let total = filings.len();
        let thread_ts = action
            .thread_ts
            .clone()
            .or_else(|| Some(action.message_ts.clone()));

        for (index, (filing, bytes)) in filings.iter().zip(documents).enumerate() {
            let position = index + 1;
            let caption = if filing.filing_year.trim().is_empty() {
                format!("File {position} of {total}")
            } else {
                format!("File {position} of {total} - {}", filing.filing_year)
            };
            self.gateway
                .upload_file(
                    &action.channel,
                    &FileUpload {
                        filename: filing.filename(position),
                        caption,
                        thread_ts: thread_ts.clone(),
                        bytes,
                    },
                )
                .await?;
        }

        info!(identifier = %action.value, count = total, "relayed filings");
        Ok(())
    }
}
