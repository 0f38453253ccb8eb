//! Rendering deduplicated entries into paginated block pages.

use std::time::Duration;

use crate::chat::Block;
use crate::entities::OrgEntry;

pub mod jurisdictions;

/// A page is sealed once appending the next entry group would push it
/// past this many blocks; the group then opens a new page.
pub const MAX_PAGE_BLOCKS: usize = 48;

/// Hard cap on rendered entries across all pages. Overflow entries are
/// silently omitted, never an error.
pub const MAX_RENDERED_ENTRIES: usize = 50;

/// One outbound message worth of display blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub blocks: Vec<Block>,
}

/// Render entries into ordered pages: a leading summary block, then one
/// block group per entry. A group is never split across pages.
pub fn compose_pages(entries: &[OrgEntry], query_text: &str, elapsed: Duration) -> Vec<Page> {
    let summary = format!(
        ":cat_typing: Here you go: _({} results for \"{}\" in {})_",
        entries.len(),
        query_text,
        pretty_time(elapsed),
    );

    let mut pages = Vec::new();
    let mut current = vec![Block::mrkdwn(summary)];

    for entry in entries.iter().take(MAX_RENDERED_ENTRIES) {
        let group = entry_group(entry);
        // +1 for the divider that joins the group onto a non-empty page.
        if current.len() + group.len() + 1 > MAX_PAGE_BLOCKS {
            pages.push(Page {
                blocks: std::mem::take(&mut current),
            });
        }
        if !current.is_empty() {
            current.push(Block::Divider);
        }
        current.extend(group);
    }

    pages.push(Page { blocks: current });
    pages
}

fn entry_group(entry: &OrgEntry) -> Vec<Block> {
    vec![
        Block::header(format!(
            "{} ({})",
            entry.organization_name,
            jurisdictions::label_or_code(&entry.jurisdiction)
        )),
        Block::mrkdwn(format!("*Identifier:* {}", entry.identifier)),
        Block::button_row("Show filings ➡️", entry.identifier.clone()),
    ]
}

/// Human elapsed time: sub-second as milliseconds, then floored whole
/// seconds.
pub fn pretty_time(elapsed: Duration) -> String {
    let ms = elapsed.as_millis();
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{}s", elapsed.as_secs())
    }
}
