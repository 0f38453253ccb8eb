//! Domain entities produced by the lookup pipelines.

use serde::Serialize;

pub mod record;

pub use record::{NO_RECORDS_TEXT, RegistryRecord, is_no_records};

/// Minimal projection kept after deduplication; one per unique
/// identifier, first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgEntry {
    pub identifier: String,
    pub organization_name: String,
    pub jurisdiction: String,
}

/// One historical filing for a selected organization. Query-scoped:
/// built from a lookup response, consumed once during relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filing {
    pub document_link: String,
    pub filing_year: String,
    pub filing_form: String,
    pub total_assets: String,
    pub display_name: String,
}

impl Filing {
    /// Numeric year for chronological ordering; non-numeric or missing
    /// years sort first.
    pub fn year_key(&self) -> i64 {
        self.filing_year.trim().parse().unwrap_or(i64::MIN)
    }

    /// Filename for the relayed document, taken from the link's last
    /// path segment.
    pub fn filename(&self, position: usize) -> String {
        self.document_link
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("filing-{position}.pdf"))
    }
}
