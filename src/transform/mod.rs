//! Projections from raw registry rows into pipeline entities.

use std::collections::HashSet;

use tracing::warn;

use crate::entities::{Filing, OrgEntry, RegistryRecord};

/// Collapse a merged record list to one entry per unique identifier.
///
/// Rows whose identifier carries no digit at all are placeholder noise
/// from the registry and are dropped. First-seen order is preserved, so
/// the pass is idempotent over its own output.
pub fn dedupe_records(records: &[RegistryRecord]) -> Vec<OrgEntry> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut entries = Vec::new();

    for record in records {
        if !record.identifier.chars().any(|c| c.is_ascii_digit()) {
            warn!(
                organization = %record.organization_name,
                "dropping row with malformed identifier"
            );
            continue;
        }
        if !seen.insert(record.identifier.as_str()) {
            continue;
        }
        entries.push(OrgEntry {
            identifier: record.identifier.clone(),
            organization_name: record.organization_name.clone(),
            jurisdiction: record.jurisdiction.clone(),
        });
    }

    entries
}

/// Build the relay-ready filing list for one organization: dedupe by
/// document link (first-seen kept), then sort ascending by filing year.
/// The sort is stable, so same-year filings keep their response order.
pub fn filings_from_records(records: &[RegistryRecord]) -> Vec<Filing> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut filings = Vec::new();

    for record in records {
        if record.document_link.is_empty() {
            continue;
        }
        if !seen.insert(record.document_link.as_str()) {
            continue;
        }
        filings.push(Filing {
            document_link: record.document_link.clone(),
            filing_year: record.filing_year.clone(),
            filing_form: record.filing_form.clone(),
            total_assets: record.total_assets.clone(),
            display_name: record.organization_name.clone(),
        });
    }

    filings.sort_by_key(Filing::year_key);
    filings
}
