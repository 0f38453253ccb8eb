//! Wire shape of one registry API result row.

use serde::{Deserialize, Deserializer};

/// Literal first-column text of the registry's no-match sentinel row,
/// also used verbatim as the user-facing "no results" reply.
pub const NO_RECORDS_TEXT: &str = "There are no data records to display.";

/// One row of a registry lookup response. Immutable once received.
///
/// The registry serves numbers and strings interchangeably for the
/// same column, so every field deserializes through [`stringly`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegistryRecord {
    #[serde(rename = "EIN", default, deserialize_with = "stringly")]
    pub identifier: String,

    #[serde(rename = "Organization Name", default, deserialize_with = "stringly")]
    pub organization_name: String,

    #[serde(rename = "State", default, deserialize_with = "stringly")]
    pub jurisdiction: String,

    #[serde(rename = "Year", default, deserialize_with = "stringly")]
    pub filing_year: String,

    #[serde(rename = "Form", default, deserialize_with = "stringly")]
    pub filing_form: String,

    #[serde(rename = "Total assets", default, deserialize_with = "stringly")]
    pub total_assets: String,

    #[serde(rename = "Link", default, deserialize_with = "stringly")]
    pub document_link: String,

    // The no-match sentinel row is keyed "0".
    #[serde(rename = "0", default)]
    pub no_data: Option<String>,
}

impl RegistryRecord {
    pub fn is_no_data_sentinel(&self) -> bool {
        self.no_data.as_deref() == Some(NO_RECORDS_TEXT)
    }
}

/// A lookup response with no usable rows: either empty, or a single
/// sentinel row in place of data.
pub fn is_no_records(records: &[RegistryRecord]) -> bool {
    records.is_empty() || records[0].is_no_data_sentinel()
}

fn stringly<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Flag(bool),
        Missing(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(v) => v,
        Raw::Number(v) => v.to_string(),
        Raw::Flag(v) => v.to_string(),
        Raw::Missing(()) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_string_and_number_columns() {
        let record: RegistryRecord = serde_json::from_value(json!({
            "EIN": 941156347,
            "Organization Name": "American National Red Cross",
            "State": "DC",
            "Year": "2019",
            "Form": "990",
            "Total assets": "$3,086,861,404",
            "Link": "//example.org/docs/941156347_2019.pdf"
        }))
        .unwrap();

        assert_eq!(record.identifier, "941156347");
        assert_eq!(record.filing_year, "2019");
        assert_eq!(record.jurisdiction, "DC");
        assert!(!record.is_no_data_sentinel());
    }

    #[test]
    fn missing_columns_default_to_empty() {
        let record: RegistryRecord = serde_json::from_value(json!({
            "EIN": "123"
        }))
        .unwrap();
        assert_eq!(record.organization_name, "");
        assert_eq!(record.document_link, "");
    }

    #[test]
    fn null_columns_default_to_empty() {
        let record: RegistryRecord = serde_json::from_value(json!({
            "EIN": "123",
            "Year": null
        }))
        .unwrap();
        assert_eq!(record.filing_year, "");
    }

    #[test]
    fn detects_sentinel_row() {
        let record: RegistryRecord = serde_json::from_value(json!({
            "0": NO_RECORDS_TEXT
        }))
        .unwrap();
        assert!(record.is_no_data_sentinel());
        assert!(is_no_records(&[record]));
        assert!(is_no_records(&[]));
    }

    #[test]
    fn ordinary_rows_are_not_sentinels() {
        let record: RegistryRecord = serde_json::from_value(json!({
            "EIN": "123",
            "Organization Name": "Acme Fund"
        }))
        .unwrap();
        assert!(!is_no_records(&[record]));
    }
}
