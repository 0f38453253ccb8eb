//! Free-text interpretation: normalized input text becomes a structured
//! registry [`Query`].

use tracing::debug;

mod relaxed;

pub use relaxed::parse_relaxed_object;

/// Field name for an exact-identifier lookup (digits only after
/// separator stripping).
pub const IDENTIFIER: &str = "identifier";

/// Field name for an organization-name lookup.
pub const ORGANIZATION_NAME: &str = "organizationName";

/// Ordered field-name to value mapping, sent verbatim as URL query
/// parameters. Insertion order is preserved; inserting an existing key
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    fields: Vec<(String, String)>,
}

impl Query {
    pub fn identifier(value: impl Into<String>) -> Self {
        let mut query = Self::default();
        query.insert(IDENTIFIER, value.into());
        query
    }

    pub fn organization_name(value: impl Into<String>) -> Self {
        let mut query = Self::default();
        query.insert(ORGANIZATION_NAME, value.into());
        query
    }

    pub fn from_fields(fields: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in fields {
            query.insert(key, value);
        }
        query
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.fields.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_identifier(&self) -> Option<&str> {
        self.get(IDENTIFIER)
    }

    pub fn get_organization_name(&self) -> Option<&str> {
        self.get(ORGANIZATION_NAME)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Canonicalize the punctuation humans paste from word processors:
/// curly quotes to straight quotes, em/en dashes to hyphen, the
/// ellipsis character to three periods. Total; never fails.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            _ => out.push(c),
        }
    }
    out
}

/// Classify trimmed, normalized text into a [`Query`].
///
/// Decision order:
/// 1. relaxed object literal (bare, then wrapped in braces) - the parsed
///    mapping is the query;
/// 2. digits-and-hyphens only - an identifier lookup with hyphens
///    stripped;
/// 3. anything else - an organization-name lookup.
///
/// Parse failures are swallowed: malformed structured input degrades to
/// a literal-text query instead of failing the request.
pub fn interpret(text: &str) -> Query {
    let mut query = structured_query(text).unwrap_or_else(|| literal_query(text));

    if let Some(id) = query.get_identifier() {
        let digits: String = id.chars().filter(|c| *c != '-').collect();
        query.insert(IDENTIFIER, digits);
    }

    query
}

fn structured_query(text: &str) -> Option<Query> {
    let fields = parse_relaxed_object(text)
        .or_else(|| parse_relaxed_object(&format!("{{{text}}}")))?;
    debug!(fields = fields.len(), "parsed structured query literal");
    Some(Query::from_fields(fields))
}

fn literal_query(text: &str) -> Query {
    if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit() || c == '-') {
        Query::identifier(text.replace('-', ""))
    } else {
        Query::organization_name(text)
    }
}
