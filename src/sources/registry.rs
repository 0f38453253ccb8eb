//! Client for the public-records registry API.

use std::borrow::Cow;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::entities::RegistryRecord;
use crate::error::BotError;
use crate::query::{ORGANIZATION_NAME, Query};

const REGISTRY_BASE: &str = "https://nonprofit.yodacode.xyz/api";
const REGISTRY_API: &str = "registry";
const REGISTRY_BASE_ENV: &str = "FILINGS_BOT_REGISTRY_BASE";

const LEADING_ARTICLE: &str = "the ";

#[derive(Clone)]
pub struct RegistryClient {
    client: reqwest_middleware::ClientWithMiddleware,
    base: Cow<'static, str>,
}

impl RegistryClient {
    pub fn new() -> Result<Self, BotError> {
        Ok(Self {
            client: crate::sources::shared_client()?,
            base: crate::sources::env_base(REGISTRY_BASE, REGISTRY_BASE_ENV),
        })
    }

    #[cfg(test)]
    pub(crate) fn new_for_test(base: String) -> Result<Self, BotError> {
        Ok(Self {
            client: crate::sources::shared_client()?,
            base: Cow::Owned(base),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        req: reqwest_middleware::RequestBuilder,
    ) -> Result<T, BotError> {
        let resp = req.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            let excerpt = crate::sources::body_excerpt(&bytes);
            return Err(BotError::Api {
                api: REGISTRY_API.to_string(),
                message: format!("HTTP {status}: {excerpt}"),
            });
        }
        serde_json::from_slice(&bytes).map_err(|source| BotError::ApiJson {
            api: REGISTRY_API.to_string(),
            source,
        })
    }

    /// One HTTP lookup; the query's pairs become URL parameters verbatim.
    pub async fn lookup(&self, query: &Query) -> Result<Vec<RegistryRecord>, BotError> {
        let mut req = self.client.get(self.base.as_ref());
        for (key, value) in query.iter() {
            req = req.query(&[(key, value)]);
        }
        self.get_json(req).await
    }

    /// Lookup with leading-article fan-out.
    ///
    /// The registry matches names near-exactly, so "The X" and "X" are
    /// different spellings of the same organization. For a name query we
    /// issue both spellings concurrently and concatenate original-first;
    /// every other query shape issues exactly one call.
    pub async fn lookup_with_variants(&self, query: &Query) -> Result<Vec<RegistryRecord>, BotError> {
        let name = match (query.get_identifier(), query.get_organization_name()) {
            (None, Some(name)) => name.to_string(),
            _ => return self.lookup(query).await,
        };

        let mut variant = query.clone();
        variant.insert(ORGANIZATION_NAME, name_variant(&name));
        debug!(
            original = %name,
            variant = variant.get_organization_name().unwrap_or_default(),
            "issuing dual-variant name lookup"
        );

        let (mut records, variant_records) =
            futures::future::try_join(self.lookup(query), self.lookup(&variant)).await?;
        records.extend(variant_records);
        Ok(records)
    }

    /// Fetch one filing document as raw bytes.
    pub async fn fetch_document(&self, link: &str) -> Result<Vec<u8>, BotError> {
        let url = resolve_link(link);
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            let excerpt = crate::sources::body_excerpt(&bytes);
            return Err(BotError::Api {
                api: REGISTRY_API.to_string(),
                message: format!("document fetch HTTP {status}: {excerpt}"),
            });
        }
        Ok(bytes.to_vec())
    }
}

/// The opposite leading-article spelling of an organization name.
pub fn name_variant(name: &str) -> String {
    match name.get(..LEADING_ARTICLE.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(LEADING_ARTICLE) => {
            name[LEADING_ARTICLE.len()..].trim_start().to_string()
        }
        _ => format!("The {name}"),
    }
}

/// Registry links are sometimes protocol-relative.
fn resolve_link(link: &str) -> String {
    if link.starts_with("//") {
        format!("https:{link}")
    } else {
        link.to_string()
    }
}
