//! HTTP client plumbing shared by every remote source.

use std::borrow::Cow;
use std::time::Duration;

use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

use crate::error::BotError;

pub mod registry;

const USER_AGENT: &str = concat!("filings-bot/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_TRANSIENT_RETRIES: u32 = 2;

/// Shared middleware-wrapped client: rustls, a request timeout, and
/// transient-error retry with exponential backoff.
pub fn shared_client() -> Result<reqwest_middleware::ClientWithMiddleware, BotError> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(MAX_TRANSIENT_RETRIES);
    Ok(reqwest_middleware::ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

/// Compiled-in base URL, overridable through an environment variable
/// (used to point clients at staging or test servers).
pub fn env_base(default: &'static str, env: &str) -> Cow<'static, str> {
    match std::env::var(env) {
        Ok(value) if !value.trim().is_empty() => Cow::Owned(value.trim().to_string()),
        _ => Cow::Borrowed(default),
    }
}

/// Short printable excerpt of an error body for log and error messages.
pub fn body_excerpt(bytes: &[u8]) -> String {
    const MAX: usize = 200;
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim();
    if trimmed.len() <= MAX {
        trimmed.to_string()
    } else {
        let mut end = MAX;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_base_prefers_non_empty_override() {
        unsafe { std::env::set_var("FILINGS_BOT_TEST_BASE", "http://localhost:9") };
        assert_eq!(
            env_base("https://default", "FILINGS_BOT_TEST_BASE"),
            "http://localhost:9"
        );
        unsafe { std::env::set_var("FILINGS_BOT_TEST_BASE", "  ") };
        assert_eq!(
            env_base("https://default", "FILINGS_BOT_TEST_BASE"),
            "https://default"
        );
        unsafe { std::env::remove_var("FILINGS_BOT_TEST_BASE") };
    }

    #[test]
    fn body_excerpt_truncates_long_bodies() {
        let long = "x".repeat(500);
        let excerpt = body_excerpt(long.as_bytes());
        assert!(excerpt.len() <= 203);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn body_excerpt_trims_short_bodies() {
        assert_eq!(body_excerpt(b"  oops \n"), "oops");
    }
}
