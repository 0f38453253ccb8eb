use thiserror::Error;

/// Crate-wide error type.
///
/// Remote-API failures carry the short API name (`registry`, `slack`) so
/// log lines and user-facing messages can say which collaborator broke.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("{api} API error: {message}")]
    Api { api: String, message: String },

    #[error("{api} returned invalid JSON: {source}")]
    ApiJson {
        api: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl BotError {
    pub fn api(api: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            api: api.into(),
            message: message.into(),
        }
    }
}
