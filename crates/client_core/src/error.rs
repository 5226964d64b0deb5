use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx answer from the table service. Displays the raw message only.
    #[error("{message}")]
    Api { status: StatusCode, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("invalid service url: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ClientError {
    pub fn api(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Builds an `Api` error from a failed response, preferring the JSON
    /// `message` field, then the raw body, then the status line.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let from_json = serde_json::from_str::<RemoteErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.message.or(parsed.error))
            .filter(|message| !message.trim().is_empty());

        let message = match from_json {
            Some(message) => message,
            None if !body.trim().is_empty() => body.trim().to_string(),
            None => match status.canonical_reason() {
                Some(reason) => format!("{} {reason}", status.as_u16()),
                None => format!("request failed with status {}", status.as_u16()),
            },
        };
        Self::api(status, message)
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status(),
            ClientError::Decode(_) | ClientError::Url(_) => None,
        }
    }
}
