use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BedrockApiError {
    #[error("bearer credential is required")]
    MissingCredential,

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}{} {message}", error_type_suffix(.error_type))]
    Service {
        status: StatusCode,
        /// Service error type from `x-amzn-errortype`, when present.
        error_type: Option<String>,
        message: String,
    },

    #[error("malformed event stream frame: {0}")]
    MalformedFrame(String),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("retry exhausted after max attempts (status: {}, last_error: {last_error:?})",
        .status.map(|s| s.as_u16().to_string()).unwrap_or_else(|| "n/a".to_owned()))]
    RetryExhausted {
        status: Option<StatusCode>,
        last_error: Option<String>,
    },

    #[error("agent stream reported {kind}: {message}")]
    StreamException { kind: String, message: String },

    #[error("{0}")]
    Unknown(String),
}

impl BedrockApiError {
    /// True when the service rejected the request with a validation-style
    /// error, which callers use to detect unsupported capabilities.
    #[must_use]
    pub fn is_validation_rejection(&self) -> bool {
        match self {
            Self::Service {
                error_type: Some(error_type),
                ..
            } => error_type.eq_ignore_ascii_case("ValidationException"),
            Self::StreamException { kind, .. } => {
                kind.eq_ignore_ascii_case("validationException")
            }
            _ => false,
        }
    }
}

fn error_type_suffix(error_type: &Option<String>) -> String {
    match error_type {
        Some(error_type) if !error_type.trim().is_empty() => format!(" ({error_type})"),
        _ => String::new(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    #[serde(alias = "Message")]
    pub message: Option<String>,
}

/// Extract a human-readable message from a service error body.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) {
        if let Some(message) = payload
            .message
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            return message.to_owned();
        }
    }

    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.trim().to_string()
    }
}
