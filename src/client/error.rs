//! Client-specific error types.

use serde::Deserialize;
use thiserror::Error;

use super::decode::DecodeError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the Hopsworks REST API.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Configuration is not usable for requests.
    #[error("{0}")]
    NotConfigured(String),

    /// Building the HTTP client failed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// The request could not be sent or its body read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a 4xx/5xx status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body.
        message: String,
    },

    /// Failed to serialize a request body.
    #[error("failed to serialize request: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A single-object response did not parse.
    #[error("failed to parse {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A list response matched none of the known shapes.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A lookup matched nothing.
    #[error("{0} not found")]
    NotFound(String),
}

impl ClientError {
    /// Build an [`ClientError::Api`] from a failed response body.
    ///
    /// The backend's error JSON carries `usrMsg`, `errorMsg` and `devMsg`;
    /// `usrMsg` is preferred and `devMsg` is appended when it adds detail.
    /// Bodies that are not error JSON are reported verbatim.
    pub fn api(status: u16, body: &[u8]) -> Self {
        #[derive(Deserialize, Default)]
        #[serde(rename_all = "camelCase", default)]
        struct ErrorBody {
            error_msg: String,
            usr_msg: String,
            dev_msg: String,
        }

        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|err| {
                let msg = if err.usr_msg.is_empty() {
                    err.error_msg
                } else {
                    err.usr_msg
                };
                if msg.is_empty() {
                    None
                } else if !err.dev_msg.is_empty() && err.dev_msg != msg {
                    Some(format!("{} - {}", msg, err.dev_msg))
                } else {
                    Some(msg)
                }
            })
            .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());

        Self::Api { status, message }
    }

    pub fn parse(what: &'static str, source: serde_json::Error) -> Self {
        Self::Parse { what, source }
    }

    /// Check if the backend reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Api { status: 404, .. })
    }
}
