//! Error types for message delivery.

use thiserror::Error;

use super::ApiResponse;
use crate::sign::SignError;

/// Error type for transport operations.
///
/// Describes what went wrong without dictating recovery strategy.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and errors while reading the response body.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The transport's own timeout elapsed.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The caller cancelled the request context.
    #[error("Request cancelled: context cancelled")]
    Cancelled,

    /// The request context's deadline passed.
    #[error("Request aborted: context deadline exceeded")]
    DeadlineExceeded,
}

/// Error returned by [`Bot::send`](super::Bot::send).
#[derive(Debug, Error)]
pub enum SendError {
    /// The signature could not be generated. No request was sent.
    #[error("Failed to generate signature: {0}")]
    Sign(#[source] SignError),

    /// The message could not be encoded. No request was sent.
    #[error("Failed to marshal message: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The request failed in transport, was cancelled, or ran out of time.
    #[error("Failed to send request: {0}")]
    Transport(#[source] HttpError),

    /// The response body is not a valid API response.
    #[error("Failed to unmarshal response (HTTP {status}): {source}")]
    Decode {
        /// HTTP status of the response
        status: http::StatusCode,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// The endpoint answered with a non-zero code.
    #[error("API error (code {code}): {msg}")]
    Api {
        /// Endpoint-defined failure code
        code: i64,
        /// Endpoint status text
        msg: String,
        /// The full parsed response
        response: ApiResponse,
    },
}

impl SendError {
    /// Returns the parsed response for API failures.
    ///
    /// The endpoint's reply is still available when it reports an error.
    #[must_use]
    pub const fn response(&self) -> Option<&ApiResponse> {
        match self {
            Self::Api { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Returns the endpoint code for API failures.
    #[must_use]
    pub const fn api_code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns true if the failure happened in transport (network,
    /// cancellation or deadline).
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Extension trait for checking if an error is retryable.
///
/// Nothing in this crate retries; the classification is for callers that
/// own a retry policy. Endpoint codes are never classified.
pub trait IsRetryable {
    /// Returns true if the error is potentially transient.
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for HttpError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Timeout | Self::DeadlineExceeded => true,
            // The caller asked to stop; URL errors are configuration issues
            Self::Cancelled | Self::InvalidUrl(_) => false,
        }
    }
}

impl IsRetryable for SendError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
            Self::Sign(_) | Self::Serialize(_) | Self::Decode { .. } | Self::Api { .. } => false,
        }
    }
}
