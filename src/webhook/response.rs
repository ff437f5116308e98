//! Webhook API response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response body returned by the webhook endpoint.
///
/// `code` is 0 on success. Older endpoints answer with `StatusCode` and
/// `StatusMessage` instead; those are kept as sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// 0 for success, otherwise an endpoint-defined failure code
    #[serde(default)]
    pub code: i64,

    /// Status text
    #[serde(default)]
    pub msg: String,

    /// Opaque payload
    #[serde(default)]
    pub data: Value,

    /// Legacy status code
    #[serde(
        rename = "StatusCode",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub status_code: Option<i64>,

    /// Legacy status text
    #[serde(
        rename = "StatusMessage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub status_message: Option<String>,
}

impl ApiResponse {
    /// Returns true if the endpoint reported success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code == 0
    }
}
