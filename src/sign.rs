//! Webhook signature generation.
//!
//! The endpoint authenticates a message by recomputing an HMAC-SHA256 keyed
//! with `"{timestamp}\n{secret}"` over an empty message and comparing the
//! Base64 result with the `sign` field of the envelope.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Error returned when a signature cannot be produced.
///
/// HMAC accepts keys of any length, so this is not expected in practice.
#[derive(Debug, Error)]
pub enum SignError {
    /// The HMAC key was rejected.
    #[error("Invalid signing key: {0}")]
    InvalidKey(#[from] hmac::digest::InvalidLength),
}

/// Generates the signature for a webhook message.
///
/// # Arguments
///
/// * `secret` - The signing secret configured for the bot
/// * `timestamp` - Unix timestamp in seconds, sent alongside the signature
///
/// # Example
///
/// ```
/// let sign = feishu_bot::sign::gen_sign("demo", 1_599_360_473).unwrap();
/// assert_eq!(sign.len(), 44);
/// ```
///
/// # Errors
///
/// Returns [`SignError::InvalidKey`] if the HMAC key is rejected.
pub fn gen_sign(secret: &str, timestamp: i64) -> Result<String, SignError> {
    let mac = keyed_mac(secret, timestamp)?;
    // The payload is empty; the timestamp and secret only enter through the key.
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Checks a signature the way the receiving endpoint does.
///
/// Returns `false` for signatures that are not valid Base64.
#[must_use]
pub fn verify_sign(secret: &str, timestamp: i64, signature: &str) -> bool {
    let Ok(expected) = STANDARD.decode(signature) else {
        return false;
    };

    keyed_mac(secret, timestamp).is_ok_and(|mac| mac.verify_slice(&expected).is_ok())
}

fn keyed_mac(secret: &str, timestamp: i64) -> Result<HmacSha256, SignError> {
    let key = format!("{timestamp}\n{secret}");
    Ok(HmacSha256::new_from_slice(key.as_bytes())?)
}
