//! Webhook delivery layer.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - Cancellation and deadlines ([`Context`], [`CancelHandle`])
//! - Sending messages and interpreting replies ([`Bot`], [`ApiResponse`])

mod bot;
mod client;
mod context;
mod error;
mod http;
mod response;

#[cfg(test)]
mod bot_tests;

pub use bot::Bot;
pub use client::ReqwestClient;
pub use context::{CancelHandle, Context};
pub use error::{HttpError, IsRetryable, SendError};
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use response::ApiResponse;
