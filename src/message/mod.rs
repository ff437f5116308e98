//! Message payloads for the bot webhook.
//!
//! This module provides:
//! - Message kinds and post languages ([`MsgType`], [`Language`])
//! - Rich text building blocks ([`Element`], [`Paragraph`], [`PostContent`])
//! - Interactive cards ([`Card`], [`CardPayload`])
//! - The message itself ([`Message`]) and its wire form ([`Envelope`], [`EnvelopeError`])
//!
//! Messages are built from closed types. They only become generic JSON
//! when converted into an [`Envelope`] for transmission.

mod card;
mod envelope;
mod kind;
mod post;


pub use card::{Card, CardBody, CardElement, CardHeader, CardPayload, CardText, TextTag};
pub use envelope::{Envelope, EnvelopeError, Message};
pub use kind::{Language, MsgType};
pub use post::{Element, Paragraph, PostContent};
