//! Messages and their wire envelope.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;

use super::{Card, CardPayload, Language, MsgType, PostContent};

/// A message to send through the bot webhook.
///
/// Each variant holds exactly the content of its kind.
///
/// # Example
///
/// ```
/// use feishu_bot::message::{Element, Language, Message, MsgType, PostContent};
///
/// let content = PostContent::new("Project Update").with_paragraph([
///     Element::text("Project has been updated: "),
///     Element::link("View", "https://example.com"),
/// ]);
/// let message = Message::post(Language::ZhCn, content);
///
/// assert_eq!(message.msg_type(), MsgType::Post);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Plain text. Mentions are written inline as
    /// `<at user_id="ou_xxx">Name</at>`.
    Text {
        /// Message text
        text: String,
    },

    /// Rich text, one content block per language.
    Post(BTreeMap<Language, PostContent>),

    /// An image from the image upload API.
    Image {
        /// Uploaded image key
        image_key: String,
    },

    /// A group card. The bot can only share chats it belongs to.
    ShareChat {
        /// Chat ID (`oc_xxx`)
        share_chat_id: String,
    },

    /// An interactive card.
    Interactive(CardPayload),
}

impl Message {
    /// Creates a text message.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Creates a rich text message in a single language.
    #[must_use]
    pub fn post(language: Language, content: PostContent) -> Self {
        Self::Post(BTreeMap::from([(language, content)]))
    }

    /// Creates a rich text message with several language versions.
    ///
    /// If a language appears more than once, the last content wins.
    #[must_use]
    pub fn post_multi_language(contents: impl IntoIterator<Item = (Language, PostContent)>) -> Self {
        Self::Post(contents.into_iter().collect())
    }

    /// Creates an image message.
    #[must_use]
    pub fn image(image_key: impl Into<String>) -> Self {
        Self::Image {
            image_key: image_key.into(),
        }
    }

    /// Creates a share chat message.
    #[must_use]
    pub fn share_chat(share_chat_id: impl Into<String>) -> Self {
        Self::ShareChat {
            share_chat_id: share_chat_id.into(),
        }
    }

    /// Creates an interactive message from a typed card.
    #[must_use]
    pub fn interactive(card: Card) -> Self {
        Self::Interactive(CardPayload::Structured(card))
    }

    /// Creates an interactive message from a raw card tree.
    #[must_use]
    pub const fn interactive_raw(card: Map<String, Value>) -> Self {
        Self::Interactive(CardPayload::Raw(card))
    }

    /// Returns the kind of this message.
    #[must_use]
    pub const fn msg_type(&self) -> MsgType {
        match self {
            Self::Text { .. } => MsgType::Text,
            Self::Post(_) => MsgType::Post,
            Self::Image { .. } => MsgType::Image,
            Self::ShareChat { .. } => MsgType::ShareChat,
            Self::Interactive(_) => MsgType::Interactive,
        }
    }

    /// Converts the message into an unsigned wire envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be represented as JSON.
    pub fn to_envelope(&self) -> Result<Envelope, serde_json::Error> {
        let msg_type = self.msg_type();
        let envelope = match self {
            Self::Text { text } => Envelope::with_content(msg_type, json!({ "text": text })),
            Self::Post(contents) => {
                Envelope::with_content(msg_type, json!({ "post": serde_json::to_value(contents)? }))
            }
            Self::Image { image_key } => {
                Envelope::with_content(msg_type, json!({ "image_key": image_key }))
            }
            Self::ShareChat { share_chat_id } => {
                Envelope::with_content(msg_type, json!({ "share_chat_id": share_chat_id }))
            }
            Self::Interactive(card) => Envelope::with_card(card.to_value()?),
        };

        Ok(envelope)
    }
}

/// The JSON document posted to the webhook.
///
/// Exactly one of `content` and `card` is present. `timestamp` and `sign`
/// are either both present or both absent; [`Envelope::signed`] is the
/// only way to set them. Decoding rejects documents that break either rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEnvelope")]
pub struct Envelope {
    msg_type: MsgType,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    card: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sign: Option<String>,
}

/// Rejected envelope shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// Neither `content` nor `card` is present.
    #[error("envelope has neither content nor card")]
    MissingBody,

    /// Both `content` and `card` are present.
    #[error("envelope has both content and card")]
    AmbiguousBody,

    /// The body field does not match the message kind.
    #[error("{0} message must carry {1}")]
    BodyMismatch(MsgType, &'static str),

    /// Only one of `timestamp` and `sign` is present.
    #[error("envelope must carry both timestamp and sign, or neither")]
    PartialSignature,
}

/// Envelope fields as they appear on the wire, before validation.
#[derive(Deserialize)]
struct RawEnvelope {
    msg_type: MsgType,
    #[serde(default)]
    content: Option<Value>,
    #[serde(default)]
    card: Option<Value>,
    #[serde(default)]
    timestamp: Option<i64>,
    #[serde(default)]
    sign: Option<String>,
}

impl TryFrom<RawEnvelope> for Envelope {
    type Error = EnvelopeError;

    fn try_from(raw: RawEnvelope) -> Result<Self, Self::Error> {
        let envelope = match (raw.content, raw.card) {
            (Some(_), Some(_)) => return Err(EnvelopeError::AmbiguousBody),
            (None, None) => return Err(EnvelopeError::MissingBody),
            (Some(content), None) if raw.msg_type != MsgType::Interactive => {
                Self::with_content(raw.msg_type, content)
            }
            (None, Some(card)) if raw.msg_type == MsgType::Interactive => Self::with_card(card),
            (Some(_), None) => {
                return Err(EnvelopeError::BodyMismatch(raw.msg_type, "card"));
            }
            (None, Some(_)) => {
                return Err(EnvelopeError::BodyMismatch(raw.msg_type, "content"));
            }
        };

        match (raw.timestamp, raw.sign) {
            (Some(timestamp), Some(sign)) => Ok(envelope.signed(timestamp, sign)),
            (None, None) => Ok(envelope),
            _ => Err(EnvelopeError::PartialSignature),
        }
    }
}

impl Envelope {
    const fn with_content(msg_type: MsgType, content: Value) -> Self {
        Self {
            msg_type,
            content: Some(content),
            card: None,
            timestamp: None,
            sign: None,
        }
    }

    const fn with_card(card: Value) -> Self {
        Self {
            msg_type: MsgType::Interactive,
            content: None,
            card: Some(card),
            timestamp: None,
            sign: None,
        }
    }

    /// Returns a copy carrying the given timestamp and signature.
    #[must_use]
    pub fn signed(mut self, timestamp: i64, sign: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp);
        self.sign = Some(sign.into());
        self
    }

    /// Returns the message kind.
    #[must_use]
    pub const fn msg_type(&self) -> MsgType {
        self.msg_type
    }

    /// Returns the kind-specific content (absent for interactive messages).
    #[must_use]
    pub const fn content(&self) -> Option<&Value> {
        self.content.as_ref()
    }

    /// Returns the card (present only for interactive messages).
    #[must_use]
    pub const fn card(&self) -> Option<&Value> {
        self.card.as_ref()
    }

    /// Returns the signing timestamp, if signed.
    #[must_use]
    pub const fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    /// Returns the signature, if signed.
    #[must_use]
    pub fn sign(&self) -> Option<&str> {
        self.sign.as_deref()
    }

    /// Returns true if both timestamp and signature are set.
    #[must_use]
    pub const fn is_signed(&self) -> bool {
        self.timestamp.is_some() && self.sign.is_some()
    }

    /// Serializes the envelope to a JSON request body.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
