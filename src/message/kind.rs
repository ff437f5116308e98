//! Message kind discriminator and post languages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a message, sent as `msg_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MsgType {
    /// Plain text.
    Text,
    /// Rich text with paragraphs of elements.
    Post,
    /// An uploaded image.
    Image,
    /// A group card for a chat the bot belongs to.
    ShareChat,
    /// An interactive card.
    Interactive,
}

impl MsgType {
    /// Returns the wire name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Post => "post",
            Self::Image => "image",
            Self::ShareChat => "share_chat",
            Self::Interactive => "interactive",
        }
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language of a post content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// Simplified Chinese (`zh_cn`)
    ZhCn,
    /// English (`en_us`)
    EnUs,
    /// Japanese (`ja`)
    Ja,
}

impl Language {
    /// Returns the wire name of the language.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ZhCn => "zh_cn",
            Self::EnUs => "en_us",
            Self::Ja => "ja",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
