//! Rich text (post) building blocks.

use serde::{Deserialize, Serialize};

/// An inline element of a post paragraph, tagged by `tag` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag")]
pub enum Element {
    /// Plain text.
    #[serde(rename = "text")]
    Text {
        /// Text to display
        text: String,
    },

    /// Hyperlink. The endpoint rejects the message if `href` is not a valid URL.
    #[serde(rename = "a")]
    Link {
        /// Link text
        text: String,
        /// Target URL
        href: String,
    },

    /// Mention of a user, or of everyone with `user_id = "all"`.
    #[serde(rename = "at")]
    At {
        /// Open ID or user ID of a group member
        user_id: String,
        /// Display name
        user_name: String,
    },

    /// Image obtained from the image upload API.
    #[serde(rename = "img")]
    Image {
        /// Uploaded image key
        image_key: String,
    },

    /// Emoticon.
    #[serde(rename = "emotion")]
    Emotion {
        /// Emoji key
        emoji_key: String,
    },
}

impl Element {
    /// Creates a plain text element.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Creates a hyperlink element.
    #[must_use]
    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self::Link {
            text: text.into(),
            href: href.into(),
        }
    }

    /// Creates a mention element.
    #[must_use]
    pub fn at(user_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self::At {
            user_id: user_id.into(),
            user_name: user_name.into(),
        }
    }

    /// Creates a mention of everyone in the chat.
    #[must_use]
    pub fn at_all() -> Self {
        Self::at("all", "所有人")
    }

    /// Creates an image element.
    #[must_use]
    pub fn image(image_key: impl Into<String>) -> Self {
        Self::Image {
            image_key: image_key.into(),
        }
    }

    /// Creates an emoticon element.
    #[must_use]
    pub fn emotion(emoji_key: impl Into<String>) -> Self {
        Self::Emotion {
            emoji_key: emoji_key.into(),
        }
    }
}

/// One line of a post: its elements in display order.
pub type Paragraph = Vec<Element>;

/// Title and paragraphs of a post in a single language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostContent {
    /// Post title (may be empty)
    pub title: String,
    /// Paragraphs in display order
    pub content: Vec<Paragraph>,
}

impl PostContent {
    /// Creates post content with the given title and no paragraphs.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Vec::new(),
        }
    }

    /// Appends a paragraph.
    #[must_use]
    pub fn with_paragraph(mut self, paragraph: impl IntoIterator<Item = Element>) -> Self {
        self.content.push(paragraph.into_iter().collect());
        self
    }
}
