//! Interactive card documents.
//!
//! Cards are plain values. The `with_*` methods consume the value and
//! return an updated copy, so a partially built card can be cloned and
//! reused without the copies affecting each other.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Rendering of a card text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextTag {
    /// Text shown as-is.
    PlainText,
    /// Text rendered as Lark markdown.
    LarkMd,
}

/// A text block used in card headers and elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardText {
    /// How the content is rendered
    pub tag: TextTag,
    /// Text content
    pub content: String,
}

impl CardText {
    /// Creates a plain text block.
    #[must_use]
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            tag: TextTag::PlainText,
            content: content.into(),
        }
    }

    /// Creates a markdown text block.
    #[must_use]
    pub fn markdown(content: impl Into<String>) -> Self {
        Self {
            tag: TextTag::LarkMd,
            content: content.into(),
        }
    }
}

/// Card header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardHeader {
    /// Header title
    pub title: CardText,
    /// Optional subtitle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<CardText>,
    /// Color template, e.g. `blue` or `red`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Optional UI element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_element: Option<CardText>,
}

impl CardHeader {
    /// Creates a header with the given title.
    #[must_use]
    pub const fn new(title: CardText) -> Self {
        Self {
            title,
            subtitle: None,
            template: None,
            ui_element: None,
        }
    }

    /// Sets the subtitle.
    #[must_use]
    pub fn with_subtitle(mut self, subtitle: CardText) -> Self {
        self.subtitle = Some(subtitle);
        self
    }

    /// Sets the color template.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Sets the UI element.
    #[must_use]
    pub fn with_ui_element(mut self, ui_element: CardText) -> Self {
        self.ui_element = Some(ui_element);
        self
    }
}

/// An element in the card body, tagged by `tag` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum CardElement {
    /// Markdown block.
    Markdown {
        /// Markdown source
        content: String,
    },

    /// Text container.
    Div {
        /// Text block
        text: CardText,
    },

    /// Button that navigates to a URL.
    ///
    /// Cards sent through a custom bot only support URL navigation,
    /// not request callbacks.
    Button {
        /// Button label
        text: CardText,
        /// Button style, e.g. `primary`, `default` or `danger`
        #[serde(rename = "type")]
        button_type: String,
        /// Navigation target
        url: String,
    },
}

impl CardElement {
    /// Creates a markdown element.
    #[must_use]
    pub fn markdown(content: impl Into<String>) -> Self {
        Self::Markdown {
            content: content.into(),
        }
    }

    /// Creates a div element.
    #[must_use]
    pub const fn div(text: CardText) -> Self {
        Self::Div { text }
    }

    /// Creates a button with a plain text label.
    #[must_use]
    pub fn button(
        text: impl Into<String>,
        button_type: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::Button {
            text: CardText::plain(text),
            button_type: button_type.into(),
            url: url.into(),
        }
    }
}

/// Card body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardBody {
    /// Layout direction, e.g. `vertical`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    /// CSS-style padding, e.g. `12px 12px 12px 12px`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    /// Elements in display order
    pub elements: Vec<CardElement>,
}

impl CardBody {
    /// Creates a body holding the given elements.
    #[must_use]
    pub fn new(elements: impl IntoIterator<Item = CardElement>) -> Self {
        Self {
            direction: None,
            padding: None,
            elements: elements.into_iter().collect(),
        }
    }

    /// Sets the layout direction.
    #[must_use]
    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    /// Sets the padding.
    #[must_use]
    pub fn with_padding(mut self, padding: impl Into<String>) -> Self {
        self.padding = Some(padding.into());
        self
    }

    /// Appends an element.
    #[must_use]
    pub fn with_element(mut self, element: CardElement) -> Self {
        self.elements.push(element);
        self
    }
}

/// An interactive card.
///
/// # Example
///
/// ```
/// use feishu_bot::message::{Card, CardBody, CardElement, CardHeader, CardText};
///
/// let card = Card::new("2.0")
///     .with_header(CardHeader::new(CardText::plain("Welcome")).with_template("blue"))
///     .with_body(CardBody::new([CardElement::markdown("Hello!")]));
///
/// assert_eq!(card.schema, "2.0");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Card schema version, e.g. `2.0`
    pub schema: String,
    /// Free-form card configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
    /// Card header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<CardHeader>,
    /// Card body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<CardBody>,
}

impl Card {
    /// Creates an empty card with the given schema version.
    #[must_use]
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            config: None,
            header: None,
            body: None,
        }
    }

    /// Sets the card configuration.
    #[must_use]
    pub fn with_config(mut self, config: Map<String, Value>) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the header.
    #[must_use]
    pub fn with_header(mut self, header: CardHeader) -> Self {
        self.header = Some(header);
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: CardBody) -> Self {
        self.body = Some(body);
        self
    }
}

/// The card carried by an interactive message.
#[derive(Debug, Clone, PartialEq)]
pub enum CardPayload {
    /// A card built from typed parts.
    Structured(Card),
    /// A hand-authored card tree (e.g. exported from the card builder tool),
    /// sent without interpretation.
    Raw(Map<String, Value>),
}

impl CardPayload {
    /// Converts the card to its wire form.
    pub(crate) fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::Structured(card) => serde_json::to_value(card),
            Self::Raw(map) => Ok(Value::Object(map.clone())),
        }
    }
}

impl From<Card> for CardPayload {
    fn from(card: Card) -> Self {
        Self::Structured(card)
    }
}

impl From<Map<String, Value>> for CardPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self::Raw(map)
    }
}
