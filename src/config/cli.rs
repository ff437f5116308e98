//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::message::Language;

/// Feishu Bot: send messages through a custom bot webhook
///
/// Builds a message from the subcommand, signs it when a secret is
/// configured, and posts it to the webhook URL.
#[derive(Debug, Parser)]
#[command(name = "feishu-bot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Message to send, or `init`
    #[command(subcommand)]
    pub command: Command,

    /// Webhook URL of the custom bot
    #[arg(long, global = true, env = "FEISHU_WEBHOOK_URL")]
    pub url: Option<String>,

    /// Signing secret (signing is disabled when empty or unset)
    #[arg(long, global = true, env = "FEISHU_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Overall request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Print the request body instead of sending it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for feishu-bot
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = super::defaults::CONFIG_FILE)]
        output: PathBuf,
    },

    /// Send a plain text message
    Text {
        /// Message text; mentions are written as <at user_id="ou_xxx">Name</at>
        text: String,
    },

    /// Send a rich text (post) message
    Post {
        /// Post title
        #[arg(long, default_value = "")]
        title: String,

        /// Language of the post
        #[arg(long, value_enum, default_value_t = LanguageArg::ZhCn)]
        lang: LanguageArg,

        /// Paragraphs, one text element each
        #[arg(required = true)]
        paragraphs: Vec<String>,
    },

    /// Send an uploaded image
    Image {
        /// Image key from the image upload API
        image_key: String,
    },

    /// Share a group chat card
    Share {
        /// Chat ID (oc_xxx)
        chat_id: String,
    },

    /// Send an interactive card read from a JSON file
    Card {
        /// Path to the card JSON (an object, e.g. exported from the card builder)
        file: PathBuf,
    },
}

/// Post language argument for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LanguageArg {
    /// Simplified Chinese
    #[value(name = "zh_cn")]
    ZhCn,
    /// English
    #[value(name = "en_us")]
    EnUs,
    /// Japanese
    #[value(name = "ja")]
    Ja,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::ZhCn => Self::ZhCn,
            LanguageArg::EnUs => Self::EnUs,
            LanguageArg::Ja => Self::Ja,
        }
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }
}
