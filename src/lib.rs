//! Feishu Bot: custom bot webhook client
//!
//! A library for composing Feishu (Lark) custom bot messages, signing them
//! with the bot's secret, and delivering them to the bot's webhook.

pub mod config;
pub mod message;
pub mod sign;
pub mod time;
pub mod webhook;
