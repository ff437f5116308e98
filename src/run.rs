//! Application execution logic.
//!
//! This module turns the parsed subcommand into a [`Message`] and either
//! prints the request body (dry-run) or delivers it through the webhook.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tokio::signal;

use feishu_bot::config::{Command, ValidatedConfig};
use feishu_bot::message::{Element, Message, PostContent};
use feishu_bot::webhook::{Bot, Context, HttpClient, ReqwestClient, SendError};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The subcommand does not describe a message.
    #[error("'{0}' does not send a message")]
    NotAMessage(&'static str),

    /// Failed to read the card file.
    #[error("Failed to read card file '{}': {source}", path.display())]
    CardRead {
        /// Path to the card file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The card file is not valid JSON.
    #[error("Failed to parse card file '{}': {source}", path.display())]
    CardParse {
        /// Path to the card file
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The card file holds JSON that is not an object.
    #[error("Card file '{}' must contain a JSON object", path.display())]
    CardNotObject {
        /// Path to the card file
        path: PathBuf,
    },

    /// Failed to render the request body in dry-run mode.
    #[error("Failed to render request body: {0}")]
    Render(#[source] serde_json::Error),

    /// Delivery failed.
    #[error("Failed to send message: {0}")]
    Send(#[source] SendError),
}

/// Builds the message described by a send subcommand.
///
/// # Errors
///
/// Returns an error for `init`, or if a card file cannot be read or is not
/// a JSON object.
pub fn build_message(command: &Command) -> Result<Message, RunError> {
    match command {
        Command::Init { .. } => Err(RunError::NotAMessage("init")),
        Command::Text { text } => Ok(Message::text(text.as_str())),
        Command::Post {
            title,
            lang,
            paragraphs,
        } => {
            let content = paragraphs
                .iter()
                .fold(PostContent::new(title.as_str()), |content, paragraph| {
                    content.with_paragraph([Element::text(paragraph.as_str())])
                });
            Ok(Message::post((*lang).into(), content))
        }
        Command::Image { image_key } => Ok(Message::image(image_key.as_str())),
        Command::Share { chat_id } => Ok(Message::share_chat(chat_id.as_str())),
        Command::Card { file } => load_card(file),
    }
}

/// Reads a card JSON object from a file.
fn load_card(path: &Path) -> Result<Message, RunError> {
    let content = std::fs::read_to_string(path).map_err(|source| RunError::CardRead {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|source| RunError::CardParse {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Object(card) => Ok(Message::interactive_raw(card)),
        _ => Err(RunError::CardNotObject {
            path: path.to_path_buf(),
        }),
    }
}

/// Executes a send subcommand.
///
/// In dry-run mode the request body is printed to stdout and nothing is
/// sent. Otherwise the message is delivered within the configured timeout,
/// and Ctrl+C (or SIGTERM) cancels the request in flight.
///
/// # Errors
///
/// Returns an error if the message cannot be built or delivered.
pub async fn execute(config: ValidatedConfig, command: &Command) -> Result<(), RunError> {
    let message = build_message(command)?;
    let bot = create_bot(&config);

    if config.dry_run {
        tracing::info!("Dry-run mode enabled - the request body is printed, not sent");
        println!("{}", render_dry_run(&bot, &message)?);
        return Ok(());
    }

    let ctx = Context::background().with_timeout(config.timeout);
    let response = send_until_shutdown(&bot, ctx, &message)
        .await
        .map_err(RunError::Send)?;

    tracing::info!("Message delivered ({} message)", message.msg_type());
    if !response.data.is_null() {
        tracing::debug!("Response data: {}", response.data);
    }

    Ok(())
}

/// Creates the bot from configuration.
fn create_bot(config: &ValidatedConfig) -> Bot<ReqwestClient> {
    Bot::new(
        ReqwestClient::with_timeout(config.timeout),
        config.url.clone(),
    )
    .with_secret(config.secret.as_str())
}

/// Renders the envelope a send would post, pretty-printed.
fn render_dry_run<H: HttpClient>(bot: &Bot<H>, message: &Message) -> Result<String, RunError> {
    let envelope = bot.envelope(message).map_err(RunError::Send)?;
    serde_json::to_string_pretty(&envelope).map_err(RunError::Render)
}

/// Sends the message, cancelling it if a shutdown signal arrives first.
async fn send_until_shutdown<H: HttpClient>(
    bot: &Bot<H>,
    ctx: Context,
    message: &Message,
) -> Result<feishu_bot::webhook::ApiResponse, SendError> {
    let (ctx, cancel) = ctx.with_cancel();

    let watcher = tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, cancelling request...");
        cancel.cancel();
    });

    let result = bot.send(&ctx, message).await;
    watcher.abort();
    result
}

/// Returns a future that completes when a shutdown signal is received.
///
/// If a handler cannot be installed, that signal source never completes.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
