//! Bot client delivering messages to a webhook.

use std::fmt;

use http::HeaderValue;
use http::header::CONTENT_TYPE;

use crate::message::{Envelope, Message};
use crate::sign::gen_sign;
use crate::time::{Clock, SystemClock, unix_seconds};

use super::{
    ApiResponse, Context, HttpClient, HttpRequest, HttpResponse, ReqwestClient, SendError,
};

/// Custom bot client sending messages through a webhook URL.
///
/// When a secret is configured, every message is signed with the current
/// timestamp. The bot holds no per-call state, so one instance can serve
/// concurrent sends.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `C`: The clock supplying signing timestamps (defaults to [`SystemClock`])
///
/// # Example
///
/// ```no_run
/// use feishu_bot::message::Message;
/// use feishu_bot::webhook::{Bot, Context};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let url = Url::parse("https://open.feishu.cn/open-apis/bot/v2/hook/xxx")?;
/// let bot = Bot::from_url(url).with_secret("my_secret");
/// let response = bot.send(&Context::background(), &Message::text("Hello")).await?;
/// println!("code={} msg={}", response.code, response.msg);
/// # Ok(())
/// # }
/// ```
pub struct Bot<H, C = SystemClock> {
    client: H,
    clock: C,
    url: url::Url,
    secret: String,
}

impl Bot<ReqwestClient, SystemClock> {
    /// Creates a bot using a [`ReqwestClient`] with the default timeout.
    #[must_use]
    pub fn from_url(url: url::Url) -> Self {
        Self::new(ReqwestClient::new(), url)
    }
}

impl<H> Bot<H, SystemClock> {
    /// Creates a bot without a secret, so messages are sent unsigned.
    #[must_use]
    pub const fn new(client: H, url: url::Url) -> Self {
        Self {
            client,
            clock: SystemClock,
            url,
            secret: String::new(),
        }
    }
}

impl<H, C> Bot<H, C> {
    /// Sets the clock used for signing timestamps.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> Bot<H, C2> {
        Bot {
            client: self.client,
            clock,
            url: self.url,
            secret: self.secret,
        }
    }

    /// Sets the signing secret. An empty secret disables signing.
    #[must_use]
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    /// Returns the webhook URL.
    #[must_use]
    pub const fn url(&self) -> &url::Url {
        &self.url
    }

    /// Returns true if messages are signed.
    #[must_use]
    pub fn is_signing_enabled(&self) -> bool {
        !self.secret.is_empty()
    }
}

impl<H, C> fmt::Debug for Bot<H, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bot")
            .field("url", &self.url.as_str())
            .field("signing", &self.is_signing_enabled())
            .finish_non_exhaustive()
    }
}

impl<H: HttpClient, C: Clock> Bot<H, C> {
    /// Sends a message and interprets the endpoint's reply.
    ///
    /// The caller's message is never modified; signing applies to the
    /// envelope built for this call. The transport is raced against `ctx`,
    /// and a done context wins, so a cancelled or expired context fails
    /// without waiting for the round trip.
    ///
    /// # Errors
    ///
    /// - [`SendError::Sign`] if the signature cannot be generated
    /// - [`SendError::Serialize`] if the message cannot be encoded
    /// - [`SendError::Transport`] on network failure, cancellation or deadline
    /// - [`SendError::Decode`] if the response body is not a valid API response
    /// - [`SendError::Api`] if the endpoint returns a non-zero code; the
    ///   parsed response is carried in the error
    pub async fn send(&self, ctx: &Context, message: &Message) -> Result<ApiResponse, SendError> {
        let envelope = self.envelope(message)?;
        let body = envelope.to_bytes().map_err(SendError::Serialize)?;

        tracing::debug!(
            "Sending {} message ({} bytes, signed: {})",
            envelope.msg_type(),
            body.len(),
            envelope.is_signed()
        );

        if let Some(err) = ctx.err() {
            return Err(SendError::Transport(err));
        }

        let request = self.build_request(ctx, body);

        let response = tokio::select! {
            biased;

            err = ctx.done() => return Err(SendError::Transport(err)),
            result = self.client.request(request) => result.map_err(SendError::Transport)?,
        };

        tracing::debug!("Webhook responded with HTTP {}", response.status);

        parse_response(&response)
    }

    /// Builds the envelope `send` would post right now, signed when a
    /// secret is set.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Sign`] or [`SendError::Serialize`].
    pub fn envelope(&self, message: &Message) -> Result<Envelope, SendError> {
        let auth = if self.secret.is_empty() {
            None
        } else {
            let timestamp = unix_seconds(self.clock.now());
            let sign = gen_sign(&self.secret, timestamp).map_err(SendError::Sign)?;
            Some((timestamp, sign))
        };

        let envelope = message.to_envelope().map_err(SendError::Serialize)?;

        Ok(match auth {
            Some((timestamp, sign)) => envelope.signed(timestamp, sign),
            None => envelope,
        })
    }

    fn build_request(&self, ctx: &Context, body: Vec<u8>) -> HttpRequest {
        let request = HttpRequest::post(self.url.clone())
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .with_body(body);

        match ctx.remaining() {
            Some(remaining) => request.with_timeout(remaining),
            None => request,
        }
    }
}

/// Parses the response body, whatever the HTTP status.
fn parse_response(response: &HttpResponse) -> Result<ApiResponse, SendError> {
    let parsed: ApiResponse =
        serde_json::from_slice(&response.body).map_err(|source| SendError::Decode {
            status: response.status,
            source,
        })?;

    if parsed.is_success() {
        return Ok(parsed);
    }

    tracing::warn!("Webhook API error (code {}): {}", parsed.code, parsed.msg);

    Err(SendError::Api {
        code: parsed.code,
        msg: parsed.msg.clone(),
        response: parsed,
    })
}
