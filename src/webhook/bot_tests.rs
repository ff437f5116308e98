//! Tests for `Bot`.

use super::{
    ApiResponse, Bot, Context, HttpClient, HttpError, HttpRequest, HttpResponse, IsRetryable,
    SendError,
};
use crate::message::{Card, Element, Envelope, Language, Message, MsgType, PostContent};
use crate::sign::{gen_sign, verify_sign};
use crate::time::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime};

const SUCCESS_BODY: &str = r#"{"code":0,"msg":"success","data":{}}"#;
const KEYWORD_ERROR_BODY: &str = r#"{"code":19024,"msg":"Key Words Not Found"}"#;
const FIXED_TIMESTAMP: i64 = 1_599_360_473;

fn json_response(status: http::StatusCode, body: &str) -> HttpResponse {
    HttpResponse::new(status, http::HeaderMap::new(), body.as_bytes().to_vec())
}

/// Mock HTTP client that returns a configurable sequence of responses.
#[derive(Debug)]
struct MockClient {
    responses: std::sync::Mutex<Vec<Result<HttpResponse, HttpError>>>,
    requests: std::sync::Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl MockClient {
    fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses),
            requests: std::sync::Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    fn replying(status: http::StatusCode, body: &str) -> Self {
        Self::new(vec![Ok(json_response(status, body))])
    }

    fn success() -> Self {
        Self::replying(http::StatusCode::OK, SUCCESS_BODY)
    }

    fn success_times(n: usize) -> Self {
        Self::new(
            (0..n)
                .map(|_| Ok(json_response(http::StatusCode::OK, SUCCESS_BODY)))
                .collect(),
        )
    }

    fn failing(error: HttpError) -> Self {
        Self::new(vec![Err(error)])
    }

    fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn captured_envelopes(&self) -> Vec<Envelope> {
        self.captured_requests()
            .iter()
            .map(|req| serde_json::from_slice(req.body.as_deref().unwrap()).unwrap())
            .collect()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);
        self.responses.lock().unwrap().remove(0)
    }
}

/// Client that answers successfully only after a delay.
struct SlowClient {
    delay: Duration,
}

impl HttpClient for SlowClient {
    async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
        tokio::time::sleep(self.delay).await;
        Ok(json_response(http::StatusCode::OK, SUCCESS_BODY))
    }
}

/// Clock pinned to a fixed Unix timestamp.
struct FixedClock(u64);

impl Clock for FixedClock {
    fn now(&self) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(self.0)
    }
}

fn test_url() -> url::Url {
    url::Url::parse("https://open.feishu.cn/open-apis/bot/v2/hook/abc123").unwrap()
}

fn bot(client: Arc<MockClient>) -> Bot<Arc<MockClient>> {
    Bot::new(client, test_url())
}

fn signed_bot(client: Arc<MockClient>, secret: &str) -> Bot<Arc<MockClient>, FixedClock> {
    Bot::new(client, test_url())
        .with_secret(secret)
        .with_clock(FixedClock(FIXED_TIMESTAMP.unsigned_abs()))
}

mod construction {
    use super::*;

    #[test]
    fn new_bot_has_url_and_no_signing() {
        let bot = Bot::new(MockClient::success(), test_url());

        assert_eq!(bot.url(), &test_url());
        assert!(!bot.is_signing_enabled());
    }

    #[test]
    fn with_secret_enables_signing() {
        let bot = Bot::new(MockClient::success(), test_url()).with_secret("my_secret");
        assert!(bot.is_signing_enabled());
    }

    #[test]
    fn empty_secret_disables_signing() {
        let bot = Bot::new(MockClient::success(), test_url())
            .with_secret("my_secret")
            .with_secret("");
        assert!(!bot.is_signing_enabled());
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let bot = Bot::new(MockClient::success(), test_url()).with_secret("top-secret-value");
        let debug = format!("{bot:?}");

        assert!(debug.contains("Bot"));
        assert!(debug.contains("signing: true"));
        assert!(!debug.contains("top-secret-value"));
    }

    #[test]
    fn bot_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Bot<MockClient>>();
        assert_send_sync::<Bot<MockClient, FixedClock>>();
    }
}

mod request {
    use super::*;

    #[tokio::test]
    async fn posts_json_to_configured_url() {
        let client = Arc::new(MockClient::success());

        bot(client.clone())
            .send(&Context::background(), &Message::text("test message"))
            .await
            .unwrap();

        let requests = client.captured_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, http::Method::POST);
        assert_eq!(requests[0].url, test_url());
        assert_eq!(
            requests[0].headers.get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn body_is_the_wire_envelope() {
        let client = Arc::new(MockClient::success());

        bot(client.clone())
            .send(&Context::background(), &Message::text("test message"))
            .await
            .unwrap();

        let body = client.captured_requests()[0].body.clone().unwrap();
        let body = String::from_utf8(body).unwrap();
        assert!(body.contains(r#""msg_type":"text""#));
        assert!(body.contains(r#""text":"test message""#));
    }

    #[tokio::test]
    async fn sends_every_message_kind() {
        let messages = [
            Message::text("text message"),
            Message::post(
                Language::ZhCn,
                PostContent::new("Title").with_paragraph([Element::text("Content")]),
            ),
            Message::image("img_key_123"),
            Message::share_chat("oc_12345"),
            Message::interactive(Card::new("2.0")),
        ];
        let client = Arc::new(MockClient::success_times(messages.len()));
        let bot = bot(client.clone());

        for message in &messages {
            bot.send(&Context::background(), message).await.unwrap();
        }

        let kinds: Vec<MsgType> = client
            .captured_envelopes()
            .iter()
            .map(Envelope::msg_type)
            .collect();
        let expected: Vec<MsgType> = messages.iter().map(Message::msg_type).collect();
        assert_eq!(kinds, expected);
    }

    #[tokio::test]
    async fn no_timeout_without_deadline() {
        let client = Arc::new(MockClient::success());

        bot(client.clone())
            .send(&Context::background(), &Message::text("x"))
            .await
            .unwrap();

        assert!(client.captured_requests()[0].timeout.is_none());
    }

    #[tokio::test]
    async fn deadline_is_forwarded_as_timeout() {
        let client = Arc::new(MockClient::success());
        let ctx = Context::background().with_timeout(Duration::from_secs(5));

        bot(client.clone())
            .send(&ctx, &Message::text("x"))
            .await
            .unwrap();

        let timeout = client.captured_requests()[0].timeout.unwrap();
        assert!(timeout <= Duration::from_secs(5));
        assert!(timeout > Duration::ZERO);
    }

    #[tokio::test]
    async fn caller_message_is_unchanged() {
        let client = Arc::new(MockClient::success());
        let message = Message::text("original");
        let copy = message.clone();

        signed_bot(client, "secret")
            .send(&Context::background(), &message)
            .await
            .unwrap();

        assert_eq!(message, copy);
    }
}

mod signing {
    use super::*;

    #[tokio::test]
    async fn unsigned_when_secret_is_empty() {
        let client = Arc::new(MockClient::success());

        bot(client.clone())
            .send(&Context::background(), &Message::text("x"))
            .await
            .unwrap();

        let envelope = &client.captured_envelopes()[0];
        assert!(envelope.timestamp().is_none());
        assert!(envelope.sign().is_none());

        let body = client.captured_requests()[0].body.clone().unwrap();
        let body = String::from_utf8(body).unwrap();
        assert!(!body.contains("timestamp"));
        assert!(!body.contains("sign"));
    }

    #[tokio::test]
    async fn signed_with_clock_timestamp() {
        let client = Arc::new(MockClient::success());

        signed_bot(client.clone(), "test_secret")
            .send(&Context::background(), &Message::text("x"))
            .await
            .unwrap();

        let envelope = &client.captured_envelopes()[0];
        let expected = gen_sign("test_secret", FIXED_TIMESTAMP).unwrap();
        assert_eq!(envelope.timestamp(), Some(FIXED_TIMESTAMP));
        assert_eq!(envelope.sign(), Some(expected.as_str()));
    }

    #[tokio::test]
    async fn signature_verifies_with_system_clock() {
        let client = Arc::new(MockClient::success());

        bot(client.clone())
            .with_secret("test_secret")
            .send(&Context::background(), &Message::text("x"))
            .await
            .unwrap();

        let envelope = &client.captured_envelopes()[0];
        let timestamp = envelope.timestamp().unwrap();
        assert!(timestamp > 0);
        assert!(verify_sign("test_secret", timestamp, envelope.sign().unwrap()));
    }

    #[tokio::test]
    async fn interactive_messages_are_signed_too() {
        let client = Arc::new(MockClient::success());

        signed_bot(client.clone(), "s")
            .send(&Context::background(), &Message::interactive(Card::new("2.0")))
            .await
            .unwrap();

        let envelope = &client.captured_envelopes()[0];
        assert!(envelope.is_signed());
        assert!(envelope.card().is_some());
    }
}

mod response {
    use super::*;

    #[tokio::test]
    async fn success_code_returns_response() {
        let client = Arc::new(MockClient::success());

        let resp = bot(client)
            .send(&Context::background(), &Message::text("x"))
            .await
            .unwrap();

        assert_eq!(resp.code, 0);
        assert_eq!(resp.msg, "success");
    }

    #[tokio::test]
    async fn non_zero_code_returns_api_error_with_response() {
        let client = Arc::new(MockClient::replying(http::StatusCode::OK, KEYWORD_ERROR_BODY));

        let err = bot(client)
            .send(&Context::background(), &Message::text("x"))
            .await
            .unwrap_err();

        assert!(matches!(err, SendError::Api { code: 19024, .. }));
        assert_eq!(err.api_code(), Some(19024));

        let resp: &ApiResponse = err.response().unwrap();
        assert_eq!(resp.code, 19024);
        assert_eq!(resp.msg, "Key Words Not Found");
        assert!(err.to_string().contains("19024"));
        assert!(err.to_string().contains("Key Words Not Found"));
    }

    #[tokio::test]
    async fn http_status_is_not_interpreted() {
        let client = Arc::new(MockClient::replying(
            http::StatusCode::BAD_REQUEST,
            r#"{"code":9499,"msg":"Bad Request","data":{}}"#,
        ));

        let err = bot(client)
            .send(&Context::background(), &Message::text("x"))
            .await
            .unwrap_err();

        assert_eq!(err.api_code(), Some(9499));
    }

    #[tokio::test]
    async fn error_status_with_success_body_is_success() {
        let client = Arc::new(MockClient::replying(
            http::StatusCode::INTERNAL_SERVER_ERROR,
            SUCCESS_BODY,
        ));

        let result = bot(client)
            .send(&Context::background(), &Message::text("x"))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn legacy_success_body_is_success() {
        let client = Arc::new(MockClient::replying(
            http::StatusCode::OK,
            r#"{"Extra":null,"StatusCode":0,"StatusMessage":"success"}"#,
        ));

        let resp = bot(client)
            .send(&Context::background(), &Message::text("x"))
            .await
            .unwrap();

        assert_eq!(resp.status_code, Some(0));
    }

    #[tokio::test]
    async fn invalid_body_returns_decode_error() {
        let client = Arc::new(MockClient::replying(
            http::StatusCode::BAD_GATEWAY,
            "<html>Bad Gateway</html>",
        ));

        let err = bot(client)
            .send(&Context::background(), &Message::text("x"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SendError::Decode {
                status: http::StatusCode::BAD_GATEWAY,
                ..
            }
        ));
        assert!(err.response().is_none());
    }

    #[tokio::test]
    async fn empty_body_returns_decode_error() {
        let client = Arc::new(MockClient::replying(http::StatusCode::OK, ""));

        let err = bot(client)
            .send(&Context::background(), &Message::text("x"))
            .await
            .unwrap_err();

        assert!(matches!(err, SendError::Decode { .. }));
    }
}

mod transport {
    use super::*;

    #[tokio::test]
    async fn connection_failure_returns_transport_error() {
        let client = Arc::new(MockClient::failing(HttpError::Connection(Box::new(
            std::io::Error::other("connection refused"),
        ))));

        let err = bot(client)
            .send(&Context::background(), &Message::text("x"))
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert!(matches!(err, SendError::Transport(HttpError::Connection(_))));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn transport_timeout_returns_transport_error() {
        let client = Arc::new(MockClient::failing(HttpError::Timeout));

        let err = bot(client)
            .send(&Context::background(), &Message::text("x"))
            .await
            .unwrap_err();

        assert!(matches!(err, SendError::Transport(HttpError::Timeout)));
    }

    #[tokio::test]
    async fn already_cancelled_context_fails_before_dispatch() {
        let client = Arc::new(MockClient::success());
        let (ctx, handle) = Context::background().with_cancel();
        handle.cancel();

        let err = bot(client.clone())
            .send(&ctx, &Message::text("x"))
            .await
            .unwrap_err();

        assert!(matches!(err, SendError::Transport(HttpError::Cancelled)));
        assert!(!err.is_retryable());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn expired_deadline_fails_before_dispatch() {
        let client = Arc::new(MockClient::success());
        let ctx = Context::background().with_timeout(Duration::ZERO);

        let err = bot(client.clone())
            .send(&ctx, &Message::text("x"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SendError::Transport(HttpError::DeadlineExceeded)
        ));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_aborts_slow_request() {
        let bot = Bot::new(
            SlowClient {
                delay: Duration::from_secs(60),
            },
            test_url(),
        );
        let ctx = Context::background().with_timeout(Duration::from_millis(100));

        let err = bot.send(&ctx, &Message::text("x")).await.unwrap_err();

        assert!(matches!(
            err,
            SendError::Transport(HttpError::DeadlineExceeded)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_aborts_in_flight_request() {
        let bot = Bot::new(
            SlowClient {
                delay: Duration::from_secs(60),
            },
            test_url(),
        );
        let (ctx, handle) = Context::background().with_cancel();
        let message = Message::text("x");

        let (result, ()) = tokio::join!(bot.send(&ctx, &message), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            handle.cancel();
        });

        assert!(matches!(
            result,
            Err(SendError::Transport(HttpError::Cancelled))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_request_within_deadline_succeeds() {
        let bot = Bot::new(
            SlowClient {
                delay: Duration::from_millis(50),
            },
            test_url(),
        );
        let ctx = Context::background().with_timeout(Duration::from_secs(1));

        let resp = bot.send(&ctx, &Message::text("x")).await.unwrap();

        assert_eq!(resp.code, 0);
    }
}

mod concurrency {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_sends_are_independent() {
        const SENDS: usize = 16;
        let client = Arc::new(MockClient::success_times(SENDS));
        let bot = Arc::new(signed_bot(client.clone(), "shared_secret"));

        let handles: Vec<_> = (0..SENDS)
            .map(|i| {
                let bot = Arc::clone(&bot);
                tokio::spawn(async move {
                    bot.send(&Context::background(), &Message::text(format!("message {i}")))
                        .await
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap().code, 0);
        }

        let envelopes = client.captured_envelopes();
        assert_eq!(envelopes.len(), SENDS);

        let mut texts: Vec<String> = envelopes
            .iter()
            .map(|e| e.content().unwrap()["text"].as_str().unwrap().to_string())
            .collect();
        texts.sort();
        texts.dedup();
        assert_eq!(texts.len(), SENDS);

        for envelope in &envelopes {
            assert!(verify_sign(
                "shared_secret",
                envelope.timestamp().unwrap(),
                envelope.sign().unwrap()
            ));
        }
    }
}

mod send_error {
    use super::*;
    use std::error::Error;

    #[test]
    fn transport_error_preserves_source() {
        let err = SendError::Transport(HttpError::Timeout);

        assert!(err.to_string().contains("Failed to send request"));
        assert!(err.source().unwrap().to_string().contains("timed out"));
    }

    #[test]
    fn non_api_errors_have_no_response() {
        let err = SendError::Transport(HttpError::Cancelled);

        assert!(err.response().is_none());
        assert!(err.api_code().is_none());
    }

    #[test]
    fn api_error_is_not_classified_retryable() {
        let err = SendError::Api {
            code: 11232,
            msg: "frequency limited".to_string(),
            response: ApiResponse::default(),
        };

        assert!(!err.is_retryable());
        assert!(!err.is_transport());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SendError>();
    }
}
