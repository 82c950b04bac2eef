use super::{ChannelApi, PublishError, REQUEST_TIMEOUT};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

const PARSE_MODE: &str = "HTML";

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

#[derive(Serialize)]
struct SendPhoto<'a> {
    chat_id: &'a str,
    photo: &'a str,
    caption: &'a str,
    parse_mode: &'static str,
}

/// Envelope every Bot API method responds with, success or not.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
}

/// Telegram Bot API client bound to one chat.
///
/// SEC-015: the bot token is part of every request URL, so it is held as a
/// [`SecretString`], masked in `Debug`, and stripped from transport errors.
pub struct TelegramApi {
    client: reqwest::Client,
    base_url: String,
    token: SecretString,
    chat_id: String,
}

impl std::fmt::Debug for TelegramApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramApi")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramApi {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: SecretString,
        chat_id: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            chat_id: chat_id.into(),
        }
    }

    async fn call<P: Serialize + Sync>(&self, method: &str, payload: &P) -> Result<(), PublishError> {
        tokio::time::timeout(REQUEST_TIMEOUT, self.execute(method, payload))
            .await
            .map_err(|_| PublishError::Timeout)?
    }

    async fn execute<P: Serialize + Sync>(
        &self,
        method: &str,
        payload: &P,
    ) -> Result<(), PublishError> {
        let url = format!(
            "{}/bot{}/{}",
            self.base_url,
            self.token.expose_secret(),
            method
        );
        let body = serde_json::to_vec(payload)?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| PublishError::Transport(e.without_url()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PublishError::Transport(e.without_url()))?;

        // Telegram reports failures as 4xx with an `ok: false` JSON body
        let envelope: ApiResponse =
            serde_json::from_slice(&bytes).map_err(|_| PublishError::MalformedResponse {
                status: status.as_u16(),
            })?;

        if envelope.ok {
            Ok(())
        } else {
            Err(PublishError::Api {
                code: envelope.error_code,
                description: envelope
                    .description
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
            })
        }
    }
}

#[async_trait]
impl ChannelApi for TelegramApi {
    async fn send_text(&self, text: &str) -> Result<(), PublishError> {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: PARSE_MODE,
        };
        self.call("sendMessage", &payload).await
    }

    async fn send_photo(&self, photo_url: &str, caption: &str) -> Result<(), PublishError> {
        let payload = SendPhoto {
            chat_id: &self.chat_id,
            photo: photo_url,
            caption,
            parse_mode: PARSE_MODE,
        };
        self.call("sendPhoto", &payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN: &str = "123:secret-token";

    fn api(server: &MockServer) -> TelegramApi {
        TelegramApi::new(
            reqwest::Client::new(),
            format!("{}/", server.uri()),
            SecretString::from(TOKEN.to_string()),
            "@channel",
        )
    }

    #[tokio::test]
    async fn test_send_text_posts_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/bot{}/sendMessage", TOKEN)))
            .and(body_json(serde_json::json!({
                "chat_id": "@channel",
                "text": "<b>hi</b>",
                "parse_mode": "HTML"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": {}
            })))
            .expect(1)
            .mount(&server)
            .await;

        api(&server).send_text("<b>hi</b>").await.unwrap();
    }

    #[tokio::test]
    async fn test_send_photo_posts_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/bot{}/sendPhoto", TOKEN)))
            .and(body_json(serde_json::json!({
                "chat_id": "@channel",
                "photo": "https://img.example.com/a.jpg",
                "caption": "caption",
                "parse_mode": "HTML"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        api(&server)
            .send_photo("https://img.example.com/a.jpg", "caption")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_not_ok_response_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: wrong file identifier/HTTP URL specified"
            })))
            .mount(&server)
            .await;

        match api(&server).send_photo("https://x.example/a.jpg", "c").await {
            Err(PublishError::Api { code, description }) => {
                assert_eq!(code, Some(400));
                assert!(description.contains("wrong file identifier"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ok_false_with_200_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": false
            })))
            .mount(&server)
            .await;

        let result = api(&server).send_text("x").await;
        assert!(matches!(result, Err(PublishError::Api { code: None, .. })));
    }

    #[tokio::test]
    async fn test_non_json_response_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let result = api(&server).send_text("x").await;
        assert!(matches!(
            result,
            Err(PublishError::MalformedResponse { status: 502 })
        ));
    }

    #[tokio::test]
    async fn test_transport_error_hides_token() {
        // Nothing listens on port 9 (discard) on the loopback interface
        let api = TelegramApi::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9",
            SecretString::from(TOKEN.to_string()),
            "@channel",
        );
        let err = api.send_text("x").await.unwrap_err();
        assert!(matches!(err, PublishError::Transport(_) | PublishError::Timeout));
        assert!(!err.to_string().contains("secret-token"));
        assert!(!format!("{:?}", err).contains("secret-token"));
    }

    #[test]
    fn test_debug_masks_token() {
        let api = TelegramApi::new(
            reqwest::Client::new(),
            DEFAULT_API_BASE,
            SecretString::from(TOKEN.to_string()),
            "@channel",
        );
        let debug_output = format!("{:?}", api);
        assert!(!debug_output.contains("secret-token"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
