//! Telegram Bot API notifier.
//!
//! Delivers postings via the `sendMessage` endpoint, one message each.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{HttpConfig, Posting, TelegramConfig};
use crate::notify::Notifier;
use crate::utils::http::create_async_client;

/// Sends postings to a Telegram chat.
#[derive(Debug)]
pub struct TelegramNotifier {
    api_base: String,
    bot_token: String,
    chat_id: i64,
    parse_mode: String,
    template: String,
    client: Client,
}

impl TelegramNotifier {
    /// Create a notifier, failing if token or chat id are missing.
    pub fn from_config(config: &TelegramConfig, http: &HttpConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token: config.token.clone(),
            chat_id: config.chat_id,
            parse_mode: config.parse_mode.clone(),
            template: config.template.clone(),
            client: create_async_client(http)?,
        })
    }

    /// Send a single message.
    async fn send(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);

        let mut body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
        });
        if !self.parse_mode.is_empty() {
            body["parse_mode"] = Value::String(self.parse_mode.clone());
        }

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        let reply_body = response.text().await?;

        let description = match serde_json::from_str::<Value>(&reply_body) {
            Ok(reply) if reply.get("ok") == Some(&Value::Bool(true)) => return Ok(()),
            Ok(reply) => reply
                .get("description")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown Telegram API error")
                .to_string(),
            Err(_) => format!("unexpected reply: {}", excerpt(&reply_body)),
        };

        Err(AppError::notify(format!(
            "Telegram API error ({status}): {description}"
        )))
    }
}

/// First line of a reply body, shortened for error messages.
fn excerpt(text: &str) -> String {
    const MAX_CHARS: usize = 200;
    let line = text.trim().lines().next().unwrap_or_default();
    if line.chars().count() > MAX_CHARS {
        format!("{}...", line.chars().take(MAX_CHARS).collect::<String>())
    } else {
        line.to_string()
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, postings: &[Posting]) -> Result<()> {
        for posting in postings {
            let text = posting.format(&self.template);
            log::info!("Sending '{}' to telegram", posting.title);
            self.send(&text).await?;
        }
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "telegram"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_server;

    const OK: &str = r#"{"ok":true,"result":{"message_id":1}}"#;

    fn config(api_base: &str) -> TelegramConfig {
        TelegramConfig {
            token: "123:ABC".to_string(),
            chat_id: -100123,
            api_base: api_base.to_string(),
            ..TelegramConfig::default()
        }
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let result = TelegramNotifier::from_config(&TelegramConfig::default(), &HttpConfig::default());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("token"));
    }

    #[tokio::test]
    async fn test_one_message_per_posting() {
        let (base, server) =
            test_server::serve(vec![(200, OK.to_string()), (200, OK.to_string())]).await;
        let notifier = TelegramNotifier::from_config(&config(&base), &HttpConfig::default()).unwrap();

        let postings = vec![
            Posting::new("Applied Physicist", "EP", "https://example.com/1"),
            Posting::new("Fellow", "IT", "https://example.com/2"),
        ];
        notifier.notify(&postings).await.unwrap();

        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].starts_with("POST /bot123:ABC/sendMessage "));
        assert!(requests[0].contains("Applied Physicist"));
        assert!(requests[0].contains("\"parse_mode\":\"Markdown\""));
        assert!(requests[0].contains("-100123"));
        assert!(requests[1].contains("https://example.com/2"));
    }

    #[tokio::test]
    async fn test_stops_at_first_failure() {
        let (base, server) = test_server::serve(vec![
            (200, OK.to_string()),
            (400, r#"{"ok":false,"description":"Bad Request: chat not found"}"#.to_string()),
        ])
        .await;
        let notifier = TelegramNotifier::from_config(&config(&base), &HttpConfig::default()).unwrap();

        let postings = vec![
            Posting::new("A", "D1", "u1"),
            Posting::new("B", "D2", "u2"),
            Posting::new("C", "D3", "u3"),
        ];
        let err = notifier.notify(&postings).await.unwrap_err();
        assert!(err.to_string().contains("chat not found"));

        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 2);
    }

    #[tokio::test]
    async fn test_non_json_reply_is_notify_error() {
        let (base, _server) =
            test_server::serve(vec![(502, "<html>Bad Gateway</html>".to_string())]).await;
        let notifier = TelegramNotifier::from_config(&config(&base), &HttpConfig::default()).unwrap();

        let err = notifier
            .notify(&[Posting::new("A", "D1", "u1")])
            .await
            .unwrap_err();
        match err {
            AppError::Notify(message) => {
                assert!(message.contains("502"));
                assert!(message.contains("<html>Bad Gateway</html>"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_excerpt_shortens_long_replies() {
        assert_eq!(excerpt("  short\nsecond line"), "short");
        let long = "x".repeat(300);
        assert_eq!(excerpt(&long).chars().count(), 203);
    }
}
