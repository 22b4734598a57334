//! 알림 싱크. 알림 한 건당 봇 API `sendMessage` 호출 한 번 — 배칭도 재시도도 없다.

use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::domain::AlertPayload;

#[async_trait]
pub trait AlertSink: Send + Sync {
    /// 전송 실패는 Err로 알리고 호출자는 로그만 남긴다 — 메시지는 재큐잉되지 않는다.
    async fn send(&self, payload: &AlertPayload) -> Result<()>;
}

pub struct TelegramNotifier {
    http: Client,
    bot_token: Option<String>,
    chat_id: Option<String>,
}

impl TelegramNotifier {
    pub fn new(http: Client, bot_token: Option<String>, chat_id: Option<String>) -> Self {
        Self {
            http,
            bot_token,
            chat_id,
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

fn build_send_request<'a>(chat_id: &'a str, text: &'a str) -> SendMessageRequest<'a> {
    SendMessageRequest {
        chat_id,
        text,
        parse_mode: "HTML",
        disable_web_page_preview: true,
    }
}

#[async_trait]
impl AlertSink for TelegramNotifier {
    async fn send(&self, payload: &AlertPayload) -> Result<()> {
        let (Some(token), Some(chat_id)) = (self.bot_token.as_deref(), self.chat_id.as_deref())
        else {
            bail!("TARGET_BOT_TOKEN 또는 TARGET_CHAT_ID가 설정되지 않았습니다");
        };

        let url = format!("https://api.telegram.org/bot{token}/sendMessage");
        self.http
            .post(url)
            .json(&build_send_request(chat_id, &payload.text))
            .send()
            .await?
            .error_for_status()?;

        tracing::info!(target: "notifier", channel = %payload.channel, "알림 전송 완료");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_without_credentials_fails() {
        let notifier = TelegramNotifier::new(Client::new(), None, None);
        let payload = AlertPayload {
            channel: "공시채널".to_string(),
            text: "본문".to_string(),
        };
        assert!(notifier.send(&payload).await.is_err());
    }

    #[test]
    fn request_body_carries_format_hint() {
        let body = serde_json::to_value(build_send_request("-100123", "공시 <b>알림</b>")).unwrap();
        assert_eq!(body["chat_id"], "-100123");
        assert_eq!(body["parse_mode"], "HTML");
        assert_eq!(body["disable_web_page_preview"], true);
    }
}
