//! 텔레그램 봇 API(`getUpdates` 롱폴링) 기반 채널 소스.
//!
//! 모니터링 봇이 관리자로 들어가 있는 채널의 `channel_post` 업데이트를 수신한다.
//! 봇 API에는 히스토리 조회가 없으므로 `history`는 지원하지 않는다 —
//! 백로그 스캔에는 히스토리를 제공하는 별도 세션 소스가 필요하다.

use std::{
    collections::{HashSet, VecDeque},
    time::Duration,
};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use futures::{stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use crate::domain::{Channel, ChannelEvent};

use super::{ChannelSource, EventStream, HistoryStream, SourceError};

const API_BASE: &str = "https://api.telegram.org";
const RETRY_DELAY: Duration = Duration::from_secs(5);

pub struct TelegramBotSource {
    http: Client,
    token: String,
    poll_timeout: Duration,
}

impl TelegramBotSource {
    pub fn new(http: Client, token: String, poll_timeout: Duration) -> Self {
        Self {
            http,
            token,
            poll_timeout,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{API_BASE}/bot{}/{method}", self.token)
    }
}

#[async_trait]
impl ChannelSource for TelegramBotSource {
    async fn connect(&self) -> Result<(), SourceError> {
        let response = self
            .http
            .get(self.method_url("getMe"))
            .send()
            .await
            .map_err(|err| SourceError::Auth(err.to_string()))?;
        let envelope: ApiEnvelope<serde_json::Value> = response
            .json()
            .await
            .map_err(|err| SourceError::Auth(err.to_string()))?;
        if !envelope.ok {
            return Err(SourceError::Auth(
                envelope
                    .description
                    .unwrap_or_else(|| "getMe 요청이 거부되었습니다".to_string()),
            ));
        }
        Ok(())
    }

    async fn subscribe(&self, channels: &[Channel]) -> Result<EventStream, SourceError> {
        let allowed: HashSet<String> = channels
            .iter()
            .filter_map(Channel::username)
            .map(str::to_lowercase)
            .collect();
        if allowed.is_empty() {
            return Err(SourceError::Transport(
                "구독할 채널 사용자명이 없습니다".to_string(),
            ));
        }

        let http = self.http.clone();
        let url = self.method_url("getUpdates");
        let poll_timeout = self.poll_timeout;

        let state = PollState {
            offset: 0,
            pending: VecDeque::new(),
        };
        let stream = stream::unfold(state, move |mut state| {
            let http = http.clone();
            let url = url.clone();
            let allowed = allowed.clone();
            async move {
                loop {
                    if let Some(event) = state.pending.pop_front() {
                        return Some((event, state));
                    }
                    match fetch_updates(&http, &url, state.offset, poll_timeout).await {
                        Ok(updates) => {
                            for update in updates {
                                state.offset = state.offset.max(update.update_id + 1);
                                if let Some(event) = event_from_update(update, &allowed) {
                                    state.pending.push_back(event);
                                }
                            }
                        }
                        Err(err) => {
                            tracing::warn!(
                                target: "source",
                                error = %err,
                                "getUpdates 실패, {}초 후 재시도",
                                RETRY_DELAY.as_secs()
                            );
                            sleep(RETRY_DELAY).await;
                        }
                    }
                }
            }
        })
        .boxed();

        Ok(stream)
    }

    async fn history(
        &self,
        _channel: &Channel,
        _limit: usize,
    ) -> Result<HistoryStream, SourceError> {
        Err(SourceError::HistoryUnsupported)
    }
}

struct PollState {
    offset: i64,
    pending: VecDeque<ChannelEvent>,
}

#[derive(Debug, Serialize)]
struct GetUpdatesRequest {
    offset: i64,
    timeout: u64,
    allowed_updates: [&'static str; 1],
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    #[serde(default)]
    channel_post: Option<ChannelPost>,
}

#[derive(Debug, Deserialize)]
struct ChannelPost {
    date: i64,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    caption: Option<String>,
    chat: PostChat,
}

#[derive(Debug, Deserialize)]
struct PostChat {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

async fn fetch_updates(
    http: &Client,
    url: &str,
    offset: i64,
    poll_timeout: Duration,
) -> Result<Vec<Update>, SourceError> {
    let request = GetUpdatesRequest {
        offset,
        timeout: poll_timeout.as_secs(),
        allowed_updates: ["channel_post"],
    };
    let response = http
        .post(url)
        .timeout(poll_timeout + Duration::from_secs(10))
        .json(&request)
        .send()
        .await
        .map_err(|err| SourceError::Transport(err.to_string()))?;
    let envelope: ApiEnvelope<Vec<Update>> = response
        .json()
        .await
        .map_err(|err| SourceError::Transport(err.to_string()))?;
    if !envelope.ok {
        return Err(SourceError::Transport(envelope.description.unwrap_or_else(
            || "getUpdates 응답이 실패로 표시되었습니다".to_string(),
        )));
    }
    Ok(envelope.result.unwrap_or_default())
}

fn event_from_update(update: Update, allowed: &HashSet<String>) -> Option<ChannelEvent> {
    let post = update.channel_post?;
    let username = post.chat.username.as_deref()?.to_lowercase();
    if !allowed.contains(&username) {
        return None;
    }
    let timestamp = Utc.timestamp_opt(post.date, 0).single()?;
    let text = post.text.or(post.caption).unwrap_or_default();
    let channel = post
        .chat
        .title
        .or(post.chat.username)
        .unwrap_or_else(|| "Unknown".to_string());
    Some(ChannelEvent {
        channel,
        timestamp,
        text,
    })
}
