//! 실시간 채널 모니터. 구독 스트림에서 메시지를 한 건씩 꺼내
//! 매칭 → 라우팅 → 싱크 전달을 수행한다.
//!
//! 메시지 단위 오류는 전부 핸들러 안에서 소화된다 — 구독 루프는
//! 전송 계층의 스트림 종료나 종료 신호로만 끝난다.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use futures::StreamExt;
use parking_lot::Mutex;

use crate::{
    config::KeywordConfig,
    domain::{Channel, ChannelEvent, MatchResult},
    infrastructure::{notifier::AlertSink, shutdown::ShutdownListener, track_log::TrackSink},
    matcher::match_keywords,
    router::Router,
    source::ChannelSource,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Connecting,
    Subscribed,
    Disconnected,
}

pub struct LiveMonitor {
    source: Arc<dyn ChannelSource>,
    channels: Vec<Channel>,
    keywords: KeywordConfig,
    router: Router,
    alerts: Arc<dyn AlertSink>,
    tracks: Arc<dyn TrackSink>,
    state: Mutex<MonitorState>,
}

impl LiveMonitor {
    pub fn new(
        source: Arc<dyn ChannelSource>,
        channels: Vec<Channel>,
        keywords: KeywordConfig,
        router: Router,
        alerts: Arc<dyn AlertSink>,
        tracks: Arc<dyn TrackSink>,
    ) -> Self {
        Self {
            source,
            channels,
            keywords,
            router,
            alerts,
            tracks,
            state: Mutex::new(MonitorState::Idle),
        }
    }

    pub fn state(&self) -> MonitorState {
        *self.state.lock()
    }

    fn set_state(&self, next: MonitorState) {
        *self.state.lock() = next;
    }

    /// 인증 실패만 치명적이다. 그 이후에는 스트림이 끝나거나
    /// 종료 신호가 올 때까지 돈다. 재연결은 하지 않는다.
    pub async fn run(&self, mut shutdown: ShutdownListener) -> Result<()> {
        let enabled: Vec<Channel> = self
            .channels
            .iter()
            .filter(|ch| ch.enabled)
            .cloned()
            .collect();
        if enabled.is_empty() {
            bail!("활성화된 채널이 없습니다");
        }

        self.set_state(MonitorState::Connecting);
        self.source
            .connect()
            .await
            .context("실시간 소스 인증 실패")?;

        let mut stream = self
            .source
            .subscribe(&enabled)
            .await
            .context("채널 구독 실패")?;
        self.set_state(MonitorState::Subscribed);

        tracing::info!(
            target: "monitor",
            channels = enabled.len(),
            alert_keywords = self.keywords.alert.len(),
            track_keywords = self.keywords.track.len(),
            "채널 모니터링 시작"
        );

        loop {
            tokio::select! {
                _ = shutdown.notified() => {
                    tracing::info!(target: "monitor", "종료 신호 수신, 구독을 중단합니다");
                    break;
                }
                next = stream.next() => match next {
                    Some(event) => self.handle_event(&event).await,
                    None => {
                        tracing::info!(target: "monitor", "이벤트 스트림이 종료되었습니다");
                        break;
                    }
                }
            }
        }

        self.set_state(MonitorState::Disconnected);
        self.source.disconnect().await;
        Ok(())
    }

    async fn handle_event(&self, event: &ChannelEvent) {
        let result = MatchResult {
            matched_alert: match_keywords(
                &event.text,
                &self.keywords.alert,
                self.keywords.case_sensitive,
            ),
            matched_track: match_keywords(
                &event.text,
                &self.keywords.track,
                self.keywords.case_sensitive,
            ),
        };
        if result.is_empty() {
            return;
        }

        let routed = self
            .router
            .route(&result, &event.channel, event.timestamp, &event.text);

        if let Some(alert) = routed.alert {
            match self.alerts.send(&alert).await {
                Ok(()) => tracing::info!(
                    target: "monitor",
                    channel = %event.channel,
                    keywords = ?result.matched_alert,
                    "🚨 알림 전달 완료"
                ),
                Err(err) => tracing::error!(
                    target: "monitor",
                    error = %err,
                    channel = %event.channel,
                    "알림 전송 실패"
                ),
            }
        }

        if let Some(record) = routed.track {
            match self.tracks.append(&record).await {
                Ok(()) => tracing::info!(
                    target: "monitor",
                    keywords = ?record.matched_track,
                    "트랙 로그 기록"
                ),
                Err(err) => tracing::error!(
                    target: "monitor",
                    error = %err,
                    channel = %event.channel,
                    "트랙 로그 기록 실패"
                ),
            }
        }
    }
}
