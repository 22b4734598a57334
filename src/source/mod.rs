//! 실시간 메시지 소스와의 경계. 구체 전송 계층은 이 트레이트 뒤에 숨는다.

pub mod telegram;

use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

use crate::domain::{Channel, ChannelEvent};

pub use telegram::TelegramBotSource;

pub type EventStream = BoxStream<'static, ChannelEvent>;
pub type HistoryStream = BoxStream<'static, Result<ChannelEvent, SourceError>>;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("소스 인증 실패: {0}")]
    Auth(String),
    #[error("전송 오류: {0}")]
    Transport(String),
    #[error("이 소스는 채널 히스토리 조회를 지원하지 않습니다")]
    HistoryUnsupported,
}

/// 외부 실시간 채널 제공자가 구현해야 하는 인터페이스.
///
/// - `connect`: 인증. 실패는 프로세스 시작 단계에서만 치명적이다.
/// - `subscribe`: 주어진 채널들의 라이브 이벤트 스트림. 채널 내 도착 순서를 보존한다.
/// - `history`: 채널 하나의 과거 메시지를 최신순으로, 최대 `limit`건까지 내놓는다.
#[async_trait]
pub trait ChannelSource: Send + Sync {
    async fn connect(&self) -> Result<(), SourceError>;

    async fn subscribe(&self, channels: &[Channel]) -> Result<EventStream, SourceError>;

    async fn history(&self, channel: &Channel, limit: usize)
        -> Result<HistoryStream, SourceError>;

    async fn disconnect(&self) {}
}
