use chrono::{DateTime, Utc};
use serde::Deserialize;

/// 모니터링 대상 채널. 설정 파일에서 읽어 프로세스 수명 동안 변하지 않는다.
#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Channel {
    /// `https://t.me/darthacking`, `t.me/darthacking`, `@darthacking` 형태에서
    /// 채널 사용자명을 뽑아낸다.
    pub fn username(&self) -> Option<&str> {
        let trimmed = self.url.trim().trim_end_matches('/');
        let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
        let name = last.trim_start_matches('@');
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// 구독 스트림 또는 히스토리 조회가 내놓는 메시지 한 건.
/// 매칭이 끝나면 버려지는 일시적 값이다.
#[derive(Debug, Clone)]
pub struct ChannelEvent {
    /// 채널 표시 이름 (제목 또는 사용자명).
    pub channel: String,
    pub timestamp: DateTime<Utc>,
    pub text: String,
}
