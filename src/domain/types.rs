use serde::Serialize;

/// 한 메시지를 alert/track 키워드 집합과 대조한 결과.
/// 두 필드 모두 비어있으면 메시지는 무시된다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchResult {
    pub matched_alert: Vec<String>,
    pub matched_track: Vec<String>,
}

impl MatchResult {
    pub fn is_empty(&self) -> bool {
        self.matched_alert.is_empty() && self.matched_track.is_empty()
    }
}

/// 알림 봇으로 전달할 포맷 완료된 메시지.
#[derive(Debug, Clone)]
pub struct AlertPayload {
    pub channel: String,
    pub text: String,
}

/// 트랙 로그 파일에 한 줄로 기록되는 레코드.
/// `processed`는 항상 false로 기록되며 이 시스템은 이후 값을 바꾸지 않는다.
#[derive(Debug, Clone, Serialize)]
pub struct TrackRecord {
    pub timestamp: String,
    pub channel: String,
    pub matched_track: Vec<String>,
    pub message: String,
    pub processed: bool,
}
