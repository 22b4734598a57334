//! 매칭 결과를 알림/트랙 페이로드로 변환하는 순수 라우팅 단계.
//! 실제 전송과 기록은 `infrastructure`의 싱크가 맡는다.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::{
    config::ForwardConfig,
    domain::{AlertPayload, MatchResult, TrackRecord},
};

/// 전송 직전에 적용되는 고정 절단 길이 (문자 수 기준).
const ALERT_BODY_MAX_WITH_HEADER: usize = 3800;
const ALERT_BODY_MAX: usize = 4000;
const TRACK_MESSAGE_MAX: usize = 2000;

#[derive(Debug, Clone, Copy)]
pub struct RoutingPolicy {
    pub alert_to_notifier: bool,
    pub track_to_log: bool,
    pub include_source_name: bool,
}

impl From<&ForwardConfig> for RoutingPolicy {
    fn from(forward: &ForwardConfig) -> Self {
        Self {
            alert_to_notifier: forward.alert_to_telegram,
            track_to_log: forward.track_to_log,
            include_source_name: forward.include_channel_name,
        }
    }
}

/// 한 메시지가 만들어낼 수 있는 최대 두 개의 라우팅 산출물.
#[derive(Debug, Clone, Default)]
pub struct RoutedOutput {
    pub alert: Option<AlertPayload>,
    pub track: Option<TrackRecord>,
}

pub struct Router {
    policy: RoutingPolicy,
    timezone: Tz,
}

impl Router {
    pub fn new(policy: RoutingPolicy, timezone: Tz) -> Self {
        Self { policy, timezone }
    }

    /// alert/track 두 분기는 서로 독립이며 같은 메시지에서 동시에 발화할 수 있다.
    /// 둘 다 비어있으면 아무것도 만들지 않는다.
    pub fn route(
        &self,
        result: &MatchResult,
        channel: &str,
        timestamp: DateTime<Utc>,
        text: &str,
    ) -> RoutedOutput {
        let mut output = RoutedOutput::default();
        if result.is_empty() {
            return output;
        }

        let stamp = timestamp
            .with_timezone(&self.timezone)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        if !result.matched_alert.is_empty() && self.policy.alert_to_notifier {
            let mut body = if self.policy.include_source_name {
                format!(
                    "🚨 <b>[{channel}]</b>\n⏰ {stamp}\n\n{}",
                    truncate_chars(text, ALERT_BODY_MAX_WITH_HEADER)
                )
            } else {
                truncate_chars(text, ALERT_BODY_MAX).to_string()
            };
            body.push_str(&format!("\n\n🔍 매칭: {}", result.matched_alert.join(", ")));
            output.alert = Some(AlertPayload {
                channel: channel.to_string(),
                text: body,
            });
        }

        if !result.matched_track.is_empty() && self.policy.track_to_log {
            output.track = Some(TrackRecord {
                timestamp: stamp,
                channel: channel.to_string(),
                matched_track: result.matched_track.clone(),
                message: truncate_chars(text, TRACK_MESSAGE_MAX).to_string(),
                processed: false,
            });
        }

        output
    }
}

/// 문자 단위 절단. UTF-8 경계를 깨지 않는다.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn policy_all_on() -> RoutingPolicy {
        RoutingPolicy {
            alert_to_notifier: true,
            track_to_log: true,
            include_source_name: true,
        }
    }

    fn router(policy: RoutingPolicy) -> Router {
        Router::new(policy, chrono_tz::Asia::Seoul)
    }

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 24, 1, 30, 0).unwrap()
    }

    #[test]
    fn empty_result_produces_nothing() {
        let out = router(policy_all_on()).route(&MatchResult::default(), "공시채널", ts(), "본문");
        assert!(out.alert.is_none());
        assert!(out.track.is_none());
    }

    #[test]
    fn alert_only_produces_exactly_one_notifier_payload() {
        let result = MatchResult {
            matched_alert: vec!["공시".to_string()],
            matched_track: vec![],
        };
        let out = router(policy_all_on()).route(&result, "공시채널", ts(), "공시 본문");
        assert!(out.alert.is_some());
        assert!(out.track.is_none());
    }

    #[test]
    fn keyword_in_both_sets_fires_both_branches() {
        let result = MatchResult {
            matched_alert: vec!["공시".to_string()],
            matched_track: vec!["공시".to_string()],
        };
        let out = router(policy_all_on()).route(&result, "공시채널", ts(), "오늘 공시 발표");
        let alert = out.alert.expect("alert payload");
        let track = out.track.expect("track record");
        assert!(alert.text.contains("공시채널"));
        assert_eq!(track.matched_track, vec!["공시"]);
        assert!(!track.processed);
    }

    #[test]
    fn policy_gates_each_branch_independently() {
        let result = MatchResult {
            matched_alert: vec!["공시".to_string()],
            matched_track: vec!["공시".to_string()],
        };
        let out = router(RoutingPolicy {
            alert_to_notifier: false,
            track_to_log: true,
            include_source_name: true,
        })
        .route(&result, "공시채널", ts(), "본문");
        assert!(out.alert.is_none());
        assert!(out.track.is_some());

        let out = router(RoutingPolicy {
            alert_to_notifier: true,
            track_to_log: false,
            include_source_name: true,
        })
        .route(&result, "공시채널", ts(), "본문");
        assert!(out.alert.is_some());
        assert!(out.track.is_none());
    }

    #[test]
    fn long_body_is_truncated_but_keywords_survive_in_full() {
        let result = MatchResult {
            matched_alert: vec!["유상증자".to_string(), "공시".to_string()],
            matched_track: vec!["유상증자".to_string()],
        };
        let body = "공".repeat(5000);
        let out = router(policy_all_on()).route(&result, "공시채널", ts(), &body);

        let alert = out.alert.expect("alert payload");
        assert!(alert.text.chars().count() < 5000);
        assert!(alert.text.ends_with("🔍 매칭: 유상증자, 공시"));

        let track = out.track.expect("track record");
        assert_eq!(track.message.chars().count(), 2000);
        assert_eq!(track.matched_track, vec!["유상증자"]);
    }

    #[test]
    fn header_omitted_when_source_name_disabled() {
        let result = MatchResult {
            matched_alert: vec!["공시".to_string()],
            matched_track: vec![],
        };
        let out = router(RoutingPolicy {
            alert_to_notifier: true,
            track_to_log: true,
            include_source_name: false,
        })
        .route(&result, "공시채널", ts(), "본문");
        let alert = out.alert.expect("alert payload");
        assert!(!alert.text.contains("공시채널"));
        assert!(alert.text.starts_with("본문"));
    }

    #[test]
    fn truncate_chars_respects_utf8_boundaries() {
        let text = "한글텍스트";
        assert_eq!(truncate_chars(text, 2), "한글");
        assert_eq!(truncate_chars(text, 10), text);
    }
}
