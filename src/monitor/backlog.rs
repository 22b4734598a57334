//! 백로그 스캐너. 채널별 과거 메시지를 최신순으로 훑어
//! `watchlist` 키워드 매칭 리포트를 만든다. 싱크에는 아무것도 쓰지 않는다.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use futures::StreamExt;

use crate::{
    domain::Channel, matcher::match_keywords, router::truncate_chars, source::ChannelSource,
};

/// 리포트에 싣는 본문 절단 길이 (문자 수).
const SCAN_TEXT_MAX: usize = 500;

#[derive(Debug, Clone)]
pub struct ScanHit {
    pub date: DateTime<Utc>,
    pub text: String,
    pub keywords: Vec<String>,
}

/// 채널마다 최신 메시지부터 거슬러 올라가며, `now - since`보다 오래된
/// 메시지를 처음 만나는 순간 혹은 `limit`건을 넘는 순간 그 채널을 끝낸다.
/// 채널 단위 실패는 로그만 남기고 건너뛴다. 결과는 시각 내림차순.
pub async fn scan(
    source: &dyn ChannelSource,
    channels: &[Channel],
    watchlist: &[String],
    since: Duration,
    limit: usize,
) -> Vec<ScanHit> {
    let cutoff = Utc::now() - since;
    let mut hits = Vec::new();

    for channel in channels.iter().filter(|ch| ch.enabled) {
        tracing::info!(target: "backlog", channel = %channel.url, "채널 히스토리 검색");

        let mut stream = match source.history(channel, limit).await {
            Ok(stream) => stream,
            Err(err) => {
                tracing::warn!(
                    target: "backlog",
                    channel = %channel.url,
                    error = %err,
                    "채널 히스토리 조회 실패, 건너뜁니다"
                );
                continue;
            }
        };

        let mut seen = 0usize;
        while let Some(item) = stream.next().await {
            let event = match item {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!(
                        target: "backlog",
                        channel = %channel.url,
                        error = %err,
                        "히스토리 읽기 오류, 채널을 중단합니다"
                    );
                    break;
                }
            };

            if event.timestamp < cutoff {
                break;
            }

            let matched = match_keywords(&event.text, watchlist, false);
            if !matched.is_empty() {
                hits.push(ScanHit {
                    date: event.timestamp,
                    text: truncate_chars(&event.text, SCAN_TEXT_MAX).to_string(),
                    keywords: matched,
                });
            }

            seen += 1;
            if seen >= limit {
                break;
            }
        }
    }

    hits.sort_by(|a, b| b.date.cmp(&a.date));
    hits
}

pub fn print_report(hits: &[ScanHit], timezone: &Tz) {
    println!("\n{}", "=".repeat(60));
    println!("📊 매칭된 메시지: {}개", hits.len());
    println!("{}\n", "=".repeat(60));

    for hit in hits {
        let local = hit.date.with_timezone(timezone);
        println!("📅 {}", local.format("%Y-%m-%d %H:%M"));
        let shown: Vec<&str> = hit.keywords.iter().take(5).map(String::as_str).collect();
        println!("🔍 키워드: {}", shown.join(", "));
        println!("📝 {}...", truncate_chars(&hit.text, 200));
        println!("{}", "-".repeat(40));
    }
}
