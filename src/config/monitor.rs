use std::collections::HashSet;

use serde::Deserialize;

use crate::domain::Channel;

/// `config.json`에 정의된 모니터링 대상과 라우팅 정책.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub keywords: KeywordConfig,
    #[serde(default)]
    pub forward: ForwardConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// 키워드 유니버스 3종. `alert`/`track`은 실시간 모니터가,
/// `watchlist`는 백로그 스캐너가 사용하며 서로 합쳐지지 않는다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordConfig {
    #[serde(default)]
    pub alert: Vec<String>,
    #[serde(default)]
    pub track: Vec<String>,
    #[serde(default)]
    pub watchlist: Vec<String>,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl KeywordConfig {
    /// 선언 순서를 유지한 채 빈 문자열과 중복을 제거한다.
    pub fn normalize(&mut self) {
        dedup_keywords(&mut self.alert);
        dedup_keywords(&mut self.track);
        dedup_keywords(&mut self.watchlist);
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForwardConfig {
    #[serde(default = "default_true")]
    pub alert_to_telegram: bool,
    #[serde(default = "default_true")]
    pub track_to_log: bool,
    #[serde(default = "default_true")]
    pub include_channel_name: bool,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            alert_to_telegram: true,
            track_to_log: true,
            include_channel_name: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_track_file")]
    pub track_file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            track_file: default_track_file(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_track_file() -> String {
    "track_log.jsonl".to_string()
}

fn dedup_keywords(list: &mut Vec<String>) {
    let mut seen = HashSet::new();
    list.retain(|keyword| !keyword.is_empty() && seen.insert(keyword.clone()));
}
