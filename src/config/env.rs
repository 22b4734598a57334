use std::time::Duration;

use thiserror::Error;

use super::monitor::MonitorConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 채널 업데이트를 수신하는 모니터링 봇 토큰.
    pub monitor_bot_token: String,
    /// 알림을 전달받을 봇 토큰. 비어있으면 알림 전송이 비활성화된다.
    pub target_bot_token: Option<String>,
    pub target_chat_id: Option<String>,
    pub monitor: MonitorConfig,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
    pub timezone: String,
    pub poll_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
    pub data_dir: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("failed to read monitor config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse monitor config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
