use std::{env, fs, time::Duration};

use super::env::{AppConfig, ConfigError, DirectoryConfig, LoggingConfig};
use super::monitor::MonitorConfig;

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let monitor_bot_token = env::var("MONITOR_BOT_TOKEN")
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("MONITOR_BOT_TOKEN"))?;

        let target_bot_token = env::var("TARGET_BOT_TOKEN").ok().filter(|v| !v.is_empty());
        let target_chat_id = env::var("TARGET_CHAT_ID").ok().filter(|v| !v.is_empty());

        let config_path = env::var("MONITOR_CONFIG").unwrap_or_else(|_| "config.json".to_string());
        let monitor = load_monitor_config(&config_path)?;

        let directories = DirectoryConfig {
            logs_dir: env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        let timezone = env::var("BOT_TIMEZONE").unwrap_or_else(|_| "Asia/Seoul".to_string());

        let poll_timeout = Duration::from_secs(
            env::var("POLL_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        );

        Ok(Self {
            monitor_bot_token,
            target_bot_token,
            target_chat_id,
            monitor,
            directories,
            logging,
            timezone,
            poll_timeout,
        })
    }
}

fn load_monitor_config(path: &str) -> Result<MonitorConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;
    let mut config: MonitorConfig =
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
    config.keywords.normalize();
    Ok(config)
}
