use std::sync::Arc;

use anyhow::Result;
use chrono_tz::Tz;
use reqwest::Client;

use crate::{
    config::AppConfig,
    infrastructure::{
        directories::ResolvedPaths, instance_guard::InstanceGuard, notifier::TelegramNotifier,
        shutdown::Shutdown, track_log::TrackLogWriter,
    },
    monitor::{backlog, LiveMonitor},
    router::{Router, RoutingPolicy},
    source::{ChannelSource, TelegramBotSource},
};

pub struct MonitorApp {
    _guard: InstanceGuard,
    monitor: LiveMonitor,
    shutdown: Shutdown,
}

impl MonitorApp {
    pub fn initialize(config: AppConfig, paths: ResolvedPaths, shutdown: Shutdown) -> Result<Self> {
        let guard = InstanceGuard::acquire(&paths)?;
        let http = build_http_client()?;

        let source: Arc<dyn ChannelSource> = Arc::new(TelegramBotSource::new(
            http.clone(),
            config.monitor_bot_token.clone(),
            config.poll_timeout,
        ));
        let notifier = Arc::new(TelegramNotifier::new(
            http,
            config.target_bot_token.clone(),
            config.target_chat_id.clone(),
        ));
        let track_log = Arc::new(TrackLogWriter::new(paths.track_file.clone()));

        let router = Router::new(
            RoutingPolicy::from(&config.monitor.forward),
            parse_timezone(&config.timezone),
        );
        let monitor = LiveMonitor::new(
            source,
            config.monitor.channels.clone(),
            config.monitor.keywords.clone(),
            router,
            notifier,
            track_log,
        );

        Ok(Self {
            _guard: guard,
            monitor,
            shutdown,
        })
    }

    pub async fn run(self) -> Result<()> {
        tracing::info!("텔레그램 채널 모니터 시작");
        let result = self.monitor.run(self.shutdown.subscribe()).await;
        tracing::info!(state = ?self.monitor.state(), "채널 모니터 종료");
        result
    }
}

/// 일회성 배치 모드. 리포트만 출력하고 싱크에는 쓰지 않는다.
pub async fn run_backlog_scan(config: &AppConfig, days: i64, limit: usize) -> Result<()> {
    let http = build_http_client()?;
    let source = TelegramBotSource::new(
        http,
        config.monitor_bot_token.clone(),
        config.poll_timeout,
    );
    source.connect().await?;

    let hits = backlog::scan(
        &source,
        &config.monitor.channels,
        &config.monitor.keywords.watchlist,
        chrono::Duration::days(days),
        limit,
    )
    .await;
    backlog::print_report(&hits, &parse_timezone(&config.timezone));
    Ok(())
}

fn build_http_client() -> Result<Client> {
    Ok(Client::builder()
        .user_agent(format!("channel-monitor-rust/{}", env!("CARGO_PKG_VERSION")))
        .build()?)
}

fn parse_timezone(timezone: &str) -> Tz {
    timezone.parse().unwrap_or(chrono_tz::Asia::Seoul)
}
