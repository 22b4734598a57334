mod app;
mod config;
mod domain;
mod infrastructure;
mod matcher;
mod monitor;
mod router;
mod source;

use anyhow::{bail, Result};
use infrastructure::{directories, logging, shutdown};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config)?;
    logging::init_tracing(&config, &paths)?;

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("scan") => {
            let days = args
                .next()
                .and_then(|value| value.parse::<i64>().ok())
                .unwrap_or(14);
            app::run_backlog_scan(&config, days, 1000).await
        }
        Some(other) => {
            bail!("알 수 없는 실행 모드: {other} (사용법: channel-monitor-rust [scan [days]])")
        }
        None => {
            let (shutdown, _) = shutdown::Shutdown::new();
            shutdown::install_signal_handlers(shutdown.clone());

            let app = app::MonitorApp::initialize(config, paths, shutdown.clone())?;
            app.run().await
        }
    }
}
