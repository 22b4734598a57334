use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::config::AppConfig;

#[derive(Debug, Clone)]
pub struct ResolvedPaths {
    pub logs_dir: PathBuf,
    pub data_dir: PathBuf,
    /// 트랙 로그 파일 경로. 상대 경로는 데이터 디렉터리 기준으로 해석한다.
    pub track_file: PathBuf,
}

pub fn ensure_directories(config: &AppConfig) -> Result<ResolvedPaths> {
    let logs_dir = ensure_dir(&config.directories.logs_dir)?;
    let data_dir = ensure_dir(&config.directories.data_dir)?;

    let configured = Path::new(&config.monitor.log.track_file);
    let track_file = if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        data_dir.join(configured)
    };

    Ok(ResolvedPaths {
        logs_dir,
        data_dir,
        track_file,
    })
}

fn ensure_dir(path: &str) -> Result<PathBuf> {
    let dir = PathBuf::from(path);
    if !dir.exists() {
        fs::create_dir_all(&dir).with_context(|| format!("failed to create directory {path}"))?;
    }
    Ok(dir.canonicalize().unwrap_or(dir))
}
