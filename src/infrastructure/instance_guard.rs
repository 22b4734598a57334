//! 프로세스당 구독 세션 하나라는 가정을 파일 잠금으로 강제한다.

use std::{
    env,
    fs::{self, File, OpenOptions},
    io::{ErrorKind, Seek, SeekFrom, Write},
    path::PathBuf,
    process,
};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::infrastructure::directories::ResolvedPaths;

const LOCK_FILENAME: &str = ".monitor.lock";

#[derive(Debug)]
pub struct InstanceGuard {
    lock: Option<(File, PathBuf)>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LockInfo {
    pid: u32,
    started_at: i64,
}

impl InstanceGuard {
    pub fn acquire(paths: &ResolvedPaths) -> Result<Self> {
        if skip_guard() {
            tracing::warn!(
                target: "lifecycle",
                "instance guard skipped because SKIP_INSTANCE_GUARD=1"
            );
            return Ok(Self { lock: None });
        }

        let lock_path = paths.data_dir.join(LOCK_FILENAME);
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&lock_path)
            .with_context(|| format!("failed to open lock file {}", lock_path.display()))?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                write_lock_info(&mut file, process::id())?;
                tracing::info!(
                    target: "lifecycle",
                    pid = process::id(),
                    path = %lock_path.display(),
                    "acquired monitor instance lock"
                );
                Ok(Self {
                    lock: Some((file, lock_path)),
                })
            }
            Err(err) if err.kind() == ErrorKind::WouldBlock => Err(anyhow!(
                "다른 모니터 인스턴스가 이미 실행 중입니다 ({})",
                lock_path.display()
            )),
            Err(err) => Err(err.into()),
        }
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        if let Some((file, path)) = self.lock.take() {
            let _ = fs2::FileExt::unlock(&file);
            if let Err(err) = fs::remove_file(&path) {
                if err.kind() != ErrorKind::NotFound {
                    tracing::warn!(
                        target: "lifecycle",
                        path = %path.display(),
                        error = %err,
                        "failed to remove lock file on shutdown"
                    );
                }
            }
        }
    }
}

fn write_lock_info(file: &mut File, pid: u32) -> Result<()> {
    let info = LockInfo {
        pid,
        started_at: Utc::now().timestamp_millis(),
    };
    let payload = serde_json::to_vec(&info)?;
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(&payload)?;
    file.sync_all()?;
    Ok(())
}

fn skip_guard() -> bool {
    matches!(
        env::var("SKIP_INSTANCE_GUARD")
            .ok()
            .map(|v| v.eq_ignore_ascii_case("1") || v.eq_ignore_ascii_case("true")),
        Some(true)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths_in(dir: &std::path::Path) -> ResolvedPaths {
        ResolvedPaths {
            logs_dir: dir.to_path_buf(),
            data_dir: dir.to_path_buf(),
            track_file: dir.join("track_log.jsonl"),
        }
    }

    #[test]
    fn second_acquire_fails_while_lock_held() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());

        let guard = InstanceGuard::acquire(&paths).unwrap();
        assert!(InstanceGuard::acquire(&paths).is_err());

        drop(guard);
        let reacquired = InstanceGuard::acquire(&paths).unwrap();
        drop(reacquired);
    }
}
