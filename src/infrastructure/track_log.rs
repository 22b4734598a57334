//! 트랙 키워드 매칭 레코드의 영속화. JSONL 파일에 한 호출당 한 줄을 덧붙인다.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::domain::TrackRecord;

#[async_trait]
pub trait TrackSink: Send + Sync {
    /// 실패한 레코드는 버려진다 — 버퍼링도 재시도도 없다.
    async fn append(&self, record: &TrackRecord) -> Result<()>;
}

pub struct TrackLogWriter {
    path: PathBuf,
}

impl TrackLogWriter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl TrackSink for TrackLogWriter {
    async fn append(&self, record: &TrackRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        // 호출마다 열고 닫는다. 레코드 하나가 write 한 번이므로 줄 단위로 원자적이다.
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("failed to open track log {}", self.path.display()))?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: usize) -> TrackRecord {
        TrackRecord {
            timestamp: "2026-08-24 10:30:00".to_string(),
            channel: "공시채널".to_string(),
            matched_track: vec!["공시".to_string()],
            message: format!("메시지 {n}"),
            processed: false,
        }
    }

    #[tokio::test]
    async fn appends_one_json_line_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("track_log.jsonl");
        let writer = TrackLogWriter::new(path.clone());

        for n in 0..3 {
            writer.append(&record(n)).await.unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["processed"], false);
            assert_eq!(value["channel"], "공시채널");
            assert_eq!(value["matched_track"][0], "공시");
        }
    }

    #[tokio::test]
    async fn append_to_unwritable_path_fails_without_panicking() {
        let writer = TrackLogWriter::new(PathBuf::from("/nonexistent-dir/track.jsonl"));
        assert!(writer.append(&record(0)).await.is_err());
    }
}
