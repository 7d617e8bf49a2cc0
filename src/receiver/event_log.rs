use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::types::Action;

/// Append-only text logs written by the control receiver.
#[derive(Debug, Clone)]
pub struct EventLog {
    events_path: PathBuf,
    performance_path: PathBuf,
}

impl EventLog {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(events_path: P, performance_path: Q) -> Self {
        Self {
            events_path: events_path.as_ref().to_path_buf(),
            performance_path: performance_path.as_ref().to_path_buf(),
        }
    }

    pub fn events_path(&self) -> &Path {
        &self.events_path
    }

    pub fn performance_path(&self) -> &Path {
        &self.performance_path
    }

    pub async fn record_event(&self, action: Action, peer: IpAddr) -> std::io::Result<()> {
        append_line(&self.events_path, &event_line(action, peer, Local::now())).await
    }

    /// 会话结束时记录总步数与播放时长
    pub async fn record_performance(&self, steps: u64, elapsed: Duration) -> std::io::Result<()> {
        append_line(
            &self.performance_path,
            &performance_line(steps, elapsed, Local::now()),
        )
        .await
    }
}

pub fn event_line(action: Action, peer: IpAddr, at: DateTime<Local>) -> String {
    format!("{},{},{}", action, peer, at.format("%Y-%m-%d-%H:%M:%S"))
}

pub fn performance_line(steps: u64, elapsed: Duration, at: DateTime<Local>) -> String {
    format!(
        "Steps: {}, Elapsed Time: {:.2} seconds, Timestamp: {}",
        steps,
        elapsed.as_secs_f64(),
        at.format("%Y-%m-%d-%H-%M-%S")
    )
}

async fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.write_all(b"\n").await?;
    file.flush().await
}
