use std::time::Duration;

/// 将毫秒时间戳格式化为 HH:MM:SS.mmm（UTC）
pub fn format_timestamp(timestamp_ms: i64) -> String {
    if timestamp_ms < 0 {
        return format!("Invalid timestamp: {}", timestamp_ms);
    }

    let total_ms = timestamp_ms as u64;
    let seconds = total_ms / 1000;
    let ms = total_ms % 1000;

    let hours = (seconds / 3600) % 24;
    let minutes = (seconds / 60) % 60;
    let secs = seconds % 60;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, ms)
}

/// Playback clock display, `MM:SS`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{:02}:{:02}", total / 60, total % 60)
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// 读取环境变量，空值视为未设置
pub fn non_empty_env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
