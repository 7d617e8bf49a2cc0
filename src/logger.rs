use chrono::Local;
use env_logger::Builder;
use log::Level;
use std::io::Write;

const DEFAULT_FILTER: &str = "info";

/// 初始化日志：默认 info 级别，可通过 RUST_LOG 覆盖
pub fn init_logger() {
    init_logger_with(DEFAULT_FILTER);
}

pub fn init_logger_with(default_filter: &str) {
    let result = Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            let time = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            writeln!(
                buf,
                "{} {}{:<5}\x1b[0m [{}:{}] {}",
                time,
                level_color(record.level()),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args(),
            )
        })
        .try_init();

    if let Err(e) = result {
        eprintln!("Logger already initialised: {}", e);
    }
}

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1b[31m\x1b[1m", // 红色
        Level::Warn => "\x1b[33m\x1b[1m",  // 黄色
        Level::Info => "\x1b[32m\x1b[1m",  // 绿色
        Level::Debug => "\x1b[36m\x1b[1m", // 青色
        Level::Trace => "\x1b[90m\x1b[1m", // 灰色
    }
}
