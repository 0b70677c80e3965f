//! 日志初始化
//!
//! 库内部只使用 `tracing` 宏，是否输出由调用方决定。
//! 需要默认输出时调用 `init_logging`。

use crate::config::LoggingConfig;
use tracing::Level;

/// 解析日志级别字符串，大小写不敏感
pub fn parse_level(level: &str) -> Option<Level> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// 安装全局 fmt subscriber
///
/// 无法识别的级别按 info 处理。已存在全局 subscriber 时返回 `false`。
pub fn init_logging(config: &LoggingConfig) -> bool {
    let level = parse_level(&config.level).unwrap_or(Level::INFO);
    let installed = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("[TELEMETRY] 日志已初始化: level={}", level);
    }
    installed
}
