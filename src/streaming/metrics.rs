//! 流式传输指标
//!
//! 记录单次翻译调用的 chunk 数、字节数、首字节时间和跳过的无效行数，
//! 调用结束时输出一条汇总日志。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// 流式传输指标
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamMetrics {
    /// 首字节时间（毫秒），从请求开始到收到第一个 chunk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttfb_ms: Option<u64>,

    /// chunk 数量
    pub chunk_count: u32,

    /// 总字节数
    pub total_bytes: usize,

    /// 输出字符数（累积的增量内容）
    pub output_chars: usize,

    pub start_time: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_chunk_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_chunk_time: Option<DateTime<Utc>>,

    /// 跳过的无法解析的事件行数
    pub parse_error_count: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_chunk_size: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_chunk_size: Option<usize>,
}

impl Default for StreamMetrics {
    fn default() -> Self {
        Self {
            ttfb_ms: None,
            chunk_count: 0,
            total_bytes: 0,
            output_chars: 0,
            start_time: Utc::now(),
            end_time: None,
            first_chunk_time: None,
            last_chunk_time: None,
            parse_error_count: 0,
            min_chunk_size: None,
            max_chunk_size: None,
        }
    }
}

impl StreamMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录收到一个 chunk，第一个 chunk 同时计算 TTFB
    pub fn record_chunk(&mut self, bytes: usize) {
        let now = Utc::now();
        if self.first_chunk_time.is_none() {
            self.first_chunk_time = Some(now);
            self.ttfb_ms = Some((now - self.start_time).num_milliseconds().max(0) as u64);
        }

        self.chunk_count += 1;
        self.total_bytes += bytes;
        self.last_chunk_time = Some(now);

        self.min_chunk_size = Some(self.min_chunk_size.map_or(bytes, |min| min.min(bytes)));
        self.max_chunk_size = Some(self.max_chunk_size.map_or(bytes, |max| max.max(bytes)));
    }

    pub fn record_output(&mut self, chars: usize) {
        self.output_chars += chars;
    }

    pub fn set_parse_error_count(&mut self, count: u32) {
        self.parse_error_count = count;
    }

    /// 标记结束
    pub fn finish(&mut self) {
        self.end_time = Some(Utc::now());
    }

    /// 总耗时（毫秒），未结束时按当前时间计算
    pub fn duration_ms(&self) -> u64 {
        let end = self.end_time.unwrap_or_else(Utc::now);
        (end - self.start_time).num_milliseconds().max(0) as u64
    }

    pub fn avg_chunk_size(&self) -> f64 {
        if self.chunk_count == 0 {
            0.0
        } else {
            self.total_bytes as f64 / self.chunk_count as f64
        }
    }

    /// 输出汇总日志
    pub fn log_summary(&self, model: &str) {
        info!(
            "[TRANSLATE] 流式传输结束: model={} chunks={} bytes={} output_chars={} ttfb_ms={:?} duration_ms={} parse_errors={}",
            model,
            self.chunk_count,
            self.total_bytes,
            self.output_chars,
            self.ttfb_ms,
            self.duration_ms(),
            self.parse_error_count
        );
    }
}
