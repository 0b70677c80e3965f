//! OpenAI SSE 增量内容解析
//!
//! 按行处理 `data: ` 事件，提取 `choices[0].delta.content`。
//! 跨 chunk 的半行会保留到下一个 chunk，`[DONE]` 与无法解析的行被跳过。

use crate::models::openai::ChatCompletionChunk;
use tracing::debug;

/// SSE 数据行前缀
pub const SSE_DATA_PREFIX: &str = "data: ";
/// 流结束标记
pub const SSE_DONE_SENTINEL: &str = "[DONE]";

/// SSE 增量解析器
#[derive(Debug, Default)]
pub struct SseDeltaParser {
    /// 尚未遇到换行的半行
    line_buffer: String,
    /// 跳过的无效行数
    parse_error_count: u32,
    /// 已处理的事件行数（不含 `[DONE]`）
    event_count: u32,
    /// 是否收到 `[DONE]`
    done: bool,
    /// 最近一次出现的 `finish_reason`
    finish_reason: Option<String>,
}

impl SseDeltaParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// 处理一段已解码文本，返回其中所有完整行的增量内容拼接结果
    pub fn feed(&mut self, text: &str) -> String {
        self.line_buffer.push_str(text);

        let Some(last_newline) = self.line_buffer.rfind('\n') else {
            return String::new();
        };

        let remainder = self.line_buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.line_buffer, remainder);

        let mut deltas = String::new();
        for line in complete.lines() {
            if let Some(delta) = self.process_line(line) {
                deltas.push_str(&delta);
            }
        }
        deltas
    }

    /// 流结束时处理残留的最后一行（没有换行结尾的情况）
    pub fn finish(&mut self) -> String {
        let line = std::mem::take(&mut self.line_buffer);
        self.process_line(&line).unwrap_or_default()
    }

    fn process_line(&mut self, line: &str) -> Option<String> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let payload = line.strip_prefix(SSE_DATA_PREFIX)?.trim();

        if payload == SSE_DONE_SENTINEL {
            self.done = true;
            return None;
        }

        self.event_count += 1;
        match serde_json::from_str::<ChatCompletionChunk>(payload) {
            Ok(chunk) => {
                if let Some(reason) = chunk.finish_reason() {
                    self.finish_reason = Some(reason.to_string());
                }
                Some(chunk.delta_content().to_string())
            }
            Err(e) => {
                self.parse_error_count += 1;
                debug!("[SSE] 跳过无法解析的事件行: {} ({})", payload, e);
                None
            }
        }
    }

    pub fn parse_error_count(&self) -> u32 {
        self.parse_error_count
    }

    pub fn event_count(&self) -> u32 {
        self.event_count
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// 模型给出的结束原因，如 `stop` / `length`
    pub fn finish_reason(&self) -> Option<&str> {
        self.finish_reason.as_deref()
    }
}
