//! 进度估算
//!
//! 以“约 4 个字符 1 个 token”粗略估算输出 token 与输入 token 的比例。
//! 结果只供参考：译文长度和原文差别较大时可能提前到 100，也可能到结束都不到 100。

const CHARS_PER_TOKEN: f64 = 4.0;

/// 计算进度百分比，结果在 [0, 100]
pub fn estimate_progress(output_chars: usize, source_chars: usize) -> u8 {
    let source_tokens = source_chars as f64 / CHARS_PER_TOKEN;
    let output_tokens = output_chars as f64 / CHARS_PER_TOKEN;

    if source_tokens <= 0.0 {
        return if output_chars > 0 { 100 } else { 0 };
    }

    (100.0 * output_tokens / source_tokens).min(100.0).round() as u8
}

/// 单次调用内的进度估算器
#[derive(Debug, Clone)]
pub struct ProgressEstimator {
    source_chars: usize,
    output_chars: usize,
}

impl ProgressEstimator {
    pub fn new(source_text: &str) -> Self {
        Self {
            source_chars: source_text.chars().count(),
            output_chars: 0,
        }
    }

    /// 追加一段输出并返回最新进度
    pub fn advance(&mut self, delta: &str) -> u8 {
        self.output_chars += delta.chars().count();
        self.current()
    }

    pub fn current(&self) -> u8 {
        estimate_progress(self.output_chars, self.source_chars)
    }

    pub fn output_chars(&self) -> usize {
        self.output_chars
    }
}
