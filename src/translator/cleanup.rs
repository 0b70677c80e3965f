//! 结果清理与 JSON 校验

use once_cell::sync::Lazy;
use regex::Regex;

/// ```json / ``` 标记，连同紧跟的换行
static CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```(?:json)?\n?").unwrap());

/// 去掉所有 markdown 代码块标记并去除首尾空白
pub fn strip_code_fences(raw: &str) -> String {
    CODE_FENCE.replace_all(raw, "").trim().to_string()
}

/// 解析清理后的内容，并以 2 空格缩进重新序列化
///
/// 键的顺序与模型输出保持一致。
pub fn normalize_json(cleaned: &str) -> Result<String, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(cleaned)?;
    serde_json::to_string_pretty(&value)
}

/// 清理 + 校验
pub fn finalize_output(raw: &str) -> Result<String, serde_json::Error> {
    normalize_json(&strip_code_fences(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fence() {
        assert_eq!(
            strip_code_fences("```json\n{\"a\":\"b\"}\n```"),
            "{\"a\":\"b\"}"
        );
    }

    #[test]
    fn test_strip_plain_fence_and_whitespace() {
        assert_eq!(strip_code_fences("  \n```\n[1, 2]\n```\n  "), "[1, 2]");
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_finalize_fenced_output() {
        let out = finalize_output("```json\n{\"a\":\"b\"}\n```").unwrap();
        assert_eq!(out, "{\n  \"a\": \"b\"\n}");
    }

    #[test]
    fn test_finalize_preserves_key_order() {
        let out = finalize_output(r#"{"zeta":"z","alpha":{"b":1,"a":[true,null]}}"#).unwrap();
        assert_eq!(
            out,
            "{\n  \"zeta\": \"z\",\n  \"alpha\": {\n    \"b\": 1,\n    \"a\": [\n      true,\n      null\n    ]\n  }\n}"
        );
    }

    #[test]
    fn test_finalize_invalid_json() {
        let err = finalize_output("Sure! Here is the translation: {").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_finalize_empty_buffer() {
        assert!(finalize_output("").is_err());
        assert!(finalize_output("```json\n```").is_err());
    }
}
