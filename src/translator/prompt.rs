//! 提示词构建

use crate::models::openai::ChatMessage;

/// 系统提示词：只输出 JSON
pub const SYSTEM_PROMPT: &str = "You are a professional translator for structured data. \
You always respond with a single valid JSON document and nothing else.";

/// 生成用户提示词
pub fn build_user_prompt(source_text: &str, target_language: &str) -> String {
    format!(
        "Translate every string value of the following JSON document into {target_language}.\n\
         \n\
         Rules:\n\
         1. Keep every key exactly as it is; translate values only.\n\
         2. Keep the structure unchanged: same nesting, same array order, same value types.\n\
         3. Return only the translated JSON so that it can be parsed directly.\n\
         4. Do not wrap the result in markdown code fences and do not add explanations.\n\
         \n\
         JSON:\n\
         {source_text}"
    )
}

/// 生成 system + user 两条消息
pub fn build_messages(source_text: &str, target_language: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_user_prompt(source_text, target_language)),
    ]
}
