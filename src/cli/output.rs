//! CLI 输出格式

use serde::Serialize;

/// 格式化为缩进 JSON
pub fn to_pretty_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
}

/// 渠道列表的一行文本形式
pub fn format_channels<T: std::fmt::Display>(channels: &[T]) -> String {
    if channels.is_empty() {
        "(none)".to_string()
    } else {
        channels
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
