//! 终端渲染：铃铛角标、收件箱面板、toast

use chrono::Local;

use crate::notification::NotificationItem;

/// Toast 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Error,
}

impl ToastKind {
    fn label(&self) -> &'static str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Success => "success",
            ToastKind::Error => "error",
        }
    }
}

/// 铃铛 + 未读角标；没有未读时不显示角标
pub fn render_bell(unread_count: usize) -> String {
    if unread_count > 0 {
        format!("🔔 ({unread_count})")
    } else {
        "🔔".to_string()
    }
}

/// 收件箱面板
pub fn render_inbox(items: &[NotificationItem]) -> String {
    let mut out = String::from("Notifications\n");
    out.push_str(&"-".repeat(40));
    out.push('\n');

    if items.is_empty() {
        out.push_str("No notifications\n");
        return out;
    }

    for item in items {
        let marker = if item.read { " " } else { "●" };
        let when = item.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S");
        out.push_str(&format!("{marker} {}\n    {when}  [{}]\n", item.message, item.id));
    }
    out
}

/// Toast 单行提示
pub fn render_toast(message: &str, kind: ToastKind) -> String {
    format!("[{}] {}", kind.label(), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(id: &str, read: bool) -> NotificationItem {
        NotificationItem {
            id: id.to_string(),
            message: format!("msg-{id}"),
            created_at: Utc::now(),
            read,
        }
    }

    #[test]
    fn test_bell_badge_hidden_at_zero() {
        assert_eq!(render_bell(0), "🔔");
        assert_eq!(render_bell(3), "🔔 (3)");
    }

    #[test]
    fn test_inbox_empty() {
        assert!(render_inbox(&[]).contains("No notifications"));
    }

    #[test]
    fn test_inbox_marks_unread() {
        let out = render_inbox(&[item("a", false), item("b", true)]);
        assert!(out.contains("● msg-a"));
        assert!(out.contains("  msg-b"));
        assert!(out.contains("[a]"));
        assert!(!out.contains("No notifications"));
    }

    #[test]
    fn test_toast_kinds() {
        assert_eq!(render_toast("saved", ToastKind::Success), "[success] saved");
        assert_eq!(render_toast("hi", ToastKind::default()), "[info] hi");
        assert_eq!(render_toast("x", ToastKind::Error), "[error] x");
    }
}
