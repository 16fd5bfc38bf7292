//! Email 渠道（日志桩）

use super::logging::LoggingSender;
use crate::notification::channel::Channel;

/// Email 渠道
pub type EmailSender = LoggingSender;

impl EmailSender {
    /// 创建 Email 渠道
    pub fn email() -> Self {
        Self::new(Channel::Email)
    }
}
