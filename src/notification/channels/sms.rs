//! SMS 渠道（日志桩）

use super::logging::LoggingSender;
use crate::notification::channel::Channel;

/// SMS 渠道
pub type SmsSender = LoggingSender;

impl SmsSender {
    /// 创建 SMS 渠道
    pub fn sms() -> Self {
        Self::new(Channel::Sms)
    }
}
