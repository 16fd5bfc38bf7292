//! 通知渠道与发送器 trait 定义

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::record::Notification;
use crate::error::FanoutError;

/// 投递渠道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "sms")]
    Sms,
    #[serde(rename = "in-app")]
    InApp,
}

impl Channel {
    /// 全部渠道（high importance 的投递顺序）
    pub const ALL: [Channel; 3] = [Channel::Sms, Channel::Email, Channel::InApp];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
            Channel::InApp => "in-app",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = FanoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(Channel::Email),
            "sms" => Ok(Channel::Sms),
            "in-app" | "in_app" | "inapp" => Ok(Channel::InApp),
            _ => Err(FanoutError::UnknownChannel(s.to_string())),
        }
    }
}

/// 发送结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendResult {
    /// 发送成功
    Sent,
    /// 跳过（dry-run 等）
    Skipped(String),
    /// 发送失败
    Failed(String),
}

/// 投递状态（`SendResult` 的线上表示）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Skipped,
    Failed,
}

/// 单个渠道的投递结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub channel: Channel,
    pub status: DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DeliveryReport {
    pub fn new(channel: Channel, result: SendResult) -> Self {
        let (status, reason) = match result {
            SendResult::Sent => (DeliveryStatus::Sent, None),
            SendResult::Skipped(r) => (DeliveryStatus::Skipped, Some(r)),
            SendResult::Failed(r) => (DeliveryStatus::Failed, Some(r)),
        };
        Self {
            channel,
            status,
            reason,
        }
    }

    pub fn is_sent(&self) -> bool {
        self.status == DeliveryStatus::Sent
    }
}

/// 通知发送器 trait，每个渠道一个实现
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// 负责的渠道
    fn channel(&self) -> Channel;

    /// 发送器名称（用于日志）
    fn name(&self) -> &str {
        self.channel().as_str()
    }

    /// 发送一条通知
    async fn send(&self, notification: &Notification) -> Result<SendResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_parse() {
        assert_eq!("email".parse::<Channel>().unwrap(), Channel::Email);
        assert_eq!("SMS".parse::<Channel>().unwrap(), Channel::Sms);
        assert_eq!("in-app".parse::<Channel>().unwrap(), Channel::InApp);
        assert_eq!("in_app".parse::<Channel>().unwrap(), Channel::InApp);
        assert!("pager".parse::<Channel>().is_err());
    }

    #[test]
    fn test_channel_wire_names() {
        assert_eq!(serde_json::to_string(&Channel::InApp).unwrap(), "\"in-app\"");
        assert_eq!(Channel::InApp.to_string(), "in-app");
    }

    #[test]
    fn test_delivery_report_json() {
        let sent = DeliveryReport::new(Channel::Sms, SendResult::Sent);
        assert_eq!(
            serde_json::to_value(&sent).unwrap(),
            serde_json::json!({"channel": "sms", "status": "sent"})
        );

        let failed = DeliveryReport::new(Channel::Email, SendResult::Failed("smtp down".to_string()));
        assert!(!failed.is_sent());
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            serde_json::json!({"channel": "email", "status": "failed", "reason": "smtp down"})
        );
    }
}
