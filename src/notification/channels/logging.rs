//! 日志桩渠道 - 不接真实服务商，只记录一条日志并返回成功

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use crate::notification::channel::{Channel, NotificationSender, SendResult};
use crate::notification::record::Notification;

/// 日志桩发送器
#[derive(Debug, Clone)]
pub struct LoggingSender {
    channel: Channel,
    /// 模拟服务商延迟
    latency: Duration,
}

impl LoggingSender {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            latency: Duration::ZERO,
        }
    }

    /// 设置模拟延迟
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl NotificationSender for LoggingSender {
    fn channel(&self) -> Channel {
        self.channel
    }

    async fn send(&self, notification: &Notification) -> Result<SendResult> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        info!(
            channel = %self.channel,
            user_id = %notification.user_id,
            context = ?notification.context,
            message = %notification.message,
            "Notification delivered"
        );
        Ok(SendResult::Sent)
    }
}
