//! In-app 渠道 - 写入内存收件箱，供客户端拉取

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::notification::channel::{Channel, NotificationSender, SendResult};
use crate::notification::inbox::InAppInbox;
use crate::notification::record::Notification;

/// In-app 渠道
pub struct InAppSender {
    inbox: Arc<InAppInbox>,
}

impl InAppSender {
    pub fn new(inbox: Arc<InAppInbox>) -> Self {
        Self { inbox }
    }
}

#[async_trait]
impl NotificationSender for InAppSender {
    fn channel(&self) -> Channel {
        Channel::InApp
    }

    async fn send(&self, notification: &Notification) -> Result<SendResult> {
        self.inbox.push(notification).await;
        info!(
            channel = "in-app",
            user_id = %notification.user_id,
            id = %notification.id,
            context = ?notification.context,
            "Notification added to inbox"
        );
        Ok(SendResult::Sent)
    }
}
