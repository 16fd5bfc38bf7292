//! 通知分发器 - 管理各渠道发送器并并发投递

use super::channel::{Channel, DeliveryReport, NotificationSender, SendResult};
use super::record::Notification;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// 通知分发器 - 每个渠道一个发送器
pub struct NotificationDispatcher {
    /// 已注册的发送器
    senders: HashMap<Channel, Arc<dyn NotificationSender>>,
    /// 是否为 dry-run 模式
    dry_run: bool,
    /// 单个发送器的超时
    sender_timeout: Option<Duration>,
}

impl NotificationDispatcher {
    /// 创建新的分发器
    pub fn new() -> Self {
        Self {
            senders: HashMap::new(),
            dry_run: false,
            sender_timeout: None,
        }
    }

    /// 设置 dry-run 模式
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 设置发送超时
    pub fn with_sender_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.sender_timeout = timeout;
        self
    }

    /// 注册发送器（同一渠道后注册的覆盖先注册的）
    pub fn register_sender(&mut self, sender: Arc<dyn NotificationSender>) {
        info!(channel = sender.name(), "Registering notification sender");
        self.senders.insert(sender.channel(), sender);
    }

    /// 向给定渠道并发投递，按 `channels` 的顺序返回每个渠道的结果
    ///
    /// 单个渠道失败不影响其它渠道。
    pub async fn dispatch(
        &self,
        notification: &Notification,
        channels: &[Channel],
    ) -> Vec<DeliveryReport> {
        let sends = channels
            .iter()
            .map(|&channel| async move {
                DeliveryReport::new(channel, self.send_one(channel, notification).await)
            });

        join_all(sends).await
    }

    async fn send_one(&self, channel: Channel, notification: &Notification) -> SendResult {
        if self.dry_run {
            info!(channel = %channel, user_id = %notification.user_id, "[DRY-RUN] Would send");
            return SendResult::Skipped("dry-run".to_string());
        }

        let Some(sender) = self.senders.get(&channel) else {
            warn!(channel = %channel, "No sender registered for channel");
            return SendResult::Failed("no sender registered".to_string());
        };

        let outcome = match self.sender_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, sender.send(notification)).await {
                Ok(r) => r,
                Err(_) => {
                    warn!(channel = %channel, timeout_ms = timeout.as_millis() as u64, "Sender timed out");
                    return SendResult::Failed("timed out".to_string());
                }
            },
            None => sender.send(notification).await,
        };

        match outcome {
            Ok(r) => r,
            Err(e) => {
                warn!(channel = %channel, error = %e, "Channel send failed");
                SendResult::Failed(e.to_string())
            }
        }
    }

    /// 获取已注册的发送器数量
    pub fn sender_count(&self) -> usize {
        self.senders.len()
    }

    /// 获取已注册的渠道（有序）
    pub fn registered_channels(&self) -> Vec<Channel> {
        let mut channels: Vec<Channel> = self.senders.keys().copied().collect();
        channels.sort();
        channels
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::channel::DeliveryStatus;
    use crate::notification::importance::Importance;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 测试用的 mock 发送器
    struct MockSender {
        channel: Channel,
        send_count: AtomicUsize,
        fail: bool,
        delay: Duration,
    }

    impl MockSender {
        fn new(channel: Channel) -> Self {
            Self {
                channel,
                send_count: AtomicUsize::new(0),
                fail: false,
                delay: Duration::ZERO,
            }
        }

        fn failing(channel: Channel) -> Self {
            Self {
                fail: true,
                ..Self::new(channel)
            }
        }

        fn slow(channel: Channel, delay: Duration) -> Self {
            Self {
                delay,
                ..Self::new(channel)
            }
        }

        fn get_send_count(&self) -> usize {
            self.send_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NotificationSender for MockSender {
        fn channel(&self) -> Channel {
            self.channel
        }

        async fn send(&self, _notification: &Notification) -> Result<SendResult> {
            self.send_count.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail {
                return Err(anyhow!("provider unavailable"));
            }
            Ok(SendResult::Sent)
        }
    }

    fn notification() -> Notification {
        Notification::new("u1", "test", Importance::High, None)
    }

    #[test]
    fn test_dispatcher_register_sender() {
        let mut dispatcher = NotificationDispatcher::new();
        assert_eq!(dispatcher.sender_count(), 0);

        dispatcher.register_sender(Arc::new(MockSender::new(Channel::Sms)));
        dispatcher.register_sender(Arc::new(MockSender::new(Channel::Email)));
        assert_eq!(dispatcher.sender_count(), 2);
        assert_eq!(
            dispatcher.registered_channels(),
            vec![Channel::Email, Channel::Sms]
        );
    }

    #[tokio::test]
    async fn test_dispatch_one_send_per_channel_in_order() {
        let mut dispatcher = NotificationDispatcher::new();
        let sms = Arc::new(MockSender::new(Channel::Sms));
        let email = Arc::new(MockSender::new(Channel::Email));
        let in_app = Arc::new(MockSender::new(Channel::InApp));
        dispatcher.register_sender(sms.clone());
        dispatcher.register_sender(email.clone());
        dispatcher.register_sender(in_app.clone());

        let reports = dispatcher
            .dispatch(&notification(), &[Channel::Sms, Channel::InApp])
            .await;

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].channel, Channel::Sms);
        assert_eq!(reports[1].channel, Channel::InApp);
        assert!(reports.iter().all(|r| r.is_sent()));
        assert_eq!(sms.get_send_count(), 1);
        assert_eq!(email.get_send_count(), 0);
        assert_eq!(in_app.get_send_count(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_reports_partial_failure() {
        let mut dispatcher = NotificationDispatcher::new();
        let sms = Arc::new(MockSender::failing(Channel::Sms));
        let email = Arc::new(MockSender::new(Channel::Email));
        dispatcher.register_sender(sms.clone());
        dispatcher.register_sender(email.clone());

        let reports = dispatcher
            .dispatch(&notification(), &[Channel::Sms, Channel::Email])
            .await;

        assert_eq!(reports[0].status, DeliveryStatus::Failed);
        assert_eq!(reports[0].reason.as_deref(), Some("provider unavailable"));
        assert_eq!(reports[1].status, DeliveryStatus::Sent);
        assert_eq!(email.get_send_count(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_missing_sender_fails_that_channel() {
        let dispatcher = NotificationDispatcher::new();
        let reports = dispatcher.dispatch(&notification(), &[Channel::Email]).await;
        assert_eq!(reports[0].status, DeliveryStatus::Failed);
        assert_eq!(reports[0].reason.as_deref(), Some("no sender registered"));
    }

    #[tokio::test]
    async fn test_dispatch_dry_run() {
        let mut dispatcher = NotificationDispatcher::new().with_dry_run(true);
        let sender = Arc::new(MockSender::new(Channel::Email));
        dispatcher.register_sender(sender.clone());

        let reports = dispatcher.dispatch(&notification(), &[Channel::Email]).await;

        assert_eq!(reports[0].status, DeliveryStatus::Skipped);
        assert_eq!(reports[0].reason.as_deref(), Some("dry-run"));
        assert_eq!(sender.get_send_count(), 0); // 不应该实际发送
    }

    /// 所有发送器都到达屏障后才能返回，串行调用会卡在第一个
    struct BarrierSender {
        channel: Channel,
        barrier: Arc<tokio::sync::Barrier>,
    }

    #[async_trait]
    impl NotificationSender for BarrierSender {
        fn channel(&self) -> Channel {
            self.channel
        }

        async fn send(&self, _notification: &Notification) -> Result<SendResult> {
            self.barrier.wait().await;
            Ok(SendResult::Sent)
        }
    }

    #[tokio::test]
    async fn test_dispatch_is_concurrent() {
        let barrier = Arc::new(tokio::sync::Barrier::new(Channel::ALL.len()));
        let mut dispatcher = NotificationDispatcher::new();
        for channel in Channel::ALL {
            dispatcher.register_sender(Arc::new(BarrierSender {
                channel,
                barrier: barrier.clone(),
            }));
        }

        let reports = tokio::time::timeout(
            Duration::from_secs(5),
            dispatcher.dispatch(&notification(), &Channel::ALL),
        )
        .await
        .expect("senders were not run concurrently");

        assert_eq!(reports.len(), 3);
        assert!(reports.iter().all(|r| r.is_sent()));
    }

    #[tokio::test]
    async fn test_dispatch_sender_timeout() {
        let mut dispatcher =
            NotificationDispatcher::new().with_sender_timeout(Some(Duration::from_millis(20)));
        dispatcher.register_sender(Arc::new(MockSender::slow(
            Channel::Sms,
            Duration::from_millis(500),
        )));
        dispatcher.register_sender(Arc::new(MockSender::new(Channel::Email)));

        let reports = dispatcher
            .dispatch(&notification(), &[Channel::Sms, Channel::Email])
            .await;

        assert_eq!(reports[0].status, DeliveryStatus::Failed);
        assert_eq!(reports[0].reason.as_deref(), Some("timed out"));
        assert!(reports[1].is_sent());
    }

    #[tokio::test]
    async fn test_dispatch_no_channels() {
        let dispatcher = NotificationDispatcher::new();
        assert!(dispatcher.dispatch(&notification(), &[]).await.is_empty());
    }
}
