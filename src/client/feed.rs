//! 客户端通知状态
//!
//! 拉取通知列表，维护未读数，并在状态变化时通过 `watch` 通道通知订阅者
//! （渲染层订阅后重绘）。

use anyhow::Result;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::api::NotificationSource;
use crate::notification::NotificationItem;

/// 一次快照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedState {
    pub notifications: Vec<NotificationItem>,
    pub loading: bool,
}

impl FeedState {
    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }
}

/// 通知 feed
pub struct NotificationFeed<S> {
    source: S,
    state: watch::Sender<FeedState>,
}

impl<S: NotificationSource> NotificationFeed<S> {
    pub fn new(source: S) -> Self {
        let (state, _) = watch::channel(FeedState::default());
        Self { source, state }
    }

    /// 创建并立即加载一次
    pub async fn mount(source: S) -> Result<Self> {
        let feed = Self::new(source);
        feed.load().await?;
        Ok(feed)
    }

    /// 订阅状态变化
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    pub fn notifications(&self) -> Vec<NotificationItem> {
        self.state.borrow().notifications.clone()
    }

    pub fn unread_count(&self) -> usize {
        self.state.borrow().unread_count()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// 拉取列表并替换本地状态；失败时保留原列表
    pub async fn load(&self) -> Result<()> {
        self.state.send_modify(|s| s.loading = true);
        let result = self.source.fetch_notifications().await;

        match result {
            Ok(items) => {
                debug!(count = items.len(), "Loaded notifications");
                self.state.send_modify(|s| {
                    s.notifications = items;
                    s.loading = false;
                });
                Ok(())
            }
            Err(e) => {
                self.state.send_modify(|s| s.loading = false);
                Err(e)
            }
        }
    }

    pub async fn reload(&self) -> Result<()> {
        self.load().await
    }

    /// 标记已读：远端确认成功后才修改本地状态
    ///
    /// 返回本地条目是否从未读变为已读。
    pub async fn mark_as_read(&self, id: &str) -> Result<bool> {
        self.source.mark_as_read(id).await?;

        let mut changed = false;
        self.state.send_if_modified(|s| {
            if let Some(item) = s.notifications.iter_mut().find(|n| n.id == id && !n.read) {
                item.read = true;
                changed = true;
            }
            changed
        });
        Ok(changed)
    }

    /// 按固定间隔轮询，直到调用方丢弃该 future
    pub async fn watch(&self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if let Err(e) = self.load().await {
                warn!(error = %e, "Failed to refresh notifications");
            }
        }
    }
}
