//! In-app 收件箱 - 内存中按用户保存已投递的 in-app 通知

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::record::Notification;
use crate::error::FanoutError;

/// 收件箱条目（也是客户端看到的通知）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationItem {
    pub id: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

impl From<&Notification> for NotificationItem {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id.to_string(),
            message: n.message.clone(),
            created_at: n.created_at,
            read: false,
        }
    }
}

/// 每个用户默认保留的条目数
pub const DEFAULT_INBOX_LIMIT: usize = 200;

/// In-app 收件箱
#[derive(Debug)]
pub struct InAppInbox {
    /// user_id -> 条目（按插入顺序）
    items: RwLock<HashMap<String, Vec<NotificationItem>>>,
    /// 每个用户最多保留的条目，超出时丢弃最旧的
    limit: usize,
}

impl Default for InAppInbox {
    fn default() -> Self {
        Self::with_limit(DEFAULT_INBOX_LIMIT)
    }
}

impl InAppInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// 投递一条通知
    pub async fn push(&self, notification: &Notification) {
        let mut items = self.items.write().await;
        let user_items = items.entry(notification.user_id.clone()).or_default();
        user_items.push(NotificationItem::from(notification));

        if user_items.len() > self.limit {
            let excess = user_items.len() - self.limit;
            user_items.drain(..excess);
            debug!(user_id = %notification.user_id, dropped = excess, "Inbox full, dropped oldest items");
        }
    }

    /// 列出通知（最新在前），`user_id` 为空时返回所有用户的通知
    pub async fn list(&self, user_id: Option<&str>) -> Vec<NotificationItem> {
        let items = self.items.read().await;
        let mut out: Vec<NotificationItem> = match user_id {
            Some(id) => items.get(id).cloned().unwrap_or_default(),
            None => items.values().flatten().cloned().collect(),
        };
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    /// 标记已读；重复标记是幂等的
    pub async fn mark_read(&self, id: &str) -> Result<(), FanoutError> {
        let mut items = self.items.write().await;
        let item = items
            .values_mut()
            .flat_map(|v| v.iter_mut())
            .find(|item| item.id == id)
            .ok_or_else(|| FanoutError::not_found("notification", id))?;
        item.read = true;
        Ok(())
    }

    pub async fn unread_count(&self, user_id: &str) -> usize {
        let items = self.items.read().await;
        items
            .get(user_id)
            .map(|v| v.iter().filter(|i| !i.read).count())
            .unwrap_or(0)
    }
}
