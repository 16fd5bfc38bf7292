//! 通知记录与持久化接口

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::importance::Importance;

/// 单次请求构造的通知（构造后不可变）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: String,
    pub message: String,
    pub importance: Importance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: impl Into<String>,
        message: impl Into<String>,
        importance: Importance,
        context: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            message: message.into(),
            importance,
            context,
            created_at: Utc::now(),
        }
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

/// 通知持久化接口
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn save(&self, notification: &Notification) -> Result<()>;
}

/// 不做任何持久化的仓库
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRepository;

#[async_trait]
impl NotificationRepository for NoopRepository {
    async fn save(&self, notification: &Notification) -> Result<()> {
        tracing::debug!(id = %notification.id, "Skipping persistence (no-op repository)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_new_assigns_id_and_timestamp() {
        let before = Utc::now();
        let a = Notification::new("u1", "hello", Importance::High, None);
        let b = Notification::new("u1", "hello", Importance::High, None);

        assert_ne!(a.id, b.id);
        assert!(a.created_at >= before);
        assert_eq!(a.context(), None);
    }

    #[test]
    fn test_notification_json_is_camel_case() {
        let n = Notification::new("u1", "hi", Importance::Low, Some("opt-in".to_string()));
        let value = serde_json::to_value(&n).unwrap();
        assert_eq!(value["userId"], "u1");
        assert_eq!(value["importance"], "low");
        assert_eq!(value["context"], "opt-in");
        assert!(value.get("createdAt").is_some());
    }

    #[tokio::test]
    async fn test_noop_repository_accepts_everything() {
        let n = Notification::new("u1", "hi", Importance::Normal, None);
        assert!(NoopRepository.save(&n).await.is_ok());
    }
}
