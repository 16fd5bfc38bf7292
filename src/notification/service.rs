//! 通知服务 - 一次请求的完整流程
//!
//! 查询偏好 → 构造通知 → 路由 → 并发投递 → 持久化。

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use super::channel::{Channel, DeliveryReport};
use super::dispatcher::NotificationDispatcher;
use super::importance::Importance;
use super::record::{Notification, NotificationRepository};
use super::router::route;
use crate::error::FanoutError;
use crate::preference::PreferenceStore;

/// 创建通知的请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    pub user_id: String,
    pub message: String,
    /// 原始文本，在服务内解析，未知值显式报错
    pub importance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// 一次投递的结果
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub notification: Notification,
    pub channels: Vec<Channel>,
    pub deliveries: Vec<DeliveryReport>,
}

/// 通知服务
pub struct NotificationService {
    preferences: Arc<dyn PreferenceStore>,
    dispatcher: Arc<NotificationDispatcher>,
    repository: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(
        preferences: Arc<dyn PreferenceStore>,
        dispatcher: Arc<NotificationDispatcher>,
        repository: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            preferences,
            dispatcher,
            repository,
        }
    }

    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }

    /// 处理一条通知请求
    ///
    /// 发送器失败体现在 `deliveries` 中，不会让整个请求失败；偏好查询和持久化
    /// 失败则直接返回错误。持久化总是恰好执行一次，即使没有任何渠道。
    pub async fn create(
        &self,
        request: CreateNotificationRequest,
    ) -> Result<DispatchOutcome, FanoutError> {
        let importance: Importance = request.importance.parse()?;

        let preference = self
            .preferences
            .get_by_user_id(&request.user_id)
            .await
            .map_err(|e| {
                error!(user_id = %request.user_id, error = %e, "Preference lookup failed");
                FanoutError::Preference(e.to_string())
            })?;

        let notification = Notification::new(
            request.user_id,
            request.message,
            importance,
            request.context,
        );

        let channels = route(importance, notification.context(), &preference);
        let deliveries = self.dispatcher.dispatch(&notification, &channels).await;

        self.repository.save(&notification).await.map_err(|e| {
            error!(id = %notification.id, error = %e, "Failed to persist notification");
            FanoutError::Persistence(e.to_string())
        })?;

        let sent = deliveries.iter().filter(|d| d.is_sent()).count();
        info!(
            id = %notification.id,
            user_id = %notification.user_id,
            importance = %importance,
            channels = channels.len(),
            sent,
            "Notification dispatched"
        );

        Ok(DispatchOutcome {
            notification,
            channels,
            deliveries,
        })
    }
}
