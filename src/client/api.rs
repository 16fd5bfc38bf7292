//! 通知 API 客户端（reqwest）

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::sync::Arc;
use std::time::Duration;

use crate::api::error::ApiErrorResponse;
use crate::api::routes::CreateNotificationResponse;
use crate::notification::{CreateNotificationRequest, NotificationItem};

/// 默认服务地址
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// 客户端读取通知的数据源
#[async_trait]
pub trait NotificationSource: Send + Sync {
    /// 拉取通知列表
    async fn fetch_notifications(&self) -> Result<Vec<NotificationItem>>;

    /// 远端确认已读
    async fn mark_as_read(&self, id: &str) -> Result<()>;
}

#[async_trait]
impl<T: NotificationSource + ?Sized> NotificationSource for Arc<T> {
    async fn fetch_notifications(&self) -> Result<Vec<NotificationItem>> {
        (**self).fetch_notifications().await
    }

    async fn mark_as_read(&self, id: &str) -> Result<()> {
        (**self).mark_as_read(id).await
    }
}

/// HTTP 客户端
#[derive(Debug, Clone)]
pub struct NotificationApi {
    client: Client,
    base_url: String,
    /// 只拉取该用户的通知
    user_id: Option<String>,
}

impl NotificationApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_id: None,
        })
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 提交一条通知
    pub async fn create_notification(
        &self,
        request: &CreateNotificationRequest,
    ) -> Result<CreateNotificationResponse> {
        let url = format!("{}/notifications", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .with_context(|| format!("POST {url}"))?;

        Ok(check(response).await?.json().await?)
    }
}

#[async_trait]
impl NotificationSource for NotificationApi {
    async fn fetch_notifications(&self) -> Result<Vec<NotificationItem>> {
        let url = format!("{}/api/notifications", self.base_url);
        let mut request = self.client.get(&url);
        if let Some(user_id) = &self.user_id {
            request = request.query(&[("userId", user_id)]);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;
        Ok(check(response).await?.json().await?)
    }

    async fn mark_as_read(&self, id: &str) -> Result<()> {
        let url = format!("{}/api/notifications/{}/read", self.base_url, id);
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .with_context(|| format!("POST {url}"))?;
        check(response).await?;
        Ok(())
    }
}

/// 非 2xx 响应转为错误，尽量带上服务端的 `error` 字段
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorResponse>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(anyhow!("server returned {}: {}", status, message))
}
