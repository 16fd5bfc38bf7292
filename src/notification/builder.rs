//! 通知系统构建器 - 按配置组装偏好、发送器与持久化

use super::channels::{EmailSender, InAppSender, SmsSender};
use super::dispatcher::NotificationDispatcher;
use super::inbox::{InAppInbox, DEFAULT_INBOX_LIMIT};
use super::record::{NoopRepository, NotificationRepository};
use super::service::NotificationService;
use super::store::JsonlNotificationStore;
use crate::config::AppConfig;
use crate::preference::{DefaultPreferenceStore, PreferenceStore, StaticPreferenceStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// 组装完成的通知系统
pub struct NotificationSystem {
    pub service: Arc<NotificationService>,
    pub inbox: Arc<InAppInbox>,
}

/// 通知系统构建器
pub struct NotificationBuilder {
    dry_run: bool,
    store_path: Option<PathBuf>,
    sender_timeout: Option<Duration>,
    sender_latency: Duration,
    preferences: Option<Arc<dyn PreferenceStore>>,
    inbox: Option<Arc<InAppInbox>>,
    inbox_limit: usize,
}

impl NotificationBuilder {
    pub fn new() -> Self {
        Self {
            dry_run: false,
            store_path: None,
            sender_timeout: None,
            sender_latency: Duration::ZERO,
            preferences: None,
            inbox: None,
            inbox_limit: DEFAULT_INBOX_LIMIT,
        }
    }

    /// 从应用配置初始化
    pub fn from_config(config: &AppConfig) -> Self {
        let fallback = DefaultPreferenceStore::new(config.default_channels.iter().copied());
        let preferences = config.preferences.iter().fold(
            StaticPreferenceStore::new(fallback),
            |store, (user_id, channels)| store.with_user(user_id.clone(), channels.iter().copied()),
        );

        Self::new()
            .dry_run(config.dry_run)
            .store_path(config.store_path.clone())
            .sender_timeout(config.sender_timeout_ms.map(Duration::from_millis))
            .preferences(Arc::new(preferences))
            .inbox_limit(config.inbox_limit)
    }

    /// 设置 dry-run 模式
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 设置 JSONL 存储路径；`None` 表示不持久化
    pub fn store_path(mut self, path: Option<PathBuf>) -> Self {
        self.store_path = path;
        self
    }

    pub fn sender_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.sender_timeout = timeout;
        self
    }

    /// 桩发送器的模拟延迟
    pub fn sender_latency(mut self, latency: Duration) -> Self {
        self.sender_latency = latency;
        self
    }

    pub fn preferences(mut self, preferences: Arc<dyn PreferenceStore>) -> Self {
        self.preferences = Some(preferences);
        self
    }

    /// 新建收件箱时每个用户的条目上限
    pub fn inbox_limit(mut self, limit: usize) -> Self {
        self.inbox_limit = limit;
        self
    }

    /// 使用已有的收件箱（忽略 `inbox_limit`）
    pub fn inbox(mut self, inbox: Arc<InAppInbox>) -> Self {
        self.inbox = Some(inbox);
        self
    }

    /// 构建通知系统
    pub fn build(self) -> NotificationSystem {
        let inbox_limit = self.inbox_limit;
        let inbox = self
            .inbox
            .unwrap_or_else(|| Arc::new(InAppInbox::with_limit(inbox_limit)));

        let mut dispatcher = NotificationDispatcher::new()
            .with_dry_run(self.dry_run)
            .with_sender_timeout(self.sender_timeout);
        dispatcher.register_sender(Arc::new(EmailSender::email().with_latency(self.sender_latency)));
        dispatcher.register_sender(Arc::new(SmsSender::sms().with_latency(self.sender_latency)));
        dispatcher.register_sender(Arc::new(InAppSender::new(inbox.clone())));

        let repository: Arc<dyn NotificationRepository> = match self.store_path {
            Some(path) => {
                info!(path = %path.display(), "Persisting notifications to JSONL store");
                Arc::new(JsonlNotificationStore::new(path))
            }
            None => {
                info!("Notification persistence disabled");
                Arc::new(NoopRepository)
            }
        };

        let preferences = self
            .preferences
            .unwrap_or_else(|| Arc::new(DefaultPreferenceStore::default()));

        let service = NotificationService::new(preferences, Arc::new(dispatcher), repository);

        NotificationSystem {
            service: Arc::new(service),
            inbox,
        }
    }
}

impl Default for NotificationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
