//! Notification fan-out - 按重要程度与用户偏好把通知分发到 email / SMS / in-app

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod notification;
pub mod preference;

pub use api::{ApiServer, AppState};
pub use client::{NotificationApi, NotificationFeed, NotificationSource};
pub use config::AppConfig;
pub use error::FanoutError;
pub use notification::{
    route, Channel, CreateNotificationRequest, DeliveryReport, Importance, InAppInbox,
    Notification, NotificationBuilder, NotificationDispatcher, NotificationItem,
    NotificationSender, NotificationService, SendResult,
};
pub use preference::{DefaultPreferenceStore, PreferenceStore, StaticPreferenceStore, UserPreference};
