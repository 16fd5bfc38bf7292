//! 通知扇出 - 按 importance、context 和用户偏好把通知分发到各渠道
//!
//! # 组成
//! 1. `router::route`：纯函数，决定投递渠道
//! 2. `NotificationSender`：每个渠道一个发送器（email / sms 为日志桩，in-app 写入收件箱）
//! 3. `NotificationDispatcher`：并发调用发送器，返回逐渠道结果
//! 4. `NotificationService`：一次请求的完整流程
//!
//! # 使用示例
//! ```ignore
//! use notification_fanout::notification::{NotificationBuilder, CreateNotificationRequest};
//!
//! let system = NotificationBuilder::new().build();
//! let outcome = system.service.create(CreateNotificationRequest {
//!     user_id: "u1".into(),
//!     message: "Hello".into(),
//!     importance: "high".into(),
//!     context: None,
//! }).await?;
//! ```

pub mod builder;
pub mod channel;
pub mod channels;
pub mod dispatcher;
pub mod importance;
pub mod inbox;
pub mod record;
pub mod router;
pub mod service;
pub mod store;

pub use builder::{NotificationBuilder, NotificationSystem};
pub use channel::{Channel, DeliveryReport, DeliveryStatus, NotificationSender, SendResult};
pub use dispatcher::NotificationDispatcher;
pub use importance::Importance;
pub use inbox::{InAppInbox, NotificationItem};
pub use record::{NoopRepository, Notification, NotificationRepository};
pub use router::{route, OPT_IN_CONTEXT};
pub use service::{CreateNotificationRequest, DispatchOutcome, NotificationService};
pub use store::JsonlNotificationStore;
