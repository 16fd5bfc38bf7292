//! 客户端：拉取通知、未读数、标记已读与终端渲染

pub mod api;
pub mod feed;
pub mod render;

pub use api::{NotificationApi, NotificationSource, DEFAULT_SERVER_URL};
pub use feed::{FeedState, NotificationFeed};
pub use render::{render_bell, render_inbox, render_toast, ToastKind};
