//! 具体渠道实现

pub mod email;
pub mod in_app;
pub mod logging;
pub mod sms;

pub use email::EmailSender;
pub use in_app::InAppSender;
pub use logging::LoggingSender;
pub use sms::SmsSender;
