//! HTTP API - 接收通知与 in-app 收件箱接口

pub mod error;
pub mod routes;
pub mod server;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use routes::create_router;
pub use server::{ApiServer, AppState};
