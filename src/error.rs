//! 领域错误类型

use thiserror::Error;

/// 通知扇出过程中可区分的错误
#[derive(Debug, Error)]
pub enum FanoutError {
    /// 无法识别的 importance（不再静默回落到 low）
    #[error("unknown importance: {0}")]
    UnknownImportance(String),

    /// 无法识别的渠道名称
    #[error("unknown channel: {0}")]
    UnknownChannel(String),

    /// 资源不存在
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// 偏好查询失败
    #[error("preference lookup failed: {0}")]
    Preference(String),

    /// 持久化失败
    #[error("failed to persist notification: {0}")]
    Persistence(String),
}

impl FanoutError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}
