//! 用户渠道偏好 - 路由器只读的外部数据

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::notification::channel::Channel;

/// 用户偏好：允许使用的渠道集合
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreference {
    pub user_id: String,
    pub preferred_channels: BTreeSet<Channel>,
}

impl UserPreference {
    pub fn new(user_id: impl Into<String>, channels: impl IntoIterator<Item = Channel>) -> Self {
        Self {
            user_id: user_id.into(),
            preferred_channels: channels.into_iter().collect(),
        }
    }

    /// 允许全部渠道
    pub fn all_channels(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Channel::ALL)
    }

    pub fn allows(&self, channel: Channel) -> bool {
        self.preferred_channels.contains(&channel)
    }
}

/// 偏好查询接口
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get_by_user_id(&self, user_id: &str) -> Result<UserPreference>;
}

/// 对所有用户返回同一组默认渠道
#[derive(Debug, Clone)]
pub struct DefaultPreferenceStore {
    channels: BTreeSet<Channel>,
}

impl DefaultPreferenceStore {
    pub fn new(channels: impl IntoIterator<Item = Channel>) -> Self {
        Self {
            channels: channels.into_iter().collect(),
        }
    }
}

impl Default for DefaultPreferenceStore {
    fn default() -> Self {
        Self::new(Channel::ALL)
    }
}

#[async_trait]
impl PreferenceStore for DefaultPreferenceStore {
    async fn get_by_user_id(&self, user_id: &str) -> Result<UserPreference> {
        Ok(UserPreference::new(user_id, self.channels.iter().copied()))
    }
}

/// 按用户配置的静态偏好表，未配置的用户回落到默认渠道
#[derive(Debug, Clone, Default)]
pub struct StaticPreferenceStore {
    entries: HashMap<String, BTreeSet<Channel>>,
    fallback: DefaultPreferenceStore,
}

impl StaticPreferenceStore {
    pub fn new(fallback: DefaultPreferenceStore) -> Self {
        Self {
            entries: HashMap::new(),
            fallback,
        }
    }

    pub fn with_user(
        mut self,
        user_id: impl Into<String>,
        channels: impl IntoIterator<Item = Channel>,
    ) -> Self {
        self.entries
            .insert(user_id.into(), channels.into_iter().collect());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl PreferenceStore for StaticPreferenceStore {
    async fn get_by_user_id(&self, user_id: &str) -> Result<UserPreference> {
        match self.entries.get(user_id) {
            Some(channels) => Ok(UserPreference::new(user_id, channels.iter().copied())),
            None => self.fallback.get_by_user_id(user_id).await,
        }
    }
}
