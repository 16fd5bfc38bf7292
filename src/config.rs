//! 应用配置
//!
//! 读取优先级（后者覆盖前者）：
//! 1. 内置默认值
//! 2. 配置文件 `~/.config/notification-fanout/config.json`（或 `--config` 指定的路径）
//! 3. 环境变量 `FANOUT_BIND_ADDRESS` / `FANOUT_PORT` / `FANOUT_STORE_PATH` / `FANOUT_DRY_RUN`
//! 4. 命令行参数（由 `main.rs` 应用）

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::notification::channel::Channel;
use crate::notification::inbox::DEFAULT_INBOX_LIMIT;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 监听地址
    pub bind_address: String,
    /// 监听端口
    pub port: u16,
    /// JSONL 存储路径，未设置时不持久化
    pub store_path: Option<PathBuf>,
    /// dry-run：只路由不发送
    pub dry_run: bool,
    /// 单个发送器超时（毫秒）
    pub sender_timeout_ms: Option<u64>,
    /// 未单独配置偏好的用户使用的渠道
    pub default_channels: Vec<Channel>,
    /// 用户 -> 允许的渠道
    pub preferences: HashMap<String, Vec<Channel>>,
    /// 是否启用 CORS
    pub enable_cors: bool,
    /// 每个用户收件箱最多保留的条目
    pub inbox_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            store_path: None,
            dry_run: false,
            sender_timeout_ms: None,
            default_channels: Channel::ALL.to_vec(),
            preferences: HashMap::new(),
            enable_cors: true,
            inbox_limit: DEFAULT_INBOX_LIMIT,
        }
    }
}

impl AppConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/notification-fanout/config.json"))
    }

    /// 加载配置：文件 + 环境变量
    ///
    /// 显式指定的路径必须存在；默认路径不存在时使用内置默认值。
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// 从 JSON 文件读取
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// 应用环境变量覆盖，`lookup` 通常是 `std::env::var`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("FANOUT_BIND_ADDRESS").filter(|v| !v.trim().is_empty()) {
            self.bind_address = addr;
        }

        if let Some(port) = lookup("FANOUT_PORT") {
            match port.parse::<u16>() {
                Ok(p) => self.port = p,
                Err(_) => warn!(value = %port, "Ignoring invalid FANOUT_PORT"),
            }
        }

        if let Some(path) = lookup("FANOUT_STORE_PATH").filter(|v| !v.trim().is_empty()) {
            self.store_path = Some(PathBuf::from(path));
        }

        if let Some(flag) = lookup("FANOUT_DRY_RUN") {
            self.dry_run = matches!(flag.to_lowercase().as_str(), "1" | "true" | "yes");
        }
    }
}
