//! Serve 命令 - 启动 HTTP 服务

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::api::{ApiServer, AppState};
use crate::config::AppConfig;
use crate::notification::NotificationBuilder;

/// Serve 命令参数
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// 配置文件路径（默认 ~/.config/notification-fanout/config.json）
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 监听地址
    #[arg(long)]
    pub bind: Option<String>,

    /// 监听端口
    #[arg(long, short)]
    pub port: Option<u16>,

    /// JSONL 持久化路径
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// 只路由不发送
    #[arg(long)]
    pub dry_run: bool,
}

impl ServeArgs {
    /// 命令行参数覆盖配置
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(bind) = &self.bind {
            config.bind_address = bind.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(store) = &self.store {
            config.store_path = Some(store.clone());
        }
        if self.dry_run {
            config.dry_run = true;
        }
    }
}

/// 处理 serve 命令
pub async fn handle_serve(args: ServeArgs) -> Result<()> {
    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    info!(
        bind = %config.bind_address,
        port = config.port,
        dry_run = config.dry_run,
        users = config.preferences.len(),
        "Starting notification fan-out service"
    );

    let system = NotificationBuilder::from_config(&config).build();
    let state = AppState::new(system.service, system.inbox);
    ApiServer::new(config, state).run().await
}
