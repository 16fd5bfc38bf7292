//! API 服务 - 路由组装与启动

use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::routes;
use crate::config::AppConfig;
use crate::notification::{InAppInbox, NotificationService};

/// 共享状态
#[derive(Clone)]
pub struct AppState {
    /// 启动时间（用于 uptime）
    pub start_time: Instant,
    pub service: Arc<NotificationService>,
    /// 客户端接口读写的收件箱
    pub inbox: Arc<InAppInbox>,
}

impl AppState {
    pub fn new(service: Arc<NotificationService>, inbox: Arc<InAppInbox>) -> Self {
        Self {
            start_time: Instant::now(),
            service,
            inbox,
        }
    }
}

/// API 服务
pub struct ApiServer {
    config: AppConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: AppConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// 组装路由与中间件
    pub fn build_router(&self) -> Router {
        let mut router = routes::create_router(self.state.clone());

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router = router.layer(cors);
        }

        router.layer(TraceLayer::new_for_http())
    }

    /// 绑定地址并运行到 Ctrl-C
    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.bind_address, self.config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("binding {addr}"))?;
        self.serve(listener).await
    }

    /// 在已绑定的 listener 上运行
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let router = self.build_router();
        info!(address = %listener.local_addr()?, "API server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => info!("Shutdown signal received"),
                    Err(e) => {
                        warn!(error = %e, "Cannot listen for Ctrl-C, serving until killed");
                        std::future::pending::<()>().await;
                    }
                }
            })
            .await
            .context("API server error")?;

        info!("API server stopped");
        Ok(())
    }
}
