//! Notification fan-out CLI
//!
//! 启动通知服务、提交通知、预览路由、查看收件箱

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use notification_fanout::cli::{
    handle_inbox, handle_route, handle_send, handle_serve, InboxArgs, RouteArgs, SendArgs,
    ServeArgs,
};

#[derive(Parser)]
#[command(name = "fanout")]
#[command(about = "Notification fan-out - 按重要程度与用户偏好分发通知")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 启动 HTTP 服务
    Serve(ServeArgs),
    /// 向服务提交一条通知
    Send(SendArgs),
    /// 本地预览路由结果
    Route(RouteArgs),
    /// 查看收件箱
    Inbox(InboxArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("notification_fanout=info,fanout=info,tower_http=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => handle_serve(args).await,
        Commands::Send(args) => handle_send(args).await,
        Commands::Route(args) => handle_route(args),
        Commands::Inbox(args) => handle_inbox(args).await,
    }
}
