//! Send 命令 - 向服务提交一条通知

use anyhow::Result;
use clap::Args;

use super::output::{format_channels, to_pretty_json};
use crate::client::{render_toast, NotificationApi, ToastKind, DEFAULT_SERVER_URL};
use crate::notification::{CreateNotificationRequest, DeliveryStatus};

/// Send 命令参数
#[derive(Args, Debug)]
pub struct SendArgs {
    /// 接收用户
    #[arg(long, short)]
    pub user: String,

    /// 消息内容
    #[arg(long, short)]
    pub message: String,

    /// 重要程度: low, normal, high
    #[arg(long, short, default_value = "normal")]
    pub importance: String,

    /// context 标签（如 opt-in）
    #[arg(long, short)]
    pub context: Option<String>,

    /// 服务地址
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    pub server: String,

    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

/// 处理 send 命令
pub async fn handle_send(args: SendArgs) -> Result<()> {
    let api = NotificationApi::new(&args.server)?;
    let request = CreateNotificationRequest {
        user_id: args.user,
        message: args.message,
        importance: args.importance,
        context: args.context,
    };

    let response = match api.create_notification(&request).await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", render_toast(&e.to_string(), ToastKind::Error));
            return Err(e);
        }
    };

    if args.json {
        println!("{}", to_pretty_json(&response));
        return Ok(());
    }

    let failed = response
        .deliveries
        .iter()
        .filter(|d| d.status == DeliveryStatus::Failed)
        .count();
    let kind = if failed == 0 { ToastKind::Success } else { ToastKind::Error };
    println!(
        "{}",
        render_toast(
            &format!(
                "notification {} -> {}",
                response.id,
                format_channels(&response.channels)
            ),
            kind
        )
    );
    for delivery in &response.deliveries {
        match &delivery.reason {
            Some(reason) => println!("  {:<7} {:?}: {}", delivery.channel.as_str(), delivery.status, reason),
            None => println!("  {:<7} {:?}", delivery.channel.as_str(), delivery.status),
        }
    }
    Ok(())
}
