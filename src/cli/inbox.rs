//! Inbox 命令 - 查看收件箱、标记已读、轮询

use anyhow::Result;
use clap::Args;
use std::time::Duration;

use super::output::to_pretty_json;
use crate::client::{
    render_bell, render_inbox, render_toast, NotificationApi, NotificationFeed, ToastKind,
    DEFAULT_SERVER_URL,
};

/// Inbox 命令参数
#[derive(Args, Debug)]
pub struct InboxArgs {
    /// 服务地址
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    pub server: String,

    /// 只显示该用户的通知
    #[arg(long, short)]
    pub user: Option<String>,

    /// 标记指定通知为已读
    #[arg(long)]
    pub read: Option<String>,

    /// 轮询间隔（秒）
    #[arg(long)]
    pub watch: Option<u64>,

    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

/// 处理 inbox 命令
pub async fn handle_inbox(args: InboxArgs) -> Result<()> {
    let mut api = NotificationApi::new(&args.server)?;
    if let Some(user) = &args.user {
        api = api.with_user(user.clone());
    }

    let feed = NotificationFeed::mount(api).await?;

    if let Some(id) = &args.read {
        match feed.mark_as_read(id).await {
            Ok(_) => println!("{}", render_toast(&format!("marked {id} as read"), ToastKind::Success)),
            Err(e) => {
                println!("{}", render_toast(&e.to_string(), ToastKind::Error));
                return Err(e);
            }
        }
    }

    if args.json {
        println!("{}", to_pretty_json(&feed.notifications()));
    } else {
        print_feed(&feed.notifications(), feed.unread_count());
    }

    let Some(secs) = args.watch else {
        return Ok(());
    };

    let mut updates = feed.subscribe();
    let poll = feed.watch(Duration::from_secs(secs.max(1)));
    tokio::pin!(poll);

    loop {
        tokio::select! {
            _ = &mut poll => break,
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                if !state.loading {
                    print_feed(&state.notifications, state.unread_count());
                }
            }
        }
    }
    Ok(())
}

fn print_feed(items: &[crate::notification::NotificationItem], unread: usize) {
    println!("{}", render_bell(unread));
    print!("{}", render_inbox(items));
}
