//! Route 命令 - 本地预览路由结果，不发送

use anyhow::Result;
use clap::Args;

use super::output::{format_channels, to_pretty_json};
use crate::notification::{route, Channel, Importance};
use crate::preference::UserPreference;

/// Route 命令参数
#[derive(Args, Debug)]
pub struct RouteArgs {
    /// 重要程度: low, normal, high
    #[arg(long, short)]
    pub importance: String,

    /// context 标签（如 opt-in）
    #[arg(long, short)]
    pub context: Option<String>,

    /// 用户允许的渠道（逗号分隔）
    #[arg(long, value_delimiter = ',', default_value = "email,sms,in-app")]
    pub channels: Vec<String>,

    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

/// 计算路由结果
pub fn resolve(args: &RouteArgs) -> Result<Vec<Channel>> {
    let importance: Importance = args.importance.parse()?;
    let allowed = args
        .channels
        .iter()
        .filter(|c| !c.trim().is_empty())
        .map(|c| c.parse::<Channel>())
        .collect::<Result<Vec<_>, _>>()?;

    let preference = UserPreference::new("cli", allowed);
    Ok(route(importance, args.context.as_deref(), &preference))
}

/// 处理 route 命令
pub fn handle_route(args: RouteArgs) -> Result<()> {
    let channels = resolve(&args)?;
    if args.json {
        println!("{}", to_pretty_json(&channels));
    } else {
        println!("{}", format_channels(&channels));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(importance: &str, context: Option<&str>, channels: &[&str]) -> RouteArgs {
        RouteArgs {
            importance: importance.to_string(),
            context: context.map(str::to_string),
            channels: channels.iter().map(|c| c.to_string()).collect(),
            json: false,
        }
    }

    #[test]
    fn test_resolve() {
        let channels = resolve(&args("low", Some("opt-in"), &["email", "sms", "in-app"])).unwrap();
        assert_eq!(channels, vec![Channel::InApp, Channel::Email, Channel::Sms]);
    }

    #[test]
    fn test_resolve_rejects_bad_input() {
        assert!(resolve(&args("urgent", None, &["email"])).is_err());
        assert!(resolve(&args("high", None, &["pager"])).is_err());
    }

    #[test]
    fn test_resolve_empty_channels() {
        assert!(resolve(&args("high", None, &[""])).unwrap().is_empty());
    }
}
