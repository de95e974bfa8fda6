//! # Quad CLI
//!
//! 四足机器人步态控制命令行工具。
//!
//! ```bash
//! # 生成默认标定文件（~/.config/quad/robot.toml）
//! quad-cli config init
//!
//! # 小跑，Ctrl+C 停止并回到中位角
//! quad-cli walk --gait trot
//!
//! # 爬行 2 个周期（不询问确认）
//! quad-cli walk --gait crawl --cycles 2 --yes
//!
//! # 所有关节回到中位角
//! quad-cli neutral
//! ```
//!
//! 未接入舵机驱动板时使用日志执行器：每条舵机命令以 `debug!` 输出
//! （`RUST_LOG=quad_driver=debug` 查看）。

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{ConfigCommand, NeutralCommand, WalkCommand};

/// Quad CLI - 四足机器人命令行工具
#[derive(Parser, Debug)]
#[command(name = "quad-cli")]
#[command(about = "Command-line interface for quadruped gait control", long_about = None)]
#[command(version)]
struct Cli {
    /// 标定文件路径（默认 ~/.config/quad/robot.toml，不存在时使用内置标定）
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 覆盖插值步之间的延时（毫秒）
    #[arg(long, global = true)]
    delay_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 运行步态
    Walk {
        #[command(flatten)]
        args: WalkCommand,
    },

    /// 所有关节回到中位角
    Neutral {
        #[command(flatten)]
        args: NeutralCommand,
    },

    /// 标定文件管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    // 初始化日志（默认显示限位饱和告警）
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,quad_cli=info")),
        )
        .init();

    let cli = Cli::parse();
    let options = commands::GlobalOptions {
        config: cli.config,
        delay_ms: cli.delay_ms,
    };

    match cli.command {
        Commands::Walk { args } => args.execute(&options),
        Commands::Neutral { args } => args.execute(&options),
        Commands::Config(cmd) => cmd.execute(&options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use quad_client::GaitFamily;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_walk_with_globals() {
        let cli = Cli::try_parse_from([
            "quad-cli", "walk", "--gait", "crawl", "--cycles", "2", "--yes", "--delay-ms", "0",
            "--config", "robot.toml",
        ])
        .unwrap();

        assert_eq!(cli.delay_ms, Some(0));
        assert_eq!(cli.config, Some(PathBuf::from("robot.toml")));
        match cli.command {
            Commands::Walk { args } => {
                assert_eq!(args.gait, GaitFamily::Crawl);
                assert_eq!(args.cycles, Some(2));
                assert_eq!(args.steps, None);
                assert!(args.yes);
            },
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_walk_defaults_to_trot() {
        let cli = Cli::try_parse_from(["quad-cli", "walk"]).unwrap();
        match cli.command {
            Commands::Walk { args } => {
                assert_eq!(args.gait, GaitFamily::Trot);
                assert!(!args.yes);
            },
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_gait() {
        assert!(Cli::try_parse_from(["quad-cli", "walk", "--gait", "gallop"]).is_err());
    }

    #[test]
    fn test_parse_config_subcommands() {
        let cli = Cli::try_parse_from(["quad-cli", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommand::Init { force: true })
        ));

        let cli = Cli::try_parse_from(["quad-cli", "config", "show", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommand::Show { json: true })
        ));
    }
}
