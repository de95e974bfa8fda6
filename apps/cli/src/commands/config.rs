//! 标定文件管理命令
//!
//! 标定文件为 TOML 格式，默认位于 `<config_dir>/quad/robot.toml`。

use super::{GlobalOptions, default_config_path, load_config};
use anyhow::{Context, Result, bail};
use clap::Subcommand;
use quad_model::RobotConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 写入默认标定文件
    Init {
        /// 覆盖已存在的文件
        #[arg(short, long)]
        force: bool,
    },

    /// 打印当前生效的标定
    Show {
        /// 以 JSON 格式输出
        #[arg(long)]
        json: bool,
    },

    /// 校验标定文件
    Check,
}

impl ConfigCommand {
    pub fn execute(&self, options: &GlobalOptions) -> Result<()> {
        match self {
            ConfigCommand::Init { force } => {
                let path = target_path(options)?;
                init_at(&path, *force)?;
                println!("✅ 已写入默认标定: {}", path.display());
                Ok(())
            },

            ConfigCommand::Show { json } => {
                let config = load_config(options)?;
                println!("{}", render(&config, *json)?);
                Ok(())
            },

            ConfigCommand::Check => {
                let path = target_path(options)?;
                println!("标定文件: {}", path.display());
                let config = check_at(&path)?;
                println!("✅ 标定有效");
                println!(
                    "  小跑: 推动 {}°，抬腿 {}°，补偿系数 {}，{} 步",
                    config.trot.femur_push,
                    config.trot.tibia_lift,
                    config.trot.compensation_ratio,
                    config.trot.step_count
                );
                println!(
                    "  爬行: 抬腿 {}°，摆腿 {}°，重心偏移 {}°，机身降低 {}°，{} 步",
                    config.crawl.tibia_lift,
                    config.crawl.femur_swing,
                    config.crawl.hip_shift,
                    config.crawl.body_lower,
                    config.crawl.step_count
                );
                Ok(())
            },
        }
    }
}

/// `--config` 指定的路径，否则默认路径
fn target_path(options: &GlobalOptions) -> Result<PathBuf> {
    match &options.config {
        Some(path) => Ok(path.clone()),
        None => default_config_path(),
    }
}

/// 写入默认标定（已存在且未指定 `force` 时拒绝覆盖）
pub fn init_at(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("标定文件已存在: {}（使用 --force 覆盖）", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("创建配置目录失败")?;
    }
    RobotConfig::default_config()
        .save_to_file(path)
        .with_context(|| format!("写入标定文件失败: {}", path.display()))?;
    Ok(())
}

/// 加载并完整校验标定文件
pub fn check_at(path: &Path) -> Result<RobotConfig> {
    let config = RobotConfig::load_from_file(path)
        .with_context(|| format!("标定文件无效: {}", path.display()))?;
    Ok(config)
}

fn render(config: &RobotConfig, json: bool) -> Result<String> {
    if json {
        serde_json::to_string_pretty(config).context("序列化标定失败")
    } else {
        config.to_toml_string().context("序列化标定失败")
    }
}
