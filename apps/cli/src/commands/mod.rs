//! 命令定义和实现

pub mod config;
pub mod neutral;
pub mod walk;

pub use config::ConfigCommand;
pub use neutral::NeutralCommand;
pub use walk::WalkCommand;

use anyhow::{Context, Result};
use quad_client::GaitController;
use quad_driver::LogActuator;
use quad_model::RobotConfig;
use std::path::{Path, PathBuf};
use tracing::info;

/// 所有子命令共享的全局选项
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub delay_ms: Option<u64>,
}

/// 默认标定文件路径：`<config_dir>/quad/robot.toml`
pub fn default_config_path() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;
    path.push("quad");
    path.push("robot.toml");
    Ok(path)
}

/// 确定要加载的标定文件
///
/// 命令行参数优先；否则使用默认路径（仅当文件存在时）；都没有时返回 `None`（内置标定）。
pub fn resolve_config_path(explicit: Option<&Path>, default: Option<PathBuf>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default.filter(|path| path.exists()),
    }
}

/// 加载标定（并应用 `--delay-ms` 覆盖）
pub fn load_config(options: &GlobalOptions) -> Result<RobotConfig> {
    let default = default_config_path().ok();
    let mut config = match resolve_config_path(options.config.as_deref(), default) {
        Some(path) => {
            info!(path = %path.display(), "Loading calibration");
            RobotConfig::load_from_file(&path)
                .with_context(|| format!("加载标定文件失败: {}", path.display()))?
        },
        None => {
            info!("No calibration file found, using built-in calibration");
            RobotConfig::default_config()
        },
    };

    if let Some(delay_ms) = options.delay_ms {
        config.motion.step_delay_ms = delay_ms;
    }
    Ok(config)
}

/// 构建控制器
///
/// ⚠️ 舵机驱动板不在本工具范围内：命令经日志执行器输出。
pub fn build_controller(config: &RobotConfig) -> Result<GaitController<LogActuator>> {
    let controller =
        GaitController::from_config(LogActuator::new(), config).context("构建步态控制器失败")?;
    Ok(controller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_path_wins() {
        let resolved = resolve_config_path(
            Some(Path::new("custom.toml")),
            Some(PathBuf::from("/nonexistent/robot.toml")),
        );
        assert_eq!(resolved, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn test_default_path_used_only_when_present() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("robot.toml");

        assert_eq!(resolve_config_path(None, Some(path.clone())), None);

        fs::write(&path, "").unwrap();
        assert_eq!(resolve_config_path(None, Some(path.clone())), Some(path));
        assert_eq!(resolve_config_path(None, None), None);
    }

    #[test]
    fn test_load_config_applies_delay_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("robot.toml");
        RobotConfig::default_config().save_to_file(&path).unwrap();

        let options = GlobalOptions {
            config: Some(path),
            delay_ms: Some(0),
        };
        let config = load_config(&options).unwrap();
        assert_eq!(config.motion.step_delay_ms, 0);
        assert_eq!(config.trot, RobotConfig::default_config().trot);
    }

    #[test]
    fn test_load_config_reports_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let options = GlobalOptions {
            config: Some(dir.path().join("missing.toml")),
            delay_ms: None,
        };
        let err = load_config(&options).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));
    }
}
