//! 步态层错误类型定义

use crate::sequencer::SequencerState;
use quad_driver::DriverError;
use quad_model::{ConfigError, LegSet};
use thiserror::Error;

/// 步态层错误类型
#[derive(Error, Debug)]
pub enum GaitError {
    /// 配置错误（标定或参数无效）
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 驱动层错误（执行器失败）
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// 相位会让机器人失去支撑
    #[error("Unstable phase: swing legs {swing} leave stance legs {stance}")]
    UnstablePhase { swing: LegSet, stance: LegSet },

    /// 当前状态不允许该操作
    #[error("Invalid transition: cannot {event} while {from}")]
    InvalidTransition {
        from: SequencerState,
        event: &'static str,
    },

    /// 步态计划没有任何相位
    #[error("Gait plan has no phases")]
    EmptyPlan,
}

impl GaitError {
    /// 是否为致命错误（需要人工介入）
    ///
    /// 配置错误和设备不可用是致命的；非法状态转换只是调用方的用法错误。
    pub fn is_fatal(&self) -> bool {
        match self {
            GaitError::Config(_) => true,
            GaitError::Driver(e) => e.is_fatal(),
            GaitError::UnstablePhase { .. } | GaitError::EmptyPlan => true,
            GaitError::InvalidTransition { .. } => false,
        }
    }
}
