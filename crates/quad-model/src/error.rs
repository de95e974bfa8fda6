//! 配置错误类型
//!
//! 所有变体都是**致命**的：标定或步态参数有误时引擎不得启动。

use crate::types::{JointAxis, JointId, Leg};
use thiserror::Error;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// TOML 解析失败
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML 序列化失败
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// 文件读写失败
    #[error("Configuration I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 未知的腿名称
    #[error("Unknown leg '{0}'")]
    UnknownLeg(String),

    /// 腿引用了不属于它的关节轴
    #[error("Leg {leg} references unknown joint axis '{axis}'")]
    UnknownAxis {
        leg: Leg,
        axis: String,
    },

    /// 方向符号表中未知的关节轴
    #[error("Unknown joint axis '{0}' in direction table")]
    UnknownDirectionAxis(String),

    /// 同一关节出现了多个条目（如 `FL` 与 `front_left` 并存）
    #[error("Duplicate {table} entry for {axis} on leg {leg}")]
    DuplicateEntry {
        table: &'static str,
        leg: Leg,
        axis: JointAxis,
    },

    /// 缺少关节标定
    #[error("Missing calibration for joint {0}")]
    MissingJoint(JointId),

    /// 缺少方向符号
    #[error("Missing direction sign for {axis} on leg {leg}")]
    MissingDirection {
        leg: Leg,
        axis: JointAxis,
    },

    /// 方向符号不是 ±1
    #[error("Direction sign for {axis} on leg {leg} must be +1 or -1, got {value}")]
    InvalidDirection {
        leg: Leg,
        axis: JointAxis,
        value: i64,
    },

    /// 限位区间无效
    #[error("Invalid bounds for joint {joint}: [{min}, {max}]")]
    InvalidBounds {
        joint: JointId,
        min: f64,
        max: f64,
    },

    /// 中位角超出自身限位
    #[error("Neutral angle {neutral} of joint {joint} lies outside [{min}, {max}]")]
    NeutralOutOfBounds {
        joint: JointId,
        neutral: f64,
        min: f64,
        max: f64,
    },

    /// 两个关节共用同一舵机通道
    #[error("Channel {channel} is assigned to both {first} and {second}")]
    DuplicateChannel {
        channel: u8,
        first: JointId,
        second: JointId,
    },

    /// 步态或运动参数无效
    #[error("Invalid tuning parameter '{param}': {reason}")]
    InvalidTuning {
        param: String,
        reason: String,
    },
}

impl ConfigError {
    /// 构造参数错误
    pub fn tuning(param: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTuning {
            param: param.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::NeutralOutOfBounds {
            joint: JointId::new(Leg::FrontLeft, JointAxis::Tibia),
            neutral: 130.0,
            min: 70.0,
            max: 110.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("FL.T"), "message: {}", msg);
        assert!(msg.contains("130"), "message: {}", msg);

        let err = ConfigError::tuning("trot.step_count", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid tuning parameter 'trot.step_count': must be at least 1"
        );
    }
}
