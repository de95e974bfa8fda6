//! 驱动层错误类型定义

use quad_model::JointId;
use thiserror::Error;

/// 执行器（舵机驱动板）错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActuatorError {
    /// 设备不可用（断开、未上电）
    #[error("Actuator unavailable: {0}")]
    Unavailable(String),

    /// 单次写入失败
    #[error("Actuator I/O error: {0}")]
    Io(String),
}

impl ActuatorError {
    /// 设备级故障，继续发送命令没有意义
    pub fn is_fatal(&self) -> bool {
        matches!(self, ActuatorError::Unavailable(_))
    }
}

/// 驱动层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DriverError {
    /// 执行器命令失败，运动已中止
    ///
    /// 失败关节保持上一次成功下发的角度；驱动层不重试。
    #[error("Actuator command for {joint} (channel {channel}) failed: {source}")]
    Actuator {
        joint: JointId,
        channel: u8,
        #[source]
        source: ActuatorError,
    },
}

impl DriverError {
    pub fn is_fatal(&self) -> bool {
        match self {
            DriverError::Actuator { source, .. } => source.is_fatal(),
        }
    }

    /// 出错的关节
    pub fn joint(&self) -> JointId {
        match self {
            DriverError::Actuator { joint, .. } => *joint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quad_model::{JointAxis, Leg};

    #[test]
    fn test_driver_error_display() {
        let err = DriverError::Actuator {
            joint: JointId::new(Leg::BackLeft, JointAxis::Femur),
            channel: 7,
            source: ActuatorError::Io("bus NAK".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("BL.F"), "message: {}", msg);
        assert!(msg.contains("channel 7"), "message: {}", msg);
        assert!(msg.contains("bus NAK"), "message: {}", msg);
        assert!(!err.is_fatal());
        assert_eq!(err.joint(), JointId::new(Leg::BackLeft, JointAxis::Femur));
    }

    #[test]
    fn test_actuator_error_fatality() {
        assert!(ActuatorError::Unavailable("unplugged".into()).is_fatal());
        assert!(!ActuatorError::Io("timeout".into()).is_fatal());
        assert_eq!(
            ActuatorError::Unavailable("unplugged".into()).to_string(),
            "Actuator unavailable: unplugged"
        );
    }
}
