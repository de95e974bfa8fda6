//! 执行器接口
//!
//! 引擎只认识一个操作：把某个通道的舵机转到给定角度。PWM、总线、驱动板初始化都属于
//! 外部硬件层，通过实现 [`Actuator`] 接入。
//!
//! 调用被视为"尽力发送、无应答"：返回 `Ok` 即认为命令在下一条指令执行前生效。

use crate::error::ActuatorError;
use tracing::debug;

/// 执行器 Trait
pub trait Actuator: Send {
    /// 把 `channel` 上的舵机转到 `degrees`（度）
    fn set_angle(&mut self, channel: u8, degrees: f64) -> Result<(), ActuatorError>;

    /// 后端名称（日志用）
    fn name(&self) -> &str {
        "actuator"
    }
}

impl<A: Actuator + ?Sized> Actuator for Box<A> {
    fn set_angle(&mut self, channel: u8, degrees: f64) -> Result<(), ActuatorError> {
        (**self).set_angle(channel, degrees)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// 空跑后端：不接硬件，只把每条命令写入 `debug!` 日志
#[derive(Debug, Default)]
pub struct LogActuator {
    commands: u64,
}

impl LogActuator {
    pub const fn new() -> Self {
        Self { commands: 0 }
    }

    /// 已接收的命令数
    pub fn commands(&self) -> u64 {
        self.commands
    }
}

impl Actuator for LogActuator {
    fn set_angle(&mut self, channel: u8, degrees: f64) -> Result<(), ActuatorError> {
        self.commands += 1;
        debug!(channel, degrees = format_args!("{:.2}", degrees), "set_angle");
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_actuator_counts_commands() {
        let mut actuator = LogActuator::new();
        actuator.set_angle(0, 90.0).unwrap();
        actuator.set_angle(11, 42.5).unwrap();
        assert_eq!(actuator.commands(), 2);
        assert_eq!(actuator.name(), "log");
    }

    #[test]
    fn test_boxed_actuator_delegates() {
        let mut boxed: Box<dyn Actuator> = Box::new(LogActuator::new());
        boxed.set_angle(3, 80.0).unwrap();
        assert_eq!(boxed.name(), "log");
    }
}
