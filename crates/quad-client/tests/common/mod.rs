//! 集成测试辅助函数

#![allow(dead_code)]

use crossbeam_channel::Receiver;
use quad_client::GaitController;
use quad_driver::{ActuatorCommand, AsyncCommandRecorder, CommandLog, MockActuator};
use quad_model::{JointId, RobotConfig};
use std::sync::Arc;

/// 无延时的默认配置
pub fn test_config() -> RobotConfig {
    let mut config = RobotConfig::default_config();
    config.motion.step_delay_ms = 0;
    config.motion.dwell_ms = 0;
    config
}

/// 测试环境：控制器 + 执行器日志 + 命令录制
pub struct TestRig {
    pub controller: GaitController<MockActuator>,
    pub log: CommandLog,
    pub commands: Receiver<ActuatorCommand>,
}

impl TestRig {
    pub fn new(config: &RobotConfig) -> Self {
        let actuator = MockActuator::new();
        let log = actuator.log();
        let mut controller = GaitController::from_config(actuator, config).unwrap();
        let (recorder, commands) = AsyncCommandRecorder::with_capacity(1_000_000);
        controller.driver_mut().hooks_mut().add_callback(Arc::new(recorder));
        Self {
            controller,
            log,
            commands,
        }
    }

    /// 取出自上次调用以来录制的命令
    pub fn drain(&self) -> Vec<ActuatorCommand> {
        self.commands.try_iter().collect()
    }

    pub fn angle(&self, joint: JointId) -> f64 {
        self.controller.driver().angle(joint)
    }

    pub fn neutral(&self, joint: JointId) -> f64 {
        self.controller.model().joints.neutral(joint)
    }

    /// 断言所有关节都在限位内
    pub fn assert_within_bounds(&self) {
        for joint in JointId::all() {
            let (min, max) = self.controller.model().clamp.bounds(joint);
            let angle = self.angle(joint);
            assert!(
                angle >= min && angle <= max,
                "{} = {} outside [{}, {}]",
                joint,
                angle,
                min,
                max
            );
        }
    }

    /// 断言所有关节都在中位角
    pub fn assert_at_neutral(&self) {
        for joint in JointId::all() {
            assert_eq!(self.angle(joint), self.neutral(joint), "joint {}", joint);
        }
    }
}
