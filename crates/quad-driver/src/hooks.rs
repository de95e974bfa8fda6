//! 钩子系统（Hook System）
//!
//! 在运动驱动器下发舵机命令时触发自定义回调，用于录制、监控和测试断言。
//!
//! # 设计原则
//!
//! - **非阻塞**: 回调运行在运动循环内，必须快速返回；耗时处理交给 Channel 另一端
//! - **只观察**: 回调不能修改命令，也不能中止运动
//!
//! # 使用示例
//!
//! ```rust
//! use quad_driver::hooks::{HookManager, MotionCallback};
//! use quad_driver::recording::AsyncCommandRecorder;
//! use std::sync::Arc;
//!
//! let mut hooks = HookManager::new();
//! let (recorder, _rx) = AsyncCommandRecorder::new();
//! hooks.add_callback(Arc::new(recorder) as Arc<dyn MotionCallback>);
//! assert_eq!(hooks.len(), 1);
//! ```

use quad_model::JointId;
use std::sync::Arc;

/// 一条已成功下发的舵机命令
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuatorCommand {
    pub joint: JointId,
    pub channel: u8,
    /// 下发角度（度，已限位）
    pub degrees: f64,
    /// 所属插值步（从 1 开始；直接下发的命令为 0）
    pub iteration: u32,
}

/// 运动回调 Trait
pub trait MotionCallback: Send + Sync {
    /// 执行器接受命令后调用
    ///
    /// 仅在 `set_angle` 返回 `Ok` 后触发，失败的命令不会出现在这里。
    fn on_command_sent(&self, command: &ActuatorCommand);

    /// 一个插值步的所有关节命令都已下发后调用（可选）
    fn on_iteration_complete(&self, iteration: u32, total: u32) {
        let _ = (iteration, total);
    }
}

/// 钩子管理器
#[derive(Default)]
pub struct HookManager {
    callbacks: Vec<Arc<dyn MotionCallback>>,
}

impl HookManager {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }

    /// 添加回调
    pub fn add_callback(&mut self, callback: Arc<dyn MotionCallback>) {
        self.callbacks.push(callback);
    }

    /// 移除所有回调
    pub fn clear(&mut self) {
        self.callbacks.clear();
    }

    /// 触发所有命令回调
    pub fn trigger_command(&self, command: &ActuatorCommand) {
        for callback in self.callbacks.iter() {
            callback.on_command_sent(command);
        }
    }

    /// 触发所有插值步回调
    pub fn trigger_iteration(&self, iteration: u32, total: u32) {
        for callback in self.callbacks.iter() {
            callback.on_iteration_complete(iteration, total);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl std::fmt::Debug for HookManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookManager")
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}
