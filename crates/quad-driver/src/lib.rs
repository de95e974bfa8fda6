//! # Quad Driver
//!
//! 四足机器人的运动驱动层：
//! - 执行器接口（[`Actuator`]）与空跑后端
//! - 平滑运动驱动器：多关节同步插值、低抖动延时
//! - 钩子系统：命令录制、自定义回调
//!
//! 大多数用户应该使用 `quad-client` 提供的步态接口。

pub mod actuator;
pub mod driver;
mod error;
pub mod hooks;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod recording;

pub use actuator::{Actuator, LogActuator};
pub use driver::{InterpolationMode, MotionDriver, MotionSettings};
pub use error::{ActuatorError, DriverError};
pub use hooks::{ActuatorCommand, HookManager, MotionCallback};
#[cfg(any(test, feature = "mock"))]
pub use mock::{CommandLog, MockActuator, RecordedCommand};
pub use recording::AsyncCommandRecorder;
