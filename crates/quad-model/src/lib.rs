//! # Quad Model
//!
//! 四足舵机机器人的静态模型层：腿/关节标识、标定配置、方向符号表与安全限位。
//!
//! 本 crate 不做任何 I/O（除加载配置文件外），所有数据在启动时构建、运行期只读。
//!
//! # 示例
//!
//! ```rust
//! use quad_model::{JointAxis, JointId, Leg, RobotConfig};
//!
//! let model = RobotConfig::default_config().build_model().unwrap();
//! let id = JointId::new(Leg::FrontLeft, JointAxis::Tibia);
//! assert_eq!(model.clamp.clamp(id, 200.0).value(), 110.0);
//! ```

pub mod clamp;
pub mod config;
pub mod direction;
pub mod error;
pub mod model;
pub mod types;

pub use clamp::{BoundedAngle, SafetyClamp};
pub use config::{
    CrawlTuning, Interpolation, JointCalibration, MotionTuning, RobotConfig, TrotTuning,
};
pub use direction::{Direction, DirectionTable};
pub use error::ConfigError;
pub use model::{JointModel, JointSpec, RobotModel};
pub use types::{AxisArray, JointAxis, JointId, JointTable, Leg, LegArray, LegSet, Side};
