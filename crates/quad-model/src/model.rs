//! 关节模型
//!
//! 12 个关节的只读标定：舵机通道、中位角、限位区间。启动时由 [`RobotConfig`] 构建并完整校验，
//! 之后在整个进程生命周期内不变。

use crate::clamp::SafetyClamp;
use crate::config::{ACTUATOR_RANGE, JointCalibration, RobotConfig};
use crate::direction::DirectionTable;
use crate::error::ConfigError;
use crate::types::{AxisArray, JointId, JointTable, LegArray};
use std::collections::HashMap;

/// 单个关节的标定规格
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointSpec {
    pub channel: u8,
    pub neutral: f64,
    pub min: f64,
    pub max: f64,
}

impl JointSpec {
    /// 角度是否在限位内（含端点）
    #[inline]
    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.min && angle <= self.max
    }

    fn validate(id: JointId, calibration: JointCalibration) -> Result<Self, ConfigError> {
        let JointCalibration {
            channel,
            neutral,
            min,
            max,
        } = calibration;

        let (lo, hi) = ACTUATOR_RANGE;
        if !min.is_finite() || !max.is_finite() || min > max || min < lo || max > hi {
            return Err(ConfigError::InvalidBounds { joint: id, min, max });
        }
        if !neutral.is_finite() || neutral < min || neutral > max {
            return Err(ConfigError::NeutralOutOfBounds {
                joint: id,
                neutral,
                min,
                max,
            });
        }

        Ok(Self {
            channel,
            neutral,
            min,
            max,
        })
    }
}

/// 关节模型（12 个关节的规格表）
#[derive(Debug, Clone, PartialEq)]
pub struct JointModel {
    specs: JointTable<JointSpec>,
}

impl JointModel {
    /// 由标定表构建并校验
    ///
    /// 检查项：
    /// - 限位区间有限、`min <= max`、位于舵机行程 `[0, 180]` 内
    /// - 中位角位于自身限位内
    /// - 舵机通道不重复
    pub fn new(calibration: &JointTable<JointCalibration>) -> Result<Self, ConfigError> {
        let specs: JointTable<JointSpec> = LegArray::try_from_fn(|leg| {
            AxisArray::try_from_fn(|axis| {
                let id = JointId::new(leg, axis);
                JointSpec::validate(id, calibration[id])
            })
        })?;

        let mut channels: HashMap<u8, JointId> = HashMap::new();
        for id in JointId::all() {
            let channel = specs[id].channel;
            if let Some(first) = channels.insert(channel, id) {
                return Err(ConfigError::DuplicateChannel {
                    channel,
                    first,
                    second: id,
                });
            }
        }

        Ok(Self { specs })
    }

    #[inline]
    pub fn spec(&self, id: JointId) -> &JointSpec {
        &self.specs[id]
    }

    #[inline]
    pub fn neutral(&self, id: JointId) -> f64 {
        self.specs[id].neutral
    }

    #[inline]
    pub fn channel(&self, id: JointId) -> u8 {
        self.specs[id].channel
    }

    /// 所有关节的中位角
    pub fn neutral_table(&self) -> JointTable<f64> {
        self.specs.map(|axes| axes.map(|spec| spec.neutral))
    }

    /// 按腿、轴顺序迭代
    pub fn iter(&self) -> impl Iterator<Item = (JointId, &JointSpec)> + '_ {
        JointId::all().map(move |id| (id, &self.specs[id]))
    }
}

/// 只读机器人模型：关节模型 + 方向符号表 + 安全限位
#[derive(Debug, Clone)]
pub struct RobotModel {
    pub joints: JointModel,
    pub directions: DirectionTable,
    pub clamp: SafetyClamp,
}

impl RobotModel {
    pub fn new(joints: JointModel, directions: DirectionTable) -> Self {
        let clamp = SafetyClamp::new(&joints);
        Self {
            joints,
            directions,
            clamp,
        }
    }

    /// 从配置构建（完整校验标定与方向表）
    pub fn from_config(config: &RobotConfig) -> Result<Self, ConfigError> {
        let joints = JointModel::new(&config.calibration_table()?)?;
        let directions = config.direction_table()?;
        Ok(Self::new(joints, directions))
    }

    /// 默认标定
    pub fn default_model() -> Result<Self, ConfigError> {
        Self::from_config(&RobotConfig::default_config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JointAxis, Leg};

    fn default_calibration() -> JointTable<JointCalibration> {
        RobotConfig::default_config().calibration_table().unwrap()
    }

    #[test]
    fn test_default_model_values() {
        let model = JointModel::new(&default_calibration()).unwrap();
        let fr_tibia = JointId::new(Leg::FrontRight, JointAxis::Tibia);
        assert_eq!(model.channel(fr_tibia), 3);
        assert_eq!(model.neutral(fr_tibia), 82.0);
        assert_eq!(model.spec(fr_tibia).min, 65.0);
        assert_eq!(model.spec(fr_tibia).max, 100.0);
        assert_eq!(model.iter().count(), 12);

        let neutral = model.neutral_table();
        assert_eq!(neutral[Leg::BackRight][JointAxis::Femur], 42.0);
    }

    #[test]
    fn test_neutral_outside_bounds_is_rejected() {
        let mut calibration = default_calibration();
        let id = JointId::new(Leg::BackLeft, JointAxis::Femur);
        calibration[id].neutral = 170.0;

        let err = JointModel::new(&calibration).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NeutralOutOfBounds { joint, neutral, .. }
                if joint == id && neutral == 170.0
        ));
    }

    #[test]
    fn test_inverted_or_out_of_range_bounds() {
        let id = JointId::new(Leg::FrontLeft, JointAxis::Hip);

        let mut calibration = default_calibration();
        calibration[id].min = 130.0;
        assert!(matches!(
            JointModel::new(&calibration).unwrap_err(),
            ConfigError::InvalidBounds { joint, .. } if joint == id
        ));

        let mut calibration = default_calibration();
        calibration[id].max = 200.0;
        assert!(matches!(
            JointModel::new(&calibration).unwrap_err(),
            ConfigError::InvalidBounds { .. }
        ));

        let mut calibration = default_calibration();
        calibration[id].min = f64::NAN;
        assert!(JointModel::new(&calibration).is_err());
    }

    #[test]
    fn test_duplicate_channel() {
        let mut calibration = default_calibration();
        calibration[Leg::BackRight][JointAxis::Tibia].channel = 0;

        let err = JointModel::new(&calibration).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DuplicateChannel { channel: 0, first, second }
                if first == JointId::new(Leg::FrontLeft, JointAxis::Tibia)
                    && second == JointId::new(Leg::BackRight, JointAxis::Tibia)
        ));
    }

    #[test]
    fn test_robot_model_from_default_config() {
        let model = RobotModel::default_model().unwrap();
        let id = JointId::new(Leg::FrontLeft, JointAxis::Femur);
        assert_eq!(model.clamp.clamp(id, 141.0).value(), 141.0);
        assert_eq!(model.clamp.clamp(id, 500.0).value(), 160.0);
    }
}
