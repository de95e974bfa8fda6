//! # 机器人配置
//!
//! 标定常量（中位角、限位、通道、方向符号）与步态/运动参数，统一存放在一个 TOML 文件中。
//! 标定值由离线标定工具产生，引擎只读取，不在运行期修改。
//!
//! ## 文件格式
//!
//! ```toml
//! [legs.front_left]
//! hip   = { channel = 2, neutral = 100.0, min = 80.0,  max = 120.0 }
//! femur = { channel = 1, neutral = 141.0, min = 110.0, max = 160.0 }
//! tibia = { channel = 0, neutral = 90.0,  min = 70.0,  max = 110.0 }
//!
//! [direction.femur]
//! front_left = 1
//! front_right = -1
//!
//! [trot]
//! femur_push = 8.0
//! tibia_lift = 10.0
//! ```

use crate::direction::DirectionTable;
use crate::error::ConfigError;
use crate::model::RobotModel;
use crate::types::{AxisArray, JointAxis, JointId, JointTable, Leg, LegArray, Side};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// 舵机可达的角度范围（度）
pub const ACTUATOR_RANGE: (f64, f64) = (0.0, 180.0);

/// 单个关节的标定
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JointCalibration {
    /// 舵机驱动板通道
    pub channel: u8,
    /// 中位角（实测，不假定为 90°）
    pub neutral: f64,
    /// 下限（度）
    pub min: f64,
    /// 上限（度）
    pub max: f64,
}

impl JointCalibration {
    pub const fn new(channel: u8, neutral: f64, min: f64, max: f64) -> Self {
        Self {
            channel,
            neutral,
            min,
            max,
        }
    }
}

/// 小跑步态参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrotTuning {
    /// 支撑腿大腿后推幅度（度）
    pub femur_push: f64,
    /// 摆动腿小腿抬起幅度（度）
    pub tibia_lift: f64,
    /// 小腿补偿比例：支撑腿小腿伸展 = 比例 × 大腿后推幅度
    ///
    /// 经验常数，用来近似保持足端触地，并非几何推导。
    pub compensation_ratio: f64,
    /// 每个子动作的插值步数
    pub step_count: u32,
}

impl Default for TrotTuning {
    fn default() -> Self {
        Self {
            femur_push: 8.0,
            tibia_lift: 10.0,
            compensation_ratio: 0.5,
            step_count: 10,
        }
    }
}

/// 爬行步态参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrawlTuning {
    /// 抬腿幅度（度）
    pub tibia_lift: f64,
    /// 前摆幅度（度）
    pub femur_swing: f64,
    /// 重心转移时其余三条腿的髋关节偏转（度）
    pub hip_shift: f64,
    /// 机身降低量：站立时所有小腿额外屈曲的角度（度），0 表示不降低
    pub body_lower: f64,
    /// 每个子动作的插值步数
    pub step_count: u32,
}

impl Default for CrawlTuning {
    fn default() -> Self {
        Self {
            tibia_lift: 8.0,
            femur_swing: 6.0,
            hip_shift: 4.0,
            body_lower: 0.0,
            step_count: 10,
        }
    }
}

/// 插值方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// 固定步数，每步前进 delta / step_count
    #[default]
    Linear,
    /// 行程最大的关节每步恰好 1°，其余关节按比例同步
    UnitDegree,
}

/// 运动参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotionTuning {
    /// 插值步之间的延时（毫秒）
    pub step_delay_ms: u64,
    /// 子动作之间的停顿（毫秒）
    pub dwell_ms: u64,
    pub interpolation: Interpolation,
    /// 中断恢复（回中位）使用的插值步数
    pub recovery_steps: u32,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            step_delay_ms: 30,
            dwell_ms: 50,
            interpolation: Interpolation::Linear,
            recovery_steps: 20,
        }
    }
}

impl MotionTuning {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }
}

/// 机器人配置（标定 + 参数）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RobotConfig {
    /// `legs.<leg>.<axis>` → 关节标定
    pub legs: BTreeMap<String, BTreeMap<String, JointCalibration>>,

    /// `direction.<axis>.<leg>` → ±1
    pub direction: BTreeMap<String, BTreeMap<String, i64>>,

    #[serde(default)]
    pub trot: TrotTuning,

    #[serde(default)]
    pub crawl: CrawlTuning,

    #[serde(default)]
    pub motion: MotionTuning,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl RobotConfig {
    /// 创建默认配置（实机标定值）
    pub fn default_config() -> Self {
        // [hip, femur, tibia]
        let calibration: LegArray<AxisArray<JointCalibration>> = LegArray::new([
            AxisArray::new([
                JointCalibration::new(2, 100.0, 80.0, 120.0),
                JointCalibration::new(1, 141.0, 110.0, 160.0),
                JointCalibration::new(0, 90.0, 70.0, 110.0),
            ]),
            AxisArray::new([
                JointCalibration::new(5, 88.0, 70.0, 110.0),
                JointCalibration::new(4, 47.0, 30.0, 80.0),
                JointCalibration::new(3, 82.0, 65.0, 100.0),
            ]),
            AxisArray::new([
                JointCalibration::new(8, 96.0, 80.0, 120.0),
                JointCalibration::new(7, 133.0, 110.0, 160.0),
                JointCalibration::new(6, 85.0, 70.0, 110.0),
            ]),
            AxisArray::new([
                JointCalibration::new(11, 94.0, 80.0, 120.0),
                JointCalibration::new(10, 42.0, 30.0, 80.0),
                JointCalibration::new(9, 91.0, 70.0, 110.0),
            ]),
        ]);

        // 前髋 +1、后髋 -1；大腿和小腿左侧 +1、右侧 -1
        let signs = |leg: Leg, axis: JointAxis| -> i64 {
            match axis {
                JointAxis::Hip if leg.is_front() => 1,
                JointAxis::Hip => -1,
                _ => match leg.side() {
                    Side::Left => 1,
                    Side::Right => -1,
                },
            }
        };

        let legs = Leg::ALL
            .into_iter()
            .map(|leg| {
                let joints = JointAxis::ALL
                    .into_iter()
                    .map(|axis| (axis.key().to_string(), calibration[leg][axis]))
                    .collect();
                (leg.key().to_string(), joints)
            })
            .collect();

        let direction = JointAxis::ALL
            .into_iter()
            .map(|axis| {
                let per_leg = Leg::ALL
                    .into_iter()
                    .map(|leg| (leg.key().to_string(), signs(leg, axis)))
                    .collect();
                (axis.key().to_string(), per_leg)
            })
            .collect();

        Self {
            legs,
            direction,
            trot: TrotTuning::default(),
            crawl: CrawlTuning::default(),
            motion: MotionTuning::default(),
        }
    }

    /// 从 TOML 字符串解析（不做语义校验，见 [`RobotConfig::validate`]）
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// 序列化为 TOML 字符串
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 从文件加载配置并校验
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// 解析关节标定表
    ///
    /// 检查腿名、轴名是否合法，以及每条腿的三个关节是否齐全。
    pub fn calibration_table(&self) -> Result<JointTable<JointCalibration>, ConfigError> {
        let mut table: JointTable<Option<JointCalibration>> =
            LegArray::splat(AxisArray::splat(None));

        for (leg_name, joints) in &self.legs {
            let leg: Leg = leg_name
                .parse()
                .map_err(|_| ConfigError::UnknownLeg(leg_name.clone()))?;
            for (axis_name, calibration) in joints {
                let axis: JointAxis = axis_name.parse().map_err(|_| ConfigError::UnknownAxis {
                    leg,
                    axis: axis_name.clone(),
                })?;
                if table[leg][axis].replace(*calibration).is_some() {
                    return Err(ConfigError::DuplicateEntry {
                        table: "calibration",
                        leg,
                        axis,
                    });
                }
            }
        }

        LegArray::try_from_fn(|leg| {
            AxisArray::try_from_fn(|axis| {
                table[leg][axis].ok_or(ConfigError::MissingJoint(JointId::new(leg, axis)))
            })
        })
    }

    /// 解析方向符号表（轴 → 腿 → 符号）
    pub fn direction_table(&self) -> Result<DirectionTable, ConfigError> {
        let mut signs: JointTable<Option<i64>> = LegArray::splat(AxisArray::splat(None));

        for (axis_name, per_leg) in &self.direction {
            let axis: JointAxis = axis_name
                .parse()
                .map_err(|_| ConfigError::UnknownDirectionAxis(axis_name.clone()))?;
            for (leg_name, sign) in per_leg {
                let leg: Leg = leg_name
                    .parse()
                    .map_err(|_| ConfigError::UnknownLeg(leg_name.clone()))?;
                if signs[leg][axis].replace(*sign).is_some() {
                    return Err(ConfigError::DuplicateEntry {
                        table: "direction",
                        leg,
                        axis,
                    });
                }
            }
        }

        DirectionTable::from_signs(|leg, axis| signs[leg][axis])
    }

    /// 校验步态与运动参数
    pub fn validate_tuning(&self) -> Result<(), ConfigError> {
        let amplitudes = [
            ("trot.femur_push", self.trot.femur_push),
            ("trot.tibia_lift", self.trot.tibia_lift),
            ("crawl.tibia_lift", self.crawl.tibia_lift),
            ("crawl.femur_swing", self.crawl.femur_swing),
            ("crawl.hip_shift", self.crawl.hip_shift),
            ("crawl.body_lower", self.crawl.body_lower),
        ];
        for (param, value) in amplitudes {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::tuning(
                    param,
                    format!("must be a non-negative number of degrees, got {}", value),
                ));
            }
        }

        if !self.trot.compensation_ratio.is_finite() {
            return Err(ConfigError::tuning(
                "trot.compensation_ratio",
                "must be finite",
            ));
        }

        let step_counts = [
            ("trot.step_count", self.trot.step_count),
            ("crawl.step_count", self.crawl.step_count),
            ("motion.recovery_steps", self.motion.recovery_steps),
        ];
        for (param, value) in step_counts {
            if value == 0 {
                return Err(ConfigError::tuning(param, "must be at least 1"));
            }
        }

        Ok(())
    }

    /// 完整校验（标定 + 方向 + 参数）
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.build_model()?;
        self.validate_tuning()
    }

    /// 构建只读的机器人模型
    pub fn build_model(&self) -> Result<RobotModel, ConfigError> {
        RobotModel::from_config(self)
    }
}
