//! 安全限位
//!
//! 任何角度在发往执行器之前都必须经过 [`SafetyClamp::clamp`]。驱动层只接受
//! [`BoundedAngle`]，而 `BoundedAngle` 只能由本模块构造，因此"未经限位的角度到达舵机"
//! 在类型层面不可表达。
//!
//! 饱和不是错误：请求值超出限位时截断到最近的端点，并记录 `warn!`。

use crate::model::JointModel;
use crate::types::{AxisArray, JointId, JointTable, LegArray};
use std::fmt;
use tracing::warn;

/// 已经过限位的关节角度（度）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct BoundedAngle(f64);

impl BoundedAngle {
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for BoundedAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}°", self.0)
    }
}

impl From<BoundedAngle> for f64 {
    fn from(angle: BoundedAngle) -> f64 {
        angle.0
    }
}

/// 每个关节的 `[min, max]` 限位
#[derive(Debug, Clone, PartialEq)]
pub struct SafetyClamp {
    bounds: JointTable<(f64, f64)>,
}

impl SafetyClamp {
    pub fn new(model: &JointModel) -> Self {
        let mut bounds: JointTable<(f64, f64)> = LegArray::splat(AxisArray::splat((0.0, 0.0)));
        for (id, spec) in model.iter() {
            bounds[id] = (spec.min, spec.max);
        }
        Self { bounds }
    }

    /// 将请求角度限制到关节限位内
    ///
    /// - 区间内：原值返回
    /// - 超出：截断到端点并告警
    /// - 非有限值（NaN）：截断到下限并告警
    pub fn clamp(&self, id: JointId, requested: f64) -> BoundedAngle {
        let (min, max) = self.bounds[id];
        let value = requested.max(min).min(max);
        if value != requested {
            warn!(
                joint = %id,
                requested,
                clamped = value,
                "Requested angle outside limits [{}, {}], saturating",
                min,
                max
            );
        }
        BoundedAngle(value)
    }

    /// 限位区间
    #[inline]
    pub fn bounds(&self, id: JointId) -> (f64, f64) {
        self.bounds[id]
    }
}
