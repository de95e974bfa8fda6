//! 方向符号表
//!
//! 左右两侧的舵机镜像安装，同一个物理动作（"小腿伸展"、"大腿后摆"）在不同腿上
//! 对应相反的舵机角度变化。本模块把这种镜像关系收敛为一张按 (腿, 轴) 查询的表，
//! 步态逻辑只描述物理意图，不再为每条腿写分支。
//!
//! # 物理正方向约定
//!
//! | 轴 | +1 的物理含义 |
//! |----|---------------|
//! | Hip | 俯视顺时针偏航 |
//! | Femur | 腿向后摆（推动机身前进） |
//! | Tibia | 膝关节伸展（机身抬高） |
//!
//! ⚠️ 符号表错误会导致腿朝相反方向运动，这是**正确性缺陷**，软件无法检测，
//! 只能通过实机检查发现。表在启动时构建，运行期间只读。

use crate::error::ConfigError;
use crate::types::{AxisArray, JointAxis, JointId, Leg, LegArray};
use std::ops::{Mul, Neg};

/// 方向符号（±1）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    /// 从整数构造（仅接受 ±1）
    pub fn from_sign(value: i64) -> Option<Self> {
        match value {
            1 => Some(Direction::Positive),
            -1 => Some(Direction::Negative),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_i8(self) -> i8 {
        match self {
            Direction::Positive => 1,
            Direction::Negative => -1,
        }
    }

    #[inline]
    pub const fn as_f64(self) -> f64 {
        match self {
            Direction::Positive => 1.0,
            Direction::Negative => -1.0,
        }
    }
}

impl Neg for Direction {
    type Output = Direction;

    fn neg(self) -> Direction {
        match self {
            Direction::Positive => Direction::Negative,
            Direction::Negative => Direction::Positive,
        }
    }
}

impl Mul for Direction {
    type Output = Direction;

    fn mul(self, rhs: Direction) -> Direction {
        if self == rhs {
            Direction::Positive
        } else {
            Direction::Negative
        }
    }
}

/// 方向符号表：`direction[leg][axis]`
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionTable {
    signs: LegArray<AxisArray<Direction>>,
}

impl DirectionTable {
    /// 由完整的符号表构造
    pub const fn new(signs: LegArray<AxisArray<Direction>>) -> Self {
        Self { signs }
    }

    /// 由整数表构造并校验（缺项或非 ±1 均为配置错误）
    pub fn from_signs<F>(mut lookup: F) -> Result<Self, ConfigError>
    where
        F: FnMut(Leg, JointAxis) -> Option<i64>,
    {
        let signs = LegArray::try_from_fn(|leg| {
            AxisArray::try_from_fn(|axis| {
                let value = lookup(leg, axis).ok_or(ConfigError::MissingDirection { leg, axis })?;
                Direction::from_sign(value).ok_or(ConfigError::InvalidDirection {
                    leg,
                    axis,
                    value,
                })
            })
        })?;
        Ok(Self { signs })
    }

    /// 查询符号
    #[inline]
    pub fn sign(&self, leg: Leg, axis: JointAxis) -> Direction {
        self.signs[leg][axis]
    }

    /// 物理意图 → 舵机角度变化方向
    ///
    /// 纯函数：`physical_intent * direction[axis][leg]`。
    #[inline]
    pub fn resolve(&self, leg: Leg, axis: JointAxis, intent: Direction) -> Direction {
        intent * self.sign(leg, axis)
    }

    /// 将物理意图和幅度换算为带符号的舵机角度增量（度）
    #[inline]
    pub fn servo_delta(&self, joint: JointId, intent: Direction, amount: f64) -> f64 {
        self.resolve(joint.leg, joint.axis, intent).as_f64() * amount
    }

    pub fn as_table(&self) -> &LegArray<AxisArray<Direction>> {
        &self.signs
    }
}
