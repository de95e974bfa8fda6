//! 步态计划
//!
//! 步态被描述为数据而不是代码：每个相位（[`GaitPhase`]）由有序的子动作（[`SubAction`]）组成，
//! 每个子动作是一组关节目标（[`JointMove`]）。目标以**物理意图**表达（"小腿屈曲 10°"），
//! 执行时才经方向符号表换算成舵机角度并限位，因此计划本身不含任何左右镜像分支。
//!
//! # 物理意图约定
//!
//! | 轴 | `Positive` | `Negative` |
//! |----|------------|------------|
//! | Tibia | 伸展（机身抬高） | 屈曲（抬脚） |
//! | Femur | 向后摆（推动机身） | 向前摆 |
//! | Hip | 俯视顺时针 | 俯视逆时针 |

use crate::error::GaitError;
use quad_model::{
    BoundedAngle, Direction, JointAxis, JointId, JointTable, Leg, LegSet, RobotModel,
};
use std::fmt;
use std::str::FromStr;

/// 小腿屈曲（抬脚、降低机身）
pub const TIBIA_FLEX: Direction = Direction::Negative;
/// 小腿伸展
pub const TIBIA_EXTEND: Direction = Direction::Positive;
/// 大腿向后摆（支撑腿推动机身前进）
pub const FEMUR_PUSH: Direction = Direction::Positive;
/// 大腿向前摆（摆动腿迈步）
pub const FEMUR_SWING: Direction = Direction::Negative;

/// 步态族
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GaitFamily {
    /// 对角小跑：两条腿同时腾空
    Trot,
    /// 爬行：一次只抬一条腿
    Crawl,
}

impl GaitFamily {
    pub const ALL: [GaitFamily; 2] = [GaitFamily::Trot, GaitFamily::Crawl];

    pub const fn name(self) -> &'static str {
        match self {
            GaitFamily::Trot => "trot",
            GaitFamily::Crawl => "crawl",
        }
    }
}

impl fmt::Display for GaitFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GaitFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trot" => Ok(GaitFamily::Trot),
            "crawl" => Ok(GaitFamily::Crawl),
            _ => Err(format!("Unknown gait '{}', expected 'trot' or 'crawl'", s)),
        }
    }
}

/// 关节目标
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveTarget {
    /// 相对相位起始角度的偏移（物理意图 + 幅度）
    Offset { intent: Direction, amount: f64 },
    /// 回到相位起始角度
    Restore,
    /// 回到中位角
    Neutral,
    /// 回到站立姿态（中位角 + 机身降低量，仅小腿受影响）
    Stance,
}

/// 单个关节的运动
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointMove {
    pub joint: JointId,
    pub target: MoveTarget,
}

impl JointMove {
    pub const fn new(leg: Leg, axis: JointAxis, target: MoveTarget) -> Self {
        Self {
            joint: JointId::new(leg, axis),
            target,
        }
    }

    pub const fn offset(leg: Leg, axis: JointAxis, intent: Direction, amount: f64) -> Self {
        Self::new(leg, axis, MoveTarget::Offset { intent, amount })
    }
}

/// 子动作：一次同步 `move` 的所有关节目标
#[derive(Debug, Clone, PartialEq)]
pub struct SubAction {
    pub name: &'static str,
    pub moves: Vec<JointMove>,
}

impl SubAction {
    pub fn new(name: &'static str, moves: Vec<JointMove>) -> Self {
        Self { name, moves }
    }

    /// 解析为已限位的舵机目标
    ///
    /// `phase_start` 是进入当前相位时的指令角度快照。
    pub fn resolve(
        &self,
        model: &RobotModel,
        phase_start: &JointTable<f64>,
        body_lower: f64,
    ) -> Vec<(JointId, BoundedAngle)> {
        self.moves
            .iter()
            .map(|m| {
                let requested = match m.target {
                    MoveTarget::Offset { intent, amount } => {
                        phase_start[m.joint] + model.directions.servo_delta(m.joint, intent, amount)
                    },
                    MoveTarget::Restore => phase_start[m.joint],
                    MoveTarget::Neutral => model.joints.neutral(m.joint),
                    MoveTarget::Stance => stance_angle(model, m.joint, body_lower),
                };
                (m.joint, model.clamp.clamp(m.joint, requested))
            })
            .collect()
    }
}

/// 站立姿态下的关节角度（未限位）
pub fn stance_angle(model: &RobotModel, joint: JointId, body_lower: f64) -> f64 {
    let neutral = model.joints.neutral(joint);
    match joint.axis {
        JointAxis::Tibia => neutral + model.directions.servo_delta(joint, TIBIA_FLEX, body_lower),
        _ => neutral,
    }
}

/// 步态相位
#[derive(Debug, Clone, PartialEq)]
pub struct GaitPhase {
    swing: LegSet,
    stance: LegSet,
    actions: Vec<SubAction>,
}

impl GaitPhase {
    /// 创建相位（支撑腿 = 摆动腿的补集）
    ///
    /// # 错误
    ///
    /// 摆动腿覆盖全部四条腿（支撑腿为空）时返回 [`GaitError::UnstablePhase`]。
    pub fn new(swing: LegSet, actions: Vec<SubAction>) -> Result<Self, GaitError> {
        let stance = swing.complement();
        if swing == LegSet::ALL || stance.is_empty() {
            return Err(GaitError::UnstablePhase { swing, stance });
        }
        Ok(Self {
            swing,
            stance,
            actions,
        })
    }

    pub fn swing(&self) -> LegSet {
        self.swing
    }

    pub fn stance(&self) -> LegSet {
        self.stance
    }

    pub fn actions(&self) -> &[SubAction] {
        &self.actions
    }
}

/// 是否恰好是一对对角腿
fn is_diagonal_pair(legs: LegSet) -> bool {
    let mut iter = legs.iter();
    match (iter.next(), iter.next(), iter.next()) {
        (Some(a), Some(b), None) => a.diagonal() == b,
        _ => false,
    }
}

/// 完整的步态计划（一个周期的相位序列）
#[derive(Debug, Clone, PartialEq)]
pub struct GaitPlan {
    pub family: GaitFamily,
    /// 每个子动作的插值步数
    pub step_count: u32,
    /// 机身降低量（度）
    pub body_lower: f64,
    /// 第一个相位之前执行一次的准备动作
    pub prelude: Option<SubAction>,
    phases: Vec<GaitPhase>,
}

impl GaitPlan {
    pub fn new(
        family: GaitFamily,
        step_count: u32,
        body_lower: f64,
        prelude: Option<SubAction>,
        phases: Vec<GaitPhase>,
    ) -> Result<Self, GaitError> {
        if phases.is_empty() {
            return Err(GaitError::EmptyPlan);
        }
        if family == GaitFamily::Trot
            && let Some(phase) = phases.iter().find(|p| !is_diagonal_pair(p.stance))
        {
            return Err(GaitError::UnstablePhase {
                swing: phase.swing,
                stance: phase.stance,
            });
        }
        Ok(Self {
            family,
            step_count,
            body_lower,
            prelude,
            phases,
        })
    }

    pub fn phases(&self) -> &[GaitPhase] {
        &self.phases
    }

    /// 第 `n` 个相位（循环）
    pub fn phase(&self, n: u64) -> &GaitPhase {
        &self.phases[(n % self.phases.len() as u64) as usize]
    }

    /// 每个周期的相位数
    pub fn cycle_len(&self) -> usize {
        self.phases.len()
    }
}
