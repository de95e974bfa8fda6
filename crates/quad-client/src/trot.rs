//! 对角小跑步态
//!
//! 对角腿成对运动：{FL, BR} 与 {FR, BL} 交替作为摆动对。每个半周期四个子动作：
//!
//! 1. `lift`: 摆动对小腿屈曲 `tibia_lift`
//! 2. `push`: 支撑对大腿后摆 `femur_push`，同时支撑对小腿伸展 `compensation_ratio × femur_push`；
//!    摆动对大腿前摆 `femur_push`。所有关节在同一次同步运动中完成
//! 3. `lower`: 摆动对小腿回到相位起始角度
//! 4. `return`: 所有移动过的大腿回到相位起始角度，撤销小腿补偿
//!
//! 每个半周期结束时回到相位起始姿态。
//!
//! ⚠️ 小腿补偿比例是经验常数，用来近似保持支撑足触地，不是由腿部几何推导的。

use crate::error::GaitError;
use crate::plan::{
    FEMUR_PUSH, FEMUR_SWING, GaitFamily, GaitPhase, GaitPlan, JointMove, MoveTarget, SubAction,
    TIBIA_EXTEND, TIBIA_FLEX,
};
use quad_model::{JointAxis, Leg, LegSet, TrotTuning};

/// 两个对角对（第一个半周期 {FL, BR} 摆动）
pub const DIAGONAL_PAIRS: [[Leg; 2]; 2] = [
    [Leg::FrontLeft, Leg::BackRight],
    [Leg::FrontRight, Leg::BackLeft],
];

/// 构建一个半周期
pub fn half_cycle(swing_pair: [Leg; 2], tuning: &TrotTuning) -> Result<GaitPhase, GaitError> {
    let swing = LegSet::of(&swing_pair);
    let stance: Vec<Leg> = swing.complement().iter().collect();
    let compensation = tuning.compensation_ratio * tuning.femur_push;

    let lift = SubAction::new(
        "lift",
        swing_pair
            .iter()
            .map(|&leg| JointMove::offset(leg, JointAxis::Tibia, TIBIA_FLEX, tuning.tibia_lift))
            .collect(),
    );

    let mut push_moves = Vec::with_capacity(6);
    for &leg in &stance {
        push_moves.push(JointMove::offset(leg, JointAxis::Femur, FEMUR_PUSH, tuning.femur_push));
        push_moves.push(JointMove::offset(leg, JointAxis::Tibia, TIBIA_EXTEND, compensation));
    }
    for &leg in &swing_pair {
        push_moves.push(JointMove::offset(leg, JointAxis::Femur, FEMUR_SWING, tuning.femur_push));
    }
    let push = SubAction::new("push", push_moves);

    let lower = SubAction::new(
        "lower",
        swing_pair
            .iter()
            .map(|&leg| JointMove::new(leg, JointAxis::Tibia, MoveTarget::Restore))
            .collect(),
    );

    let mut return_moves: Vec<JointMove> = Leg::ALL
        .iter()
        .map(|&leg| JointMove::new(leg, JointAxis::Femur, MoveTarget::Restore))
        .collect();
    return_moves.extend(
        stance
            .iter()
            .map(|&leg| JointMove::new(leg, JointAxis::Tibia, MoveTarget::Restore)),
    );
    let return_action = SubAction::new("return", return_moves);

    GaitPhase::new(swing, vec![lift, push, lower, return_action])
}

/// 构建小跑计划
pub fn trot_plan(tuning: &TrotTuning, step_count: u32) -> Result<GaitPlan, GaitError> {
    let phases = DIAGONAL_PAIRS
        .iter()
        .map(|&pair| half_cycle(pair, tuning))
        .collect::<Result<Vec<_>, _>>()?;
    GaitPlan::new(GaitFamily::Trot, step_count, 0.0, None, phases)
}
