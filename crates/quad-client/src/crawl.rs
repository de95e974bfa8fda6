//! 爬行步态
//!
//! 一次只抬一条腿，其余三条始终着地。每条腿的相位按顺序执行：
//!
//! 1. `shift`: 其余三条腿的髋关节偏转 `hip_shift`，足端移向抬腿一侧（重心远离抬起的腿）
//! 2. `lift`: 小腿屈曲 `tibia_lift`（相对站立姿态）
//! 3. `swing`: 大腿前摆 `femur_swing`
//! 4. `lower`: 小腿回到站立姿态
//! 5. `reset`: 大腿回到中位角
//! 6. `unshift`: 撤销重心转移
//!
//! 腿的访问顺序为 FL → BR → FR → BL（对角优先），同一侧不会连续抬腿三次。

use crate::error::GaitError;
use crate::plan::{
    FEMUR_SWING, GaitFamily, GaitPhase, GaitPlan, JointMove, MoveTarget, SubAction, TIBIA_FLEX,
};
use quad_model::{CrawlTuning, Direction, JointAxis, Leg, LegSet, Side};

/// 抬腿顺序
pub const CRAWL_ORDER: [Leg; 4] = [Leg::FrontLeft, Leg::BackRight, Leg::FrontRight, Leg::BackLeft];

/// 让 `leg` 的足端横向移向 `side` 所需的髋关节意图
///
/// 髋关节 `Positive` 为俯视顺时针：前腿足端在髋关节前方，顺时针使其右移；
/// 后腿足端在后方，顺时针使其左移。
pub fn hip_intent_toward(leg: Leg, side: Side) -> Direction {
    let toward_left = if leg.is_front() {
        Direction::Negative
    } else {
        Direction::Positive
    };
    match side {
        Side::Left => toward_left,
        Side::Right => -toward_left,
    }
}

/// 构建单腿相位
pub fn leg_phase(leg: Leg, tuning: &CrawlTuning) -> Result<GaitPhase, GaitError> {
    let swing = LegSet::of(&[leg]);
    let others: Vec<Leg> = swing.complement().iter().collect();

    let shift = SubAction::new(
        "shift",
        others
            .iter()
            .map(|&other| {
                JointMove::offset(
                    other,
                    JointAxis::Hip,
                    hip_intent_toward(other, leg.side()),
                    tuning.hip_shift,
                )
            })
            .collect(),
    );
    let lift = SubAction::new(
        "lift",
        vec![JointMove::offset(leg, JointAxis::Tibia, TIBIA_FLEX, tuning.tibia_lift)],
    );
    let swing_action = SubAction::new(
        "swing",
        vec![JointMove::offset(leg, JointAxis::Femur, FEMUR_SWING, tuning.femur_swing)],
    );
    let lower = SubAction::new(
        "lower",
        vec![JointMove::new(leg, JointAxis::Tibia, MoveTarget::Stance)],
    );
    let reset = SubAction::new(
        "reset",
        vec![JointMove::new(leg, JointAxis::Femur, MoveTarget::Neutral)],
    );
    let unshift = SubAction::new(
        "unshift",
        others
            .iter()
            .map(|&other| JointMove::new(other, JointAxis::Hip, MoveTarget::Restore))
            .collect(),
    );

    GaitPhase::new(swing, vec![shift, lift, swing_action, lower, reset, unshift])
}

/// 所有小腿降到机身高度
pub fn settle_action() -> SubAction {
    SubAction::new(
        "settle",
        Leg::ALL
            .iter()
            .map(|&leg| JointMove::new(leg, JointAxis::Tibia, MoveTarget::Stance))
            .collect(),
    )
}

/// 构建爬行计划
///
/// `body_lower` 为 0 时不执行 `settle`。
pub fn crawl_plan(tuning: &CrawlTuning, step_count: u32) -> Result<GaitPlan, GaitError> {
    let phases = CRAWL_ORDER
        .iter()
        .map(|&leg| leg_phase(leg, tuning))
        .collect::<Result<Vec<_>, _>>()?;
    let prelude = (tuning.body_lower != 0.0).then(settle_action);
    GaitPlan::new(GaitFamily::Crawl, step_count, tuning.body_lower, prelude, phases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quad_model::{JointId, RobotModel};

    #[test]
    fn test_crawl_order_and_single_swing_leg() {
        let plan = crawl_plan(&CrawlTuning::default(), 10).unwrap();
        assert_eq!(plan.cycle_len(), 4);
        for (n, &leg) in CRAWL_ORDER.iter().enumerate() {
            let phase = plan.phase(n as u64);
            assert_eq!(phase.swing(), LegSet::of(&[leg]));
            assert_eq!(phase.stance().len(), 3);
            let names: Vec<&str> = phase.actions().iter().map(|a| a.name).collect();
            assert_eq!(names, vec!["shift", "lift", "swing", "lower", "reset", "unshift"]);
        }
    }

    #[test]
    fn test_order_never_lifts_one_side_three_times_running() {
        let cyclic: Vec<Leg> = CRAWL_ORDER.iter().copied().cycle().take(6).collect();
        for window in cyclic.windows(3) {
            assert!(
                window.iter().any(|leg| leg.side() != window[0].side()),
                "three lifts on one side: {:?}",
                window
            );
        }
        for pair in cyclic.windows(2) {
            assert!(
                pair[0].diagonal() == pair[1] || pair[0].is_front() != pair[1].is_front(),
                "{} -> {} shares an end without being diagonal",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_settle_only_when_body_lowered() {
        let plan = crawl_plan(&CrawlTuning::default(), 10).unwrap();
        assert!(plan.prelude.is_none());

        let tuning = CrawlTuning {
            body_lower: 4.0,
            ..CrawlTuning::default()
        };
        let plan = crawl_plan(&tuning, 10).unwrap();
        assert_eq!(plan.prelude.as_ref().map(|a| a.name), Some("settle"));
        assert_eq!(plan.body_lower, 4.0);
    }

    #[test]
    fn test_hip_shift_moves_feet_toward_lifting_side() {
        assert_eq!(hip_intent_toward(Leg::FrontRight, Side::Left), Direction::Negative);
        assert_eq!(hip_intent_toward(Leg::BackLeft, Side::Left), Direction::Positive);
        assert_eq!(hip_intent_toward(Leg::BackRight, Side::Right), Direction::Negative);

        let model = RobotModel::default_model().unwrap();
        let plan = crawl_plan(&CrawlTuning::default(), 10).unwrap();
        let start = model.joints.neutral_table();
        let shift = plan.phase(0).actions()[0].resolve(&model, &start, 0.0);
        let hip = |leg| {
            shift
                .iter()
                .find(|(id, _)| *id == JointId::new(leg, JointAxis::Hip))
                .map(|(_, angle)| angle.value())
        };
        assert_eq!(hip(Leg::FrontLeft), None);
        assert_eq!(hip(Leg::FrontRight), Some(84.0));
        assert_eq!(hip(Leg::BackLeft), Some(92.0));
        assert_eq!(hip(Leg::BackRight), Some(90.0));
    }

    #[test]
    fn test_lift_and_swing_targets() {
        let model = RobotModel::default_model().unwrap();
        let plan = crawl_plan(&CrawlTuning::default(), 10).unwrap();
        let start = model.joints.neutral_table();

        // 第二相位：BR
        let phase = plan.phase(1);
        let lift = phase.actions()[1].resolve(&model, &start, 0.0);
        assert_eq!(lift[0].1.value(), 99.0);
        let swing = phase.actions()[2].resolve(&model, &start, 0.0);
        assert_eq!(swing[0].1.value(), 48.0);
    }
}
