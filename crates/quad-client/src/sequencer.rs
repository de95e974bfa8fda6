//! 步态相位状态机
//!
//! ```text
//!            start                 所有子动作完成
//!   Idle ───────────▶ PhaseInProgress(n, 0) ──────────▶ PhaseInProgress(n+1, 0) ─┐
//!    ▲                      │    ▲                                               │
//!    │                      │    └───────────────────────────────────────────────┘
//!    │ 回到中位角          │ 停止信号（在子动作之间检查）
//!    │                      ▼
//!    └──────────────── Interrupted
//! ```
//!
//! - 正常运行没有终止状态，步态一直运行到收到停止信号
//! - 停止信号只在子动作之间检查，正在执行的子动作总会完成到一致的角度
//! - 进入 `Interrupted` 后不再执行任何子动作，由恢复动作把所有关节驱动回中位角
//!
//! 状态机本身不持有驱动器：每次推进都借用调用方的 [`MotionDriver`]。

use crate::error::GaitError;
use crate::plan::GaitPlan;
use quad_driver::{Actuator, MotionDriver};
use quad_model::{AxisArray, JointTable, LegArray};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// 状态机状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// 空闲（未运行步态）
    Idle,
    /// 正在执行第 `phase` 个相位（累计计数）的第 `action` 个子动作
    PhaseInProgress { phase: u64, action: usize },
    /// 已中断，等待恢复到中位角
    Interrupted,
}

impl SequencerState {
    pub fn is_idle(&self) -> bool {
        matches!(self, SequencerState::Idle)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, SequencerState::PhaseInProgress { .. })
    }
}

impl fmt::Display for SequencerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequencerState::Idle => f.write_str("idle"),
            SequencerState::PhaseInProgress { phase, action } => {
                write!(f, "in phase {} (action {})", phase, action)
            },
            SequencerState::Interrupted => f.write_str("interrupted"),
        }
    }
}

/// 停止句柄（可跨线程共享，如 Ctrl+C 处理器）
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求停止（在下一个子动作边界生效）
    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub(crate) fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// 单次推进的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// 执行了一个子动作
    Action {
        phase: u64,
        name: &'static str,
        /// 该子动作是否完成了整个相位
        phase_complete: bool,
    },
    /// 收到停止信号，已中断并回到中位角
    Interrupted,
}

/// 步态相位状态机
#[derive(Debug)]
pub struct GaitSequencer {
    plan: GaitPlan,
    state: SequencerState,
    /// 进入当前相位时的指令角度快照
    phase_start: JointTable<f64>,
    phases_completed: u64,
    actions_completed: u64,
    recovery_steps: u32,
}

impl GaitSequencer {
    pub fn new(plan: GaitPlan, recovery_steps: u32) -> Self {
        Self {
            plan,
            state: SequencerState::Idle,
            phase_start: LegArray::splat(AxisArray::splat(0.0)),
            phases_completed: 0,
            actions_completed: 0,
            recovery_steps,
        }
    }

    /// `Idle → PhaseInProgress(0, 0)`
    ///
    /// 若计划带有准备动作（如爬行的机身降低），在进入第一个相位之前执行。
    pub fn start<A: Actuator>(&mut self, driver: &mut MotionDriver<A>) -> Result<(), GaitError> {
        if !self.state.is_idle() {
            return Err(GaitError::InvalidTransition {
                from: self.state,
                event: "start",
            });
        }

        info!(
            gait = %self.plan.family,
            step_count = self.plan.step_count,
            phases = self.plan.cycle_len(),
            "Starting gait"
        );

        if let Some(prelude) = &self.plan.prelude {
            let start = driver.angles();
            let targets = prelude.resolve(driver.model(), &start, self.plan.body_lower);
            debug!(action = prelude.name, "Prelude");
            driver.move_to(targets, self.plan.step_count)?;
            driver.dwell();
        }

        self.phase_start = driver.angles();
        self.phases_completed = 0;
        self.actions_completed = 0;
        self.state = SequencerState::PhaseInProgress {
            phase: 0,
            action: 0,
        };
        Ok(())
    }

    /// 执行一个子动作
    ///
    /// 执行前检查停止信号：已请求停止时不再执行任何子动作，转入 `Interrupted`
    /// 并立即恢复到中位角。
    pub fn advance<A: Actuator>(
        &mut self,
        driver: &mut MotionDriver<A>,
        stop: &StopHandle,
    ) -> Result<Advance, GaitError> {
        let SequencerState::PhaseInProgress { phase, action } = self.state else {
            return Err(GaitError::InvalidTransition {
                from: self.state,
                event: "advance",
            });
        };

        if stop.is_stop_requested() {
            self.interrupt(driver)?;
            stop.reset();
            return Ok(Advance::Interrupted);
        }

        let current_phase = self.plan.phase(phase);
        let sub_action = &current_phase.actions()[action];
        let targets = sub_action.resolve(driver.model(), &self.phase_start, self.plan.body_lower);
        debug!(
            phase,
            swing = %current_phase.swing(),
            action = sub_action.name,
            joints = targets.len(),
            "Sub-action"
        );
        driver.move_to(targets, self.plan.step_count)?;
        driver.dwell();

        let name = sub_action.name;
        let phase_complete = action + 1 == current_phase.actions().len();
        self.actions_completed += 1;
        if phase_complete {
            self.phases_completed += 1;
            self.phase_start = driver.angles();
            self.state = SequencerState::PhaseInProgress {
                phase: phase + 1,
                action: 0,
            };
        } else {
            self.state = SequencerState::PhaseInProgress {
                phase,
                action: action + 1,
            };
        }

        Ok(Advance::Action {
            phase,
            name,
            phase_complete,
        })
    }

    /// `PhaseInProgress → Interrupted → Idle`
    ///
    /// 中断当前步态并把所有关节驱动回中位角。恢复失败时停留在 `Interrupted`。
    pub fn interrupt<A: Actuator>(
        &mut self,
        driver: &mut MotionDriver<A>,
    ) -> Result<(), GaitError> {
        if !self.state.is_running() {
            return Err(GaitError::InvalidTransition {
                from: self.state,
                event: "interrupt",
            });
        }
        info!(state = %self.state, "Gait interrupted, returning to neutral");
        self.state = SequencerState::Interrupted;
        self.recover(driver)
    }

    /// 在相位边界正常结束：`PhaseInProgress(n, 0) → Idle`（回到中位角）
    pub fn finish<A: Actuator>(&mut self, driver: &mut MotionDriver<A>) -> Result<(), GaitError> {
        match self.state {
            SequencerState::PhaseInProgress { action: 0, .. } => self.recover(driver),
            from => Err(GaitError::InvalidTransition {
                from,
                event: "finish",
            }),
        }
    }

    /// 所有关节回到中位角，成功后进入 `Idle`
    pub fn recover<A: Actuator>(&mut self, driver: &mut MotionDriver<A>) -> Result<(), GaitError> {
        if self.state.is_idle() {
            return Err(GaitError::InvalidTransition {
                from: self.state,
                event: "recover",
            });
        }
        driver.move_to_neutral(self.recovery_steps)?;
        info!(
            phases = self.phases_completed,
            actions = self.actions_completed,
            "Returned to neutral"
        );
        self.state = SequencerState::Idle;
        Ok(())
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn plan(&self) -> &GaitPlan {
        &self.plan
    }

    /// 已完成的相位数
    pub fn phases_completed(&self) -> u64 {
        self.phases_completed
    }

    /// 已完成的子动作数
    pub fn actions_completed(&self) -> u64 {
        self.actions_completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trot::trot_plan;
    use quad_driver::{MockActuator, MotionSettings};
    use quad_model::{RobotModel, TrotTuning};

    fn driver() -> MotionDriver<MockActuator> {
        let model = Arc::new(RobotModel::default_model().unwrap());
        MotionDriver::new(MockActuator::new(), model, MotionSettings::immediate())
    }

    fn sequencer() -> GaitSequencer {
        GaitSequencer::new(trot_plan(&TrotTuning::default(), 10).unwrap(), 20)
    }

    #[test]
    fn test_advance_walks_through_phase() {
        let mut driver = driver();
        let mut seq = sequencer();
        let stop = StopHandle::new();

        seq.start(&mut driver).unwrap();
        assert_eq!(seq.state(), SequencerState::PhaseInProgress { phase: 0, action: 0 });

        let names: Vec<&str> = (0..4)
            .map(|_| match seq.advance(&mut driver, &stop).unwrap() {
                Advance::Action { name, .. } => name,
                Advance::Interrupted => panic!("unexpected interrupt"),
            })
            .collect();
        assert_eq!(names, vec!["lift", "push", "lower", "return"]);
        assert_eq!(seq.state(), SequencerState::PhaseInProgress { phase: 1, action: 0 });
        assert_eq!(seq.phases_completed(), 1);
        assert_eq!(seq.actions_completed(), 4);

        // 半周期结束回到起始姿态
        assert_eq!(driver.angles(), driver.model().joints.neutral_table());
    }

    #[test]
    fn test_invalid_transitions() {
        let mut driver = driver();
        let mut seq = sequencer();
        let stop = StopHandle::new();

        assert!(matches!(
            seq.advance(&mut driver, &stop),
            Err(GaitError::InvalidTransition { from: SequencerState::Idle, event: "advance" })
        ));
        assert!(seq.interrupt(&mut driver).is_err());
        assert!(seq.recover(&mut driver).is_err());

        seq.start(&mut driver).unwrap();
        assert!(matches!(
            seq.start(&mut driver),
            Err(GaitError::InvalidTransition { event: "start", .. })
        ));

        seq.advance(&mut driver, &stop).unwrap();
        assert!(matches!(
            seq.finish(&mut driver),
            Err(GaitError::InvalidTransition { event: "finish", .. })
        ));
    }

    #[test]
    fn test_stop_interrupts_and_recovers() {
        let mut driver = driver();
        let mut seq = sequencer();
        let stop = StopHandle::new();

        seq.start(&mut driver).unwrap();
        seq.advance(&mut driver, &stop).unwrap();
        seq.advance(&mut driver, &stop).unwrap();
        assert_ne!(driver.angles(), driver.model().joints.neutral_table());

        stop.stop();
        assert_eq!(seq.advance(&mut driver, &stop).unwrap(), Advance::Interrupted);
        assert_eq!(seq.state(), SequencerState::Idle);
        assert!(!stop.is_stop_requested());
        assert_eq!(driver.angles(), driver.model().joints.neutral_table());
        assert_eq!(seq.actions_completed(), 2);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(SequencerState::Idle.to_string(), "idle");
        assert_eq!(
            SequencerState::PhaseInProgress { phase: 3, action: 1 }.to_string(),
            "in phase 3 (action 1)"
        );
        assert_eq!(SequencerState::Interrupted.to_string(), "interrupted");
    }
}
