//! # Quad Client
//!
//! 四足机器人的步态层：
//! - 步态计划：对角小跑（[`trot`]）与爬行（[`crawl`]），以物理意图描述、经方向符号表执行
//! - 相位状态机：`Idle → PhaseInProgress → Interrupted → Idle`，停止后必定回到中位角
//! - 控制接口：[`GaitController`]
//!
//! # 使用场景
//!
//! 这是大多数用户应该使用的 crate。如果需要直接下发关节运动，可以使用 `quad-driver`。

pub mod controller;
pub mod crawl;
mod error;
pub mod plan;
pub mod sequencer;
pub mod trot;

pub use controller::{GaitController, GaitReport};
pub use error::GaitError;
pub use plan::{GaitFamily, GaitPhase, GaitPlan, JointMove, MoveTarget, SubAction};
pub use sequencer::{Advance, GaitSequencer, SequencerState, StopHandle};
