//! 步态控制接口
//!
//! [`GaitController`] 是调用方（CLI、上层应用）唯一需要接触的类型：
//!
//! - `start_gait`: 运行步态直到收到停止信号（阻塞）
//! - `walk`: 运行固定周期数后回到中位角
//! - `stop_gait` / `stop_handle`: 中断并恢复到中位角
//! - `return_to_neutral`: 任何时候都可以调用
//! - `begin` + `advance`: 单步推进，便于测试和离线仿真
//!
//! # 示例
//!
//! ```rust
//! use quad_client::{GaitController, GaitFamily};
//! use quad_driver::LogActuator;
//! use quad_model::RobotConfig;
//!
//! let mut config = RobotConfig::default_config();
//! config.motion.step_delay_ms = 0;
//! config.motion.dwell_ms = 0;
//!
//! let mut controller = GaitController::from_config(LogActuator::new(), &config).unwrap();
//! controller.initialize().unwrap();
//! let report = controller.walk(GaitFamily::Crawl, 5, 1).unwrap();
//! assert_eq!(report.phases_completed, 4);
//! ```

use crate::crawl::crawl_plan;
use crate::error::GaitError;
use crate::plan::{GaitFamily, GaitPlan};
use crate::sequencer::{Advance, GaitSequencer, SequencerState, StopHandle};
use crate::trot::trot_plan;
use quad_driver::{Actuator, MotionDriver, MotionSettings};
use quad_model::{ConfigError, CrawlTuning, JointTable, RobotConfig, RobotModel, TrotTuning};
use std::sync::Arc;
use tracing::info;

/// 步态运行报告
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GaitReport {
    /// 已完成的相位数
    pub phases_completed: u64,
    /// 已完成的子动作数
    pub actions_completed: u64,
    /// 是否因停止信号而中断
    pub interrupted: bool,
    /// 运行期间下发的舵机命令数（含恢复动作）
    pub commands_sent: u64,
}

/// 步态控制器
#[derive(Debug)]
pub struct GaitController<A: Actuator> {
    driver: MotionDriver<A>,
    trot: TrotTuning,
    crawl: CrawlTuning,
    recovery_steps: u32,
    stop: StopHandle,
    sequencer: Option<GaitSequencer>,
    /// 当前运行开始时的命令计数
    commands_at_start: u64,
}

impl<A: Actuator> GaitController<A> {
    /// 用已有驱动器创建（参数取自 `config`）
    pub fn new(driver: MotionDriver<A>, config: &RobotConfig) -> Result<Self, GaitError> {
        config.validate_tuning()?;
        Ok(Self {
            driver,
            trot: config.trot,
            crawl: config.crawl,
            recovery_steps: config.motion.recovery_steps,
            stop: StopHandle::new(),
            sequencer: None,
            commands_at_start: 0,
        })
    }

    /// 从配置构建完整的控制器（模型 + 驱动器）
    pub fn from_config(actuator: A, config: &RobotConfig) -> Result<Self, GaitError> {
        let model = Arc::new(RobotModel::from_config(config)?);
        let driver = MotionDriver::new(actuator, model, MotionSettings::from(&config.motion));
        Self::new(driver, config)
    }

    /// 启动姿态：所有关节直接下发中位角
    ///
    /// 同时清除之前遗留的停止请求。
    pub fn initialize(&mut self) -> Result<(), GaitError> {
        self.stop.reset();
        self.driver.initialize()?;
        Ok(())
    }

    /// 构建步态计划
    pub fn plan(&self, family: GaitFamily, step_count: u32) -> Result<GaitPlan, GaitError> {
        if step_count == 0 {
            return Err(ConfigError::tuning("step_count", "must be at least 1").into());
        }
        match family {
            GaitFamily::Trot => trot_plan(&self.trot, step_count),
            GaitFamily::Crawl => crawl_plan(&self.crawl, step_count),
        }
    }

    /// 各步态族的默认插值步数
    pub fn default_step_count(&self, family: GaitFamily) -> u32 {
        match family {
            GaitFamily::Trot => self.trot.step_count,
            GaitFamily::Crawl => self.crawl.step_count,
        }
    }

    /// `Idle → PhaseInProgress(0, 0)`，之后用 [`advance`](Self::advance) 单步推进
    ///
    /// 开始前已经请求的停止不会被丢弃，在第一个子动作之前生效。
    pub fn begin(&mut self, family: GaitFamily, step_count: u32) -> Result<(), GaitError> {
        let state = self.state();
        if !state.is_idle() {
            return Err(GaitError::InvalidTransition {
                from: state,
                event: "start",
            });
        }

        let plan = self.plan(family, step_count)?;
        let mut sequencer = GaitSequencer::new(plan, self.recovery_steps);
        self.commands_at_start = self.driver.commands_sent();
        sequencer.start(&mut self.driver)?;
        self.sequencer = Some(sequencer);
        Ok(())
    }

    /// 执行一个子动作（或在收到停止信号时中断并恢复）
    pub fn advance(&mut self) -> Result<Advance, GaitError> {
        let Some(sequencer) = self.sequencer.as_mut() else {
            return Err(GaitError::InvalidTransition {
                from: SequencerState::Idle,
                event: "advance",
            });
        };
        sequencer.advance(&mut self.driver, &self.stop)
    }

    /// 运行步态直到收到停止信号
    ///
    /// 阻塞调用；通过 [`stop_handle`](Self::stop_handle) 从其他线程（如 Ctrl+C 处理器）停止。
    /// 返回时所有关节已回到中位角。
    pub fn start_gait(
        &mut self,
        family: GaitFamily,
        step_count: u32,
    ) -> Result<GaitReport, GaitError> {
        self.begin(family, step_count)?;
        loop {
            if self.advance()? == Advance::Interrupted {
                return Ok(self.report(true));
            }
        }
    }

    /// 运行 `cycles` 个完整周期后回到中位角
    ///
    /// 期间收到停止信号时提前中断（同样回到中位角）。
    pub fn walk(
        &mut self,
        family: GaitFamily,
        step_count: u32,
        cycles: u32,
    ) -> Result<GaitReport, GaitError> {
        self.begin(family, step_count)?;
        let target = {
            let plan_len = self
                .sequencer
                .as_ref()
                .map_or(0, |s| s.plan().cycle_len() as u64);
            plan_len * u64::from(cycles)
        };

        while self.phases_completed() < target {
            if self.advance()? == Advance::Interrupted {
                return Ok(self.report(true));
            }
        }

        if let Some(sequencer) = self.sequencer.as_mut() {
            sequencer.finish(&mut self.driver)?;
        }
        // 最后一个相位之后到达的停止请求已由回中位满足
        self.stop.reset();
        info!(%family, cycles, "Walk complete");
        Ok(self.report(false))
    }

    /// 停止步态：中断当前相位并回到中位角
    ///
    /// 没有正在运行的步态时不做任何事。
    pub fn stop_gait(&mut self) -> Result<GaitReport, GaitError> {
        match self.sequencer.as_mut() {
            Some(sequencer) if sequencer.state().is_running() => {
                sequencer.interrupt(&mut self.driver)?;
                Ok(self.report(true))
            },
            _ => Ok(GaitReport::default()),
        }
    }

    /// 停止句柄（跨线程停止 `start_gait`/`walk`）
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// 所有关节回到中位角
    ///
    /// 步态运行中调用等同于 [`stop_gait`](Self::stop_gait)；中断后恢复失败时可再次调用。
    pub fn return_to_neutral(&mut self) -> Result<(), GaitError> {
        match self.sequencer.as_mut() {
            Some(sequencer) if sequencer.state().is_running() => {
                sequencer.interrupt(&mut self.driver)?;
            },
            Some(sequencer) if sequencer.state() == SequencerState::Interrupted => {
                sequencer.recover(&mut self.driver)?;
            },
            _ => {
                self.driver.move_to_neutral(self.recovery_steps)?;
            },
        }
        Ok(())
    }

    /// 状态机状态
    pub fn state(&self) -> SequencerState {
        self.sequencer
            .as_ref()
            .map_or(SequencerState::Idle, GaitSequencer::state)
    }

    /// 所有关节的当前指令角度
    pub fn angles(&self) -> JointTable<f64> {
        self.driver.angles()
    }

    pub fn model(&self) -> &RobotModel {
        self.driver.model()
    }

    pub fn driver(&self) -> &MotionDriver<A> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut MotionDriver<A> {
        &mut self.driver
    }

    fn phases_completed(&self) -> u64 {
        self.sequencer.as_ref().map_or(0, GaitSequencer::phases_completed)
    }

    fn report(&self, interrupted: bool) -> GaitReport {
        let (phases_completed, actions_completed) = self
            .sequencer
            .as_ref()
            .map_or((0, 0), |s| (s.phases_completed(), s.actions_completed()));
        GaitReport {
            phases_completed,
            actions_completed,
            interrupted,
            commands_sent: self.driver.commands_sent() - self.commands_at_start,
        }
    }
}
