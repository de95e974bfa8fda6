//! 平滑运动驱动器
//!
//! 关节"当前指令角度"的唯一拥有者。其他组件只能通过查询接口读取角度，
//! 通过 [`MotionDriver::move_to`] 改变角度，不能直接写入。
//!
//! # 插值
//!
//! 对目标集合中的每个关节计算 `delta = target - current`，在每个插值步给集合中**每个**关节
//! 各下发一条命令，因此多关节运动保持同步：所有关节在同一个最后插值步到达目标。
//! 中间值按 `start + delta * i / span` 计算（不做增量累加），最后一步直接写入目标值，
//! 因此不存在跨调用的舍入漂移。
//!
//! # 阻塞点
//!
//! 插值步之间的 `step_delay` 与子动作之间的 `dwell` 是整个引擎仅有的两处挂起，
//! 都是无条件延时，使用 `spin_sleep` 获得低抖动。延时为 0 时完全跳过。

use crate::actuator::Actuator;
use crate::error::DriverError;
use crate::hooks::{ActuatorCommand, HookManager};
use quad_model::{BoundedAngle, Interpolation, JointId, JointTable, MotionTuning, RobotModel};
use smallvec::SmallVec;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace};

/// 插值方式
pub use quad_model::Interpolation as InterpolationMode;

/// 运动参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSettings {
    /// 插值步之间的延时
    pub step_delay: Duration,
    /// 子动作之间的停顿
    pub dwell: Duration,
    pub interpolation: InterpolationMode,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self::from(&MotionTuning::default())
    }
}

impl From<&MotionTuning> for MotionSettings {
    fn from(tuning: &MotionTuning) -> Self {
        Self {
            step_delay: tuning.step_delay(),
            dwell: tuning.dwell(),
            interpolation: tuning.interpolation,
        }
    }
}

impl MotionSettings {
    /// 无延时（测试、离线仿真）
    pub const fn immediate() -> Self {
        Self {
            step_delay: Duration::ZERO,
            dwell: Duration::ZERO,
            interpolation: Interpolation::Linear,
        }
    }

    #[must_use]
    pub const fn with_interpolation(mut self, interpolation: InterpolationMode) -> Self {
        self.interpolation = interpolation;
        self
    }
}

/// 单个关节在一次 `move` 中的轨迹
#[derive(Debug, Clone, Copy)]
struct Track {
    joint: JointId,
    channel: u8,
    start: f64,
    delta: f64,
    target: f64,
}

/// 平滑运动驱动器
pub struct MotionDriver<A: Actuator> {
    actuator: A,
    model: Arc<RobotModel>,
    /// 当前指令角度（每条成功下发的命令更新一次）
    current: JointTable<f64>,
    settings: MotionSettings,
    hooks: HookManager,
    commands_sent: u64,
}

impl<A: Actuator> MotionDriver<A> {
    /// 创建驱动器
    ///
    /// 当前角度初始化为中位角；调用 [`initialize`](Self::initialize) 才会真正下发。
    pub fn new(actuator: A, model: Arc<RobotModel>, settings: MotionSettings) -> Self {
        let current = model.joints.neutral_table();
        Self {
            actuator,
            model,
            current,
            settings,
            hooks: HookManager::new(),
            commands_sent: 0,
        }
    }

    /// 启动姿态：每个关节直接下发一次中位角（无插值）
    pub fn initialize(&mut self) -> Result<(), DriverError> {
        info!(backend = self.actuator.name(), "Initializing joints to neutral pose");
        for joint in JointId::all() {
            let neutral = self.model.clamp.clamp(joint, self.model.joints.neutral(joint));
            let channel = self.model.joints.channel(joint);
            self.command(joint, channel, neutral.value(), 0)?;
        }
        Ok(())
    }

    /// 同步多关节运动
    ///
    /// - `targets`: 关节 → 已限位的目标角度；同一关节出现多次时以最后一次为准
    /// - `step_count`: 线性插值的步数（`UnitDegree` 模式下由行程决定）
    ///
    /// 返回实际执行的插值步数。`step_count == 0` 或所有目标都等于当前角度时不下发任何命令。
    ///
    /// # 错误
    ///
    /// 执行器失败时立即中止，不重试；失败关节保持上一次成功下发的角度。
    pub fn move_to<I>(&mut self, targets: I, step_count: u32) -> Result<u32, DriverError>
    where
        I: IntoIterator<Item = (JointId, BoundedAngle)>,
    {
        let mut tracks: SmallVec<[Track; 12]> = SmallVec::new();
        for (joint, target) in targets {
            let target = target.value();
            let start = self.current[joint];
            let track = Track {
                joint,
                channel: self.model.joints.channel(joint),
                start,
                delta: target - start,
                target,
            };
            match tracks.iter_mut().find(|t| t.joint == joint) {
                Some(existing) => *existing = track,
                None => tracks.push(track),
            }
        }
        tracks.retain(|t| t.delta != 0.0);

        if step_count == 0 || tracks.is_empty() {
            return Ok(0);
        }

        let max_travel = tracks.iter().map(|t| t.delta.abs()).fold(0.0, f64::max);
        let iterations = match self.settings.interpolation {
            Interpolation::Linear => step_count,
            Interpolation::UnitDegree => (max_travel.ceil() as u32).max(1),
        };

        debug!(
            joints = tracks.len(),
            iterations,
            max_travel,
            "Synchronized move"
        );

        // Linear: 每步 delta / n；UnitDegree: 行程最大的关节每步 1°
        let span = match self.settings.interpolation {
            Interpolation::Linear => iterations as f64,
            Interpolation::UnitDegree => max_travel,
        };

        for i in 1..=iterations {
            for track in tracks.iter() {
                let value = if i == iterations {
                    track.target
                } else {
                    track.start + track.delta * i as f64 / span
                };
                self.command(track.joint, track.channel, value, i)?;
            }
            self.hooks.trigger_iteration(i, iterations);

            if i < iterations {
                pause(self.settings.step_delay);
            }
        }

        Ok(iterations)
    }

    /// 单关节运动
    pub fn move_joint(
        &mut self,
        joint: JointId,
        target: BoundedAngle,
        step_count: u32,
    ) -> Result<u32, DriverError> {
        self.move_to([(joint, target)], step_count)
    }

    /// 所有关节同步回到中位角
    pub fn move_to_neutral(&mut self, step_count: u32) -> Result<u32, DriverError> {
        let model = Arc::clone(&self.model);
        let targets = JointId::all()
            .map(|joint| (joint, model.clamp.clamp(joint, model.joints.neutral(joint))));
        self.move_to(targets, step_count)
    }

    /// 子动作之间的停顿
    pub fn dwell(&self) {
        pause(self.settings.dwell);
    }

    fn command(
        &mut self,
        joint: JointId,
        channel: u8,
        degrees: f64,
        iteration: u32,
    ) -> Result<(), DriverError> {
        self.actuator
            .set_angle(channel, degrees)
            .map_err(|source| DriverError::Actuator {
                joint,
                channel,
                source,
            })?;
        self.current[joint] = degrees;
        self.commands_sent += 1;
        trace!(joint = %joint, channel, degrees, iteration, "Command sent");
        self.hooks.trigger_command(&ActuatorCommand {
            joint,
            channel,
            degrees,
            iteration,
        });
        Ok(())
    }

    /// 当前指令角度
    #[inline]
    pub fn angle(&self, joint: JointId) -> f64 {
        self.current[joint]
    }

    /// 所有关节的当前指令角度
    pub fn angles(&self) -> JointTable<f64> {
        self.current
    }

    /// 限位后的目标角度
    pub fn bound(&self, joint: JointId, requested: f64) -> BoundedAngle {
        self.model.clamp.clamp(joint, requested)
    }

    pub fn model(&self) -> &Arc<RobotModel> {
        &self.model
    }

    pub fn settings(&self) -> &MotionSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: MotionSettings) {
        self.settings = settings;
    }

    pub fn hooks_mut(&mut self) -> &mut HookManager {
        &mut self.hooks
    }

    /// 已成功下发的命令总数
    pub fn commands_sent(&self) -> u64 {
        self.commands_sent
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }

    pub fn into_actuator(self) -> A {
        self.actuator
    }
}

impl<A: Actuator> std::fmt::Debug for MotionDriver<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionDriver")
            .field("actuator", &self.actuator.name())
            .field("settings", &self.settings)
            .field("commands_sent", &self.commands_sent)
            .finish()
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        spin_sleep::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ActuatorError;
    use crate::mock::MockActuator;
    use crate::recording::AsyncCommandRecorder;
    use quad_model::{JointAxis, Leg};
    use std::sync::atomic::Ordering;

    const FL_FEMUR: JointId = JointId::new(Leg::FrontLeft, JointAxis::Femur);
    const FL_TIBIA: JointId = JointId::new(Leg::FrontLeft, JointAxis::Tibia);

    fn driver(actuator: MockActuator) -> MotionDriver<MockActuator> {
        let model = Arc::new(RobotModel::default_model().unwrap());
        MotionDriver::new(actuator, model, MotionSettings::immediate())
    }

    #[test]
    fn test_synchronized_move_reaches_targets_on_final_iteration() {
        let mock = MockActuator::new();
        let log = mock.log();
        let mut driver = driver(mock);

        // FL 大腿 141 → 151（+10），FL 小腿 90 → 86（-4）
        let targets = [
            (FL_FEMUR, driver.bound(FL_FEMUR, 151.0)),
            (FL_TIBIA, driver.bound(FL_TIBIA, 86.0)),
        ];
        let iterations = driver.move_to(targets, 10).unwrap();
        assert_eq!(iterations, 10);

        let femur = log.channel_history(1);
        let tibia = log.channel_history(0);
        assert_eq!(femur.len(), 10);
        assert_eq!(tibia.len(), 10);

        for i in 0..9 {
            assert_ne!(femur[i], 151.0, "femur finished early at {}", i);
            assert_ne!(tibia[i], 86.0, "tibia finished early at {}", i);
        }
        assert_eq!(femur[9], 151.0);
        assert_eq!(tibia[9], 86.0);
        assert!((femur[0] - 142.0).abs() < 1e-9);
        assert!((tibia[4] - 88.0).abs() < 1e-9);

        // 命令交替下发：每个插值步每个关节一条
        let channels: Vec<u8> = log.snapshot().iter().map(|c| c.channel).take(4).collect();
        assert_eq!(channels, vec![1, 0, 1, 0]);

        assert_eq!(driver.angle(FL_FEMUR), 151.0);
        assert_eq!(driver.angle(FL_TIBIA), 86.0);
    }

    #[test]
    fn test_degenerate_moves_emit_nothing() {
        let mock = MockActuator::new();
        let log = mock.log();
        let mut driver = driver(mock);

        let target = driver.bound(FL_FEMUR, 150.0);
        assert_eq!(driver.move_joint(FL_FEMUR, target, 0).unwrap(), 0);
        assert_eq!(driver.angle(FL_FEMUR), 141.0);

        let same = driver.bound(FL_FEMUR, 141.0);
        assert_eq!(driver.move_joint(FL_FEMUR, same, 10).unwrap(), 0);
        assert!(log.is_empty());
    }

    #[test]
    fn test_unchanged_joints_are_not_commanded() {
        let mock = MockActuator::new();
        let log = mock.log();
        let mut driver = driver(mock);

        let targets = [
            (FL_FEMUR, driver.bound(FL_FEMUR, 145.0)),
            (FL_TIBIA, driver.bound(FL_TIBIA, 90.0)),
        ];
        driver.move_to(targets, 4).unwrap();
        assert_eq!(log.len(), 4);
        assert!(log.channel_history(0).is_empty());
    }

    #[test]
    fn test_no_drift_across_repeated_moves() {
        let mut driver = driver(MockActuator::new());
        for k in 1..=9 {
            let requested = 141.0 + k as f64 / 3.0;
            let target = driver.bound(FL_FEMUR, requested);
            driver.move_joint(FL_FEMUR, target, 7).unwrap();
            assert_eq!(driver.angle(FL_FEMUR), requested);
        }
    }

    #[test]
    fn test_unit_degree_mode() {
        let mock = MockActuator::new();
        let log = mock.log();
        let mut driver = driver(mock);
        driver.set_settings(
            MotionSettings::immediate().with_interpolation(InterpolationMode::UnitDegree),
        );

        // 大腿 +5.5，小腿 -2.75（一半行程）
        let targets = [
            (FL_FEMUR, driver.bound(FL_FEMUR, 146.5)),
            (FL_TIBIA, driver.bound(FL_TIBIA, 87.25)),
        ];
        let iterations = driver.move_to(targets, 1).unwrap();
        assert_eq!(iterations, 6);

        let femur = log.channel_history(1);
        assert_eq!(femur, vec![142.0, 143.0, 144.0, 145.0, 146.0, 146.5]);
        let tibia = log.channel_history(0);
        assert_eq!(tibia.len(), 6);
        assert!((tibia[1] - 89.0).abs() < 1e-9);
        assert_eq!(tibia[5], 87.25);
    }

    #[test]
    fn test_actuator_failure_aborts_and_keeps_previous_angle() {
        let mock = MockActuator::new().fail_after(3, ActuatorError::Unavailable("brownout".into()));
        let mut driver = driver(mock);

        let targets = [
            (FL_FEMUR, driver.bound(FL_FEMUR, 151.0)),
            (FL_TIBIA, driver.bound(FL_TIBIA, 80.0)),
        ];
        let err = driver.move_to(targets, 10).unwrap_err();
        assert_eq!(err.joint(), FL_TIBIA);
        assert!(err.is_fatal());

        // 第 2 步：大腿已下发，小腿失败，保持第 1 步的值
        assert!((driver.angle(FL_FEMUR) - 143.0).abs() < 1e-9);
        assert!((driver.angle(FL_TIBIA) - 89.0).abs() < 1e-9);
        assert_eq!(driver.commands_sent(), 3);
    }

    #[test]
    fn test_initialize_and_move_to_neutral() {
        let mock = MockActuator::new();
        let log = mock.log();
        let mut driver = driver(mock);

        driver.initialize().unwrap();
        assert_eq!(log.len(), 12);
        assert_eq!(log.channel_history(4), vec![47.0]);

        let target = driver.bound(FL_TIBIA, 100.0);
        driver.move_joint(FL_TIBIA, target, 5).unwrap();
        log.clear();

        assert_eq!(driver.move_to_neutral(5).unwrap(), 5);
        assert_eq!(log.len(), 5);
        assert_eq!(driver.angles(), driver.model().joints.neutral_table());
    }

    #[test]
    fn test_hooks_observe_commands() {
        let mut driver = driver(MockActuator::new());
        let (recorder, rx) = AsyncCommandRecorder::new();
        let counter = recorder.command_counter().clone();
        driver.hooks_mut().add_callback(Arc::new(recorder));

        let target = driver.bound(FL_TIBIA, 95.0);
        driver.move_joint(FL_TIBIA, target, 5).unwrap();

        let commands: Vec<ActuatorCommand> = rx.try_iter().collect();
        assert_eq!(commands.len(), 5);
        assert_eq!(counter.load(Ordering::Relaxed), 5);
        assert_eq!(
            commands.iter().map(|c| c.iteration).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
        assert!(commands.iter().all(|c| c.joint == FL_TIBIA && c.channel == 0));
    }
}
