//! 异步命令录制（Async Command Recorder）
//!
//! 把每条已下发的舵机命令通过有界 Channel 转发给后台消费者（写文件、测试断言）。
//!
//! # 设计原则
//!
//! - **Bounded Queue**: 使用 `bounded` 通道防止 OOM
//! - **非阻塞**: 使用 `try_send`，队列满时丢弃命令而非阻塞运动循环
//! - **丢弃监控**: 提供 `dropped_commands` 计数器

use crate::hooks::{ActuatorCommand, MotionCallback};
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// 默认队列容量
///
/// 一个小跑半周期约 160 条命令，10,000 条足够缓存数十个周期。
pub const DEFAULT_CAPACITY: usize = 10_000;

/// 异步命令录制钩子
pub struct AsyncCommandRecorder {
    tx: Sender<ActuatorCommand>,
    dropped_commands: Arc<AtomicU64>,
    command_counter: Arc<AtomicU64>,
}

impl AsyncCommandRecorder {
    /// 使用默认容量创建
    ///
    /// # 返回
    ///
    /// - `(recorder, rx)`: 钩子实例和接收端
    #[must_use]
    pub fn new() -> (Self, Receiver<ActuatorCommand>) {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> (Self, Receiver<ActuatorCommand>) {
        let (tx, rx) = bounded(capacity);
        let recorder = Self {
            tx,
            dropped_commands: Arc::new(AtomicU64::new(0)),
            command_counter: Arc::new(AtomicU64::new(0)),
        };
        (recorder, rx)
    }

    /// 丢弃计数器（可直接持有 Arc 引用做监控）
    #[must_use]
    pub fn dropped_commands(&self) -> &Arc<AtomicU64> {
        &self.dropped_commands
    }

    /// 成功入队的命令计数器
    #[must_use]
    pub fn command_counter(&self) -> &Arc<AtomicU64> {
        &self.command_counter
    }
}

impl MotionCallback for AsyncCommandRecorder {
    fn on_command_sent(&self, command: &ActuatorCommand) {
        match self.tx.try_send(*command) {
            Ok(()) => {
                self.command_counter.fetch_add(1, Ordering::Relaxed);
            },
            Err(TrySendError::Full(_)) => {
                let dropped = self.dropped_commands.fetch_add(1, Ordering::Relaxed) + 1;
                // 只在首次丢弃时告警
                if dropped == 1 {
                    warn!("Command recorder queue full, dropping commands");
                }
            },
            Err(TrySendError::Disconnected(_)) => {
                self.dropped_commands.fetch_add(1, Ordering::Relaxed);
            },
        }
    }
}
