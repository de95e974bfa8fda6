//! Mock 执行器（测试用）
//!
//! 把每条 `(channel, degrees)` 写入共享日志，并可设置在第 N 条命令后失败，
//! 用于验证逐步插值、同步到达以及故障传播。

use crate::actuator::Actuator;
use crate::error::ActuatorError;
use std::sync::{Arc, Mutex, PoisonError};

/// 单条已记录的命令
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedCommand {
    pub channel: u8,
    pub degrees: f64,
}

/// 命令日志（可跨线程共享）
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    inner: Arc<Mutex<Vec<RecordedCommand>>>,
}

impl CommandLog {
    fn push(&self, command: RecordedCommand) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command);
    }

    /// 日志快照
    pub fn snapshot(&self) -> Vec<RecordedCommand> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 某通道的角度序列
    pub fn channel_history(&self, channel: u8) -> Vec<f64> {
        self.snapshot()
            .into_iter()
            .filter(|c| c.channel == channel)
            .map(|c| c.degrees)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

/// Mock 执行器
#[derive(Debug, Default)]
pub struct MockActuator {
    log: CommandLog,
    /// (剩余可成功的命令数, 之后返回的错误)
    failure: Option<(usize, ActuatorError)>,
}

impl MockActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 成功 `count` 条命令后，每条命令都返回 `error`
    #[must_use]
    pub fn fail_after(self, count: usize, error: ActuatorError) -> Self {
        Self {
            failure: Some((count, error)),
            ..self
        }
    }

    /// 共享日志句柄
    pub fn log(&self) -> CommandLog {
        self.log.clone()
    }
}

impl Actuator for MockActuator {
    fn set_angle(&mut self, channel: u8, degrees: f64) -> Result<(), ActuatorError> {
        if let Some((remaining, error)) = &mut self.failure {
            if *remaining == 0 {
                return Err(error.clone());
            }
            *remaining -= 1;
        }
        self.log.push(RecordedCommand { channel, degrees });
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
