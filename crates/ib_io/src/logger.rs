// crates/ib_io/src/logger.rs

//! 周期输出调度
//!
//! `Logger` 按注册顺序保存 (输出目标, 周期)，在 `step % period == 0`
//! 时触发对应目标（包括第 0 步）。
//!
//! ## 生命周期
//!
//! ```text
//! new ─> add_output* ─> init ─> do_output* ─> cleanup
//! ```
//!
//! - 输出目标只在 init/cleanup 区间内被调用，区间外的 `do_output` 返回
//!   [`OutputError::Lifecycle`]
//! - 写出失败的目标会被记录并在本次运行余下部分禁用，其余目标照常输出
//! - 同一步调用两次会输出两次，不做去重
//! - 已 init 但未 cleanup 的 Logger 在 drop 时自动 cleanup

use ib_physics::State;
use tracing::{debug, info, warn};

use crate::error::{OutputError, OutputResult};
use crate::sinks::OutputSink;

/// Logger 所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerPhase {
    /// 可以注册输出目标
    Configuring,
    /// 已初始化，可以输出
    Active,
    /// 已清理
    Closed,
}

struct Registration {
    sink: Box<dyn OutputSink>,
    period: u64,
    enabled: bool,
}

/// 周期输出调度器
pub struct Logger {
    outputs: Vec<Registration>,
    phase: LoggerPhase,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// 创建空调度器
    pub fn new() -> Self {
        Self {
            outputs: Vec::new(),
            phase: LoggerPhase::Configuring,
        }
    }

    /// 当前阶段
    pub fn phase(&self) -> LoggerPhase {
        self.phase
    }

    /// 已注册的输出目标数
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// 是否没有注册任何输出目标
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// 仍处于启用状态的输出目标数
    pub fn active_count(&self) -> usize {
        self.outputs.iter().filter(|r| r.enabled).count()
    }

    /// 注册输出目标
    ///
    /// `period <= 0` 表示关闭该输出，不注册并返回 `false`；
    /// `init` 之后的注册同样被拒绝。
    pub fn add_output(&mut self, sink: Box<dyn OutputSink>, period: i64) -> bool {
        if self.phase != LoggerPhase::Configuring {
            warn!(sink = sink.name(), "Logger 已初始化，忽略新的输出目标");
            return false;
        }
        if period <= 0 {
            debug!(sink = sink.name(), period, "输出周期不为正，跳过");
            return false;
        }

        info!("输出 {} 每 {} 步一次", sink.name(), period);
        self.outputs.push(Registration {
            sink,
            period: period as u64,
            enabled: true,
        });
        true
    }

    /// 初始化全部输出目标，返回成功初始化的数目
    ///
    /// 单个目标初始化失败只会禁用该目标。
    pub fn init(&mut self) -> OutputResult<usize> {
        if self.phase != LoggerPhase::Configuring {
            return Err(OutputError::lifecycle(format!(
                "init 只能调用一次 (当前阶段 {:?})",
                self.phase
            )));
        }

        for reg in &mut self.outputs {
            if let Err(e) = reg.sink.init() {
                warn!("输出 {} 初始化失败，已禁用: {}", reg.sink.name(), e);
                reg.enabled = false;
            }
        }
        self.phase = LoggerPhase::Active;
        Ok(self.active_count())
    }

    /// 输出第 `step` 步，返回实际写出的目标数
    pub fn do_output(&mut self, state: &State, step: u64) -> OutputResult<usize> {
        if self.phase != LoggerPhase::Active {
            return Err(OutputError::lifecycle(format!(
                "do_output 必须在 init 与 cleanup 之间调用 (当前阶段 {:?})",
                self.phase
            )));
        }

        let mut written = 0;
        for reg in self.outputs.iter_mut().filter(|r| r.enabled) {
            if step % reg.period != 0 {
                continue;
            }
            match reg.sink.write(state, step) {
                Ok(()) => written += 1,
                Err(e) => {
                    warn!("输出 {} 在第 {} 步失败，后续不再输出: {}", reg.sink.name(), step, e);
                    reg.enabled = false;
                }
            }
        }
        Ok(written)
    }

    /// 清理全部输出目标
    ///
    /// 每个已初始化的目标恰好清理一次；重复调用只记录警告。
    pub fn cleanup(&mut self) {
        match self.phase {
            LoggerPhase::Closed => {
                warn!("Logger 已清理，忽略重复的 cleanup");
                return;
            }
            LoggerPhase::Configuring => {
                debug!("Logger 未初始化，无需清理输出目标");
            }
            LoggerPhase::Active => {
                for reg in &mut self.outputs {
                    if let Err(e) = reg.sink.cleanup() {
                        warn!("输出 {} 清理失败: {}", reg.sink.name(), e);
                    }
                }
            }
        }
        self.phase = LoggerPhase::Closed;
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.phase == LoggerPhase::Active {
            self.cleanup();
        }
    }
}
