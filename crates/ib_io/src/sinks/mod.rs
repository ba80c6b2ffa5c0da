// crates/ib_io/src/sinks/mod.rs

//! 周期输出目标
//!
//! 每个输出目标只负责一种文件编码，不持有任何模拟状态；
//! 调用时由 [`Logger`](crate::Logger) 借出 `&State` 和步数。
//!
//! - [`TecplotSink`]: ASCII 可视化文件，每次输出一个文件
//! - [`RestartSink`]: 二进制重启文件，每次输出一个文件
//! - [`ForceLogSink`]: 边界受力日志，单文件逐行追加

mod force_log;
mod restart;
mod tecplot;

pub use force_log::ForceLogSink;
pub use restart::RestartSink;
pub use tecplot::TecplotSink;

use ib_physics::State;

use crate::error::OutputResult;

/// 输出目标 trait
pub trait OutputSink: Send {
    /// 诊断用名称
    fn name(&self) -> &str;

    /// 运行开始前调用一次
    fn init(&mut self) -> OutputResult<()> {
        Ok(())
    }

    /// 写出一次快照
    fn write(&mut self, state: &State, step: u64) -> OutputResult<()>;

    /// 运行结束时调用一次
    fn cleanup(&mut self) -> OutputResult<()> {
        Ok(())
    }
}
