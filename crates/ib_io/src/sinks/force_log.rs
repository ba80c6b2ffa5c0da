// crates/ib_io/src/sinks/force_log.rs

//! 边界受力日志
//!
//! 单个文本文件，每次输出追加一行：
//!
//! ```text
//! <step> <time> <fx> <fy>
//! ```
//!
//! `fx`/`fy` 为全部边界点受力分量之和。

use ib_physics::{NetForce, State};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::OutputSink;
use crate::error::{OutputError, OutputResult};

/// 受力日志输出目标
#[derive(Debug)]
pub struct ForceLogSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl ForceLogSink {
    /// 创建输出目标，文件在 `init` 时创建
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
        }
    }

    /// 日志文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for ForceLogSink {
    fn name(&self) -> &str {
        "force"
    }

    fn init(&mut self) -> OutputResult<()> {
        let file = File::create(&self.path).map_err(|e| OutputError::io(&self.path, e))?;
        self.writer = Some(BufWriter::new(file));
        Ok(())
    }

    fn write(&mut self, state: &State, step: u64) -> OutputResult<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| OutputError::lifecycle("受力日志尚未打开"))?;

        let force = NetForce::from_state(state);
        writeln!(
            writer,
            "{} {:.10e} {:.10e} {:.10e}",
            step, force.time, force.fx, force.fy
        )
        .and_then(|_| writer.flush())
        .map_err(|e| OutputError::io(&self.path, e))
    }

    fn cleanup(&mut self) -> OutputResult<()> {
        match self.writer.take() {
            Some(mut writer) => writer.flush().map_err(|e| OutputError::io(&self.path, e)),
            None => Ok(()),
        }
    }
}
