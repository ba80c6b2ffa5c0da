// crates/ib_io/src/sinks/restart.rs

//! 重启文件输出

use ib_physics::State;
use tracing::debug;

use super::OutputSink;
use crate::error::OutputResult;
use crate::template::FileTemplate;

/// 按步数写出二进制重启文件
///
/// 文件可作为下一次运行的初始条件。
#[derive(Debug, Clone)]
pub struct RestartSink {
    file: FileTemplate,
}

impl RestartSink {
    /// 创建输出目标，`file` 形如 `out/ibpm%03d.bin`
    pub fn new(file: FileTemplate) -> Self {
        Self { file }
    }
}

impl OutputSink for RestartSink {
    fn name(&self) -> &str {
        "restart"
    }

    fn write(&mut self, state: &State, step: u64) -> OutputResult<()> {
        let path = self.file.path(step);
        state.save(&path)?;
        debug!(path = %path.display(), "写出重启文件");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restart_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let template = format!("{}/ibpm%03d.bin", dir.path().display());
        let mut sink = RestartSink::new(FileTemplate::new(template).unwrap());

        let mut state = State::new(3, 2, 1);
        state.gamma[4] = 1.25;
        state.step = 12;
        sink.write(&state, 12).unwrap();

        let loaded = State::load(&dir.path().join("ibpm012.bin")).unwrap();
        assert_eq!(loaded, state);
    }
}
