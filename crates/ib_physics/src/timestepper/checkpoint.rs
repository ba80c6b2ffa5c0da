// crates/ib_physics/src/timestepper/checkpoint.rs

//! 时间推进器检查点
//!
//! 文件 `<base>.<tag>`，二进制记录，魔数 `IBTS`，载荷依次为：
//!
//! ```text
//! tag (len u64 + utf8) | dt f64 | nx u64 | ny u64 | n_points u64
//! | has_history u8 | [history: len u64 + f64 * len]
//! ```
//!
//! 历史数组按原始位模式保存，恢复后的多步推进与不中断时逐位一致。

use ib_config::SchemeKind;
use ib_foundation::{IbError, IbResult, RecordReader, RecordWriter};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::model::FlowModel;

/// 检查点魔数
pub const STEPPER_MAGIC: &[u8; 4] = b"IBTS";

/// 检查点版本
pub const STEPPER_VERSION: u32 = 1;

/// 检查点路径 `<base>.<tag>`
pub fn checkpoint_path(base: &Path, kind: SchemeKind) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(kind.tag());
    PathBuf::from(name)
}

/// 推进器检查点内容
#[derive(Debug, Clone, PartialEq)]
pub struct StepperCheckpoint {
    /// 格式
    pub kind: SchemeKind,
    /// 时间步长
    pub dt: f64,
    /// x 方向单元数
    pub nx: usize,
    /// y 方向单元数
    pub ny: usize,
    /// 边界点数
    pub n_points: usize,
    /// 多步法历史（上一步导数）
    pub history: Option<Vec<f64>>,
}

impl StepperCheckpoint {
    /// 按模型维度构建（无历史）
    pub fn new(kind: SchemeKind, dt: f64, model: &dyn FlowModel) -> Self {
        Self {
            kind,
            dt,
            nx: model.grid().nx(),
            ny: model.grid().ny(),
            n_points: model.n_boundary_points(),
            history: None,
        }
    }

    /// 附带历史数据
    pub fn with_history(mut self, history: Option<&[f64]>) -> Self {
        self.history = history.map(<[f64]>::to_vec);
        self
    }

    /// 写入 `<base>.<tag>`
    pub fn write(&self, base: &Path) -> IbResult<()> {
        let mut writer = RecordWriter::new(STEPPER_MAGIC, STEPPER_VERSION);
        writer
            .put_str(self.kind.tag())
            .put_f64(self.dt)
            .put_usize(self.nx)
            .put_usize(self.ny)
            .put_usize(self.n_points);
        match &self.history {
            Some(history) => writer.put_u8(1).put_f64_slice(history),
            None => writer.put_u8(0),
        };
        writer.write_to(&checkpoint_path(base, self.kind))
    }

    /// 读取 `<base>.<tag>`，文件中的格式标签必须与 `kind` 一致
    pub fn read(base: &Path, kind: SchemeKind) -> IbResult<Self> {
        let path = checkpoint_path(base, kind);
        let mut reader = RecordReader::open(&path, STEPPER_MAGIC, STEPPER_VERSION)?;

        let tag = reader.get_string()?;
        if tag != kind.tag() {
            return Err(IbError::format(format!(
                "{}: 检查点格式为 '{}', 期望 '{}'",
                path.display(),
                tag,
                kind.tag()
            )));
        }

        let dt = reader.get_f64()?;
        let nx = reader.get_usize()?;
        let ny = reader.get_usize()?;
        let n_points = reader.get_usize()?;
        let history = match reader.get_u8()? {
            0 => None,
            1 => Some(reader.get_f64_vec()?),
            flag => {
                return Err(IbError::format(format!("无效的历史标志: {flag}")));
            }
        };
        reader.finish()?;

        Ok(Self {
            kind,
            dt,
            nx,
            ny,
            n_points,
            history,
        })
    }

    /// 检查步长和维度与当前推进器一致
    pub fn verify(&self, dt: f64, model: &dyn FlowModel) -> IbResult<()> {
        if self.dt.to_bits() != dt.to_bits() {
            return Err(IbError::invalid_input(format!(
                "检查点时间步长 {} 与当前 {} 不一致",
                self.dt, dt
            )));
        }
        IbError::check_size("nx", model.grid().nx(), self.nx)?;
        IbError::check_size("ny", model.grid().ny(), self.ny)?;
        IbError::check_size("n_points", model.n_boundary_points(), self.n_points)?;
        if let Some(history) = &self.history {
            IbError::check_size("history", model.grid().n_cells(), history.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::model::QuiescentModel;

    fn model(nx: usize) -> QuiescentModel {
        QuiescentModel::new(Grid::new(nx, 2, 1.0, 0.0, 0.0).unwrap(), 3)
    }

    #[test]
    fn test_checkpoint_path_appends_tag() {
        let path = checkpoint_path(Path::new("out/ibpm"), SchemeKind::RungeKutta3);
        assert_eq!(path, PathBuf::from("out/ibpm.rk3"));
        let path = checkpoint_path(Path::new("run.v2"), SchemeKind::AdamsBashforth2);
        assert_eq!(path, PathBuf::from("run.v2.ab2"));
    }

    #[test]
    fn test_write_read_with_history() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("ibpm");
        let model = model(2);
        let history = [0.1, -0.2, 1e-300, f64::MIN_POSITIVE];

        let cp = StepperCheckpoint::new(SchemeKind::AdamsBashforth2, 0.01, &model)
            .with_history(Some(&history));
        cp.write(&base).unwrap();
        assert!(dir.path().join("ibpm.ab2").exists());

        let read = StepperCheckpoint::read(&base, SchemeKind::AdamsBashforth2).unwrap();
        assert_eq!(read, cp);
        assert!(read.verify(0.01, &model).is_ok());
    }

    #[test]
    fn test_verify_mismatch() {
        let model2 = model(2);
        let cp = StepperCheckpoint::new(SchemeKind::Euler, 0.01, &model2);
        assert!(cp.verify(0.02, &model2).is_err());
        assert!(cp.verify(0.01, &model(3)).is_err());
    }

    #[test]
    fn test_tag_mismatch_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("ibpm");
        StepperCheckpoint::new(SchemeKind::RungeKutta3, 0.01, &model(2))
            .write(&base)
            .unwrap();
        std::fs::rename(dir.path().join("ibpm.rk3"), dir.path().join("ibpm.rk2")).unwrap();

        let err = StepperCheckpoint::read(&base, SchemeKind::RungeKutta2).unwrap_err();
        assert!(matches!(err, IbError::Format { .. }));
    }

    #[test]
    fn test_missing_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let err = StepperCheckpoint::read(&dir.path().join("none"), SchemeKind::Euler).unwrap_err();
        assert!(matches!(err, IbError::FileNotFound { .. }));
    }
}
