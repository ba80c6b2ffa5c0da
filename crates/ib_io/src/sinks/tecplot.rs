// crates/ib_io/src/sinks/tecplot.rs

//! Tecplot ASCII 导出
//!
//! 每次输出一个 POINT 格式的结构化区块文件，变量为单元中心坐标、
//! 涡量和通量两个分量：
//!
//! ```text
//! TITLE = "Test run, step 005"
//! VARIABLES = "X" "Y" "Omega" "Qx" "Qy"
//! ZONE T="Rect", I=200, J=200, F=POINT
//! ...
//! ```

use ib_physics::{Grid, State};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

use super::OutputSink;
use crate::error::{OutputError, OutputResult};
use crate::template::FileTemplate;

/// Tecplot 输出目标
#[derive(Debug, Clone)]
pub struct TecplotSink {
    file: FileTemplate,
    title: FileTemplate,
    grid: Grid,
}

impl TecplotSink {
    /// 创建输出目标
    ///
    /// `file` 和 `title` 都是步数模板，如 `out/ibpm%03d.plt` 与
    /// `Test run, step %03d`。
    pub fn new(file: FileTemplate, title: FileTemplate, grid: Grid) -> Self {
        Self { file, title, grid }
    }

    fn write_file(&self, path: &Path, state: &State, step: u64) -> std::io::Result<()> {
        let mut w = BufWriter::new(File::create(path)?);
        let grid = &self.grid;
        let n_cells = grid.n_cells();

        writeln!(w, "TITLE = \"{}\"", self.title.render(step))?;
        writeln!(w, "VARIABLES = \"X\" \"Y\" \"Omega\" \"Qx\" \"Qy\"")?;
        writeln!(
            w,
            "ZONE T=\"Rect\", I={}, J={}, F=POINT",
            grid.nx(),
            grid.ny()
        )?;

        for j in 0..grid.ny() {
            for i in 0..grid.nx() {
                let idx = grid.index(i, j);
                let c = grid.cell_center(i, j);
                writeln!(
                    w,
                    "{:.8e} {:.8e} {:.8e} {:.8e} {:.8e}",
                    c.x,
                    c.y,
                    state.gamma[idx],
                    state.q[idx],
                    state.q[n_cells + idx]
                )?;
            }
        }

        w.flush()
    }
}

impl OutputSink for TecplotSink {
    fn name(&self) -> &str {
        "tecplot"
    }

    fn write(&mut self, state: &State, step: u64) -> OutputResult<()> {
        if state.nx() != self.grid.nx() || state.ny() != self.grid.ny() {
            return Err(ib_foundation::IbError::invalid_input(format!(
                "状态网格 {} x {} 与输出网格 {} x {} 不一致",
                state.nx(),
                state.ny(),
                self.grid.nx(),
                self.grid.ny()
            ))
            .into());
        }
        state.check_consistency()?;

        let path = self.file.path(step);
        self.write_file(&path, state, step)
            .map_err(|e| OutputError::io(&path, e))?;
        debug!(path = %path.display(), "写出 Tecplot 文件");
        Ok(())
    }
}
