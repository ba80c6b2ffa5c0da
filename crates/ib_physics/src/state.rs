// crates/ib_physics/src/state.rs

//! 流场状态
//!
//! 某一离散时刻的完整快照：
//!
//! - `gamma`: 涡量，每个单元一个值（`nx * ny`，行主序 `j * nx + i`）
//! - `q`: 通量，每个单元两个分量（`2 * nx * ny`，先全部 x 分量再全部 y 分量）
//! - `f`: 边界力，每个边界点两个分量（`2 * n_points`，先 x 后 y）
//!
//! 一次运行中各数组维度不变。
//!
//! # 重启文件
//!
//! 二进制记录，魔数 `IBST`，载荷依次为
//! `step, time, nx, ny, n_points, gamma, q, f`。

use ib_foundation::{IbError, IbResult, RecordReader, RecordWriter};
use std::path::Path;

use crate::grid::Grid;

/// 重启文件魔数
pub const STATE_MAGIC: &[u8; 4] = b"IBST";

/// 重启文件版本
pub const STATE_VERSION: u32 = 1;

/// 流场状态
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    /// 时间步编号
    pub step: u64,
    /// 当前时间
    pub time: f64,
    /// 涡量
    pub gamma: Vec<f64>,
    /// 通量
    pub q: Vec<f64>,
    /// 边界力
    pub f: Vec<f64>,
    nx: usize,
    ny: usize,
    n_points: usize,
}

impl State {
    /// 创建全零状态
    pub fn new(nx: usize, ny: usize, n_points: usize) -> Self {
        let n_cells = nx * ny;
        Self {
            step: 0,
            time: 0.0,
            gamma: vec![0.0; n_cells],
            q: vec![0.0; 2 * n_cells],
            f: vec![0.0; 2 * n_points],
            nx,
            ny,
            n_points,
        }
    }

    /// 在给定网格上创建全零状态
    pub fn zeros(grid: &Grid, n_points: usize) -> Self {
        Self::new(grid.nx(), grid.ny(), n_points)
    }

    /// x 方向单元数
    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// y 方向单元数
    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// 单元总数
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.nx * self.ny
    }

    /// 边界点数
    #[inline]
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// 边界力 x 分量
    pub fn fx(&self) -> &[f64] {
        &self.f[..self.n_points]
    }

    /// 边界力 y 分量
    pub fn fy(&self) -> &[f64] {
        &self.f[self.n_points..]
    }

    /// 通量 x 分量
    pub fn qx(&self) -> &[f64] {
        &self.q[..self.n_cells()]
    }

    /// 通量 y 分量
    pub fn qy(&self) -> &[f64] {
        &self.q[self.n_cells()..]
    }

    /// 维度是否与另一状态一致
    pub fn same_shape(&self, other: &State) -> bool {
        self.nx == other.nx && self.ny == other.ny && self.n_points == other.n_points
    }

    /// 检查数组长度与声明的维度一致
    pub fn check_consistency(&self) -> IbResult<()> {
        IbError::check_size("gamma", self.n_cells(), self.gamma.len())?;
        IbError::check_size("q", 2 * self.n_cells(), self.q.len())?;
        IbError::check_size("f", 2 * self.n_points, self.f.len())
    }

    /// 复制另一个同维度状态的全部内容，不重新分配
    pub fn copy_from(&mut self, other: &State) {
        debug_assert!(self.same_shape(other));
        self.step = other.step;
        self.time = other.time;
        self.gamma.copy_from_slice(&other.gamma);
        self.q.copy_from_slice(&other.q);
        self.f.copy_from_slice(&other.f);
    }

    /// 写入重启文件
    pub fn save(&self, path: &Path) -> IbResult<()> {
        self.check_consistency()?;

        let mut writer = RecordWriter::new(STATE_MAGIC, STATE_VERSION);
        writer
            .put_u64(self.step)
            .put_f64(self.time)
            .put_usize(self.nx)
            .put_usize(self.ny)
            .put_usize(self.n_points)
            .put_f64_slice(&self.gamma)
            .put_f64_slice(&self.q)
            .put_f64_slice(&self.f);
        writer.write_to(path)
    }

    /// 读取重启文件为新状态
    pub fn load(path: &Path) -> IbResult<Self> {
        let mut reader = RecordReader::open(path, STATE_MAGIC, STATE_VERSION)?;

        let step = reader.get_u64()?;
        let time = reader.get_f64()?;
        let nx = reader.get_usize()?;
        let ny = reader.get_usize()?;
        let n_points = reader.get_usize()?;
        let overflow = || IbError::format(format!("维度溢出: {nx} x {ny}, {n_points} 点"));
        let n_cells = nx.checked_mul(ny).ok_or_else(overflow)?;
        let n_q = n_cells.checked_mul(2).ok_or_else(overflow)?;
        let n_f = n_points.checked_mul(2).ok_or_else(overflow)?;

        let gamma = reader.get_f64_vec_exact("gamma", n_cells)?;
        let q = reader.get_f64_vec_exact("q", n_q)?;
        let f = reader.get_f64_vec_exact("f", n_f)?;
        reader.finish()?;

        Ok(Self {
            step,
            time,
            gamma,
            q,
            f,
            nx,
            ny,
            n_points,
        })
    }

    /// 读取重启文件覆盖当前状态
    ///
    /// 文件维度必须与当前状态一致；失败时当前状态保持不变。
    pub fn load_into(&mut self, path: &Path) -> IbResult<()> {
        let loaded = Self::load(path)?;
        if loaded.nx != self.nx || loaded.ny != self.ny {
            return Err(IbError::invalid_input(format!(
                "{}: 网格维度 {} x {} 与当前 {} x {} 不一致",
                path.display(),
                loaded.nx,
                loaded.ny,
                self.nx,
                self.ny
            )));
        }
        if loaded.n_points != self.n_points {
            return Err(IbError::size_mismatch("n_points", self.n_points, loaded.n_points));
        }
        *self = loaded;
        Ok(())
    }
}
