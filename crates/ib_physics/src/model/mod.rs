// crates/ib_physics/src/model/mod.rs

//! 流动模型
//!
//! 时间推进器只通过 [`FlowModel`] 接触物理：
//!
//! - `evaluate`: 由当前状态计算涡量时间导数 N(x)
//! - `project`: 由涡量刷新通量 `q` 与边界力 `f`
//!
//! 每个推进阶段都先求值、更新涡量，再投影。

mod viscous;

pub use viscous::ViscousModel;

use ib_foundation::{IbError, IbResult};

use crate::grid::Grid;
use crate::state::State;

/// 流动模型 trait
pub trait FlowModel: Send + Sync {
    /// 模型名称
    fn name(&self) -> &'static str;

    /// 计算网格
    fn grid(&self) -> &Grid;

    /// 边界点数
    fn n_boundary_points(&self) -> usize;

    /// 计算涡量时间导数
    ///
    /// `out` 长度为 `nx * ny`，调用方负责分配。
    fn evaluate(&self, state: &State, out: &mut [f64]) -> IbResult<()>;

    /// 由涡量刷新通量和边界力
    fn project(&self, state: &mut State) -> IbResult<()>;

    /// 在本模型的网格和边界上创建全零状态
    fn zero_state(&self) -> State {
        State::zeros(self.grid(), self.n_boundary_points())
    }

    /// 检查状态维度与模型一致
    fn check_state(&self, state: &State) -> IbResult<()> {
        let grid = self.grid();
        if state.nx() != grid.nx() || state.ny() != grid.ny() {
            return Err(IbError::invalid_input(format!(
                "状态网格 {} x {} 与模型网格 {} x {} 不一致",
                state.nx(),
                state.ny(),
                grid.nx(),
                grid.ny()
            )));
        }
        IbError::check_size("n_points", self.n_boundary_points(), state.n_points())?;
        state.check_consistency()
    }
}

/// 静止流体模型
///
/// 动力学恒为零；投影将边界力置零，通量保持不变。
#[derive(Debug, Clone)]
pub struct QuiescentModel {
    grid: Grid,
    n_points: usize,
}

impl QuiescentModel {
    /// 创建静止模型
    pub fn new(grid: Grid, n_points: usize) -> Self {
        Self { grid, n_points }
    }
}

impl FlowModel for QuiescentModel {
    fn name(&self) -> &'static str {
        "Quiescent"
    }

    fn grid(&self) -> &Grid {
        &self.grid
    }

    fn n_boundary_points(&self) -> usize {
        self.n_points
    }

    fn evaluate(&self, state: &State, out: &mut [f64]) -> IbResult<()> {
        IbError::check_size("rhs", state.n_cells(), out.len())?;
        out.fill(0.0);
        Ok(())
    }

    fn project(&self, state: &mut State) -> IbResult<()> {
        state.f.fill(0.0);
        Ok(())
    }
}
