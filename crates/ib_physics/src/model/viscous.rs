// crates/ib_physics/src/model/viscous.rs

//! 带均匀来流的粘性涡量模型
//!
//! ## 动力学
//!
//! ```text
//! N(γ) = ∇²γ / Re − U·∇γ
//! ```
//!
//! - 五点拉普拉斯
//! - 一阶迎风对流
//! - 区域外涡量为零
//!
//! ## 投影
//!
//! ```text
//! q_x = U_x dx + dx² (γ_N − γ_S) / 2
//! q_y = U_y dx − dx² (γ_E − γ_W) / 2
//! f_k = −dx · u_k
//! ```
//!
//! 其中 `u_k` 为来流速度加上边界点所在单元涡量诱导的局部速度；
//! 区域外的边界点只受来流作用。

use glam::DVec2;
use ib_foundation::{ensure, IbError, IbResult};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::FlowModel;
use crate::geometry::Geometry;
use crate::grid::Grid;
use crate::state::State;

/// 粘性涡量模型
#[derive(Debug, Clone)]
pub struct ViscousModel {
    grid: Grid,
    points: Vec<DVec2>,
    reynolds: f64,
    freestream: DVec2,
}

impl ViscousModel {
    /// 创建模型，来流默认为 x 方向单位速度
    pub fn new(grid: Grid, geometry: &Geometry, reynolds: f64) -> IbResult<Self> {
        ensure!(
            reynolds.is_finite() && reynolds > 0.0,
            IbError::invalid_input(format!("雷诺数必须为正: {reynolds}"))
        );
        Ok(Self {
            grid,
            points: geometry.points(),
            reynolds,
            freestream: DVec2::X,
        })
    }

    /// 设置来流大小和攻角（弧度）
    pub fn with_freestream(mut self, magnitude: f64, alpha: f64) -> Self {
        self.freestream = magnitude * DVec2::new(alpha.cos(), alpha.sin());
        self
    }

    /// 来流速度
    pub fn freestream(&self) -> DVec2 {
        self.freestream
    }

    /// 雷诺数
    pub fn reynolds(&self) -> f64 {
        self.reynolds
    }

    fn evaluate_row(&self, gamma: &[f64], j: usize, row: &mut [f64]) {
        let nx = self.grid.nx();
        let ny = self.grid.ny();
        let dx = self.grid.dx();
        let inv_dx2 = 1.0 / (dx * dx);
        let u = self.freestream;

        let at = |i: isize, j: isize| -> f64 {
            if i < 0 || j < 0 || i as usize >= nx || j as usize >= ny {
                0.0
            } else {
                gamma[j as usize * nx + i as usize]
            }
        };

        let jj = j as isize;
        for (i, out) in row.iter_mut().enumerate() {
            let ii = i as isize;
            let c = at(ii, jj);
            let (e, w, n, s) = (at(ii + 1, jj), at(ii - 1, jj), at(ii, jj + 1), at(ii, jj - 1));

            let laplacian = (e + w + n + s - 4.0 * c) * inv_dx2;

            let dgdx = (if u.x >= 0.0 { c - w } else { e - c }) / dx;
            let dgdy = (if u.y >= 0.0 { c - s } else { n - c }) / dx;

            *out = laplacian / self.reynolds - (u.x * dgdx + u.y * dgdy);
        }
    }

    fn induced_velocity(&self, gamma: &[f64], p: DVec2) -> DVec2 {
        let Some((i, j)) = self.grid.locate(p) else {
            return DVec2::ZERO;
        };
        let dx = self.grid.dx();
        let circulation = gamma[self.grid.index(i, j)] * dx * dx;
        let r = p - self.grid.cell_center(i, j);
        // 正则化核，核半径取半个单元
        let r2 = r.length_squared() + 0.25 * dx * dx;
        circulation / (std::f64::consts::TAU * r2) * r.perp()
    }
}

impl FlowModel for ViscousModel {
    fn name(&self) -> &'static str {
        "Viscous"
    }

    fn grid(&self) -> &Grid {
        &self.grid
    }

    fn n_boundary_points(&self) -> usize {
        self.points.len()
    }

    fn evaluate(&self, state: &State, out: &mut [f64]) -> IbResult<()> {
        IbError::check_size("rhs", self.grid.n_cells(), out.len())?;
        IbError::check_size("gamma", self.grid.n_cells(), state.gamma.len())?;

        let nx = self.grid.nx();
        let gamma = &state.gamma;

        #[cfg(feature = "parallel")]
        out.par_chunks_mut(nx)
            .enumerate()
            .for_each(|(j, row)| self.evaluate_row(gamma, j, row));

        #[cfg(not(feature = "parallel"))]
        out.chunks_mut(nx)
            .enumerate()
            .for_each(|(j, row)| self.evaluate_row(gamma, j, row));

        Ok(())
    }

    fn project(&self, state: &mut State) -> IbResult<()> {
        let n_cells = self.grid.n_cells();
        IbError::check_size("gamma", n_cells, state.gamma.len())?;
        IbError::check_size("q", 2 * n_cells, state.q.len())?;
        IbError::check_size("f", 2 * self.points.len(), state.f.len())?;

        let nx = self.grid.nx();
        let ny = self.grid.ny();
        let dx = self.grid.dx();
        let dx2 = dx * dx;
        let u = self.freestream;
        let gamma = &state.gamma;
        let at = |i: usize, j: usize| gamma[j * nx + i];

        let (qx, qy) = state.q.split_at_mut(n_cells);
        for j in 0..ny {
            for i in 0..nx {
                let n = if j + 1 < ny { at(i, j + 1) } else { 0.0 };
                let s = if j > 0 { at(i, j - 1) } else { 0.0 };
                let e = if i + 1 < nx { at(i + 1, j) } else { 0.0 };
                let w = if i > 0 { at(i - 1, j) } else { 0.0 };

                let idx = j * nx + i;
                qx[idx] = u.x * dx + dx2 * (n - s) * 0.5;
                qy[idx] = u.y * dx - dx2 * (e - w) * 0.5;
            }
        }

        let n_points = self.points.len();
        let (fx, fy) = state.f.split_at_mut(n_points);
        for (k, &p) in self.points.iter().enumerate() {
            let velocity = u + self.induced_velocity(gamma, p);
            fx[k] = -dx * velocity.x;
            fy[k] = -dx * velocity.y;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with_points(points: &str) -> ViscousModel {
        let grid = Grid::new(8, 8, 1.0, -0.5, -0.5).unwrap();
        let geom = Geometry::parse(points, None).unwrap();
        ViscousModel::new(grid, &geom, 100.0).unwrap()
    }

    #[test]
    fn test_zero_vorticity_has_zero_dynamics() {
        let model = model_with_points("point 0 0\n");
        let state = model.zero_state();
        let mut rhs = vec![1.0; state.n_cells()];
        model.evaluate(&state, &mut rhs).unwrap();
        assert!(rhs.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_projection_of_uniform_flow() {
        let model = model_with_points("point 0 0\npoint 5 5\n");
        let mut state = model.zero_state();
        model.project(&mut state).unwrap();

        let dx = model.grid().dx();
        assert!(state.qx().iter().all(|&v| (v - dx).abs() < 1e-14));
        assert!(state.qy().iter().all(|&v| v.abs() < 1e-14));
        assert!(state.fx().iter().all(|&v| (v + dx).abs() < 1e-14));
        assert!(state.fy().iter().all(|&v| v.abs() < 1e-14));
    }

    #[test]
    fn test_diffusion_of_single_vortex() {
        let grid = Grid::new(8, 8, 1.0, 0.0, 0.0).unwrap();
        let model = ViscousModel::new(grid, &Geometry::new(), 10.0)
            .unwrap()
            .with_freestream(0.0, 0.0);
        let mut state = model.zero_state();
        let center = model.grid().index(4, 4);
        state.gamma[center] = 1.0;

        let mut rhs = vec![0.0; state.n_cells()];
        model.evaluate(&state, &mut rhs).unwrap();

        let dx = model.grid().dx();
        assert!((rhs[center] + 4.0 / (dx * dx) / 10.0).abs() < 1e-10);
        assert!((rhs[model.grid().index(5, 4)] - 1.0 / (dx * dx) / 10.0).abs() < 1e-10);
        // 纯扩散在区域内部守恒总涡量
        let total: f64 = rhs.iter().sum();
        assert!(total.abs() < 1e-9);
    }

    #[test]
    fn test_upwind_advection() {
        let grid = Grid::new(8, 8, 1.0, 0.0, 0.0).unwrap();
        let model = ViscousModel::new(grid, &Geometry::new(), 1e12).unwrap();
        let mut state = model.zero_state();
        let center = model.grid().index(3, 3);
        state.gamma[center] = 1.0;

        let mut rhs = vec![0.0; state.n_cells()];
        model.evaluate(&state, &mut rhs).unwrap();

        let dx = model.grid().dx();
        // 来流沿 +x：下游单元增加，上游单元不受影响
        assert!((rhs[model.grid().index(4, 3)] - 1.0 / dx).abs() < 1e-6);
        assert!(rhs[model.grid().index(2, 3)].abs() < 1e-6);
    }

    #[test]
    fn test_rejects_nonpositive_reynolds() {
        let grid = Grid::new(4, 4, 1.0, 0.0, 0.0).unwrap();
        assert!(ViscousModel::new(grid, &Geometry::new(), 0.0).is_err());
    }
}
