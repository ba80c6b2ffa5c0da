// crates/ib_physics/src/grid.rs

//! 均匀笛卡尔网格
//!
//! 正方形单元，x 方向长度由 `length` 给出，y 方向长度为 `ny * dx`。
//! 单元 `(i, j)` 的线性索引为 `j * nx + i`。

use glam::DVec2;
use ib_config::GridConfig;
use ib_foundation::{ensure, IbError, IbResult};

/// 均匀网格
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    nx: usize,
    ny: usize,
    length: f64,
    origin: DVec2,
    dx: f64,
}

impl Grid {
    /// 创建网格
    pub fn new(nx: usize, ny: usize, length: f64, x_offset: f64, y_offset: f64) -> IbResult<Self> {
        ensure!(nx > 0 && ny > 0, IbError::invalid_input(format!("网格单元数必须为正: {nx} x {ny}")));
        // 通量场长度为 2 * nx * ny
        ensure!(
            nx.checked_mul(ny).and_then(|n| n.checked_mul(2)).is_some(),
            IbError::invalid_input(format!("网格单元数溢出: {nx} x {ny}"))
        );
        ensure!(
            length.is_finite() && length > 0.0,
            IbError::invalid_input(format!("区域长度必须为正: {length}"))
        );
        ensure!(
            x_offset.is_finite() && y_offset.is_finite(),
            IbError::invalid_input("区域偏移必须为有限值")
        );

        Ok(Self {
            nx,
            ny,
            length,
            origin: DVec2::new(x_offset, y_offset),
            dx: length / nx as f64,
        })
    }

    /// 从配置创建
    pub fn from_config(config: &GridConfig) -> IbResult<Self> {
        Self::new(config.nx, config.ny, config.length, config.x_offset, config.y_offset)
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

    /// 单元尺寸
    #[inline]
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// x 方向长度
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// y 方向长度
    #[inline]
    pub fn height(&self) -> f64 {
        self.ny as f64 * self.dx
    }

    /// 左下角坐标
    #[inline]
    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    /// 线性索引
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        j * self.nx + i
    }

    /// 单元中心坐标
    #[inline]
    pub fn cell_center(&self, i: usize, j: usize) -> DVec2 {
        self.origin + DVec2::new((i as f64 + 0.5) * self.dx, (j as f64 + 0.5) * self.dx)
    }

    /// 查找包含点 `p` 的单元，区域外返回 `None`
    pub fn locate(&self, p: DVec2) -> Option<(usize, usize)> {
        let local = (p - self.origin) / self.dx;
        if !(local.x >= 0.0 && local.y >= 0.0) {
            return None;
        }
        let (i, j) = (local.x.floor() as usize, local.y.floor() as usize);
        (i < self.nx && j < self.ny).then_some((i, j))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_geometry() {
        let grid = Grid::new(200, 100, 4.0, -2.0, -1.0).unwrap();
        assert!((grid.dx() - 0.02).abs() < 1e-14);
        assert!((grid.height() - 2.0).abs() < 1e-12);
        assert_eq!(grid.n_cells(), 20_000);
        assert_eq!(grid.index(3, 2), 403);

        let c = grid.cell_center(0, 0);
        assert!((c.x + 1.99).abs() < 1e-12);
        assert!((c.y + 0.99).abs() < 1e-12);
    }

    #[test]
    fn test_grid_from_default_config() {
        let grid = Grid::from_config(&GridConfig::default()).unwrap();
        assert_eq!(grid.nx(), 200);
        assert!((grid.origin().x + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_grid_rejects_invalid() {
        assert!(Grid::new(0, 10, 1.0, 0.0, 0.0).is_err());
        assert!(Grid::new(10, 10, 0.0, 0.0, 0.0).is_err());
        assert!(Grid::new(10, 10, 1.0, f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_grid_rejects_overflowing_size() {
        assert!(Grid::new(usize::MAX, 2, 1.0, 0.0, 0.0).is_err());
        assert!(Grid::new(usize::MAX / 2, 2, 1.0, 0.0, 0.0).is_err());
        assert!(Grid::new(1 << 16, 1 << 16, 1.0, 0.0, 0.0).is_ok());
    }

    #[test]
    fn test_locate() {
        let grid = Grid::new(4, 4, 4.0, 0.0, 0.0).unwrap();
        assert_eq!(grid.locate(DVec2::new(0.5, 0.5)), Some((0, 0)));
        assert_eq!(grid.locate(DVec2::new(3.9, 2.1)), Some((3, 2)));
        assert_eq!(grid.locate(DVec2::new(4.1, 0.5)), None);
        assert_eq!(grid.locate(DVec2::new(-0.1, 0.5)), None);
        assert_eq!(grid.locate(DVec2::new(f64::NAN, 0.5)), None);
    }
}
