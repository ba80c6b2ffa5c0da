// crates/ib_physics/src/timestepper/mod.rs

//! 显式时间推进器
//!
//! 四种格式共用 [`TimeStepper`] 接口：
//!
//! | 格式 | 标签 | 阶数 | 求值次数 | 历史数据 |
//! |------|------|------|----------|----------|
//! | 欧拉 | `euler` | 1 | 1 | 无 |
//! | Adams-Bashforth 2 | `ab2` | 2 | 1 | 上一步导数 |
//! | Runge-Kutta 2 (Heun) | `rk2` | 2 | 2 | 无 |
//! | Runge-Kutta 3 (Wray) | `rk3` | 3 | 3 | 无 |
//!
//! ## 生命周期
//!
//! ```text
//! create ─> init() ─────┐
//!        └> load(path) ─┴─> advance()* ─> drop
//! ```
//!
//! `advance` 之前必须 `init` 或成功 `load`，否则返回
//! [`IbError::Uninitialized`]。
//!
//! ## 检查点
//!
//! `save(base)` 写入 `<base>.<tag>`，见 [`checkpoint`]。

pub mod checkpoint;

mod adams_bashforth;
mod euler;
mod runge_kutta2;
mod runge_kutta3;

pub use adams_bashforth::AdamsBashforth2;
pub use checkpoint::{checkpoint_path, StepperCheckpoint};
pub use euler::Euler;
pub use runge_kutta2::RungeKutta2;
pub use runge_kutta3::RungeKutta3;

use ib_config::SchemeKind;
use ib_foundation::{ensure, IbError, IbResult};
use std::path::Path;
use std::str::FromStr;

use crate::model::FlowModel;
use crate::state::State;

/// 时间推进器 trait
pub trait TimeStepper: Send {
    /// 诊断用名称
    fn name(&self) -> &'static str;

    /// 格式类型
    fn kind(&self) -> SchemeKind;

    /// 固定时间步长
    fn dt(&self) -> f64;

    /// 时间精度阶数
    fn order(&self) -> u8 {
        self.kind().order()
    }

    /// 每步的模型求值次数
    fn stages(&self) -> u8 {
        self.kind().stages()
    }

    /// 是否已完成 init 或 load
    fn is_ready(&self) -> bool;

    /// 冷启动
    ///
    /// 多步法清空历史，首次推进时自举。
    fn init(&mut self) -> IbResult<()>;

    /// 从 `<base>.<tag>` 恢复内部状态
    ///
    /// 文件缺失、损坏、格式或步长不符都返回错误，调用方应回退到 `init`。
    fn load(&mut self, base: &Path) -> IbResult<()>;

    /// 将内部状态写入 `<base>.<tag>`
    fn save(&self, base: &Path) -> IbResult<()>;

    /// 原地推进一个时间步
    ///
    /// 每个阶段都会调用模型求值和投影；结束时 `step` 加一、`time` 加 `dt`。
    fn advance(&mut self, state: &mut State) -> IbResult<()>;
}

/// 按格式类型创建推进器
pub fn create_stepper<'m>(
    kind: SchemeKind,
    model: &'m dyn FlowModel,
    dt: f64,
) -> IbResult<Box<dyn TimeStepper + 'm>> {
    check_dt(dt)?;
    let stepper: Box<dyn TimeStepper + 'm> = match kind {
        SchemeKind::Euler => Box::new(Euler::new(model, dt)),
        SchemeKind::AdamsBashforth2 => Box::new(AdamsBashforth2::new(model, dt)),
        SchemeKind::RungeKutta2 => Box::new(RungeKutta2::new(model, dt)),
        SchemeKind::RungeKutta3 => Box::new(RungeKutta3::new(model, dt)),
    };
    Ok(stepper)
}

/// 按名称创建推进器（大小写不敏感）
pub fn create_stepper_by_name<'m>(
    name: &str,
    model: &'m dyn FlowModel,
    dt: f64,
) -> IbResult<Box<dyn TimeStepper + 'm>> {
    let kind = SchemeKind::from_str(name).map_err(|e| IbError::config(e.to_string()))?;
    create_stepper(kind, model, dt)
}

// ============================================================
// 各格式共用的辅助函数
// ============================================================

pub(crate) fn check_dt(dt: f64) -> IbResult<()> {
    ensure!(
        dt.is_finite() && dt > 0.0,
        IbError::invalid_input(format!("时间步长必须为正: {dt}"))
    );
    Ok(())
}

/// y += a * x
#[inline]
pub(crate) fn axpy(y: &mut [f64], a: f64, x: &[f64]) {
    for (yi, &xi) in y.iter_mut().zip(x) {
        *yi += a * xi;
    }
}

/// y += a * x1 + b * x2
#[inline]
pub(crate) fn axpy2(y: &mut [f64], a: f64, x1: &[f64], b: f64, x2: &[f64]) {
    for ((yi, &u), &v) in y.iter_mut().zip(x1).zip(x2) {
        *yi += a * u + b * v;
    }
}

pub(crate) fn require_ready(ready: bool, stepper: &'static str) -> IbResult<()> {
    ensure!(ready, IbError::Uninitialized { stepper });
    Ok(())
}

pub(crate) fn finish_step(state: &mut State, dt: f64) {
    state.step += 1;
    state.time += dt;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::model::QuiescentModel;

    fn model() -> QuiescentModel {
        QuiescentModel::new(Grid::new(4, 4, 1.0, 0.0, 0.0).unwrap(), 2)
    }

    #[test]
    fn test_factory_all_kinds() {
        let model = model();
        for kind in SchemeKind::ALL {
            let stepper = create_stepper(kind, &model, 0.1).unwrap();
            assert_eq!(stepper.kind(), kind);
            assert_eq!(stepper.order(), kind.order());
            assert_eq!(stepper.stages(), kind.stages());
            assert!((stepper.dt() - 0.1).abs() < 1e-15);
            assert!(!stepper.is_ready());
        }
    }

    #[test]
    fn test_factory_by_name() {
        let model = model();
        let stepper = create_stepper_by_name("RK3", &model, 0.01).unwrap();
        assert_eq!(stepper.name(), "RK3");
        let stepper = create_stepper_by_name("ab2", &model, 0.01).unwrap();
        assert_eq!(stepper.name(), "AB2");

        let err = create_stepper_by_name("bogus", &model, 0.01).err().unwrap();
        assert!(matches!(err, IbError::Config { .. }));
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_factory_rejects_bad_dt() {
        let model = model();
        assert!(create_stepper(SchemeKind::Euler, &model, 0.0).is_err());
        assert!(create_stepper(SchemeKind::Euler, &model, f64::INFINITY).is_err());
    }

    #[test]
    fn test_advance_before_init_fails() {
        let model = model();
        for kind in SchemeKind::ALL {
            let mut stepper = create_stepper(kind, &model, 0.1).unwrap();
            let mut state = model.zero_state();
            let err = stepper.advance(&mut state).unwrap_err();
            assert!(matches!(err, IbError::Uninitialized { .. }));
            assert_eq!(state.step, 0);
        }
    }

    #[test]
    fn test_axpy_helpers() {
        let mut y = vec![1.0, 2.0];
        axpy(&mut y, 2.0, &[1.0, -1.0]);
        assert_eq!(y, vec![3.0, 0.0]);
        axpy2(&mut y, 1.0, &[1.0, 1.0], -1.0, &[0.5, 0.5]);
        assert_eq!(y, vec![3.5, 0.5]);
    }
}
