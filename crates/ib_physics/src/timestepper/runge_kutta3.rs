// crates/ib_physics/src/timestepper/runge_kutta3.rs

//! 三阶低存储 Runge-Kutta (Wray)
//!
//! ```text
//! x1 = x^n + dt ( 8/15 N(x^n) )
//! x2 = x1  + dt ( 5/12 N(x1) − 17/60 N(x^n) )
//! x3 = x2  + dt (  3/4 N(x2) −  5/12 N(x1) )
//! ```
//!
//! 每个阶段后都投影。只需两块导数缓冲区，状态原地更新。
//!
//! ## 参考文献
//!
//! Wray, A. A. (1990). Minimal storage time advancement schemes for spectral
//! methods. NASA Ames Research Center.

use ib_config::SchemeKind;
use ib_foundation::IbResult;
use std::path::Path;
use tracing::debug;

use super::{axpy, axpy2, finish_step, require_ready, StepperCheckpoint, TimeStepper};
use crate::model::FlowModel;
use crate::state::State;

const A1: f64 = 8.0 / 15.0;
const A2: f64 = 5.0 / 12.0;
const B2: f64 = -17.0 / 60.0;
const A3: f64 = 3.0 / 4.0;
const B3: f64 = -5.0 / 12.0;

/// RK3 推进器
pub struct RungeKutta3<'m> {
    model: &'m dyn FlowModel,
    dt: f64,
    ready: bool,
    rhs_a: Vec<f64>,
    rhs_b: Vec<f64>,
}

impl<'m> RungeKutta3<'m> {
    /// 创建推进器（尚未初始化）
    pub fn new(model: &'m dyn FlowModel, dt: f64) -> Self {
        let n_cells = model.grid().n_cells();
        Self {
            model,
            dt,
            ready: false,
            rhs_a: vec![0.0; n_cells],
            rhs_b: vec![0.0; n_cells],
        }
    }
}

impl TimeStepper for RungeKutta3<'_> {
    fn name(&self) -> &'static str {
        "RK3"
    }

    fn kind(&self) -> SchemeKind {
        SchemeKind::RungeKutta3
    }

    fn dt(&self) -> f64 {
        self.dt
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn init(&mut self) -> IbResult<()> {
        self.ready = true;
        Ok(())
    }

    fn load(&mut self, base: &Path) -> IbResult<()> {
        let checkpoint = StepperCheckpoint::read(base, self.kind())?;
        checkpoint.verify(self.dt, self.model)?;
        debug!("{} 从检查点恢复", self.name());
        self.ready = true;
        Ok(())
    }

    fn save(&self, base: &Path) -> IbResult<()> {
        StepperCheckpoint::new(self.kind(), self.dt, self.model).write(base)
    }

    fn advance(&mut self, state: &mut State) -> IbResult<()> {
        require_ready(self.ready, self.name())?;
        self.model.check_state(state)?;
        let dt = self.dt;

        // Stage 1: rhs_a = N(x)
        self.model.evaluate(state, &mut self.rhs_a)?;
        axpy(&mut state.gamma, dt * A1, &self.rhs_a);
        self.model.project(state)?;

        // Stage 2: rhs_b = N(x1)
        self.model.evaluate(state, &mut self.rhs_b)?;
        axpy2(&mut state.gamma, dt * A2, &self.rhs_b, dt * B2, &self.rhs_a);
        self.model.project(state)?;

        // Stage 3: rhs_a = N(x2)
        self.model.evaluate(state, &mut self.rhs_a)?;
        axpy2(&mut state.gamma, dt * A3, &self.rhs_a, dt * B3, &self.rhs_b);
        self.model.project(state)?;

        finish_step(state, dt);
        Ok(())
    }
}
