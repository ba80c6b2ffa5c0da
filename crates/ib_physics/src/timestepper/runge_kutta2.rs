// crates/ib_physics/src/timestepper/runge_kutta2.rs

//! 二阶 Runge-Kutta (Heun)
//!
//! ```text
//! x1 = x^n + dt N(x^n),                P(x1)
//! γ^{n+1} = γ^n + dt/2 (N(x^n) + N(x1)), P(x^{n+1})
//! ```

use ib_config::SchemeKind;
use ib_foundation::IbResult;
use std::path::Path;
use tracing::debug;

use super::{axpy, axpy2, finish_step, require_ready, StepperCheckpoint, TimeStepper};
use crate::model::FlowModel;
use crate::state::State;

/// RK2 推进器
pub struct RungeKutta2<'m> {
    model: &'m dyn FlowModel,
    dt: f64,
    ready: bool,
    rhs_0: Vec<f64>,
    rhs_1: Vec<f64>,
    stage: State,
}

impl<'m> RungeKutta2<'m> {
    /// 创建推进器（尚未初始化）
    pub fn new(model: &'m dyn FlowModel, dt: f64) -> Self {
        let n_cells = model.grid().n_cells();
        Self {
            model,
            dt,
            ready: false,
            rhs_0: vec![0.0; n_cells],
            rhs_1: vec![0.0; n_cells],
            stage: model.zero_state(),
        }
    }
}

impl TimeStepper for RungeKutta2<'_> {
    fn name(&self) -> &'static str {
        "RK2"
    }

    fn kind(&self) -> SchemeKind {
        SchemeKind::RungeKutta2
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

        // Stage 1: x1 = x + dt N(x)
        self.model.evaluate(state, &mut self.rhs_0)?;
        self.stage.copy_from(state);
        axpy(&mut self.stage.gamma, dt, &self.rhs_0);
        self.stage.time += dt;
        self.model.project(&mut self.stage)?;

        // Stage 2: γ += dt/2 (N(x) + N(x1))
        self.model.evaluate(&self.stage, &mut self.rhs_1)?;
        axpy2(&mut state.gamma, 0.5 * dt, &self.rhs_0, 0.5 * dt, &self.rhs_1);
        self.model.project(state)?;

        finish_step(state, dt);
        Ok(())
    }
}
