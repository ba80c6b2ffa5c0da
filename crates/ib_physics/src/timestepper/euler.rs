// crates/ib_physics/src/timestepper/euler.rs

//! 一阶显式欧拉
//!
//! ```text
//! γ^{n+1} = γ^n + dt N(x^n)
//! P(x^{n+1})
//! ```

use ib_config::SchemeKind;
use ib_foundation::IbResult;
use std::path::Path;
use tracing::debug;

use super::{axpy, finish_step, require_ready, StepperCheckpoint, TimeStepper};
use crate::model::FlowModel;
use crate::state::State;

/// 显式欧拉推进器
pub struct Euler<'m> {
    model: &'m dyn FlowModel,
    dt: f64,
    ready: bool,
    rhs: Vec<f64>,
}

impl<'m> Euler<'m> {
    /// 创建推进器（尚未初始化）
    pub fn new(model: &'m dyn FlowModel, dt: f64) -> Self {
        Self {
            model,
            dt,
            ready: false,
            rhs: vec![0.0; model.grid().n_cells()],
        }
    }
}

impl TimeStepper for Euler<'_> {
    fn name(&self) -> &'static str {
        "Euler"
    }

    fn kind(&self) -> SchemeKind {
        SchemeKind::Euler
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

        self.model.evaluate(state, &mut self.rhs)?;
        axpy(&mut state.gamma, self.dt, &self.rhs);
        self.model.project(state)?;

        finish_step(state, self.dt);
        Ok(())
    }
}
