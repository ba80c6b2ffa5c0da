// crates/ib_physics/src/timestepper/adams_bashforth.rs

//! 二阶 Adams-Bashforth
//!
//! ```text
//! N0 = N(x^n)
//! γ^{n+1} = γ^n + dt (3/2 N0 − 1/2 N_prev)     有历史
//! γ^{n+1} = γ^n + dt N0                        冷启动后首步（欧拉自举）
//! P(x^{n+1}),  N_prev ← N0
//! ```
//!
//! 历史由推进器独占，`has_history` 显式标记是否可用，
//! 并随检查点一起保存。

use ib_config::SchemeKind;
use ib_foundation::{IbError, IbResult};
use std::path::Path;
use tracing::debug;

use super::{axpy, axpy2, finish_step, require_ready, StepperCheckpoint, TimeStepper};
use crate::model::FlowModel;
use crate::state::State;

/// Adams-Bashforth 2 推进器
pub struct AdamsBashforth2<'m> {
    model: &'m dyn FlowModel,
    dt: f64,
    ready: bool,
    rhs: Vec<f64>,
    previous: Vec<f64>,
    has_history: bool,
}

impl<'m> AdamsBashforth2<'m> {
    /// 创建推进器（尚未初始化）
    pub fn new(model: &'m dyn FlowModel, dt: f64) -> Self {
        let n_cells = model.grid().n_cells();
        Self {
            model,
            dt,
            ready: false,
            rhs: vec![0.0; n_cells],
            previous: vec![0.0; n_cells],
            has_history: false,
        }
    }

    /// 是否已有上一步导数
    pub fn has_history(&self) -> bool {
        self.has_history
    }
}

impl TimeStepper for AdamsBashforth2<'_> {
    fn name(&self) -> &'static str {
        "AB2"
    }

    fn kind(&self) -> SchemeKind {
        SchemeKind::AdamsBashforth2
    }

    fn dt(&self) -> f64 {
        self.dt
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn init(&mut self) -> IbResult<()> {
        self.previous.fill(0.0);
        self.has_history = false;
        self.ready = true;
        Ok(())
    }

    fn load(&mut self, base: &Path) -> IbResult<()> {
        let checkpoint = StepperCheckpoint::read(base, self.kind())?;
        checkpoint.verify(self.dt, self.model)?;

        match checkpoint.history {
            Some(history) => {
                if history.len() != self.previous.len() {
                    return Err(IbError::size_mismatch(
                        "history",
                        self.previous.len(),
                        history.len(),
                    ));
                }
                self.previous = history;
                self.has_history = true;
            }
            None => {
                self.previous.fill(0.0);
                self.has_history = false;
            }
        }

        debug!(has_history = self.has_history, "AB2 从检查点恢复");
        self.ready = true;
        Ok(())
    }

    fn save(&self, base: &Path) -> IbResult<()> {
        let history = self.has_history.then_some(self.previous.as_slice());
        StepperCheckpoint::new(self.kind(), self.dt, self.model)
            .with_history(history)
            .write(base)
    }

    fn advance(&mut self, state: &mut State) -> IbResult<()> {
        require_ready(self.ready, self.name())?;
        self.model.check_state(state)?;

        self.model.evaluate(state, &mut self.rhs)?;
        if self.has_history {
            axpy2(
                &mut state.gamma,
                1.5 * self.dt,
                &self.rhs,
                -0.5 * self.dt,
                &self.previous,
            );
        } else {
            debug!("AB2 无历史数据，首步使用欧拉自举");
            axpy(&mut state.gamma, self.dt, &self.rhs);
        }
        self.model.project(state)?;

        std::mem::swap(&mut self.previous, &mut self.rhs);
        self.has_history = true;

        finish_step(state, self.dt);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::model::QuiescentModel;

    #[test]
    fn test_history_flag_lifecycle() {
        let model = QuiescentModel::new(Grid::new(2, 2, 1.0, 0.0, 0.0).unwrap(), 0);
        let mut stepper = AdamsBashforth2::new(&model, 0.1);
        stepper.init().unwrap();
        assert!(!stepper.has_history());

        let mut state = model.zero_state();
        stepper.advance(&mut state).unwrap();
        assert!(stepper.has_history());

        stepper.init().unwrap();
        assert!(!stepper.has_history());
    }

    #[test]
    fn test_history_survives_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("ibpm");
        let model = QuiescentModel::new(Grid::new(2, 2, 1.0, 0.0, 0.0).unwrap(), 0);

        let mut stepper = AdamsBashforth2::new(&model, 0.1);
        stepper.init().unwrap();
        stepper.save(&base).unwrap();

        let mut restored = AdamsBashforth2::new(&model, 0.1);
        restored.load(&base).unwrap();
        assert!(!restored.has_history());

        let mut state = model.zero_state();
        stepper.advance(&mut state).unwrap();
        stepper.save(&base).unwrap();
        restored.load(&base).unwrap();
        assert!(restored.has_history());
    }
}
