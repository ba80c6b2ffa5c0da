// crates/ib_physics/tests/stepper_properties.rs

//! 时间推进器性质测试
//!
//! 覆盖四种格式共有的行为：零状态保持、首步自举、检查点恢复的逐位复现、
//! 每阶段的求值与投影次数、收敛阶。

use std::sync::atomic::{AtomicUsize, Ordering};

use ib_config::SchemeKind;
use ib_foundation::{IbError, IbResult};
use ib_physics::{create_stepper, FlowModel, Geometry, Grid, QuiescentModel, State, ViscousModel};

// ============================================================
// 测试模型
// ============================================================

/// dγ/dt = -γ，精确解 γ(t) = γ0 exp(-t)
struct DecayModel {
    grid: Grid,
}

impl DecayModel {
    fn new() -> Self {
        Self {
            grid: Grid::new(1, 1, 1.0, 0.0, 0.0).unwrap(),
        }
    }
}

impl FlowModel for DecayModel {
    fn name(&self) -> &'static str {
        "Decay"
    }

    fn grid(&self) -> &Grid {
        &self.grid
    }

    fn n_boundary_points(&self) -> usize {
        0
    }

    fn evaluate(&self, state: &State, out: &mut [f64]) -> IbResult<()> {
        for (o, g) in out.iter_mut().zip(&state.gamma) {
            *o = -g;
        }
        Ok(())
    }

    fn project(&self, _state: &mut State) -> IbResult<()> {
        Ok(())
    }
}

/// 统计求值与投影次数
struct CountingModel {
    inner: QuiescentModel,
    evaluations: AtomicUsize,
    projections: AtomicUsize,
}

impl FlowModel for CountingModel {
    fn name(&self) -> &'static str {
        "Counting"
    }

    fn grid(&self) -> &Grid {
        self.inner.grid()
    }

    fn n_boundary_points(&self) -> usize {
        self.inner.n_boundary_points()
    }

    fn evaluate(&self, state: &State, out: &mut [f64]) -> IbResult<()> {
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        self.inner.evaluate(state, out)
    }

    fn project(&self, state: &mut State) -> IbResult<()> {
        self.projections.fetch_add(1, Ordering::SeqCst);
        self.inner.project(state)
    }
}

fn viscous_model() -> ViscousModel {
    let grid = Grid::new(16, 12, 2.0, -1.0, -0.75).unwrap();
    let geometry = Geometry::parse("body cyl\n circle 0 0 0.25 12\nend\n", None).unwrap();
    ViscousModel::new(grid, &geometry, 50.0).unwrap()
}

/// 网格中心附近的高斯涡
fn vortex_state(model: &dyn FlowModel) -> State {
    let grid = model.grid();
    let mut state = model.zero_state();
    for j in 0..grid.ny() {
        for i in 0..grid.nx() {
            let c = grid.cell_center(i, j);
            state.gamma[grid.index(i, j)] = (-(c.length_squared()) / 0.1).exp();
        }
    }
    model.project(&mut state).unwrap();
    state
}

fn assert_bits_eq(a: &[f64], b: &[f64]) {
    assert_eq!(a.len(), b.len());
    for (k, (x, y)) in a.iter().zip(b).enumerate() {
        assert_eq!(x.to_bits(), y.to_bits(), "index {k}: {x} != {y}");
    }
}

fn assert_state_bits_eq(a: &State, b: &State) {
    assert_eq!(a.step, b.step);
    assert_eq!(a.time.to_bits(), b.time.to_bits());
    assert_bits_eq(&a.gamma, &b.gamma);
    assert_bits_eq(&a.q, &b.q);
    assert_bits_eq(&a.f, &b.f);
}

// ============================================================
// 性质
// ============================================================

#[test]
fn test_zero_state_stays_zero() {
    let model = QuiescentModel::new(Grid::new(6, 5, 1.0, 0.0, 0.0).unwrap(), 4);
    for kind in SchemeKind::ALL {
        let mut stepper = create_stepper(kind, &model, 0.05).unwrap();
        stepper.init().unwrap();

        let mut state = model.zero_state();
        for _ in 0..5 {
            stepper.advance(&mut state).unwrap();
        }
        assert_eq!(state.step, 5, "{kind}");
        assert!(state.gamma.iter().all(|&v| v == 0.0), "{kind}");
        assert!(state.q.iter().all(|&v| v == 0.0), "{kind}");
        assert!(state.f.iter().all(|&v| v == 0.0), "{kind}");
    }
}

#[test]
fn test_zero_vorticity_stays_zero_under_viscous_model() {
    let model = viscous_model();
    for kind in SchemeKind::ALL {
        let mut stepper = create_stepper(kind, &model, 0.01).unwrap();
        stepper.init().unwrap();
        let mut state = model.zero_state();
        for _ in 0..3 {
            stepper.advance(&mut state).unwrap();
        }
        assert!(state.gamma.iter().all(|&v| v == 0.0), "{kind}");
    }
}

#[test]
fn test_ab2_first_step_equals_euler() {
    let model = viscous_model();
    let initial = vortex_state(&model);

    let mut euler = create_stepper(SchemeKind::Euler, &model, 0.01).unwrap();
    euler.init().unwrap();
    let mut by_euler = initial.clone();
    euler.advance(&mut by_euler).unwrap();

    let mut ab2 = create_stepper(SchemeKind::AdamsBashforth2, &model, 0.01).unwrap();
    ab2.init().unwrap();
    let mut by_ab2 = initial.clone();
    ab2.advance(&mut by_ab2).unwrap();

    assert_state_bits_eq(&by_euler, &by_ab2);

    // 第二步开始使用历史，结果不再相同
    euler.advance(&mut by_euler).unwrap();
    ab2.advance(&mut by_ab2).unwrap();
    assert_ne!(by_euler.gamma, by_ab2.gamma);
}

#[test]
fn test_restart_reproduces_bitwise() {
    let model = viscous_model();
    let dir = tempfile::tempdir().unwrap();

    for kind in SchemeKind::ALL {
        let base = dir.path().join(format!("run_{kind}"));
        let state_file = dir.path().join(format!("run_{kind}.bin"));

        // 不中断运行：3 步后保存，再走 4 步
        let mut stepper = create_stepper(kind, &model, 0.01).unwrap();
        stepper.init().unwrap();
        let mut state = vortex_state(&model);
        for _ in 0..3 {
            stepper.advance(&mut state).unwrap();
        }
        stepper.save(&base).unwrap();
        state.save(&state_file).unwrap();
        for _ in 0..4 {
            stepper.advance(&mut state).unwrap();
        }

        // 从检查点恢复后走 4 步
        let mut restored = create_stepper(kind, &model, 0.01).unwrap();
        restored.load(&base).unwrap();
        assert!(restored.is_ready());
        let mut resumed = model.zero_state();
        resumed.load_into(&state_file).unwrap();
        for _ in 0..4 {
            restored.advance(&mut resumed).unwrap();
        }

        assert_state_bits_eq(&state, &resumed);
    }
}

#[test]
fn test_load_failures_are_reported() {
    let model = viscous_model();
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("ibpm");

    for kind in SchemeKind::ALL {
        let mut stepper = create_stepper(kind, &model, 0.01).unwrap();
        let err = stepper.load(&base).err().unwrap();
        assert!(matches!(err, IbError::FileNotFound { .. }), "{kind}");
        assert!(!stepper.is_ready());

        stepper.init().unwrap();
        stepper.save(&base).unwrap();

        // 步长不一致
        let mut other_dt = create_stepper(kind, &model, 0.02).unwrap();
        assert!(other_dt.load(&base).is_err(), "{kind}");
        assert!(!other_dt.is_ready());

        // 网格不一致
        let other_model = QuiescentModel::new(Grid::new(8, 8, 2.0, -1.0, -1.0).unwrap(), 12);
        let mut other_grid = create_stepper(kind, &other_model, 0.01).unwrap();
        assert!(other_grid.load(&base).is_err(), "{kind}");
    }
}

#[test]
fn test_every_stage_evaluates_and_projects() {
    for kind in SchemeKind::ALL {
        let model = CountingModel {
            inner: QuiescentModel::new(Grid::new(3, 3, 1.0, 0.0, 0.0).unwrap(), 1),
            evaluations: AtomicUsize::new(0),
            projections: AtomicUsize::new(0),
        };
        let mut stepper = create_stepper(kind, &model, 0.1).unwrap();
        stepper.init().unwrap();
        let mut state = model.zero_state();
        stepper.advance(&mut state).unwrap();
        stepper.advance(&mut state).unwrap();
        drop(stepper);

        let stages = kind.stages() as usize;
        assert_eq!(model.evaluations.load(Ordering::SeqCst), 2 * stages, "{kind}");
        assert_eq!(model.projections.load(Ordering::SeqCst), 2 * stages, "{kind}");
    }
}

// ============================================================
// 收敛阶
// ============================================================

fn decay_error(kind: SchemeKind, dt: f64) -> f64 {
    let model = DecayModel::new();
    let mut stepper = create_stepper(kind, &model, dt).unwrap();
    stepper.init().unwrap();

    let mut state = model.zero_state();
    state.gamma[0] = 1.0;
    let steps = (1.0 / dt).round() as usize;
    for _ in 0..steps {
        stepper.advance(&mut state).unwrap();
    }
    assert!((state.time - 1.0).abs() < 1e-9);
    (state.gamma[0] - (-1.0f64).exp()).abs()
}

#[test]
fn test_convergence_order() {
    for (kind, min_ratio) in [
        (SchemeKind::Euler, 1.8),
        (SchemeKind::AdamsBashforth2, 3.0),
        (SchemeKind::RungeKutta2, 3.5),
        (SchemeKind::RungeKutta3, 6.0),
    ] {
        let coarse = decay_error(kind, 0.05);
        let fine = decay_error(kind, 0.025);
        let ratio = coarse / fine;
        assert!(
            ratio > min_ratio,
            "{kind}: expected ratio > {min_ratio}, got {ratio}"
        );
    }
}

#[test]
fn test_rk3_more_accurate_than_rk2() {
    assert!(decay_error(SchemeKind::RungeKutta3, 0.1) < decay_error(SchemeKind::RungeKutta2, 0.1));
    assert!(decay_error(SchemeKind::RungeKutta2, 0.1) < decay_error(SchemeKind::Euler, 0.1));
}
