// crates/ib_workflow/src/runner.rs

//! 模拟驱动循环
//!
//! 阶段转换：
//!
//! ```text
//! Configuring ─> ColdInit ─┐
//!            └─> WarmLoad ─┴─> Stepping(1..=N) ─> Cleanup ─> Terminal
//! ```
//!
//! 1. 由配置创建推进器和输出调度器
//! 2. 尝试从 `<outdir>/<name>.<tag>` 恢复推进器；失败则冷启动并保存检查点
//! 3. 初始状态为零，若给定初始条件文件则加载（失败时保留零状态）
//! 4. 输出第 0 步
//! 5. 逐步推进，记录并报告边界净受力，按周期输出
//! 6. 清理输出目标

use ib_config::{ConfigError, RunConfig};
use ib_foundation::IbError;
use ib_io::{FileTemplate, ForceLogSink, Logger, OutputError, RestartSink, TecplotSink};
use ib_physics::{
    checkpoint_path, create_stepper, FlowModel, Geometry, Grid, NetForce, State, ViscousModel,
};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// 运行器错误
#[derive(Debug, Error)]
pub enum RunnerError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 初始化失败
    #[error("初始化失败: {0}")]
    Setup(#[from] IbError),

    /// 推进失败
    #[error("{stepper} 在第 {step} 步推进失败: {source}")]
    Step {
        /// 推进器名称
        stepper: &'static str,
        /// 失败的步数
        step: u64,
        /// 底层错误
        #[source]
        source: IbError,
    },

    /// 输出失败
    #[error("输出错误: {0}")]
    Output(#[from] OutputError),

    /// 文件系统错误
    #[error("IO 错误 {}: {source}", path.display())]
    Io {
        /// 相关路径
        path: PathBuf,
        /// 底层错误
        #[source]
        source: std::io::Error,
    },
}

/// 运行器结果类型
pub type RunnerResult<T> = Result<T, RunnerError>;

/// 驱动循环所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// 构建推进器和输出
    Configuring,
    /// 推进器冷启动
    ColdInit,
    /// 推进器从检查点恢复
    WarmLoad,
    /// 正在推进第 i 步（0 表示初始输出之后、第一步之前）
    Stepping(u64),
    /// 清理输出
    Cleanup,
    /// 运行结束
    Terminal,
}

/// 一次运行的结果
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// 最终状态
    pub state: State,
    /// 最近若干步的边界净受力（按步数递增）
    pub forces: Vec<NetForce>,
    /// 推进器是否从检查点恢复
    pub warm_started: bool,
    /// 实际推进步数
    pub steps_taken: u64,
    /// 墙钟耗时
    pub elapsed: Duration,
}

/// `RunOutcome::forces` 默认保留的步数
pub const DEFAULT_FORCE_HISTORY: usize = 100_000;

/// 按配置构建网格、读取几何并创建粘性模型
pub fn load_viscous_model(config: &RunConfig) -> RunnerResult<ViscousModel> {
    let grid = Grid::from_config(&config.grid)?;
    info!(
        "网格参数: nx={} ny={} length={} xoffset={} yoffset={}",
        grid.nx(),
        grid.ny(),
        grid.length(),
        config.grid.x_offset,
        config.grid.y_offset
    );

    let geometry = Geometry::from_file(&config.geometry)?;
    info!(
        "从 {} 读取几何: {} 个物体, {} 个边界点",
        config.geometry.display(),
        geometry.bodies().len(),
        geometry.n_points()
    );

    info!("雷诺数 = {}", config.reynolds);
    let model = ViscousModel::new(grid, &geometry, config.reynolds)?;
    Ok(model)
}

/// 模拟驱动
pub struct Simulation<'a> {
    config: &'a RunConfig,
    model: &'a dyn FlowModel,
    phase: RunPhase,
    force_history: usize,
}

impl<'a> Simulation<'a> {
    /// 创建驱动
    ///
    /// 配置必须有效，且模型网格与配置一致。
    pub fn new(config: &'a RunConfig, model: &'a dyn FlowModel) -> RunnerResult<Self> {
        config.validate()?;

        let grid = model.grid();
        if grid.nx() != config.grid.nx || grid.ny() != config.grid.ny {
            return Err(IbError::invalid_input(format!(
                "模型网格 {} x {} 与配置 {} x {} 不一致",
                grid.nx(),
                grid.ny(),
                config.grid.nx,
                config.grid.ny
            ))
            .into());
        }

        Ok(Self {
            config,
            model,
            phase: RunPhase::Configuring,
            force_history: DEFAULT_FORCE_HISTORY,
        })
    }

    /// 设置结果中保留的受力记录步数（0 表示不保留）
    pub fn with_force_history(mut self, steps: usize) -> Self {
        self.force_history = steps;
        self
    }

    /// 当前阶段
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    fn enter(&mut self, phase: RunPhase) {
        debug!(from = ?self.phase, to = ?phase, "阶段转换");
        self.phase = phase;
    }

    /// 按输出配置构建调度器（周期不为正的输出不注册）
    pub fn build_logger(&self) -> RunnerResult<Logger> {
        let config = self.config;
        let output = &config.output;
        let mut logger = Logger::new();

        let plot = FileTemplate::new(config.plot_template().to_string_lossy())?;
        let title = FileTemplate::new(config.plot_title_template())?;
        logger.add_output(
            Box::new(TecplotSink::new(plot, title, self.model.grid().clone())),
            output.plot_period,
        );

        let restart = FileTemplate::new(config.restart_template().to_string_lossy())?;
        logger.add_output(Box::new(RestartSink::new(restart)), output.restart_period);

        logger.add_output(
            Box::new(ForceLogSink::new(config.force_log_path())),
            output.force_period,
        );

        Ok(logger)
    }

    /// 执行完整运行
    pub fn run(&mut self) -> RunnerResult<RunOutcome> {
        let start = Instant::now();
        let config = self.config;
        let model = self.model;
        self.enter(RunPhase::Configuring);

        info!("运行名称: {}", config.name);
        debug!("运行配置:\n{}", config.to_json_pretty()?);

        let outdir = &config.output.directory;
        std::fs::create_dir_all(outdir).map_err(|source| RunnerError::Io {
            path: outdir.clone(),
            source,
        })?;

        let mut stepper = create_stepper(config.scheme, model, config.dt)?;
        let stepper_name = stepper.name();
        info!("使用 {} 时间推进, dt = {}", stepper_name, config.dt);

        let mut logger = self.build_logger()?;

        // 推进器：优先从检查点恢复
        let base = config.checkpoint_base();
        let warm_started = match stepper.load(&base) {
            Ok(()) => {
                self.enter(RunPhase::WarmLoad);
                info!(
                    "从 {} 恢复推进器",
                    checkpoint_path(&base, config.scheme).display()
                );
                true
            }
            Err(e) if e.is_recoverable_data_error() => {
                self.enter(RunPhase::ColdInit);
                warn!("未能加载推进器检查点 ({e})，冷启动");
                stepper.init()?;
                if let Err(e) = stepper.save(&base) {
                    warn!("推进器检查点保存失败: {e}");
                }
                false
            }
            Err(e) => return Err(e.into()),
        };

        // 初始条件
        let mut state = model.zero_state();
        match &config.initial_condition {
            Some(ic) => {
                info!("从 {} 加载初始条件", ic.display());
                match state.load_into(ic) {
                    Ok(()) => {}
                    Err(e) if e.is_recoverable_data_error() => {
                        warn!("初始条件加载失败 ({e})，使用零初始条件");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            None => info!("使用零初始条件"),
        }
        model.project(&mut state)?;

        logger.init()?;
        logger.do_output(&state, 0)?;
        self.enter(RunPhase::Stepping(0));

        info!("积分 {} 步", config.n_steps);
        let mut forces = VecDeque::new();
        for i in 1..=config.n_steps {
            self.phase = RunPhase::Stepping(i);
            debug!("step {i}");

            stepper
                .advance(&mut state)
                .map_err(|source| RunnerError::Step {
                    stepper: stepper_name,
                    step: i,
                    source,
                })?;

            let force = NetForce::from_state(&state);
            info!(
                "step {:>6}  x force : {:>16.8e} , y force : {:>16.8e}",
                i,
                force.drag(),
                force.lift()
            );
            if self.force_history > 0 {
                if forces.len() == self.force_history {
                    forces.pop_front();
                }
                forces.push_back(force);
            }

            logger.do_output(&state, i)?;
        }

        self.enter(RunPhase::Cleanup);
        logger.cleanup();
        drop(stepper);

        let elapsed = start.elapsed();
        info!("完成 {} 步, 耗时 {:.3}s", config.n_steps, elapsed.as_secs_f64());
        self.enter(RunPhase::Terminal);

        Ok(RunOutcome {
            state,
            forces: forces.into(),
            warm_started,
            steps_taken: config.n_steps,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ib_physics::QuiescentModel;

    fn small_config(dir: &std::path::Path) -> RunConfig {
        let mut config = RunConfig::default();
        config.grid.nx = 4;
        config.grid.ny = 4;
        config.output.directory = dir.to_path_buf();
        config.n_steps = 2;
        config
    }

    #[test]
    fn test_model_grid_must_match_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = small_config(dir.path());
        let model = QuiescentModel::new(Grid::new(5, 4, 4.0, -2.0, -2.0).unwrap(), 0);
        assert!(matches!(
            Simulation::new(&config, &model),
            Err(RunnerError::Setup(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.dt = -1.0;
        let model = QuiescentModel::new(Grid::from_config(&config.grid).unwrap(), 0);
        assert!(matches!(
            Simulation::new(&config, &model),
            Err(RunnerError::Config(_))
        ));
    }

    #[test]
    fn test_build_logger_skips_disabled_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.output.plot_period = 0;
        config.output.restart_period = -1;
        let model = QuiescentModel::new(Grid::from_config(&config.grid).unwrap(), 0);
        let sim = Simulation::new(&config, &model).unwrap();
        assert_eq!(sim.build_logger().unwrap().len(), 1);
        assert_eq!(sim.phase(), RunPhase::Configuring);
    }

    #[test]
    fn test_force_history_keeps_latest_steps() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.n_steps = 5;
        let model = QuiescentModel::new(Grid::from_config(&config.grid).unwrap(), 2);

        let outcome = Simulation::new(&config, &model)
            .unwrap()
            .with_force_history(2)
            .run()
            .unwrap();
        assert_eq!(outcome.steps_taken, 5);
        let steps: Vec<u64> = outcome.forces.iter().map(|f| f.step).collect();
        assert_eq!(steps, vec![4, 5]);

        let outcome = Simulation::new(&config, &model)
            .unwrap()
            .with_force_history(0)
            .run()
            .unwrap();
        assert!(outcome.forces.is_empty());
    }

    #[test]
    fn test_huge_step_count_rejected_before_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.n_steps = u64::MAX;
        let model = QuiescentModel::new(Grid::from_config(&config.grid).unwrap(), 0);
        assert!(matches!(
            Simulation::new(&config, &model),
            Err(RunnerError::Config(_))
        ));
        assert!(!dir.path().join("ibpm000.plt").exists());
    }

    #[test]
    fn test_corrupt_checkpoint_falls_back_to_cold_start() {
        let dir = tempfile::tempdir().unwrap();
        let config = small_config(dir.path());
        let model = QuiescentModel::new(Grid::from_config(&config.grid).unwrap(), 0);
        std::fs::write(dir.path().join("ibpm.rk2"), b"garbage").unwrap();

        let outcome = Simulation::new(&config, &model).unwrap().run().unwrap();
        assert!(!outcome.warm_started);

        let again = Simulation::new(&config, &model).unwrap().run().unwrap();
        assert!(again.warm_started);
    }

    #[test]
    fn test_missing_geometry_is_setup_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.geometry = dir.path().join("missing.inp");
        let err = load_viscous_model(&config).err().unwrap();
        assert!(matches!(err, RunnerError::Setup(IbError::FileNotFound { .. })));
    }
}
