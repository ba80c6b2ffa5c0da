// crates/ib_workflow/src/lib.rs

//! IBFlow 工作流
//!
//! 把配置、流动模型、时间推进器和输出调度器串成一次完整运行。
//!
//! # 模块结构
//!
//! - [`runner`]: 模拟驱动循环
//!
//! # 示例
//!
//! ```rust,ignore
//! use ib_config::RunConfig;
//! use ib_workflow::{load_viscous_model, Simulation};
//!
//! let config = RunConfig::from_file("cylinder.json")?;
//! let model = load_viscous_model(&config)?;
//! let outcome = Simulation::new(&config, &model)?.run()?;
//! println!("{} 步, 末步升力 {:?}", outcome.steps_taken, outcome.forces.last());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod runner;

// 重导出常用类型
pub use runner::{
    load_viscous_model, RunOutcome, RunPhase, RunnerError, RunnerResult, Simulation,
    DEFAULT_FORCE_HISTORY,
};
