// crates/ib_physics/src/lib.rs

//! IBFlow 物理层
//!
//! 提供浸入边界涡量法的时间推进核心：
//! - 网格与边界几何 (grid, geometry)
//! - 流场状态及重启文件 (state)
//! - 流动模型抽象与实现 (model)
//! - 四种显式时间推进格式及工厂 (timestepper)
//! - 边界净受力 (force)
//!
//! # 示例
//!
//! ```
//! use ib_config::SchemeKind;
//! use ib_physics::{create_stepper, FlowModel, Grid, QuiescentModel};
//!
//! let model = QuiescentModel::new(Grid::new(8, 8, 1.0, 0.0, 0.0).unwrap(), 0);
//! let mut stepper = create_stepper(SchemeKind::RungeKutta3, &model, 0.01).unwrap();
//! stepper.init().unwrap();
//!
//! let mut state = model.zero_state();
//! stepper.advance(&mut state).unwrap();
//! assert_eq!(state.step, 1);
//! ```
//!
//! # 特性
//!
//! - `parallel`: 使用 rayon 按网格行并行计算模型右端项

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod force;
pub mod geometry;
pub mod grid;
pub mod model;
pub mod state;
pub mod timestepper;

// 重导出常用类型
pub use force::NetForce;
pub use geometry::{Body, Geometry};
pub use grid::Grid;
pub use model::{FlowModel, QuiescentModel, ViscousModel};
pub use state::State;
pub use timestepper::{
    checkpoint_path, create_stepper, create_stepper_by_name, AdamsBashforth2, Euler,
    RungeKutta2, RungeKutta3, StepperCheckpoint, TimeStepper,
};
