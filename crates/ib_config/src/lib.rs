// crates/ib_config/src/lib.rs

//! IBFlow Config Layer (Layer 2)
//!
//! 配置层，提供时间推进格式选择和运行参数。
//!
//! # 模块概览
//!
//! - [`scheme`]: SchemeKind 枚举（euler / ab2 / rk2 / rk3）
//! - [`run_config`]: RunConfig 运行配置（网格、物理参数、输出周期）
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! Layer 5: ib_cli       ─> 解析命令行，构建 RunConfig
//! Layer 4: ib_workflow  ─> 驱动循环
//! Layer 3: ib_physics / ib_io
//! Layer 2: ib_config    ─> SchemeKind, RunConfig (本层)
//! Layer 1: ib_foundation
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod run_config;
pub mod scheme;

// 重导出核心类型
pub use error::ConfigError;
pub use run_config::{GridConfig, OutputConfig, RunConfig, MAX_STEPS};
pub use scheme::SchemeKind;
