// crates/ib_foundation/src/lib.rs

//! IBFlow Foundation Layer
//!
//! 基础层，提供整个项目共用的错误类型和二进制记录格式。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型
//! - [`record`]: 带魔数、版本和 CRC32 的二进制记录编解码
//!
//! # 设计原则
//!
//! 1. **最少依赖**: 仅依赖 thiserror
//! 2. **不 panic**: 解析外部文件时所有越界都转为错误

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod record;

// 重导出常用类型
pub use error::{IbError, IbResult};
pub use record::{RecordReader, RecordWriter};

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::ensure;
    pub use crate::error::{IbError, IbResult};
    pub use crate::record::{RecordReader, RecordWriter};
}
