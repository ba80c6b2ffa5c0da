// crates/ib_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `IbError` 枚举和 `IbResult` 类型别名，用于整个项目的错误处理。
//!
//! # 设计原则
//!
//! 1. **层次化**: 基础层只定义核心错误，配置与输出错误在各自的 crate 中定义
//! 2. **易用性**: 提供便捷的构造方法
//! 3. **可追溯**: 支持错误链
//!
//! # 示例
//!
//! ```
//! use ib_foundation::error::{IbError, IbResult};
//!
//! fn read_geometry() -> IbResult<()> {
//!     Err(IbError::invalid_input("几何文件为空"))
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// 统一结果类型
pub type IbResult<T> = Result<T, IbError>;

/// IBFlow 错误类型
#[derive(Error, Debug)]
pub enum IbError {
    // ========================================================================
    // IO 相关错误
    // ========================================================================

    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        #[source]
        /// 可选的底层 IO 错误
        source: Option<std::io::Error>,
    },

    /// 文件不存在
    #[error("文件不存在: {path}")]
    FileNotFound {
        /// 未找到的路径
        path: PathBuf,
    },

    /// 文件解析错误
    #[error("文件解析错误: {file} 第{line}行: {message}")]
    ParseError {
        /// 文件路径
        file: PathBuf,
        /// 行号
        line: usize,
        /// 错误信息
        message: String,
    },

    // ========================================================================
    // 二进制记录错误
    // ========================================================================

    /// 格式错误（魔数不符、截断、越界）
    #[error("格式错误: {message}")]
    Format {
        /// 具体错误信息
        message: String,
    },

    /// 版本不兼容
    #[error("版本不兼容: 文件版本 {file}, 当前版本 {current}")]
    Version {
        /// 文件中的版本号
        file: u32,
        /// 当前支持的版本号
        current: u32,
    },

    /// 校验和错误
    #[error("校验和错误: 期望 {expected:08x}, 实际 {found:08x}")]
    Checksum {
        /// 文件中存储的 CRC
        expected: u32,
        /// 重新计算的 CRC
        found: u32,
    },

    // ========================================================================
    // 数据错误
    // ========================================================================

    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 配置错误
    #[error("配置错误: {message}")]
    Config {
        /// 具体错误信息
        message: String,
    },

    // ========================================================================
    // 运行时错误
    // ========================================================================

    /// 时间推进器未初始化
    #[error("时间推进器 {stepper} 未初始化: 推进前必须调用 init 或成功 load")]
    Uninitialized {
        /// 推进器名称
        stepper: &'static str,
    },

    /// 内部错误
    #[error("内部错误: {message}")]
    Internal {
        /// 内部错误描述
        message: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl IbError {
    /// 从描述创建 IO 错误
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// 从IO错误创建（带源）
    pub fn io_with_source(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(source),
        }
    }

    /// 文件不存在
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// 解析错误
    pub fn parse_error(file: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// 格式错误
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 数组大小不匹配
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// 是否为"数据不可用"类错误（文件缺失或损坏）
    ///
    /// 这类错误在热启动和初始条件加载时可恢复：调用方回退到默认值继续运行。
    pub fn is_recoverable_data_error(&self) -> bool {
        matches!(
            self,
            Self::Io { .. }
                | Self::FileNotFound { .. }
                | Self::Format { .. }
                | Self::Version { .. }
                | Self::Checksum { .. }
                | Self::SizeMismatch { .. }
                | Self::InvalidInput { .. }
        )
    }
}

// ========================================================================
// 验证辅助方法
// ========================================================================

impl IbError {
    /// 检查数组大小是否匹配
    #[inline]
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> IbResult<()> {
        if expected != actual {
            Err(Self::size_mismatch(name, expected, actual))
        } else {
            Ok(())
        }
    }
}

/// 条件不满足时提前返回错误
///
/// ```
/// use ib_foundation::{ensure, IbError, IbResult};
///
/// fn check(dt: f64) -> IbResult<()> {
///     ensure!(dt > 0.0, IbError::invalid_input("dt 必须为正"));
///     Ok(())
/// }
/// assert!(check(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err.into());
        }
    };
}

// ========================================================================
// 标准库错误转换
// ========================================================================

impl From<std::io::Error> for IbError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

// ========================================================================
// 测试
// ========================================================================
