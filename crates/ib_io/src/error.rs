// crates/ib_io/src/error.rs

//! 输出层错误类型
//!
//! 所有错误最终可转换为 IbError 以实现跨层错误传递。

use ib_foundation::IbError;
use std::path::PathBuf;
use thiserror::Error;

/// 输出层结果类型别名
pub type OutputResult<T> = Result<T, OutputError>;

/// 输出错误枚举
#[derive(Error, Debug)]
pub enum OutputError {
    /// 文件读写失败
    #[error("IO 错误 {}: {source}", path.display())]
    Io {
        /// 相关文件
        path: PathBuf,
        /// 底层错误
        #[source]
        source: std::io::Error,
    },

    /// 文件名模板无效
    #[error("无效的模板 '{template}': {reason}")]
    Template {
        /// 模板原文
        template: String,
        /// 原因
        reason: String,
    },

    /// 在 init/cleanup 区间之外调用
    #[error("输出生命周期错误: {0}")]
    Lifecycle(String),

    /// 基础层错误转换
    #[error("基础层错误: {0}")]
    Foundation(#[from] IbError),
}

impl OutputError {
    /// 构造带路径的 IO 错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// 构造生命周期错误
    pub fn lifecycle(message: impl Into<String>) -> Self {
        Self::Lifecycle(message.into())
    }
}

impl From<OutputError> for IbError {
    fn from(err: OutputError) -> Self {
        match err {
            OutputError::Io { path, source } => {
                IbError::io_with_source(format!("输出文件 {}", path.display()), source)
            }
            OutputError::Template { template, reason } => {
                IbError::invalid_input(format!("无效的模板 '{template}': {reason}"))
            }
            OutputError::Lifecycle(message) => IbError::internal(message),
            OutputError::Foundation(ib_err) => ib_err,
        }
    }
}
