// crates/ib_io/src/lib.rs

//! IBFlow IO 模块
//!
//! 提供周期输出功能。
//!
//! # 模块
//!
//! - [`logger`]: 按步数周期调度输出目标
//! - [`sinks`]: 输出目标 (Tecplot, 重启文件, 受力日志)
//! - [`template`]: printf 风格的步数文件名模板
//! - [`error`]: 输出错误类型
//!
//! # 使用示例
//!
//! ```rust,no_run
//! use ib_io::{FileTemplate, ForceLogSink, Logger, RestartSink};
//! use ib_physics::State;
//!
//! let mut logger = Logger::new();
//! logger.add_output(Box::new(ForceLogSink::new("out/ibpm.force")), 1);
//! logger.add_output(
//!     Box::new(RestartSink::new(FileTemplate::new("out/ibpm%03d.bin")?)),
//!     100,
//! );
//!
//! let state = State::new(200, 200, 0);
//! logger.init()?;
//! logger.do_output(&state, 0)?;
//! logger.cleanup();
//! # Ok::<(), ib_io::OutputError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod logger;
pub mod sinks;
pub mod template;

// 重导出常用类型
pub use error::{OutputError, OutputResult};
pub use logger::{Logger, LoggerPhase};
pub use sinks::{ForceLogSink, OutputSink, RestartSink, TecplotSink};
pub use template::FileTemplate;
