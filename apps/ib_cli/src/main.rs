// apps/ib_cli/src/main.rs

//! IBFlow 命令行界面
//!
//! 浸入边界涡量法的二维不可压缩流动模拟工具。
//!
//! # 架构层级
//!
//! 本模块属于 **Layer 5: Application**：
//! - 解析命令行并与配置文件合并为 `RunConfig`
//! - 错误统一以 `anyhow` 报告，非零退出码结束

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// IBFlow 浸入边界法流动求解器命令行工具
#[derive(Parser)]
#[command(name = "ibflow")]
#[command(author = "IBFlow Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "IBFlow immersed boundary flow solver", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行模拟
    Run(commands::run::RunArgs),
    /// 显示信息
    Info(commands::info::InfoArgs),
    /// 验证配置
    Validate(commands::validate::ValidateArgs),
}

fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&cli.log_level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}
