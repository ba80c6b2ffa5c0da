// apps/ib_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 显示版本、可用时间推进格式和默认配置。

use anyhow::Result;
use clap::Args;
use ib_config::{RunConfig, SchemeKind};
use ib_physics::{create_stepper, Grid, QuiescentModel};
use tracing::info;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 显示可用格式
    #[arg(long)]
    pub schemes: bool,

    /// 显示默认配置
    #[arg(long)]
    pub defaults: bool,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== IBFlow 信息 ===");

    println!("IBFlow CLI 版本: {}", env!("CARGO_PKG_VERSION"));
    println!("目标平台: {}", std::env::consts::ARCH);
    println!("操作系统: {}", std::env::consts::OS);

    let all = !args.schemes && !args.defaults;

    if args.schemes || all {
        println!();
        print_schemes()?;
    }

    if args.defaults || all {
        println!();
        print_default_config()?;
    }

    Ok(())
}

fn print_schemes() -> Result<()> {
    println!("=== 时间推进格式 ===");
    println!("{:<8}{:<8}{:>6}{:>8}", "tag", "name", "order", "stages");

    // 名称由推进器自身给出
    let model = QuiescentModel::new(Grid::new(1, 1, 1.0, 0.0, 0.0)?, 0);
    for kind in SchemeKind::ALL {
        let stepper = create_stepper(kind, &model, 1.0)?;
        println!(
            "{:<8}{:<8}{:>6}{:>8}{}",
            kind.tag(),
            stepper.name(),
            kind.order(),
            kind.stages(),
            if kind == SchemeKind::default() { "  (默认)" } else { "" }
        );
    }
    Ok(())
}

fn print_default_config() -> Result<()> {
    println!("=== 默认配置 ===");
    println!("{}", RunConfig::default().to_json_pretty()?);
    Ok(())
}
