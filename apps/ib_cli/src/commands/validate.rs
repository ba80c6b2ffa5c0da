// apps/ib_cli/src/commands/validate.rs

//! 配置验证命令
//!
//! 验证配置文件，并可选地检查其引用的几何文件。

use anyhow::{bail, Result};
use clap::Args;
use ib_config::RunConfig;
use ib_physics::Geometry;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    pub config: PathBuf,

    /// 同时检查几何文件
    #[arg(long)]
    pub geometry: bool,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 验证结果
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn is_ok(&self, strict: bool) -> bool {
        self.errors.is_empty() && (!strict || self.warnings.is_empty())
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== IBFlow 配置验证 ===");

    let result = validate(&args.config, args.geometry);
    print_validation_result(&result, args.strict)
}

fn validate(path: &Path, check_geometry: bool) -> ValidationResult {
    let mut result = ValidationResult::default();
    println!("\n检查配置文件: {}", path.display());

    // from_file 同时完成解析和验证
    let config = match RunConfig::from_file(path) {
        Ok(config) => config,
        Err(e) => {
            result.add_error(e.to_string());
            return result;
        }
    };
    println!("  ✓ 配置有效");

    if config.output.all_disabled() {
        result.add_warning("所有周期输出均已关闭");
    }
    if config.n_steps == 0 {
        result.add_warning("积分步数为 0");
    }

    if check_geometry {
        validate_geometry(&config.geometry, &mut result);
    }

    result
}

fn validate_geometry(path: &Path, result: &mut ValidationResult) {
    println!("\n检查几何文件: {}", path.display());

    match Geometry::from_file(path) {
        Ok(geometry) if geometry.n_points() == 0 => {
            result.add_warning(format!("几何文件不含边界点: {}", path.display()));
        }
        Ok(geometry) => {
            println!(
                "  ✓ {} 个物体, {} 个边界点",
                geometry.bodies().len(),
                geometry.n_points()
            );
        }
        Err(e) => result.add_error(e.to_string()),
    }
}

fn print_validation_result(result: &ValidationResult, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if !result.errors.is_empty() {
        println!("\n错误 ({}):", result.errors.len());
        for err in &result.errors {
            error!("  ✗ {}", err);
            println!("  ✗ {}", err);
        }
    }

    if !result.warnings.is_empty() {
        println!("\n警告 ({}):", result.warnings.len());
        for warning in &result.warnings {
            warn!("  ⚠ {}", warning);
            println!("  ⚠ {}", warning);
        }
    }

    if result.is_ok(strict) {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            result.errors.len(),
            result.warnings.len()
        )
    }
}
