// apps/ib_cli/src/commands/run.rs

//! 运行模拟命令
//!
//! 配置来源按优先级从低到高：内置默认值、`--config` 文件、命令行选项。

use anyhow::{Context, Result};
use clap::Args;
use ib_config::{RunConfig, SchemeKind};
use ib_workflow::{load_viscous_model, Simulation};
use std::path::PathBuf;
use tracing::info;

/// 运行模拟参数
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// JSON 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 运行名称（输出文件前缀）
    #[arg(long)]
    pub name: Option<String>,

    /// x 方向单元数
    #[arg(long)]
    pub nx: Option<usize>,

    /// y 方向单元数
    #[arg(long)]
    pub ny: Option<usize>,

    /// x 方向区域长度
    #[arg(long)]
    pub length: Option<f64>,

    /// 区域左边界 x 坐标
    #[arg(long, allow_negative_numbers = true)]
    pub xoffset: Option<f64>,

    /// 区域下边界 y 坐标
    #[arg(long, allow_negative_numbers = true)]
    pub yoffset: Option<f64>,

    /// 几何文件
    #[arg(long)]
    pub geom: Option<PathBuf>,

    /// 雷诺数
    #[arg(long)]
    pub re: Option<f64>,

    /// 时间步长
    #[arg(long)]
    pub dt: Option<f64>,

    /// 时间推进格式 (euler, ab2, rk2, rk3)
    #[arg(long)]
    pub scheme: Option<String>,

    /// 初始条件文件
    #[arg(long)]
    pub ic: Option<PathBuf>,

    /// 输出目录
    #[arg(long)]
    pub outdir: Option<PathBuf>,

    /// Tecplot 输出周期（<= 0 关闭）
    #[arg(long, allow_negative_numbers = true)]
    pub tecplot: Option<i64>,

    /// 重启文件输出周期（<= 0 关闭）
    #[arg(long, allow_negative_numbers = true)]
    pub restart: Option<i64>,

    /// 受力日志周期（<= 0 关闭）
    #[arg(long, allow_negative_numbers = true)]
    pub force: Option<i64>,

    /// 积分步数
    #[arg(long)]
    pub nsteps: Option<u64>,
}

impl RunArgs {
    /// 合并配置文件与命令行选项并验证
    pub fn resolve(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)
                .with_context(|| format!("无法加载配置文件 {}", path.display()))?,
            None => RunConfig::default(),
        };

        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        if let Some(nx) = self.nx {
            config.grid.nx = nx;
        }
        if let Some(ny) = self.ny {
            config.grid.ny = ny;
        }
        if let Some(length) = self.length {
            config.grid.length = length;
        }
        if let Some(x) = self.xoffset {
            config.grid.x_offset = x;
        }
        if let Some(y) = self.yoffset {
            config.grid.y_offset = y;
        }
        if let Some(geom) = &self.geom {
            config.geometry = geom.clone();
        }
        if let Some(re) = self.re {
            config.reynolds = re;
        }
        if let Some(dt) = self.dt {
            config.dt = dt;
        }
        if let Some(scheme) = &self.scheme {
            config.scheme = scheme
                .parse::<SchemeKind>()
                .context("--scheme 参数无效")?;
        }
        if let Some(ic) = &self.ic {
            config.initial_condition = Some(ic.clone());
        }
        if let Some(outdir) = &self.outdir {
            config.output.directory = outdir.clone();
        }
        if let Some(period) = self.tecplot {
            config.output.plot_period = period;
        }
        if let Some(period) = self.restart {
            config.output.restart_period = period;
        }
        if let Some(period) = self.force {
            config.output.force_period = period;
        }
        if let Some(n) = self.nsteps {
            config.n_steps = n;
        }

        config.validate().context("配置无效")?;
        Ok(config)
    }
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> Result<()> {
    info!("=== IBFlow 模拟启动 ===");

    let config = args.resolve()?;
    let model = load_viscous_model(&config).context("构建流动模型失败")?;

    let mut simulation = Simulation::new(&config, &model).context("初始化模拟失败")?;
    let outcome = simulation.run().context("模拟运行失败")?;

    info!("=== 模拟完成 ===");
    info!("总步数: {}", outcome.steps_taken);
    info!("推进器: {}", if outcome.warm_started { "检查点恢复" } else { "冷启动" });
    info!("计算时间: {:.2} s", outcome.elapsed.as_secs_f64());
    if let Some(last) = outcome.forces.last() {
        info!("末步受力: fx = {:.8e}, fy = {:.8e}", last.fx, last.fy);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_overrides() {
        let config = RunArgs::default().resolve().unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = RunArgs {
            name: Some("cyl".into()),
            nx: Some(64),
            xoffset: Some(-1.0),
            scheme: Some("RK3".into()),
            tecplot: Some(0),
            nsteps: Some(10),
            ..Default::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.name, "cyl");
        assert_eq!(config.grid.nx, 64);
        assert_eq!(config.grid.ny, 200);
        assert_eq!(config.grid.x_offset, -1.0);
        assert_eq!(config.scheme, SchemeKind::RungeKutta3);
        assert_eq!(config.output.plot_period, 0);
        assert_eq!(config.n_steps, 10);
    }

    #[test]
    fn test_unknown_scheme_is_fatal() {
        let args = RunArgs {
            scheme: Some("bogus".into()),
            ..Default::default()
        };
        let err = args.resolve().unwrap_err();
        assert!(format!("{err:#}").contains("bogus"));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let args = RunArgs {
            dt: Some(0.0),
            ..Default::default()
        };
        assert!(args.resolve().is_err());
    }
}
