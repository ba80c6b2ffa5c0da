// crates/ib_config/src/run_config.rs

//! RunConfig - 一次运行的全部参数
//!
//! 配置在启动时构建一次，之后以不可变引用传入驱动循环，
//! 运行期间不存在可变的全局参数。
//!
//! 所有字段都有默认值，JSON 配置文件可以只给出需要修改的键。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::scheme::SchemeKind;

/// 运行配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// 运行名称，用作所有输出文件的前缀
    #[serde(default = "default_name")]
    pub name: String,

    /// 网格参数
    #[serde(default)]
    pub grid: GridConfig,

    /// 边界几何文件
    #[serde(default = "default_geometry")]
    pub geometry: PathBuf,

    /// 雷诺数
    #[serde(default = "default_reynolds")]
    pub reynolds: f64,

    /// 固定时间步长
    #[serde(default = "default_dt")]
    pub dt: f64,

    /// 时间推进格式
    #[serde(default)]
    pub scheme: SchemeKind,

    /// 初始条件文件（可选）
    #[serde(default)]
    pub initial_condition: Option<PathBuf>,

    /// 输出配置
    #[serde(default)]
    pub output: OutputConfig,

    /// 积分步数
    #[serde(default = "default_n_steps")]
    pub n_steps: u64,
}

/// 单次运行允许的最大积分步数
pub const MAX_STEPS: u64 = 1_000_000_000;

fn default_name() -> String { "ibpm".to_string() }
fn default_geometry() -> PathBuf { PathBuf::from("geom.inp") }
fn default_reynolds() -> f64 { 100.0 }
fn default_dt() -> f64 { 0.01 }
fn default_n_steps() -> u64 { 250 }

/// 网格配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// x 方向单元数
    #[serde(default = "default_cells")]
    pub nx: usize,

    /// y 方向单元数
    #[serde(default = "default_cells")]
    pub ny: usize,

    /// x 方向区域长度
    #[serde(default = "default_length")]
    pub length: f64,

    /// 区域左边界 x 坐标
    #[serde(default = "default_offset")]
    pub x_offset: f64,

    /// 区域下边界 y 坐标
    #[serde(default = "default_offset")]
    pub y_offset: f64,
}

fn default_cells() -> usize { 200 }
fn default_length() -> f64 { 4.0 }
fn default_offset() -> f64 { -2.0 }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            nx: default_cells(),
            ny: default_cells(),
            length: default_length(),
            x_offset: default_offset(),
            y_offset: default_offset(),
        }
    }
}

/// 输出配置
///
/// 周期单位为步数；小于等于 0 表示关闭该输出。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 输出目录
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// Tecplot 文件输出周期
    #[serde(default = "default_plot_period")]
    pub plot_period: i64,

    /// 重启文件输出周期
    #[serde(default = "default_restart_period")]
    pub restart_period: i64,

    /// 力记录周期
    #[serde(default = "default_force_period")]
    pub force_period: i64,
}

fn default_output_dir() -> PathBuf { PathBuf::from(".") }
fn default_plot_period() -> i64 { 100 }
fn default_restart_period() -> i64 { 100 }
fn default_force_period() -> i64 { 1 }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            plot_period: default_plot_period(),
            restart_period: default_restart_period(),
            force_period: default_force_period(),
        }
    }
}

impl OutputConfig {
    /// 是否所有周期输出都已关闭
    pub fn all_disabled(&self) -> bool {
        self.plot_period <= 0 && self.restart_period <= 0 && self.force_period <= 0
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            grid: GridConfig::default(),
            geometry: default_geometry(),
            reynolds: default_reynolds(),
            dt: default_dt(),
            scheme: SchemeKind::default(),
            initial_condition: None,
            output: OutputConfig::default(),
            n_steps: default_n_steps(),
        }
    }
}

impl RunConfig {
    /// 从 JSON 文件加载配置并验证
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;

        let config: RunConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::invalid("name", "", "运行名称不能为空"));
        }

        if self.grid.nx == 0 {
            return Err(ConfigError::invalid("grid.nx", self.grid.nx, "单元数必须为正"));
        }
        if self.grid.ny == 0 {
            return Err(ConfigError::invalid("grid.ny", self.grid.ny, "单元数必须为正"));
        }
        if self
            .grid
            .nx
            .checked_mul(self.grid.ny)
            .and_then(|n| n.checked_mul(2))
            .is_none()
        {
            return Err(ConfigError::invalid(
                "grid",
                format!("{} x {}", self.grid.nx, self.grid.ny),
                "单元总数溢出",
            ));
        }
        if !(self.grid.length.is_finite() && self.grid.length > 0.0) {
            return Err(ConfigError::invalid("grid.length", self.grid.length, "区域长度必须为正"));
        }
        if !self.grid.x_offset.is_finite() {
            return Err(ConfigError::invalid("grid.x_offset", self.grid.x_offset, "必须为有限值"));
        }
        if !self.grid.y_offset.is_finite() {
            return Err(ConfigError::invalid("grid.y_offset", self.grid.y_offset, "必须为有限值"));
        }

        if !(self.reynolds.is_finite() && self.reynolds > 0.0) {
            return Err(ConfigError::invalid("reynolds", self.reynolds, "雷诺数必须为正"));
        }

        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::invalid("dt", self.dt, "时间步长必须为正"));
        }

        if self.n_steps > MAX_STEPS {
            return Err(ConfigError::invalid(
                "n_steps",
                self.n_steps,
                format!("积分步数不能超过 {MAX_STEPS}"),
            ));
        }

        Ok(())
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_json_pretty()?).map_err(ConfigError::Io)?;
        Ok(())
    }

    /// 格式化为 JSON，用于启动日志回显
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 时间推进器检查点的基础路径: `<outdir>/<name>`
    pub fn checkpoint_base(&self) -> PathBuf {
        self.output.directory.join(&self.name)
    }

    /// Tecplot 文件名模板: `<outdir>/<name>%03d.plt`
    pub fn plot_template(&self) -> PathBuf {
        self.output.directory.join(format!("{}%03d.plt", self.name))
    }

    /// Tecplot 标题模板
    pub fn plot_title_template(&self) -> &'static str {
        "Test run, step %03d"
    }

    /// 重启文件名模板: `<outdir>/<name>%03d.bin`
    pub fn restart_template(&self) -> PathBuf {
        self.output.directory.join(format!("{}%03d.bin", self.name))
    }

    /// 力记录文件: `<outdir>/<name>.force`
    pub fn force_log_path(&self) -> PathBuf {
        self.output.directory.join(format!("{}.force", self.name))
    }
}
