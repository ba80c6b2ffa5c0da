// crates/ib_config/src/scheme.rs

//! 时间推进格式选择
//!
//! 提供 `SchemeKind` 枚举，将大小写不敏感的格式名映射到具体格式。
//! 映射是纯函数，不依赖任何全局注册表。

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ConfigError;

/// 时间推进格式
///
/// # 示例
///
/// ```rust
/// use ib_config::SchemeKind;
///
/// let kind: SchemeKind = "RK3".parse().unwrap();
/// assert_eq!(kind, SchemeKind::RungeKutta3);
/// assert_eq!(kind.tag(), "rk3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SchemeKind {
    /// 一阶显式欧拉
    Euler,
    /// 二阶 Adams-Bashforth（两步法，需要启动步）
    AdamsBashforth2,
    /// 二阶 Runge-Kutta（Heun）
    RungeKutta2,
    /// 三阶低存储 Runge-Kutta
    RungeKutta3,
}

impl SchemeKind {
    /// 全部格式，按阶数排列
    pub const ALL: [SchemeKind; 4] = [
        Self::Euler,
        Self::AdamsBashforth2,
        Self::RungeKutta2,
        Self::RungeKutta3,
    ];

    /// 命令行和配置文件中使用的短名称
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Euler => "euler",
            Self::AdamsBashforth2 => "ab2",
            Self::RungeKutta2 => "rk2",
            Self::RungeKutta3 => "rk3",
        }
    }

    /// 时间精度阶数
    pub fn order(&self) -> u8 {
        match self {
            Self::Euler => 1,
            Self::AdamsBashforth2 | Self::RungeKutta2 => 2,
            Self::RungeKutta3 => 3,
        }
    }

    /// 每步的动力学求值次数
    pub fn stages(&self) -> u8 {
        match self {
            Self::Euler | Self::AdamsBashforth2 => 1,
            Self::RungeKutta2 => 2,
            Self::RungeKutta3 => 3,
        }
    }

    /// 是否为多步法（需要历史数据）
    #[inline]
    pub fn is_multistep(&self) -> bool {
        matches!(self, Self::AdamsBashforth2)
    }

    /// 可选格式的短名称列表，用于错误提示
    pub fn tags() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.tag()).collect()
    }
}

impl Default for SchemeKind {
    fn default() -> Self {
        Self::RungeKutta2
    }
}

impl std::fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for SchemeKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "euler" => Ok(Self::Euler),
            "ab2" => Ok(Self::AdamsBashforth2),
            "rk2" => Ok(Self::RungeKutta2),
            "rk3" => Ok(Self::RungeKutta3),
            _ => Err(ConfigError::UnknownScheme {
                name: s.to_string(),
                expected: Self::tags().join(", "),
            }),
        }
    }
}

impl TryFrom<String> for SchemeKind {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SchemeKind> for String {
    fn from(kind: SchemeKind) -> Self {
        kind.tag().to_string()
    }
}
