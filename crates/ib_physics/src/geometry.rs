// crates/ib_physics/src/geometry.rs

//! 浸入边界几何
//!
//! 边界由若干命名物体组成，每个物体是一组有序的拉格朗日点。
//!
//! # 文件格式
//!
//! 纯文本，空白分隔，`#` 之后为注释：
//!
//! ```text
//! body plate
//!     line -0.5 0.0 0.5 0.0 21
//! end
//! body cylinder
//!     circle 0.0 0.0 0.5 64
//!     point 1.0 1.0
//! end
//! ```
//!
//! - `line x1 y1 x2 y2 n`: 含端点的 n 个等距点（n >= 2）
//! - `circle xc yc r n`: 从角度 0 开始逆时针的 n 个点（n >= 3）
//! - 不在 `body ... end` 中的命令归入名为 `default` 的物体

use glam::DVec2;
use ib_foundation::{IbError, IbResult};
use std::path::{Path, PathBuf};

/// 隐式物体名称
pub const DEFAULT_BODY: &str = "default";

/// 命名物体
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// 物体名称
    pub name: String,
    /// 边界点
    pub points: Vec<DVec2>,
}

impl Body {
    /// 创建空物体
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
        }
    }

    /// 追加单点
    pub fn add_point(&mut self, p: DVec2) {
        self.points.push(p);
    }

    /// 追加线段上的等距点
    pub fn add_line(&mut self, a: DVec2, b: DVec2, n: usize) {
        let denom = (n.max(2) - 1) as f64;
        self.points
            .extend((0..n).map(|k| a + (b - a) * (k as f64 / denom)));
    }

    /// 追加圆周上的点
    pub fn add_circle(&mut self, center: DVec2, radius: f64, n: usize) {
        let dtheta = std::f64::consts::TAU / n as f64;
        self.points.extend((0..n).map(|k| {
            let theta = k as f64 * dtheta;
            center + radius * DVec2::new(theta.cos(), theta.sin())
        }));
    }
}

/// 边界几何
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    bodies: Vec<Body>,
}

impl Geometry {
    /// 空几何（无边界点）
    pub fn new() -> Self {
        Self::default()
    }

    /// 从文件加载
    pub fn from_file(path: &Path) -> IbResult<Self> {
        if !path.exists() {
            return Err(IbError::file_not_found(path));
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            IbError::io_with_source(format!("无法读取几何文件 {}", path.display()), e)
        })?;
        Self::parse(&content, Some(path))
    }

    /// 从字符串解析
    pub fn parse(content: &str, source: Option<&Path>) -> IbResult<Self> {
        Parser::new(source).run(content)
    }

    /// 全部物体
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// 边界点总数
    pub fn n_points(&self) -> usize {
        self.bodies.iter().map(|b| b.points.len()).sum()
    }

    /// 按物体顺序展开的全部边界点
    pub fn points(&self) -> Vec<DVec2> {
        self.bodies
            .iter()
            .flat_map(|b| b.points.iter().copied())
            .collect()
    }
}

// ============================================================
// 解析器
// ============================================================

struct Parser {
    file: PathBuf,
    bodies: Vec<Body>,
    current: Option<usize>,
    default_body: Option<usize>,
    line: usize,
}

impl Parser {
    fn new(source: Option<&Path>) -> Self {
        Self {
            file: source.map_or_else(|| PathBuf::from("<string>"), Path::to_path_buf),
            bodies: Vec::new(),
            current: None,
            default_body: None,
            line: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> IbError {
        IbError::parse_error(&self.file, self.line, message)
    }

    fn run(mut self, content: &str) -> IbResult<Geometry> {
        for (idx, raw) in content.lines().enumerate() {
            self.line = idx + 1;
            let text = raw.split('#').next().unwrap_or("");
            let tokens: Vec<&str> = text.split_whitespace().collect();
            if let Some((command, args)) = tokens.split_first() {
                self.command(command, args)?;
            }
        }

        if let Some(open) = self.current {
            return Err(self.error(format!("物体 '{}' 缺少 end", self.bodies[open].name)));
        }

        Ok(Geometry { bodies: self.bodies })
    }

    fn command(&mut self, command: &str, args: &[&str]) -> IbResult<()> {
        match command.to_lowercase().as_str() {
            "body" => {
                if self.current.is_some() {
                    return Err(self.error("物体不能嵌套"));
                }
                let [name] = args else {
                    return Err(self.error("用法: body <name>"));
                };
                self.bodies.push(Body::new(*name));
                self.current = Some(self.bodies.len() - 1);
            }
            "end" => {
                if self.current.take().is_none() {
                    return Err(self.error("end 之前没有 body"));
                }
            }
            "point" => {
                let v = self.numbers(args, 2, "point x y")?;
                self.target().add_point(DVec2::new(v[0], v[1]));
            }
            "line" => {
                let v = self.numbers(&args[..args.len().min(4)], 4, "line x1 y1 x2 y2 n")?;
                let n = self.count(args.get(4), 2, "line")?;
                if args.len() != 5 {
                    return Err(self.error("用法: line x1 y1 x2 y2 n"));
                }
                self.target()
                    .add_line(DVec2::new(v[0], v[1]), DVec2::new(v[2], v[3]), n);
            }
            "circle" => {
                let v = self.numbers(&args[..args.len().min(3)], 3, "circle xc yc r n")?;
                let n = self.count(args.get(3), 3, "circle")?;
                if args.len() != 4 {
                    return Err(self.error("用法: circle xc yc r n"));
                }
                if v[2] <= 0.0 {
                    return Err(self.error(format!("圆半径必须为正: {}", v[2])));
                }
                self.target().add_circle(DVec2::new(v[0], v[1]), v[2], n);
            }
            other => return Err(self.error(format!("未知命令 '{other}'"))),
        }
        Ok(())
    }

    fn target(&mut self) -> &mut Body {
        let idx = match (self.current, self.default_body) {
            (Some(idx), _) | (None, Some(idx)) => idx,
            (None, None) => {
                self.bodies.push(Body::new(DEFAULT_BODY));
                let idx = self.bodies.len() - 1;
                self.default_body = Some(idx);
                idx
            }
        };
        &mut self.bodies[idx]
    }

    fn numbers(&self, args: &[&str], expected: usize, usage: &str) -> IbResult<Vec<f64>> {
        if args.len() != expected {
            return Err(self.error(format!("用法: {usage}")));
        }
        args.iter()
            .map(|s| {
                s.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| self.error(format!("无效数值 '{s}'")))
            })
            .collect()
    }

    fn count(&self, arg: Option<&&str>, min: usize, command: &str) -> IbResult<usize> {
        let Some(s) = arg else {
            return Err(self.error(format!("{command} 缺少点数")));
        };
        match s.parse::<usize>() {
            Ok(n) if n >= min => Ok(n),
            _ => Err(self.error(format!("{command} 点数必须为不小于 {min} 的整数: '{s}'"))),
        }
    }
}
