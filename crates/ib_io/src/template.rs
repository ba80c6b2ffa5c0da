// crates/ib_io/src/template.rs

//! 文件名模板
//!
//! 支持 printf 风格的步数占位符：
//!
//! | 占位符 | 含义 | `step = 7` |
//! |--------|------|------------|
//! | `%d` | 十进制 | `7` |
//! | `%03d` | 零填充到 3 位 | `007` |
//! | `%3d` | 空格填充到 3 位 | `  7` |
//! | `%%` | 字面 `%` | `%` |
//!
//! 其他 `%` 序列在构造时报错。

use std::fmt;
use std::path::PathBuf;

use crate::error::{OutputError, OutputResult};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Step { width: usize, zero_pad: bool },
}

/// 已解析的步数模板
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTemplate {
    raw: String,
    pieces: Vec<Piece>,
}

impl FileTemplate {
    /// 解析模板
    pub fn new(template: impl Into<String>) -> OutputResult<Self> {
        let raw = template.into();
        let pieces = parse(&raw).map_err(|reason| OutputError::Template {
            template: raw.clone(),
            reason,
        })?;
        Ok(Self { raw, pieces })
    }

    /// 模板原文
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// 是否包含步数占位符
    pub fn has_step(&self) -> bool {
        self.pieces.iter().any(|p| matches!(p, Piece::Step { .. }))
    }

    /// 代入步数
    pub fn render(&self, step: u64) -> String {
        let mut out = String::with_capacity(self.raw.len() + 8);
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Step { width, zero_pad: true } => {
                    out.push_str(&format!("{step:0width$}", width = *width))
                }
                Piece::Step { width, zero_pad: false } => {
                    out.push_str(&format!("{step:width$}", width = *width))
                }
            }
        }
        out
    }

    /// 代入步数并作为路径返回
    pub fn path(&self, step: u64) -> PathBuf {
        PathBuf::from(self.render(step))
    }
}

impl fmt::Display for FileTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for FileTemplate {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

fn parse(raw: &str) -> Result<Vec<Piece>, String> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }

        if chars.peek() == Some(&'%') {
            chars.next();
            literal.push('%');
            continue;
        }

        let zero_pad = chars.peek() == Some(&'0');
        if zero_pad {
            chars.next();
        }

        let mut digits = String::new();
        while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
            digits.push(d);
            chars.next();
        }

        match chars.next() {
            Some('d') => {}
            Some(other) => return Err(format!("不支持的格式符 '%{digits}{other}'")),
            None => return Err("模板以未完成的 '%' 结尾".to_string()),
        }

        if zero_pad && digits.is_empty() {
            return Err("'%0d' 缺少宽度".to_string());
        }
        let width = if digits.is_empty() {
            0
        } else {
            digits
                .parse::<usize>()
                .ok()
                .filter(|w| *w <= 64)
                .ok_or_else(|| format!("宽度过大: {digits}"))?
        };

        if !literal.is_empty() {
            pieces.push(Piece::Literal(std::mem::take(&mut literal)));
        }
        pieces.push(Piece::Step { width, zero_pad });
    }

    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }
    Ok(pieces)
}
