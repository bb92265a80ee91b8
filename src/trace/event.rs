//! trace 事件类型
//!
//! 定义回放的基本单位及其坐标。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 事件类型（封闭集合；解析器丢弃无法识别的类型）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// 计算某个点：坐标为 `[x, y]`
    Evaluating,
    /// 分配缓冲区：坐标为 `[x0, w, y0, h]`
    Realizing,
    /// 释放缓冲区：坐标为 `[x0, w, y0, h]`
    Discarding,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [
        EventKind::Evaluating,
        EventKind::Realizing,
        EventKind::Discarding,
    ];

    /// 日志行首的关键字
    pub fn keyword(self) -> &'static str {
        match self {
            EventKind::Evaluating => "Evaluating",
            EventKind::Realizing => "Realizing",
            EventKind::Discarding => "Discarding",
        }
    }

    pub fn from_keyword(token: &str) -> Option<EventKind> {
        Self::ALL.into_iter().find(|k| k.keyword() == token)
    }

    /// 坐标个数
    pub fn arity(self) -> usize {
        match self {
            EventKind::Evaluating => 2,
            EventKind::Realizing | EventKind::Discarding => 4,
        }
    }

    /// 实体名与坐标之间的填充词
    pub(crate) fn filler(self) -> Option<&'static str> {
        match self {
            EventKind::Evaluating => Some("at"),
            EventKind::Realizing => Some("over"),
            EventKind::Discarding => None,
        }
    }

    /// 第一个坐标 token 的下标
    pub(crate) fn coord_start(self) -> usize {
        if self.filler().is_some() { 3 } else { 2 }
    }

    /// 一行应包含的空白分隔 token 数
    pub(crate) fn token_count(self) -> usize {
        match self {
            EventKind::Evaluating => self.coord_start() + 1,
            EventKind::Realizing | EventKind::Discarding => self.coord_start() + 2,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// 一个坐标值；无法解析的 token 得到 not-a-number（`None`）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coord(Option<i64>);

impl Coord {
    pub const NAN: Coord = Coord(None);

    pub fn new(v: i64) -> Coord {
        Coord(Some(v))
    }

    pub fn value(self) -> Option<i64> {
        self.0
    }

    pub fn is_nan(self) -> bool {
        self.0.is_none()
    }
}

impl From<i64> for Coord {
    fn from(v: i64) -> Self {
        Coord::new(v)
    }
}

/// trace 坐标单位下的轴对齐矩形
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRect {
    pub x: i64,
    pub w: i64,
    pub y: i64,
    pub h: i64,
}

/// 一个可回放的事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// 源文本中的行号（从 1 开始）
    pub line: usize,
    pub kind: EventKind,
    /// 规范化后的实体名（`.` 替换为 `_`）
    pub entity: String,
    pub coords: Vec<Coord>,
}

impl TraceEvent {
    pub fn new(line: usize, kind: EventKind, entity: impl Into<String>, coords: Vec<Coord>) -> Self {
        Self {
            line,
            kind,
            entity: entity.into(),
            coords,
        }
    }

    pub fn has_nan(&self) -> bool {
        self.coords.iter().any(|c| c.is_nan())
    }

    fn values<const N: usize>(&self) -> Option<[i64; N]> {
        if self.coords.len() != N {
            return None;
        }
        let mut out = [0_i64; N];
        for (slot, c) in out.iter_mut().zip(&self.coords) {
            *slot = c.value()?;
        }
        Some(out)
    }

    /// Evaluating 的点坐标；坐标个数不符或含 NaN 时为 `None`
    pub fn point(&self) -> Option<(i64, i64)> {
        self.values::<2>().map(|[x, y]| (x, y))
    }

    /// Realizing/Discarding 的矩形；坐标个数不符或含 NaN 时为 `None`
    pub fn rect(&self) -> Option<TraceRect> {
        self.values::<4>().map(|[x, w, y, h]| TraceRect { x, w, y, h })
    }
}
