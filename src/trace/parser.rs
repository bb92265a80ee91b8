//! 日志解析器
//!
//! 只支持关键字方言：第 0 个 token 为事件类型，第 1 个为实体名，
//! 坐标从固定下标开始（Evaluating/Realizing 为 3，Discarding 为 2）：
//!
//! ```text
//! Evaluating <entity> at <x>,<y>
//! Realizing <entity> over <x0>,<w> <y0>,<h>
//! Discarding <entity> <x0>,<w> <y0>,<h>
//! ```
//!
//! 解析是纯函数且不会失败：无法识别的行被忽略，token 或坐标个数不符的
//! 记录被丢弃，无法解析的坐标（包括空片段，如 `,3`）变为 NaN。

use tracing::{debug, trace};

use super::event::{Coord, EventKind, TraceEvent};

/// 解析整段 trace 文本
pub fn parse_trace(text: &str) -> Vec<TraceEvent> {
    let events = text
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| parse_line(idx + 1, line))
        .collect::<Vec<_>>();
    debug!(events = events.len(), "trace 解析完成");
    events
}

/// 解析一行；不是可视化记录或格式不符时返回 `None`
pub fn parse_line(line_no: usize, line: &str) -> Option<TraceEvent> {
    let pieces = line.split_whitespace().collect::<Vec<_>>();
    let kind = EventKind::from_keyword(pieces.first()?)?;

    if pieces.len() != kind.token_count() {
        debug!(line = line_no, kind = %kind, tokens = pieces.len(), "token 数不符，丢弃该行");
        return None;
    }
    if let Some(filler) = kind.filler() {
        if pieces[2] != filler {
            debug!(line = line_no, kind = %kind, got = pieces[2], "缺少填充词，丢弃该行");
            return None;
        }
    }

    let coords = pieces[kind.coord_start()..]
        .iter()
        .copied()
        .flat_map(coord_pieces)
        .map(parse_coord)
        .collect::<Vec<_>>();
    if coords.len() != kind.arity() {
        debug!(line = line_no, kind = %kind, coords = coords.len(), "坐标个数不符，丢弃该行");
        return None;
    }

    let entity = normalize_entity(pieces[1]);
    trace!(line = line_no, kind = %kind, entity = %entity, ?coords, "解析事件");
    Some(TraceEvent::new(line_no, kind, entity, coords))
}

/// 每个坐标 token 是一对 `a,b`
const COORDS_PER_TOKEN: usize = 2;

// 按 `,` 拆分坐标 token。空片段保留（之后解析为 NaN），
// 只有超出一对之后的尾部空片段（如 `2,3,`）不计数。
fn coord_pieces(token: &str) -> Vec<&str> {
    let mut pieces = token.split(',').collect::<Vec<_>>();
    while pieces.len() > COORDS_PER_TOKEN && pieces.last() == Some(&"") {
        pieces.pop();
    }
    pieces
}

/// 把实体名中的 `.` 替换为 `_`，得到可作为 surface key 的名字
pub fn normalize_entity(name: &str) -> String {
    name.replace('.', "_")
}

/// 取 token 的数字前缀（可带负号），例如 `"12)"` 得到 12；没有数字则为 NaN
pub fn parse_coord(token: &str) -> Coord {
    let digits_from = usize::from(token.starts_with('-'));
    let digits_len = token[digits_from..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits_len == 0 {
        return Coord::NAN;
    }
    token[..digits_from + digits_len]
        .parse::<i64>()
        .map(Coord::new)
        .unwrap_or(Coord::NAN)
}
