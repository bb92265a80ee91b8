//! 执行 trace 模块
//!
//! 把编译器运行时输出的文本日志解析为有序的 `TraceEvent` 序列，
//! 并按首次出现顺序发现需要绘制的实体。

mod discovery;
mod event;
mod parser;

pub use discovery::discover_entities;
pub use event::{Coord, EventKind, TraceEvent, TraceRect};
pub use parser::{normalize_entity, parse_coord, parse_line, parse_trace};
