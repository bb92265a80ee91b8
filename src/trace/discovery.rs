//! 实体发现
//!
//! 按首次出现顺序枚举事件序列中的不同实体名。该顺序决定 surface 的
//! 创建顺序以及合成帧中的位置。

use std::collections::HashSet;

use super::event::TraceEvent;

/// 返回去重后的实体名，保持首次出现顺序。O(n) 期望时间。
pub fn discover_entities(events: &[TraceEvent]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut entities = Vec::new();
    for ev in events {
        if seen.insert(ev.entity.as_str()) {
            entities.push(ev.entity.clone());
        }
    }
    entities
}
