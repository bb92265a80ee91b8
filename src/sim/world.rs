//! 世界 trait
//!
//! 定义事件执行时可访问的宿主状态接口。

use super::simulator::Simulator;
use std::any::Any;

/// 宿主世界：由业务层实现（例如回放会话）。
pub trait World: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// 每执行完一个事件后调用
    fn on_tick(&mut self, _sim: &mut Simulator) {}
}
