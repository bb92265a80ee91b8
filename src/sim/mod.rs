//! 定时器核心模块
//!
//! 此模块包含单线程、协作式的虚拟时间调度组件：时间、事件、世界和调度器。
//! 回放循环建模为一串单次定时器，每个定时器只在上一个执行完毕后才被调度。

// 子模块声明
mod event;
mod scheduled_event;
mod simulator;
mod time;
mod world;

// 重新导出公共接口
pub use event::Event;
pub use scheduled_event::{ScheduledEvent, TimerId};
pub use simulator::Simulator;
pub use time::SimTime;
pub use world::World;
