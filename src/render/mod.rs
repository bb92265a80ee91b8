//! 渲染模块
//!
//! 把单个 trace 事件作用到目标 surface 上，以及把所有 surface 拼成一帧。

mod handler;
mod label;
mod layout;

pub use handler::{RenderHandler, RenderOutcome, RenderStyle};
pub use label::{draw_index_label, label_scale};
pub use layout::{GridLayout, compose_frame};
