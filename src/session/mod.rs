//! 回放会话模块
//!
//! `Session` 持有一次可视化会话的全部可变状态（事件序列、surface 注册表、
//! 回放游标），并作为 `World` 由定时器链驱动。

mod playback;
mod session;
mod sink;

pub use playback::{PlaybackCursor, PlaybackTick};
pub use session::{Dispatch, PlaybackState, PlaybackStats, Session};
pub use sink::{FrameSink, MemorySink, PngDirSink};
