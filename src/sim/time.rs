//! 回放时间类型
//!
//! 定义虚拟时间及其单位转换。

use std::time::Duration;

/// 虚拟时间（纳秒）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);
    pub fn from_micros(us: u64) -> SimTime {
        SimTime(us.saturating_mul(1_000))
    }
    pub fn from_millis(ms: u64) -> SimTime {
        SimTime(ms.saturating_mul(1_000_000))
    }
    pub fn from_secs(s: u64) -> SimTime {
        SimTime(s.saturating_mul(1_000_000_000))
    }

    /// 在当前时间上加一段延迟（饱和）
    pub fn after(self, delay: SimTime) -> SimTime {
        SimTime(self.0.saturating_add(delay.0))
    }

    /// 两个时间点之间的间隔；`earlier` 晚于 `self` 时为零
    pub fn since(self, earlier: SimTime) -> SimTime {
        SimTime(self.0.saturating_sub(earlier.0))
    }

    /// 转换为墙钟时长（用于实时节拍）
    pub fn as_duration(self) -> Duration {
        Duration::from_nanos(self.0)
    }
}
