//! 回放配置
//!
//! 所有字段都有默认值；可从 JSON 文件加载，再由命令行参数覆盖。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{VizError, VizResult};
use crate::sim::SimTime;

/// RGBA8 颜色
pub type Rgba8 = [u8; 4];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    /// 每个 surface 的边长（像素，正方形画布）
    pub canvas_px: u32,
    /// 一个 trace 坐标单位对应的像素数
    pub scale: u32,
    /// Evaluating 标记的边长（像素）；缺省等于 `scale`
    pub marker_px: Option<u32>,
    /// 两次 tick 之间的间隔（毫秒）
    pub tick_ms: u64,
    /// Realizing 是否先清空整个 surface
    pub clear_on_realize: bool,
    /// 回放结束后是否从头循环
    pub loop_playback: bool,
    /// 每隔多少个 tick 输出一帧；`None` 表示只输出最终帧
    pub frame_every: Option<u64>,
    /// 回放结束后重复输出最终帧的次数
    pub hold_frames: u32,
    /// 合成帧的网格列数；缺省为 ceil(sqrt(n))
    pub grid_columns: Option<u32>,
    /// 合成帧中 surface 之间的间隔（像素）
    pub gap_px: u32,
    /// 在每个图块左上角写出实体的发现序号
    pub label_tiles: bool,
    pub background: Rgba8,
    pub active: Rgba8,
    pub realized: Rgba8,
    pub cleared: Rgba8,
    /// 合成帧底色（间隔区域）
    pub frame_rgba: Rgba8,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            canvas_px: 400,
            scale: 10,
            marker_px: None,
            tick_ms: 10,
            clear_on_realize: true,
            loop_playback: false,
            frame_every: None,
            hold_frames: 0,
            grid_columns: None,
            gap_px: 4,
            label_tiles: false,
            background: [255, 255, 255, 255],
            active: [230, 70, 40, 255],
            realized: [20, 20, 20, 255],
            cleared: [150, 150, 150, 255],
            frame_rgba: [32, 32, 32, 255],
        }
    }
}

impl VizConfig {
    /// 从 JSON 文件读取配置（缺失字段取默认值）
    pub fn from_json_file(path: &Path) -> VizResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            VizError::config(format!("read config '{}': {e}", path.display()))
        })?;
        let cfg: VizConfig = serde_json::from_str(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> VizResult<()> {
        if self.canvas_px == 0 {
            return Err(VizError::config("canvas_px must be positive"));
        }
        if self.scale == 0 {
            return Err(VizError::config("scale must be positive"));
        }
        if self.marker_px == Some(0) {
            return Err(VizError::config("marker_px must be positive"));
        }
        if self.frame_every == Some(0) {
            return Err(VizError::config("frame_every must be positive"));
        }
        if self.grid_columns == Some(0) {
            return Err(VizError::config("grid_columns must be positive"));
        }
        Ok(())
    }

    pub fn marker_px(&self) -> u32 {
        self.marker_px.unwrap_or(self.scale)
    }

    pub fn tick_period(&self) -> SimTime {
        SimTime::from_millis(self.tick_ms)
    }
}
