//! 合成帧布局
//!
//! 按实体发现顺序把所有 surface 平铺到一个网格里，行优先。
//! 开启 `label_tiles` 时每个图块左上角写出它的序号。

use image::{Rgba, RgbaImage, imageops};

use super::label::draw_index_label;
use crate::config::VizConfig;
use crate::surface::SurfaceRegistry;

/// 网格布局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: u32,
    pub rows: u32,
    pub cell_px: u32,
    pub gap_px: u32,
}

impl GridLayout {
    /// `count` 个格子的布局；`columns` 缺省为 ceil(sqrt(count))
    pub fn for_count(count: usize, columns: Option<u32>, cell_px: u32, gap_px: u32) -> Self {
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        let columns = columns
            .unwrap_or_else(|| (f64::from(count)).sqrt().ceil() as u32)
            .clamp(1, count.max(1));
        let rows = count.div_ceil(columns);
        Self {
            columns,
            rows,
            cell_px,
            gap_px,
        }
    }

    /// 整帧尺寸（宽, 高）
    pub fn frame_size(&self) -> (u32, u32) {
        let span = |n: u32| {
            n.saturating_mul(self.cell_px)
                .saturating_add(n.saturating_sub(1).saturating_mul(self.gap_px))
        };
        (span(self.columns), span(self.rows))
    }

    /// 第 `index` 个格子的左上角
    pub fn cell_origin(&self, index: usize) -> (u32, u32) {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        let stride = self.cell_px.saturating_add(self.gap_px);
        let col = index % self.columns;
        let row = index / self.columns;
        (col.saturating_mul(stride), row.saturating_mul(stride))
    }
}

/// 把注册表中的全部 surface 拼成一帧；没有 surface 时返回 `None`
pub fn compose_frame(registry: &SurfaceRegistry, cfg: &VizConfig) -> Option<RgbaImage> {
    if registry.is_empty() {
        return None;
    }
    let layout = GridLayout::for_count(
        registry.len(),
        cfg.grid_columns,
        registry.size_px(),
        cfg.gap_px,
    );
    let (w, h) = layout.frame_size();
    let mut frame = RgbaImage::from_pixel(w, h, Rgba(cfg.frame_rgba));
    for (i, surface) in registry.iter().enumerate() {
        let (x, y) = layout.cell_origin(i);
        imageops::replace(&mut frame, surface.pixels(), i64::from(x), i64::from(y));
        if cfg.label_tiles {
            draw_index_label(&mut frame, x, y, layout.cell_px, i, Rgba(cfg.frame_rgba));
        }
    }
    Some(frame)
}
