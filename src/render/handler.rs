//! 渲染处理器
//!
//! 按事件类型修改像素：
//! - Evaluating：在缩放后的点上画一个固定大小的标记，标记会累积
//! - Realizing：（可选先清空画布）描出缩放后的矩形边框
//! - Discarding：逐点擦除矩形内的标记，再用 "cleared" 颜色描边
//!
//! 任意坐标为 NaN 的事件不修改任何像素。

use image::Rgba;
use tracing::trace;

use crate::config::VizConfig;
use crate::error::RenderError;
use crate::surface::Surface;
use crate::trace::{EventKind, TraceEvent, TraceRect};

/// 绘制参数（从配置中提取）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStyle {
    pub scale: i64,
    pub marker_px: i64,
    pub clear_on_realize: bool,
    pub active: Rgba<u8>,
    pub realized: Rgba<u8>,
    pub cleared: Rgba<u8>,
}

impl From<&VizConfig> for RenderStyle {
    fn from(cfg: &VizConfig) -> Self {
        Self {
            scale: i64::from(cfg.scale),
            marker_px: i64::from(cfg.marker_px()),
            clear_on_realize: cfg.clear_on_realize,
            active: Rgba(cfg.active),
            realized: Rgba(cfg.realized),
            cleared: Rgba(cfg.cleared),
        }
    }
}

/// 单个事件的渲染结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Drawn,
    /// 坐标含 NaN，未修改像素
    SkippedNan,
}

impl RenderOutcome {
    pub fn is_drawn(self) -> bool {
        matches!(self, RenderOutcome::Drawn)
    }
}

#[derive(Debug, Clone)]
pub struct RenderHandler {
    style: RenderStyle,
}

impl RenderHandler {
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// 把事件作用到 surface 上
    pub fn apply(&self, surface: &mut Surface, ev: &TraceEvent) -> Result<RenderOutcome, RenderError> {
        let expected = ev.kind.arity();
        if ev.coords.len() != expected {
            return Err(RenderError::Arity {
                kind: ev.kind,
                expected,
                got: ev.coords.len(),
            });
        }
        if ev.has_nan() {
            trace!(line = ev.line, entity = %ev.entity, "坐标含 NaN，跳过");
            return Ok(RenderOutcome::SkippedNan);
        }

        match ev.kind {
            EventKind::Evaluating => {
                if let Some((x, y)) = ev.point() {
                    self.mark(surface, x, y);
                }
            }
            EventKind::Realizing => {
                if let Some(r) = ev.rect() {
                    if self.style.clear_on_realize {
                        surface.clear();
                    }
                    self.outline(surface, r, self.style.realized);
                }
            }
            EventKind::Discarding => {
                if let Some(r) = ev.rect() {
                    self.discard(surface, r);
                }
            }
        }
        Ok(RenderOutcome::Drawn)
    }

    fn scaled(&self, v: i64) -> i64 {
        v.saturating_mul(self.style.scale)
    }

    fn mark(&self, surface: &mut Surface, x: i64, y: i64) {
        let m = self.style.marker_px;
        surface.fill_rect(self.scaled(x), self.scaled(y), m, m, self.style.active);
    }

    fn outline(&self, surface: &mut Surface, r: TraceRect, color: Rgba<u8>) {
        surface.stroke_rect(
            self.scaled(r.x),
            self.scaled(r.y),
            self.scaled(r.x.saturating_add(r.w)),
            self.scaled(r.y.saturating_add(r.h)),
            color,
        );
    }

    // 逐点擦除：代价与矩形（可见部分）面积成正比
    fn discard(&self, surface: &mut Surface, r: TraceRect) {
        let m = self.style.marker_px;
        let size = i64::from(surface.size_px());
        for y in self.visible_cells(r.y, r.h, size) {
            for x in self.visible_cells(r.x, r.w, size) {
                surface.erase_rect(self.scaled(x), self.scaled(y), m, m);
            }
        }
        self.outline(surface, r, self.style.cleared);
    }

    // 画布外的格子擦除后也没有效果，只遍历可能落在画布内的部分
    fn visible_cells(&self, origin: i64, extent: i64, size_px: i64) -> std::ops::Range<i64> {
        let s = self.style.scale;
        let lo = origin.max(-(self.style.marker_px / s) - 1);
        let hi = origin.saturating_add(extent).min(size_px / s + 1);
        lo..hi.max(lo)
    }
}
