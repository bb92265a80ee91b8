//! 单个绘制区域
//!
//! 以 `image::RgbaImage` 存储像素，所有绘制操作都裁剪到画布范围内。

use image::{Rgba, RgbaImage};

use crate::config::Rgba8;

/// 与某个实体一一绑定的画布
#[derive(Debug, Clone)]
pub struct Surface {
    name: String,
    background: Rgba<u8>,
    pixels: RgbaImage,
}

impl Surface {
    pub fn new(name: impl Into<String>, size_px: u32, background: Rgba8) -> Self {
        let background = Rgba(background);
        Self {
            name: name.into(),
            background,
            pixels: RgbaImage::from_pixel(size_px, size_px, background),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_px(&self) -> u32 {
        self.pixels.width()
    }

    pub fn background(&self) -> Rgba<u8> {
        self.background
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// 读取一个像素；越界时为 `None`
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    /// 画布上是否存在非背景色像素
    pub fn is_blank(&self) -> bool {
        self.pixels.pixels().all(|p| *p == self.background)
    }

    /// 整个画布填充为背景色
    pub fn clear(&mut self) {
        let bg = self.background;
        self.pixels.pixels_mut().for_each(|p| *p = bg);
    }

    /// 填充矩形 `[x, x+w) x [y, y+h)`，超出部分被裁剪
    pub fn fill_rect(&mut self, x: i64, y: i64, w: i64, h: i64, color: Rgba<u8>) {
        let Some((x0, x1)) = self.clip(x, x.saturating_add(w)) else {
            return;
        };
        let Some((y0, y1)) = self.clip(y, y.saturating_add(h)) else {
            return;
        };
        for py in y0..y1 {
            for px in x0..x1 {
                self.pixels.put_pixel(px, py, color);
            }
        }
    }

    /// 用背景色擦除矩形
    pub fn erase_rect(&mut self, x: i64, y: i64, w: i64, h: i64) {
        self.fill_rect(x, y, w, h, self.background);
    }

    /// 描 1 像素宽的边框，四条边分别位于 `x`、`x1`、`y`、`y1`（含端点）
    pub fn stroke_rect(&mut self, x: i64, y: i64, x1: i64, y1: i64, color: Rgba<u8>) {
        let (left, right) = (x.min(x1), x.max(x1));
        let (top, bottom) = (y.min(y1), y.max(y1));
        let span_w = right.saturating_sub(left).saturating_add(1);
        let span_h = bottom.saturating_sub(top).saturating_add(1);
        self.fill_rect(left, top, span_w, 1, color);
        self.fill_rect(left, bottom, span_w, 1, color);
        self.fill_rect(left, top, 1, span_h, color);
        self.fill_rect(right, top, 1, span_h, color);
    }

    // 把半开区间 [lo, hi) 裁剪到画布内；为空时返回 None
    fn clip(&self, lo: i64, hi: i64) -> Option<(u32, u32)> {
        let size = i64::from(self.size_px());
        let lo = lo.clamp(0, size);
        let hi = hi.clamp(0, size);
        (lo < hi).then_some((lo as u32, hi as u32))
    }
}
