//! 图块编号
//!
//! 用内置的 3x5 点阵数字在合成帧的每个图块左上角写出它的发现序号，
//! 序号与 `Session::entities()` 的下标一一对应。

use image::{Rgba, RgbaImage};

const GLYPH_W: u32 = 3;
const GLYPH_H: u32 = 5;

// 每行低 3 位，最高位在左
const DIGITS: [[u8; GLYPH_H as usize]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// 点阵像素的放大倍数：每 100 像素画布放大一倍
pub fn label_scale(cell_px: u32) -> u32 {
    (cell_px / 100).max(1)
}

/// 在 `(x, y)` 处的 `cell_px` 图块内写出 `index`；超出图块的数字不画
pub fn draw_index_label(frame: &mut RgbaImage, x: u32, y: u32, cell_px: u32, index: usize, color: Rgba<u8>) {
    let k = label_scale(cell_px);
    let margin = 2 * k;
    let advance = (GLYPH_W + 1) * k;
    if margin + GLYPH_H * k > cell_px {
        return;
    }

    let text = index.to_string();
    for (i, ch) in text.bytes().enumerate() {
        let Some(glyph) = DIGITS.get(usize::from(ch.wrapping_sub(b'0'))) else {
            continue;
        };
        let gx = margin + u32::try_from(i).unwrap_or(u32::MAX).saturating_mul(advance);
        if gx.saturating_add(GLYPH_W * k) > cell_px {
            break;
        }
        for (row, bits) in (0u32..).zip(glyph.iter()) {
            for col in 0..GLYPH_W {
                if bits & (0b100 >> col) == 0 {
                    continue;
                }
                let px = x.saturating_add(gx + col * k);
                let py = y.saturating_add(margin + row * k);
                for dy in 0..k {
                    for dx in 0..k {
                        if let Some(p) = frame.get_pixel_mut_checked(px.saturating_add(dx), py.saturating_add(dy)) {
                            *p = color;
                        }
                    }
                }
            }
        }
    }
}
