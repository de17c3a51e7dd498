//! PanelView: maps controller RAM into a terminal framebuffer.
//!
//! Each terminal cell shows one column and two pixel rows using half blocks,
//! so the 128x64 glass takes 128x32 cells inside a one-cell border. A status
//! line sits under the frame. Pure, no I/O.

use crate::display::PanelRam;
use crate::fb::{CellStyle, Emphasis, FrameBuffer, Rgb, PLAIN};
use crate::types::{LCD_HEIGHT, LCD_WIDTH};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        let (w, h) = PanelView::frame_size();
        Self::new(w, h + 1)
    }
}

const GLASS: Rgb = Rgb::new(8, 12, 24);
const LIT: Rgb = Rgb::new(130, 200, 255);

#[derive(Debug, Clone, Copy, Default)]
pub struct PanelView;

impl PanelView {
    /// Frame size in cells, border included
    pub const fn frame_size() -> (u16, u16) {
        (LCD_WIDTH as u16 + 2, (LCD_HEIGHT as u16).div_ceil(2) + 2)
    }

    /// Top-left corner of the frame: centred horizontally, top aligned.
    pub fn origin(viewport: Viewport) -> (u16, u16) {
        let (w, _) = Self::frame_size();
        (viewport.width.saturating_sub(w) / 2, 0)
    }

    pub fn render_into(&self, panel: &PanelRam, status: &str, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(PLAIN.cell(' '));

        let (frame_w, frame_h) = Self::frame_size();
        let (start_x, start_y) = Self::origin(viewport);
        let border = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        let glass = CellStyle::new(LIT, GLASS);
        let lit = panel.is_lit();
        for row in 0..(frame_h - 2) {
            for col in 0..(frame_w - 2) {
                let (x, y) = (col as usize, row as usize * 2);
                let ch = if lit {
                    half_block(panel.pixel(x, y), panel.pixel(x, y + 1))
                } else {
                    ' '
                };
                fb.put_char(start_x + 1 + col, start_y + 1 + row, ch, glass);
            }
        }

        if !lit {
            let text = "DISPLAY OFF";
            let x = start_x + frame_w.saturating_sub(text.len() as u16) / 2;
            let style = CellStyle::new(Rgb::new(140, 140, 140), GLASS).with(Emphasis::Dim);
            fb.put_str(x, start_y + frame_h / 2, text, style);
        }

        fb.put_str(start_x, start_y + frame_h, status, PLAIN.with(Emphasis::Bold));
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, panel: &PanelRam, status: &str, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(panel, status, viewport, &mut fb);
        fb
    }
}

fn half_block(top: bool, bottom: bool) -> char {
    match (top, bottom) {
        (false, false) => ' ',
        (true, false) => '▀',
        (false, true) => '▄',
        (true, true) => '█',
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }
    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);
    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}
