//! TerminalPanel: a hardware sink that shows the panel in a terminal.
//!
//! Bytes are decoded into a [`PanelRam`] exactly as the controller would; each
//! `sync` renders the RAM through [`PanelView`] and writes only the changed
//! runs of cells since the previous frame.

use std::io::{self, Write};

use anyhow::Result;
use log::debug;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::display::{HardwareSink, PanelRam};
use crate::fb::{CellStyle, Emphasis, FrameBuffer, Rgb};
use crate::panel_view::{PanelView, Viewport};
use crate::types::ByteKind;

pub struct TerminalPanel<W: Write = io::Stdout> {
    out: W,
    ram: PanelRam,
    view: PanelView,
    viewport: Viewport,
    status: String,
    frame: FrameBuffer,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl TerminalPanel<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalPanel<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalPanel<W> {
    pub fn with_writer(out: W) -> Self {
        let viewport = Viewport::default();
        Self {
            out,
            ram: PanelRam::new(),
            view: PanelView,
            viewport,
            status: String::new(),
            frame: FrameBuffer::new(viewport.width, viewport.height),
            last: None,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Track a terminal resize; the next frame is a full redraw.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            debug!("viewport {}x{}", viewport.width, viewport.height);
            self.viewport = viewport;
            self.invalidate();
        }
    }

    /// Text shown under the panel from the next frame on
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn ram(&self) -> &PanelRam {
        &self.ram
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Force the next frame to be a full redraw.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Render the RAM and write the difference to the previous frame.
    pub fn present(&mut self) -> Result<()> {
        self.view
            .render_into(&self.ram, &self.status, self.viewport, &mut self.frame);

        self.buf.clear();
        match self.last.take() {
            Some(mut prev) if same_size(&prev, &self.frame) => {
                encode_diff_into(&prev, &self.frame, &mut self.buf)?;
                std::mem::swap(&mut prev, &mut self.frame);
                self.last = Some(prev);
            }
            _ => {
                encode_full_into(&self.frame, &mut self.buf)?;
                self.last = Some(self.frame.clone());
            }
        }
        self.flush_buf()
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> HardwareSink for TerminalPanel<W> {
    fn send_byte(&mut self, value: u8, kind: ByteKind) -> Result<()> {
        self.ram.send_byte(value, kind)
    }

    fn set_reset_line(&mut self, high: bool) -> Result<()> {
        self.ram.set_reset_line(high)
    }

    fn sync(&mut self) -> Result<()> {
        self.ram.sync()?;
        self.present()
    }
}

/// Put the terminal back into cooked mode; for error and panic paths.
pub fn restore_terminal() {
    let mut out = io::stdout();
    let _ = out.queue(cursor::Show);
    let _ = out.queue(terminal::LeaveAlternateScreen);
    let _ = out.flush();
    let _ = terminal::disable_raw_mode();
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;

    let mut current_style: Option<CellStyle> = None;
    for y in 0..fb.height() {
        for x in 0..fb.width() {
            let cell = fb.get(x, y).unwrap_or_default();
            if current_style != Some(cell.style) {
                apply_style_into(out, cell.style)?;
                current_style = Some(cell.style);
            }
            out.queue(Print(cell.ch))?;
        }
        if y + 1 < fb.height() {
            out.queue(Print("\r\n"))?;
        }
    }

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Encode only the changed runs of `next` relative to `prev` (same size).
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut current_style: Option<CellStyle> = None;
    let mut runs = 0usize;

    for_each_changed_run(prev, next, |x, y, len| {
        runs += 1;
        out.queue(cursor::MoveTo(x, y))?;
        for dx in 0..len {
            let cell = next.get(x + dx, y).unwrap_or_default();
            if current_style != Some(cell.style) {
                apply_style_into(out, cell.style)?;
                current_style = Some(cell.style);
            }
            out.queue(Print(cell.ch))?;
        }
        Ok(())
    })?;

    if runs > 0 {
        out.queue(ResetColor)?;
        out.queue(SetAttribute(Attribute::Reset))?;
    }
    Ok(())
}

fn apply_style_into(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
    out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
    out.queue(SetAttribute(Attribute::Reset))?;
    match style.emphasis {
        Emphasis::Normal => {}
        Emphasis::Bold => {
            out.queue(SetAttribute(Attribute::Bold))?;
        }
        Emphasis::Dim => {
            out.queue(SetAttribute(Attribute::Dim))?;
        }
    }
    Ok(())
}

fn same_size(a: &FrameBuffer, b: &FrameBuffer) -> bool {
    a.width() == b.width() && a.height() == b.height()
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

fn for_each_changed_run(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    mut f: impl FnMut(u16, u16, u16) -> Result<()>,
) -> Result<()> {
    let (w, h) = (next.width(), next.height());
    for y in 0..h {
        let mut x = 0;
        while x < w {
            if prev.get(x, y) == next.get(x, y) {
                x += 1;
                continue;
            }
            let start = x;
            x += 1;
            while x < w && prev.get(x, y) != next.get(x, y) {
                x += 1;
            }
            f(start, y, x - start)?;
        }
    }
    Ok(())
}
