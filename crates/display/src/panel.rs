//! Controller RAM model.
//!
//! Decodes the command/data byte stream the way the page-addressed controller
//! does and keeps its display RAM. The terminal transport paints from it, and
//! tests use it to compare what different drawing paths leave on the glass.

use anyhow::Result;

use crate::sink::{
    HardwareSink, CHARGE_PUMP_ON, CMD_CHARGE_PUMP, CMD_DISPLAY_OFF, CMD_DISPLAY_ON, COLUMN_OFFSET,
};
use crate::types::{ByteKind, LCD_PAGES, LCD_WIDTH, PAGE_HEIGHT};

/// Controller RAM is wider than the glass; visible columns start at `COLUMN_OFFSET`.
pub const RAM_COLUMNS: usize = LCD_WIDTH + 2 * COLUMN_OFFSET as usize;

/// Commands that consume the next command byte as an argument.
const ONE_ARG_COMMANDS: [u8; 9] = [0x81, 0xA8, 0xD3, 0xD5, 0xD9, 0xDA, 0xDB, 0x20, CMD_CHARGE_PUMP];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRam {
    ram: Vec<u8>,
    page: usize,
    column: usize,
    display_on: bool,
    charge_pump: bool,
    pending_arg: Option<u8>,
    reset_line: bool,
    frames: u64,
}

impl PanelRam {
    pub fn new() -> Self {
        Self {
            ram: vec![0; RAM_COLUMNS * LCD_PAGES],
            page: 0,
            column: 0,
            display_on: false,
            charge_pump: false,
            pending_arg: None,
            reset_line: true,
            frames: 0,
        }
    }

    /// Panel is lit only with the display enabled and the charge pump running.
    pub fn is_lit(&self) -> bool {
        self.display_on && self.charge_pump
    }

    pub fn display_on(&self) -> bool {
        self.display_on
    }

    pub fn charge_pump(&self) -> bool {
        self.charge_pump
    }

    /// Number of completed frames (`sync` calls)
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Visible bytes of one page
    pub fn page(&self, page: usize) -> &[u8] {
        let start = page * RAM_COLUMNS + COLUMN_OFFSET as usize;
        &self.ram[start..start + LCD_WIDTH]
    }

    /// Visible RAM, page-major, same layout as a `Surface` buffer
    pub fn visible(&self) -> Vec<u8> {
        (0..LCD_PAGES).flat_map(|p| self.page(p).iter().copied()).collect()
    }

    /// Physical pixel as shown on the glass
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= LCD_WIDTH || y >= LCD_PAGES * PAGE_HEIGHT {
            return false;
        }
        self.page(y / PAGE_HEIGHT)[x] & (1 << (y % PAGE_HEIGHT)) != 0
    }

    fn apply_command(&mut self, cmd: u8) {
        if let Some(op) = self.pending_arg.take() {
            if op == CMD_CHARGE_PUMP {
                self.charge_pump = cmd == CHARGE_PUMP_ON;
            }
            return;
        }

        match cmd {
            CMD_DISPLAY_OFF => self.display_on = false,
            CMD_DISPLAY_ON => self.display_on = true,
            0xB0..=0xBF => self.page = (cmd & 0x0F) as usize,
            0x00..=0x0F => self.column = (self.column & 0xF0) | (cmd & 0x0F) as usize,
            0x10..=0x1F => self.column = (((cmd & 0x0F) as usize) << 4) | (self.column & 0x0F),
            c if ONE_ARG_COMMANDS.contains(&c) => self.pending_arg = Some(c),
            // Start line, remap, scan direction, inversion: no effect on RAM.
            _ => {}
        }
    }

    fn write_data(&mut self, value: u8) {
        // Writes past the last column are dropped; page mode does not wrap.
        if self.page < LCD_PAGES && self.column < RAM_COLUMNS {
            self.ram[self.page * RAM_COLUMNS + self.column] = value;
        }
        self.column += 1;
    }
}

impl Default for PanelRam {
    fn default() -> Self {
        Self::new()
    }
}

impl HardwareSink for PanelRam {
    fn send_byte(&mut self, value: u8, kind: ByteKind) -> Result<()> {
        match kind {
            ByteKind::Command => self.apply_command(value),
            ByteKind::Data => self.write_data(value),
        }
        Ok(())
    }

    fn set_reset_line(&mut self, high: bool) -> Result<()> {
        if self.reset_line && !high {
            self.display_on = false;
            self.charge_pump = false;
            self.pending_arg = None;
            self.page = 0;
            self.column = 0;
        }
        self.reset_line = high;
        Ok(())
    }

    fn delay_ms(&mut self, _ms: u64) {}

    fn sync(&mut self) -> Result<()> {
        self.frames += 1;
        Ok(())
    }
}
