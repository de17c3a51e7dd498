//! Hardware sink: the byte-oriented command/data protocol of the panel controller.
//!
//! A transport only has to move single bytes (tagged command or data) and drive
//! the reset line. Addressing, power and init sequences are provided methods
//! that encode the controller's commands on top of `send_byte`.

use std::time::Duration;

use anyhow::Result;

use crate::types::{ByteKind, LCD_PAGES, LCD_WIDTH, RESET_PULSE_MS};

/// Visible column 0 sits at controller RAM column 2.
pub const COLUMN_OFFSET: u8 = 2;

/// Pages `set_address` can select (4-bit page field)
pub const MAX_PAGES: usize = 16;

/// Visible columns `set_address` can select once the offset is added
pub const MAX_COLUMNS: usize = 256 - COLUMN_OFFSET as usize;

/// `(page, column)` as `set_address` arguments, or `None` past the
/// controller's address range.
pub fn address(page: usize, column: usize) -> Option<(u8, u8)> {
    if page >= MAX_PAGES || column >= MAX_COLUMNS {
        return None;
    }
    Some((u8::try_from(page).ok()?, u8::try_from(column).ok()?))
}

pub const CMD_DISPLAY_OFF: u8 = 0xAE;
pub const CMD_DISPLAY_ON: u8 = 0xAF;
pub const CMD_CHARGE_PUMP: u8 = 0x8D;
pub const CHARGE_PUMP_ON: u8 = 0x14;
pub const CHARGE_PUMP_OFF: u8 = 0x10;
pub const CMD_PAGE_ADDR: u8 = 0xB0;
pub const CMD_COLUMN_LOW: u8 = 0x00;
pub const CMD_COLUMN_HIGH: u8 = 0x10;

/// Power-up register setup, in order. Pairs are command + argument.
#[rustfmt::skip]
pub const INIT_SEQUENCE: &[u8] = &[
    CMD_DISPLAY_OFF,
    0x02, // column low
    0x10, // column high
    0x40, // start line 0
    0x81, 0xA5, // contrast
    0xA1, // segment remap
    0xC8, // COM scan direction
    0xA6, // normal (not inverted)
    0xA8, 0x3F, // multiplex 1/64
    0xD3, 0x00, // display offset
    0xD5, 0x80, // clock divide
    0xD9, 0xF1, // pre-charge
    0xDA, 0x12, // COM pins
    0xDB, 0x40, // VCOMH deselect
    0x20, 0x02, // page addressing mode
    CMD_CHARGE_PUMP, CHARGE_PUMP_ON,
    0xA4, // resume from RAM
    0xA6,
    CMD_DISPLAY_ON,
];

/// Byte transport to a page-addressed display controller.
pub trait HardwareSink {
    /// Transfer one byte, tagged as command or data.
    fn send_byte(&mut self, value: u8, kind: ByteKind) -> Result<()>;

    /// Drive the reset line; `true` is the released (high) level.
    fn set_reset_line(&mut self, high: bool) -> Result<()>;

    fn delay_ms(&mut self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }

    /// Called at the end of a frame (flush or fast blit).
    fn sync(&mut self) -> Result<()> {
        Ok(())
    }

    fn command(&mut self, value: u8) -> Result<()> {
        self.send_byte(value, ByteKind::Command)
    }

    /// Select the page (8-row band) and visible column for the next data run.
    fn set_address(&mut self, page: u8, column: u8) -> Result<()> {
        let col = column.wrapping_add(COLUMN_OFFSET);
        self.command(CMD_PAGE_ADDR | (page & 0x0F))?;
        self.command(CMD_COLUMN_HIGH | (col >> 4))?;
        self.command(CMD_COLUMN_LOW | (col & 0x0F))
    }

    /// High, wait, low, wait, high.
    fn reset(&mut self) -> Result<()> {
        self.set_reset_line(true)?;
        self.delay_ms(RESET_PULSE_MS);
        self.set_reset_line(false)?;
        self.delay_ms(RESET_PULSE_MS);
        self.set_reset_line(true)
    }

    fn power_on(&mut self) -> Result<()> {
        self.command(CMD_CHARGE_PUMP)?;
        self.command(CHARGE_PUMP_ON)?;
        self.command(CMD_DISPLAY_ON)
    }

    fn power_off(&mut self) -> Result<()> {
        self.command(CMD_CHARGE_PUMP)?;
        self.command(CHARGE_PUMP_OFF)?;
        self.command(CMD_DISPLAY_OFF)
    }

    /// Zero the controller RAM directly, bypassing any software buffer.
    fn clear_hardware(&mut self) -> Result<()> {
        for page in 0..LCD_PAGES as u8 {
            self.set_address(page, 0)?;
            for _ in 0..LCD_WIDTH {
                self.send_byte(0, ByteKind::Data)?;
            }
        }
        Ok(())
    }

    /// Reset pulse, register setup, power on, blank RAM.
    fn initialize(&mut self) -> Result<()> {
        self.reset()?;
        for &cmd in INIT_SEQUENCE {
            self.command(cmd)?;
        }
        self.set_address(0, 0)?;
        self.power_on()?;
        self.clear_hardware()
    }
}

/// One recorded sink interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkOp {
    Byte(u8, ByteKind),
    ResetLine(bool),
    Delay(u64),
    Sync,
}

/// Sink that records every interaction instead of driving hardware.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    ops: Vec<SinkOp>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[SinkOp] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn data_bytes(&self) -> Vec<u8> {
        self.bytes_of(ByteKind::Data)
    }

    pub fn commands(&self) -> Vec<u8> {
        self.bytes_of(ByteKind::Command)
    }

    fn bytes_of(&self, wanted: ByteKind) -> Vec<u8> {
        self.ops
            .iter()
            .filter_map(|op| match *op {
                SinkOp::Byte(v, kind) if kind == wanted => Some(v),
                _ => None,
            })
            .collect()
    }

    /// Decode `(page, visible column)` pairs from page + column-high + column-low triples.
    pub fn addresses(&self) -> Vec<(u8, u8)> {
        let cmds = self.commands();
        let mut out = Vec::new();
        let mut i = 0;
        while i + 2 < cmds.len() {
            let (p, hi, lo) = (cmds[i], cmds[i + 1], cmds[i + 2]);
            if p & 0xF0 == CMD_PAGE_ADDR && hi & 0xF0 == CMD_COLUMN_HIGH && lo & 0xF0 == CMD_COLUMN_LOW
            {
                let raw = ((hi & 0x0F) << 4) | (lo & 0x0F);
                out.push((p & 0x0F, raw.wrapping_sub(COLUMN_OFFSET)));
                i += 3;
            } else {
                i += 1;
            }
        }
        out
    }
}

impl HardwareSink for RecordingSink {
    fn send_byte(&mut self, value: u8, kind: ByteKind) -> Result<()> {
        self.ops.push(SinkOp::Byte(value, kind));
        Ok(())
    }

    fn set_reset_line(&mut self, high: bool) -> Result<()> {
        self.ops.push(SinkOp::ResetLine(high));
        Ok(())
    }

    fn delay_ms(&mut self, ms: u64) {
        self.ops.push(SinkOp::Delay(ms));
    }

    fn sync(&mut self) -> Result<()> {
        self.ops.push(SinkOp::Sync);
        Ok(())
    }
}
