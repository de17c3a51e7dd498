//! Page-organized monochrome framebuffer.
//!
//! Storage mirrors the controller's addressing: the panel is cut into pages of
//! 8 rows, and each byte holds one column of a page with bit 0 on top. The
//! buffer is page-major (`page * width + x`) so a flush streams it in order.

use anyhow::Result;
use log::debug;

use crate::sink::{address, HardwareSink, MAX_COLUMNS, MAX_PAGES};
use crate::types::{ByteKind, Color, Orientation, PAGE_HEIGHT};

/// The point primitive every drawing routine is built on.
///
/// Coordinates are logical (before mirroring) and signed so callers can
/// pass off-canvas values; those are clipped, never an error.
pub trait Canvas {
    /// `(width, height)` in pixels
    fn size(&self) -> (i32, i32);

    /// Set or clear one pixel. Out-of-range coordinates are ignored.
    fn point(&mut self, x: i32, y: i32, color: Color);

    /// Read one pixel; `None` when the coordinate is off the canvas.
    fn get_point(&self, x: i32, y: i32) -> Option<Color>;

    /// Logical coordinate of the last plotted point (clipped or not)
    fn last_position(&self) -> (i32, i32);
}

/// 1 bit per pixel framebuffer with mirroring and a remembered cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: usize,
    height: usize,
    pages: usize,
    buffer: Vec<u8>,
    mirror_x: bool,
    mirror_y: bool,
    last_x: i32,
    last_y: i32,
}

impl Surface {
    /// Create a cleared surface.
    ///
    /// A height that is not a multiple of 8 still allocates a whole last page;
    /// rows past `height` are never addressable.
    /// Pages or columns past the controller's address range can be drawn
    /// and read but are left out of `flush`.
    pub fn new(width: usize, height: usize) -> Self {
        let pages = height.div_ceil(PAGE_HEIGHT);
        if pages > MAX_PAGES || width > MAX_COLUMNS {
            debug!("surface {width}x{height} exceeds the addressable {MAX_COLUMNS} columns x {MAX_PAGES} pages");
        }
        Self {
            width,
            height,
            pages,
            buffer: vec![0; width * pages],
            mirror_x: false,
            mirror_y: false,
            last_x: 0,
            last_y: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// Affects every later coordinate-taking call; existing pixels stay put.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        let (mx, my) = orientation.mirrors();
        self.mirror_x = mx;
        self.mirror_y = my;
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_mirrors(self.mirror_x, self.mirror_y)
    }

    /// Apply the current mirroring to a coordinate, without bounds checks.
    ///
    /// Mirroring is an involution, so this also maps a physical coordinate
    /// back to the logical one that lands on it.
    pub fn mirror(&self, x: i32, y: i32) -> (i32, i32) {
        // Saturation only happens far off the canvas, where any value clips.
        let x = if self.mirror_x {
            (self.width as i32 - 1).saturating_sub(x)
        } else {
            x
        };
        let y = if self.mirror_y {
            (self.height as i32 - 1).saturating_sub(y)
        } else {
            y
        };
        (x, y)
    }

    /// Physical storage coordinate for a logical one, or `None` if off-canvas.
    pub fn physical(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let (px, py) = self.mirror(x, y);
        if px < 0 || py < 0 || px >= self.width as i32 || py >= self.height as i32 {
            return None;
        }
        Some((px as usize, py as usize))
    }

    #[inline(always)]
    fn locate(px: usize, py: usize, width: usize) -> (usize, u8) {
        ((py / PAGE_HEIGHT) * width + px, 1u8 << (py % PAGE_HEIGHT))
    }

    /// Set every pixel to one color.
    pub fn clear(&mut self, color: Color) {
        let fill = if color.is_on() { 0xFF } else { 0x00 };
        self.buffer.fill(fill);
    }

    /// Raw page-major bytes
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// The bytes of one page, one per column
    pub fn page(&self, page: usize) -> &[u8] {
        let start = page * self.width;
        &self.buffer[start..start + self.width]
    }

    /// Number of lit pixels (physical, so independent of orientation).
    pub fn lit_count(&self) -> usize {
        let mut n = 0;
        for py in 0..self.height {
            for px in 0..self.width {
                let (idx, mask) = Self::locate(px, py, self.width);
                if self.buffer[idx] & mask != 0 {
                    n += 1;
                }
            }
        }
        n
    }

    /// Push the whole buffer to the sink.
    ///
    /// One `set_address(page, 0)` per page followed by one data byte per column,
    /// then a `sync` so frame-oriented transports can present. Pages and
    /// columns past what `set_address` can encode are not sent.
    pub fn flush<S: HardwareSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        for page in 0..self.pages {
            let Some((page_addr, column)) = address(page, 0) else {
                break;
            };
            sink.set_address(page_addr, column)?;
            for &byte in self.page(page).iter().take(MAX_COLUMNS) {
                sink.send_byte(byte, ByteKind::Data)?;
            }
        }
        sink.sync()
    }
}

impl Canvas for Surface {
    fn size(&self) -> (i32, i32) {
        (self.width as i32, self.height as i32)
    }

    fn point(&mut self, x: i32, y: i32, color: Color) {
        // Cursor stays in caller space so line_to chains compose under mirroring.
        self.last_x = x;
        self.last_y = y;

        let Some((px, py)) = self.physical(x, y) else {
            return;
        };
        let (idx, mask) = Self::locate(px, py, self.width);
        if color.is_on() {
            self.buffer[idx] |= mask;
        } else {
            self.buffer[idx] &= !mask;
        }
    }

    fn get_point(&self, x: i32, y: i32) -> Option<Color> {
        let (px, py) = self.physical(x, y)?;
        let (idx, mask) = Self::locate(px, py, self.width);
        Some(Color::from(self.buffer[idx] & mask != 0))
    }

    fn last_position(&self) -> (i32, i32) {
        (self.last_x, self.last_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{RecordingSink, SinkOp};

    #[test]
    fn point_lands_in_page_byte() {
        let mut s = Surface::new(16, 16);
        s.point(3, 9, Color::On);
        // page 1, column 3, bit 1
        assert_eq!(s.page(1)[3], 0b0000_0010);
        assert_eq!(s.page(0).iter().filter(|b| **b != 0).count(), 0);
    }

    #[test]
    fn point_set_then_clear() {
        let mut s = Surface::new(8, 8);
        s.point(2, 2, Color::On);
        assert_eq!(s.get_point(2, 2), Some(Color::On));
        s.point(2, 2, Color::Off);
        assert_eq!(s.get_point(2, 2), Some(Color::Off));
    }

    #[test]
    fn mirror_x_stores_at_far_column() {
        let mut s = Surface::new(16, 8);
        s.set_orientation(Orientation::MirrorX);
        s.point(0, 0, Color::On);
        assert_eq!(s.page(0)[15], 0x01);
        assert_eq!(s.get_point(0, 0), Some(Color::On));

        s.set_orientation(Orientation::Normal);
        assert_eq!(s.get_point(15, 0), Some(Color::On));
        assert_eq!(s.get_point(0, 0), Some(Color::Off));
    }

    #[test]
    fn last_position_is_pre_mirror() {
        let mut s = Surface::new(16, 16);
        s.set_orientation(Orientation::MirrorBoth);
        s.point(3, 4, Color::On);
        assert_eq!(s.last_position(), (3, 4));

        // Off-canvas points still move the cursor.
        s.point(-5, 40, Color::On);
        assert_eq!(s.last_position(), (-5, 40));
    }

    #[test]
    fn odd_height_keeps_last_rows_addressable() {
        let mut s = Surface::new(4, 10);
        assert_eq!(s.page_count(), 2);
        s.point(0, 9, Color::On);
        assert_eq!(s.get_point(0, 9), Some(Color::On));
        assert_eq!(s.get_point(0, 10), None);
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut s = Surface::new(8, 16);
        s.clear(Color::On);
        assert_eq!(s.lit_count(), 8 * 16);
        s.clear(Color::Off);
        assert_eq!(s.lit_count(), 0);
    }

    #[test]
    fn flush_addresses_each_page_then_streams_columns() {
        let mut s = Surface::new(4, 16);
        s.point(1, 0, Color::On);
        s.point(2, 15, Color::On);

        let mut sink = RecordingSink::new();
        s.flush(&mut sink).unwrap();

        assert_eq!(sink.data_bytes(), vec![0, 1, 0, 0, 0, 0, 0x80, 0]);
        assert_eq!(sink.addresses(), vec![(0, 0), (1, 0)]);
        assert_eq!(sink.ops().last(), Some(&SinkOp::Sync));
    }

    #[test]
    fn flush_stops_at_controller_address_range() {
        let mut s = Surface::new(300, 160);
        s.point(299, 159, Color::On);
        s.point(253, 127, Color::On);

        let mut sink = RecordingSink::new();
        s.flush(&mut sink).unwrap();

        let pages: Vec<u8> = sink.addresses().iter().map(|&(p, _)| p).collect();
        assert_eq!(pages, (0..MAX_PAGES as u8).collect::<Vec<_>>());
        assert!(sink.addresses().iter().all(|&(_, col)| col == 0));
        let data = sink.data_bytes();
        assert_eq!(data.len(), MAX_PAGES * MAX_COLUMNS);
        assert_eq!(data[15 * MAX_COLUMNS + 253], 0x80);
        assert_eq!(data.iter().filter(|&&b| b != 0).count(), 1);
    }

    #[test]
    fn mirror_saturates_far_off_canvas() {
        let mut s = Surface::new(16, 16);
        s.set_orientation(Orientation::MirrorBoth);
        assert_eq!(s.mirror(i32::MIN, i32::MIN), (i32::MAX, i32::MAX));
        s.point(i32::MIN, 0, Color::On);
        s.point(0, i32::MIN, Color::On);
        assert_eq!(s.get_point(i32::MIN, 0), None);
        assert!(s.buffer().iter().all(|&b| b == 0));
    }
}
