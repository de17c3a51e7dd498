//! Page-packed bitmaps and the direct-to-hardware blit.
//!
//! Source images use the controller's own packing: byte `(y / 8) * width + x`
//! holds column `x` of row band `y / 8`, bit `y % 8` set for a lit pixel.

use anyhow::Result;
use log::debug;

use crate::sink::{address, HardwareSink, MAX_COLUMNS, MAX_PAGES};
use crate::surface::Surface;
use crate::types::{ByteKind, Color, PAGE_HEIGHT};

/// Borrowed 1-bit image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitmap<'a> {
    width: usize,
    height: usize,
    data: &'a [u8],
}

impl<'a> Bitmap<'a> {
    /// Wrap packed bytes; `None` unless `data` holds exactly one byte per
    /// column for every (possibly partial) row band.
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Option<Self> {
        if data.len() != width * height.div_ceil(PAGE_HEIGHT) {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Source pixel; out-of-range reads are dark.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.data[(y / PAGE_HEIGHT) * self.width + x] & (1 << (y % PAGE_HEIGHT)) != 0
    }
}

/// Stream a bitmap straight to the sink, leaving `surface` untouched.
///
/// The surface supplies the orientation and the current contents of every
/// byte the image only partly covers, so when the sink already shows the
/// surface the result is pixel-identical to `put_bitmap` followed by a flush.
/// Only the pages and columns the image touches are sent, then one `sync`.
pub fn blit_direct<S: HardwareSink + ?Sized>(
    surface: &Surface,
    sink: &mut S,
    x0: i32,
    y0: i32,
    bitmap: &Bitmap<'_>,
    color: Color,
) -> Result<()> {
    let (w, h) = (bitmap.width() as i32, bitmap.height() as i32);
    if w == 0 || h == 0 {
        return Ok(());
    }

    let (ax, ay) = surface.mirror(x0, y0);
    let (bx, by) = surface.mirror(x0.saturating_add(w - 1), y0.saturating_add(h - 1));
    let max_x = surface.width().min(MAX_COLUMNS) as i32 - 1;
    let max_y = surface.height().min(MAX_PAGES * PAGE_HEIGHT) as i32 - 1;
    let left = ax.min(bx).max(0);
    let right = ax.max(bx).min(max_x);
    let top = ay.min(by).max(0);
    let bottom = ay.max(by).min(max_y);
    if left > right || top > bottom {
        debug!("blit_direct: {w}x{h} at ({x0}, {y0}) is off-canvas");
        return Ok(());
    }

    let page_h = PAGE_HEIGHT as i32;
    for page in (top / page_h)..=(bottom / page_h) {
        let Some((page_addr, column)) = address(page as usize, left as usize) else {
            break;
        };
        sink.set_address(page_addr, column)?;
        let current = surface.page(page as usize);
        for px in left..=right {
            let mut byte = current[px as usize];
            for bit in 0..page_h {
                let py = page * page_h + bit;
                if py < top || py > bottom {
                    continue;
                }
                let (lx, ly) = surface.mirror(px, py);
                let src = bitmap.pixel((lx - x0) as usize, (ly - y0) as usize);
                if src == color.is_on() {
                    byte |= 1 << bit;
                } else {
                    byte &= !(1 << bit);
                }
            }
            sink.send_byte(byte, ByteKind::Data)?;
        }
    }
    sink.sync()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::PanelRam;
    use crate::raster::Rasterizer;
    use crate::sink::{RecordingSink, SinkOp};
    use crate::surface::Canvas;
    use crate::types::{Orientation, LCD_HEIGHT, LCD_WIDTH};

    // 12x10 arrow-ish pattern, two row bands.
    const ARROW: [u8; 24] = [
        0x10, 0x38, 0x7C, 0xFE, 0x38, 0x38, 0x38, 0x38, 0x38, 0x38, 0x38, 0x01, //
        0x00, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03, 0x02, 0x01, 0x00, 0x00, 0x02,
    ];

    fn backdrop(orientation: Orientation) -> Surface {
        let mut s = Surface::new(LCD_WIDTH, LCD_HEIGHT);
        s.set_orientation(orientation);
        s.rectangle(2, 2, 60, 40, Color::On, false);
        s.line(0, 63, 127, 0, Color::On);
        s
    }

    fn slow_path(surface: &Surface, x: i32, y: i32, bmp: &Bitmap<'_>, color: Color) -> Vec<u8> {
        let mut drawn = surface.clone();
        drawn.put_bitmap(x, y, bmp, color);
        let mut panel = PanelRam::new();
        drawn.flush(&mut panel).unwrap();
        panel.visible()
    }

    fn fast_path(surface: &Surface, x: i32, y: i32, bmp: &Bitmap<'_>, color: Color) -> Vec<u8> {
        let mut panel = PanelRam::new();
        surface.flush(&mut panel).unwrap();
        blit_direct(surface, &mut panel, x, y, bmp, color).unwrap();
        panel.visible()
    }

    #[test]
    fn new_checks_packed_length() {
        assert!(Bitmap::new(12, 10, &ARROW).is_some());
        assert!(Bitmap::new(12, 8, &ARROW).is_none());
        assert!(Bitmap::new(0, 0, &[]).is_some());
    }

    #[test]
    fn pixel_reads_bit_in_band() {
        let bmp = Bitmap::new(12, 10, &ARROW).unwrap();
        assert!(bmp.pixel(0, 4));
        assert!(!bmp.pixel(0, 3));
        assert!(bmp.pixel(11, 0));
        assert!(bmp.pixel(4, 8));
        assert!(!bmp.pixel(12, 0));
    }

    #[test]
    fn put_bitmap_inverted_darkens_set_bits() {
        let data = [0x01, 0x00];
        let bmp = Bitmap::new(2, 1, &data).unwrap();
        let mut s = Surface::new(8, 8);
        s.put_bitmap(3, 3, &bmp, Color::Off);
        assert_eq!(s.get_point(3, 3), Some(Color::Off));
        assert_eq!(s.get_point(4, 3), Some(Color::On));
    }

    #[test]
    fn fast_path_matches_slow_path_in_every_orientation() {
        let bmp = Bitmap::new(12, 10, &ARROW).unwrap();
        let placements = [(0, 0), (17, 5), (120, 58), (-4, -3), (64, 24)];
        for orientation in [
            Orientation::Normal,
            Orientation::MirrorX,
            Orientation::MirrorY,
            Orientation::MirrorBoth,
        ] {
            let surface = backdrop(orientation);
            for &(x, y) in &placements {
                for color in [Color::On, Color::Off] {
                    assert_eq!(
                        slow_path(&surface, x, y, &bmp, color),
                        fast_path(&surface, x, y, &bmp, color),
                        "{orientation:?} at ({x}, {y}) {color:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn fast_path_sends_only_touched_pages() {
        let data = [0xFF; 4];
        let bmp = Bitmap::new(4, 8, &data).unwrap();
        let surface = Surface::new(LCD_WIDTH, LCD_HEIGHT);
        let mut sink = RecordingSink::new();
        blit_direct(&surface, &mut sink, 10, 16, &bmp, Color::On).unwrap();
        assert_eq!(sink.addresses(), vec![(2, 10)]);
        assert_eq!(sink.data_bytes(), vec![0xFF; 4]);
        assert_eq!(sink.ops().last(), Some(&SinkOp::Sync));
    }

    #[test]
    fn fast_path_skips_unaddressable_columns() {
        let data = [0xFF; 8];
        let bmp = Bitmap::new(8, 8, &data).unwrap();
        let surface = Surface::new(300, 8);
        let mut sink = RecordingSink::new();

        blit_direct(&surface, &mut sink, 280, 0, &bmp, Color::On).unwrap();
        assert!(sink.ops().is_empty());

        blit_direct(&surface, &mut sink, 250, 0, &bmp, Color::On).unwrap();
        assert_eq!(sink.addresses(), vec![(0, 250)]);
        assert_eq!(sink.data_bytes(), vec![0xFF; 4]);
    }

    #[test]
    fn fast_path_survives_extreme_origins() {
        let data = [0xFF; 4];
        let bmp = Bitmap::new(4, 8, &data).unwrap();
        let mut surface = Surface::new(LCD_WIDTH, LCD_HEIGHT);
        surface.set_orientation(Orientation::MirrorBoth);
        let mut sink = RecordingSink::new();
        for (x, y) in [(i32::MAX, 0), (i32::MIN, 0), (0, i32::MAX), (i32::MIN, i32::MIN)] {
            blit_direct(&surface, &mut sink, x, y, &bmp, Color::On).unwrap();
        }
        assert!(sink.ops().is_empty());
    }

    #[test]
    fn fast_path_off_canvas_sends_nothing() {
        let data = [0xFF; 4];
        let bmp = Bitmap::new(4, 8, &data).unwrap();
        let surface = Surface::new(LCD_WIDTH, LCD_HEIGHT);
        let mut sink = RecordingSink::new();
        blit_direct(&surface, &mut sink, 200, 0, &bmp, Color::On).unwrap();
        assert!(sink.ops().is_empty());
    }
}
