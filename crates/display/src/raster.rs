//! Rasterizer: shapes, text and bitmaps on top of the point primitive.
//!
//! Everything here goes through [`Canvas::point`], so mirroring and clipping
//! apply uniformly and no routine touches storage. The circle and ellipse
//! recurrences are kept exactly as the classic algorithms define them; changing
//! an update order moves boundary pixels. Lines use the closed form of the
//! Bresenham error walk, which picks the same pixels.
//!
//! Arithmetic is widened past `i32`, so any `i32` coordinate clips instead of
//! overflowing.

use crate::bitmap::Bitmap;
use crate::font::GlyphTable;
use crate::surface::Canvas;
use crate::types::Color;

/// Drawing operations, available on every [`Canvas`].
pub trait Rasterizer: Canvas {
    /// Bresenham line, both end points included.
    ///
    /// Each step along the major axis is located directly from the error
    /// recurrence's closed form, so only steps that land on the canvas are
    /// walked. The end point is plotted last and becomes the cursor.
    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let (w, h) = self.size();
        let dx = (i64::from(x1) - i64::from(x0)).abs();
        let dy = (i64::from(y1) - i64::from(y0)).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };

        let x_major = dx >= dy;
        let (major0, major_step, d_major, limit) = if x_major {
            (i64::from(x0), sx, dx, w)
        } else {
            (i64::from(y0), sy, dy, h)
        };
        let (minor0, minor_step, d_minor) = if x_major {
            (i64::from(y0), sy, dy)
        } else {
            (i64::from(x0), sx, dx)
        };

        if let Some((first, last)) = visible_steps(major0, major_step, d_major, limit) {
            for k in first..=last {
                let major = major0 + major_step * k;
                let minor = minor0 + minor_step * minor_offset(k, d_major, d_minor);
                let (x, y) = if x_major { (major, minor) } else { (minor, major) };
                // Both lie between the i32 end points.
                self.point(x as i32, y as i32, color);
            }
        }
        self.point(x1, y1, color);
    }

    /// Line from the last plotted position.
    fn line_to(&mut self, x: i32, y: i32, color: Color) {
        let (lx, ly) = self.last_position();
        self.line(lx, ly, x, y, color);
    }

    /// Outline traces the four sides as one closed loop; filled draws one
    /// vertical line per column, left to right.
    fn rectangle(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color, filled: bool) {
        if filled {
            if x1 == x2 {
                self.line(x1, y1, x2, y2, color);
                return;
            }
            let (w, _) = self.size();
            let (left, right) = (x1.min(x2), x1.max(x2));
            for x in left.max(0)..=right.min(w - 1) {
                self.line(x, y1, x, y2, color);
            }
            // Off-canvas columns only move the cursor.
            self.point(right, y2, color);
        } else {
            self.line(x1, y1, x2, y1, color);
            self.line_to(x2, y2, color);
            self.line_to(x1, y2, color);
            self.line_to(x1, y1, color);
        }
    }

    /// Midpoint circle.
    ///
    /// A circle whose bounding box misses the canvas draws nothing.
    fn circle(&mut self, cx: i32, cy: i32, r: i32, color: Color, filled: bool) {
        let (cx, cy, r) = (i64::from(cx), i64::from(cy), i64::from(r));
        if !box_meets_canvas(self, cx, cy, r.abs(), r.abs()) {
            return;
        }

        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let mut f = 1 - r;
        let mut x1 = 0;
        let mut y1 = r;

        if filled {
            span(self, (cx, cy + r), (cx, cy - r), color);
            span(self, (cx + r, cy), (cx - r, cy), color);
        } else {
            plot(self, cx, cy + r, color);
            plot(self, cx, cy - r, color);
            plot(self, cx + r, cy, color);
            plot(self, cx - r, cy, color);
        }

        while x1 < y1 {
            if f >= 0 {
                y1 -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x1 += 1;
            ddf_x += 2;
            f += ddf_x;

            if filled {
                span(self, (cx + x1, cy + y1), (cx - x1, cy + y1), color);
                span(self, (cx + x1, cy - y1), (cx - x1, cy - y1), color);
                span(self, (cx + y1, cy + x1), (cx - y1, cy + x1), color);
                span(self, (cx + y1, cy - x1), (cx - y1, cy - x1), color);
            } else {
                plot(self, cx + x1, cy + y1, color);
                plot(self, cx - x1, cy + y1, color);
                plot(self, cx + x1, cy - y1, color);
                plot(self, cx - x1, cy - y1, color);
                plot(self, cx + y1, cy + x1, color);
                plot(self, cx - y1, cy + x1, color);
                plot(self, cx + y1, cy - x1, color);
                plot(self, cx - y1, cy - x1, color);
            }
        }
    }

    /// Two-region fast ellipse (Kennedy).
    ///
    /// Region 1 starts at the x-axis vertex and steps y until the slope passes 1;
    /// region 2 starts at the y-axis vertex and steps x. Radii are taken by
    /// magnitude; a zero-size ellipse is a single point. An ellipse whose
    /// bounding box misses the canvas draws nothing.
    fn ellipse(&mut self, cx: i32, cy: i32, x_radius: i32, y_radius: i32, color: Color, filled: bool) {
        let (cx, cy) = (i64::from(cx), i64::from(cy));
        let a = i64::from(x_radius).abs();
        let b = i64::from(y_radius).abs();
        if !box_meets_canvas(self, cx, cy, a, b) {
            return;
        }
        if a == 0 && b == 0 {
            plot(self, cx, cy, color);
            return;
        }

        // Squared radii of a full i32 range exceed i64.
        let (a, b) = (i128::from(a), i128::from(b));
        let two_a_sq = 2 * a * a;
        let two_b_sq = 2 * b * b;

        let mut x = a;
        let mut y = 0i128;
        let mut x_change = b * b * (1 - 2 * a);
        let mut y_change = a * a;
        let mut error = 0i128;
        let mut stopping_x = two_b_sq * a;
        let mut stopping_y = 0i128;

        while stopping_x >= stopping_y {
            plot4(self, cx, cy, x as i64, y as i64, color, filled);
            y += 1;
            stopping_y += two_a_sq;
            error += y_change;
            y_change += two_a_sq;
            if 2 * error + x_change > 0 {
                x -= 1;
                stopping_x -= two_b_sq;
                error += x_change;
                x_change += two_b_sq;
            }
        }

        x = 0;
        y = b;
        x_change = b * b;
        y_change = a * a * (1 - 2 * b);
        error = 0;
        stopping_x = 0;
        stopping_y = two_a_sq * b;

        while stopping_x <= stopping_y {
            plot4(self, cx, cy, x as i64, y as i64, color, filled);
            x += 1;
            stopping_x += two_b_sq;
            error += x_change;
            x_change += two_b_sq;
            if 2 * error + y_change > 0 {
                y -= 1;
                stopping_y -= two_a_sq;
                error += y_change;
                y_change += two_a_sq;
            }
        }
    }

    /// One glyph cell, top-left at `(x, y)`.
    ///
    /// A cell that would not fit entirely on the canvas is skipped, not clipped.
    fn put_char<G: GlyphTable + ?Sized>(
        &mut self,
        font: &G,
        x: i32,
        y: i32,
        code: u8,
        bg: Color,
        fg: Color,
    ) {
        let (w, h) = self.size();
        let fw = font.width() as i32;
        let fh = font.height() as i32;
        if x < 0 || x > w - fw || y < 0 || y > h - fh {
            return;
        }

        for (row, &bits) in font.glyph(code).iter().enumerate().take(fh as usize) {
            let py = y + row as i32;
            for col in 0..fw.min(8) {
                let on = bits & (0x80 >> col) != 0;
                self.point(x + col, py, if on { fg } else { bg });
            }
        }
    }

    /// Left-to-right text. `\r` returns to the starting column, `\n` moves down
    /// one text line, and a glyph that would run past the right edge wraps to
    /// column 0 of the next line.
    fn puts<G: GlyphTable + ?Sized>(
        &mut self,
        font: &G,
        x: i32,
        y: i32,
        text: &str,
        bg: Color,
        fg: Color,
    ) {
        let (w, _) = self.size();
        let fw = font.width() as i32;
        let fh = font.height() as i32;
        let (mut mx, mut my) = (x, y);

        for ch in text.chars() {
            match ch {
                '\r' => {
                    mx = x;
                    continue;
                }
                '\n' => {
                    my = my.saturating_add(fh);
                    continue;
                }
                _ => {}
            }

            let code = if ch.is_ascii() { ch as u8 } else { b'?' };
            self.put_char(font, mx, my, code, bg, fg);

            mx = mx.saturating_add(fw);
            if mx > w - fw {
                mx = 0;
                my = my.saturating_add(fh);
            }
        }
    }

    /// Signed decimal number as text.
    fn put_num<G: GlyphTable + ?Sized>(
        &mut self,
        font: &G,
        x: i32,
        y: i32,
        num: i64,
        bg: Color,
        fg: Color,
    ) {
        self.puts(font, x, y, &num.to_string(), bg, fg);
    }

    /// Copy a page-packed bitmap with its top-left at `(x0, y0)`.
    ///
    /// `Color::On` copies set bits as lit pixels, `Color::Off` inverts.
    /// Every source pixel is written, lit or dark.
    fn put_bitmap(&mut self, x0: i32, y0: i32, bitmap: &Bitmap<'_>, color: Color) {
        for by in 0..bitmap.height() {
            for bx in 0..bitmap.width() {
                let src = Color::from(bitmap.pixel(bx, by));
                let px = if color.is_on() { src } else { src.invert() };
                let (x, y) = (i64::from(x0) + bx as i64, i64::from(y0) + by as i64);
                plot(self, x, y, px);
            }
        }
    }
}

impl<T: Canvas + ?Sized> Rasterizer for T {}

fn plot4<C: Canvas + ?Sized>(c: &mut C, cx: i64, cy: i64, x: i64, y: i64, color: Color, filled: bool) {
    if filled {
        span(c, (cx + x, cy + y), (cx - x, cy + y), color);
        span(c, (cx - x, cy - y), (cx + x, cy - y), color);
    } else {
        plot(c, cx + x, cy + y, color);
        plot(c, cx - x, cy + y, color);
        plot(c, cx - x, cy - y, color);
        plot(c, cx + x, cy - y, color);
    }
}

/// Point at a wide coordinate; anything outside `i32` is off-canvas.
fn plot<C: Canvas + ?Sized>(c: &mut C, x: i64, y: i64, color: Color) {
    if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
        c.point(x, y, color);
    }
}

/// Horizontal or vertical line at wide coordinates.
///
/// Clamping along an axis-aligned line keeps every on-canvas pixel.
fn span<C: Canvas + ?Sized>(c: &mut C, (x0, y0): (i64, i64), (x1, y1): (i64, i64), color: Color) {
    debug_assert!(x0 == x1 || y0 == y1);
    let clamp = |v: i64| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
    c.line(clamp(x0), clamp(y0), clamp(x1), clamp(y1), color);
}

/// Whether the box `cx ± rx, cy ± ry` overlaps the canvas.
fn box_meets_canvas<C: Canvas + ?Sized>(c: &C, cx: i64, cy: i64, rx: i64, ry: i64) -> bool {
    let (w, h) = c.size();
    cx + rx >= 0 && cy + ry >= 0 && cx - rx < i64::from(w) && cy - ry < i64::from(h)
}

/// Range of major-axis steps `k` in `0..=d` whose coordinate `m0 + step * k`
/// falls inside `0..limit`.
fn visible_steps(m0: i64, step: i64, d: i64, limit: i32) -> Option<(i64, i64)> {
    let last_col = i64::from(limit) - 1;
    let (lo, hi) = if step > 0 {
        ((-m0).max(0), d.min(last_col - m0))
    } else {
        ((m0 - last_col).max(0), d.min(m0))
    };
    (lo <= hi).then_some((lo, hi))
}

/// Minor-axis offset after `k` major steps of the Bresenham error walk.
///
/// The minor coordinate advances on step `j` exactly when
/// `(2m + 1) * d_major < 2 * d_minor * (j + 1)`, where `m` counts earlier
/// advances, which totals `floor((2 * d_minor * k + d_major - 1) / (2 * d_major))`.
fn minor_offset(k: i64, d_major: i64, d_minor: i64) -> i64 {
    if d_major == 0 {
        return 0;
    }
    let (k, d_major, d_minor) = (i128::from(k), i128::from(d_major), i128::from(d_minor));
    ((2 * d_minor * k + d_major - 1) / (2 * d_major)) as i64
}
