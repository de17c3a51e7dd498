//! Display module - software framebuffer and 2D drawing engine
//!
//! This crate owns everything between "plot a dot" and "bytes on the wire":
//!
//! - [`surface`]: the page-organized 1-bit [`Surface`] with coordinate mirroring
//! - [`raster`]: lines, rectangles, circles, ellipses, text and bitmaps, all built on
//!   the [`Canvas`] point primitive
//! - [`bitmap`]: page-packed source images and the direct-to-hardware fast blit
//! - [`sink`]: the [`HardwareSink`] byte protocol plus a recording double
//! - [`panel`]: a controller RAM model that decodes the byte protocol
//! - [`font`]: glyph tables and the built-in 8x8 font
//!
//! Nothing in here raises errors for coordinates: off-canvas drawing is clipped,
//! off-canvas queries return `None`. Only transport calls return `Result`.
//!
//! # Example
//!
//! ```
//! use lcd_snake_display::{Canvas, Font8x8, Rasterizer, Surface};
//! use lcd_snake_types::Color;
//!
//! let mut surface = Surface::new(128, 64);
//! surface.line(0, 0, 10, 0, Color::On);
//! surface.circle(64, 32, 10, Color::On, false);
//! surface.puts(&Font8x8, 0, 56, "SCORE", Color::Off, Color::On);
//!
//! assert_eq!(surface.get_point(10, 0), Some(Color::On));
//! assert_eq!(surface.get_point(200, 0), None);
//! ```

pub mod bitmap;
pub mod font;
pub mod panel;
pub mod raster;
pub mod sink;
pub mod surface;

pub use lcd_snake_types as types;

pub use bitmap::{blit_direct, Bitmap};
pub use font::{Font8x8, GlyphTable};
pub use panel::PanelRam;
pub use raster::Rasterizer;
pub use sink::{HardwareSink, RecordingSink, SinkOp};
pub use surface::{Canvas, Surface};
