//! Draws multi-line text onto transparent images. Supports
//! wrapping lines by pixel width or character count, minimum
//! line heights with vertically centered glyphs, and pixel outlines.
//!
//! ```no_run
//! use textdraw::{Color, DrawOptions, Font, TextDrawer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let font = Font::from_data(std::fs::read("PingFang.ttf")?)?;
//! let options = DrawOptions::default()
//!     .font_size(16.)
//!     .font_color(Color::rgb(59, 89, 152))
//!     .line_width(400)
//!     .line_height(30);
//! let image = TextDrawer::new(font, options).draw("Hello\nworld")?.into_image();
//! # Ok(())
//! # }
//! ```

mod canvas;
mod color;
pub mod compositor;
mod drawer;
mod font;
pub mod layout;
pub mod metrics;
pub mod outline;

pub use canvas::{Canvas, CanvasError, PixelCanvas, MAX_CANVAS_PIXELS};
pub use color::{Color, ColorParseError, ErrorLevel};
pub use compositor::Rasterizer;
pub use drawer::{DrawOptions, Error, TextDrawer, DEFAULT_OUTLINE_COLOR};
pub use font::{Font, MalformedFont};
pub use layout::{LayoutConstraints, LayoutPlan, LineSegment};
pub use metrics::{GlyphBoundingBox, GlyphMetricsProvider, MetricsError};
