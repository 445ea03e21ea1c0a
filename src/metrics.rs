//! Glyph run measurement.

/// The bounding polygon of a rendered glyph run.
///
/// Holds four corners relative to the pen origin on the baseline,
/// in the order lower-left, lower-right, upper-right, upper-left.
/// Each corner is an `(x, y)` pair and y grows downward, so the upper
/// corners of a run with ascenders have negative y.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct GlyphBoundingBox(pub [i32; 8]);

impl GlyphBoundingBox {
    /// Creates an axis-aligned box from its edges.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self([left, bottom, right, bottom, right, top, left, top])
    }

    /// Width of the run.
    ///
    /// The corners may describe a rotated polygon, so the wider of the
    /// two horizontal edges is used.
    pub fn width(&self) -> u32 {
        let b = &self.0;
        (b[2] - b[0]).unsigned_abs().max((b[4] - b[6]).unsigned_abs())
    }

    /// Height of the run. See [`width`](Self::width).
    pub fn height(&self) -> u32 {
        let b = &self.0;
        (b[7] - b[1]).unsigned_abs().max((b[5] - b[3]).unsigned_abs())
    }

    /// X of the lower-left corner, i.e. the left bearing of the run.
    pub fn left(&self) -> i32 {
        self.0[0]
    }

    /// Y of the lower-left corner, i.e. how far the run descends
    /// below the baseline.
    pub fn bottom(&self) -> i32 {
        self.0[1]
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("invalid font size {0}")]
    InvalidSize(f32),
    #[error("failed to measure text: {0}")]
    Other(String),
}

/// Measures strings rendered in a single font.
pub trait GlyphMetricsProvider {
    /// Returns the bounding box of `text` rendered at `size` pixels.
    fn measure(&self, size: f32, text: &str) -> Result<GlyphBoundingBox, MetricsError>;
}

impl<T> GlyphMetricsProvider for &T
where
    T: GlyphMetricsProvider + ?Sized,
{
    fn measure(&self, size: f32, text: &str) -> Result<GlyphBoundingBox, MetricsError> {
        (**self).measure(size, text)
    }
}
