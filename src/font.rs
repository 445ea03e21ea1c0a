//! Font measurement and rasterization.
//!
//! Glyph metrics and coverage bitmaps come from `fontdue`. Glyphs are
//! placed left to right by their advance widths; no shaping or kerning
//! is applied.

use fontdue::{FontSettings, Metrics};
use glam::IVec2;

use crate::{
    canvas::PixelCanvas,
    compositor::Rasterizer,
    metrics::{GlyphBoundingBox, GlyphMetricsProvider, MetricsError},
    Color,
};

/// Coverage at or above which a pixel belongs to a glyph.
///
/// Glyphs are painted without blending, so partially covered
/// pixels are either fully painted or skipped.
const COVERAGE_THRESHOLD: u8 = 128;

#[derive(Debug, thiserror::Error)]
#[error("failed to parse font as TTF/OTF font data: {0}")]
pub struct MalformedFont(&'static str);

/// A font that can measure and draw text.
pub struct Font {
    font: fontdue::Font,
}

impl Font {
    pub fn from_data(data: Vec<u8>) -> Result<Self, MalformedFont> {
        let len = data.len();
        let font = fontdue::Font::from_bytes(data, FontSettings::default()).map_err(MalformedFont)?;
        log::info!("Loaded font ({} bytes)", len);
        Ok(Self { font })
    }

    fn place_glyphs(&self, size: f32, text: &str) -> Result<Vec<PlacedGlyph>, MetricsError> {
        if !size.is_finite() || size <= 0. {
            return Err(MetricsError::InvalidSize(size));
        }
        Ok(place_glyphs(
            text.chars().map(|c| (c, GlyphMetrics::from(self.font.metrics(c, size)))),
        ))
    }
}

impl GlyphMetricsProvider for Font {
    fn measure(&self, size: f32, text: &str) -> Result<GlyphBoundingBox, MetricsError> {
        let glyphs = self.place_glyphs(size, text)?;
        Ok(run_bounds(&glyphs))
    }
}

impl Rasterizer for Font {
    fn draw_text<C>(
        &self,
        canvas: &mut C,
        size: f32,
        pos: IVec2,
        color: Color,
        text: &str,
    ) -> Result<(), MetricsError>
    where
        C: PixelCanvas + ?Sized,
    {
        for glyph in self.place_glyphs(size, text)? {
            if glyph.metrics.is_empty() {
                continue;
            }

            let (metrics, coverage) = self.font.rasterize(glyph.c, size);
            let left = i64::from(pos.x + glyph.x);
            let top = i64::from(pos.y - glyph.metrics.top());
            blit(canvas, left, top, metrics.width, &coverage, color);
        }
        Ok(())
    }
}

/// Paints `color` onto every pixel of a row-major coverage bitmap
/// that is at least [`COVERAGE_THRESHOLD`], with the bitmap's
/// top-left corner at `(left, top)`.
///
/// Pixels outside the canvas are skipped.
fn blit<C>(canvas: &mut C, left: i64, top: i64, width: usize, coverage: &[u8], color: Color)
where
    C: PixelCanvas + ?Sized,
{
    if width == 0 {
        return;
    }
    for (i, &value) in coverage.iter().enumerate() {
        if value < COVERAGE_THRESHOLD {
            continue;
        }
        let x = left + (i % width) as i64;
        let y = top + (i / width) as i64;
        if canvas.contains(x, y) {
            canvas.set_pixel(x as u32, y as u32, color);
        }
    }
}

/// The parts of a glyph's metrics used for placement.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
struct GlyphMetrics {
    /// Offset of the bitmap's left edge from the pen position.
    xmin: i32,
    /// Offset of the bitmap's bottom edge from the baseline, upward.
    ymin: i32,
    width: u32,
    height: u32,
    advance: f32,
}

impl GlyphMetrics {
    fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Height of the bitmap's top edge above the baseline.
    fn top(&self) -> i32 {
        self.ymin + self.height as i32
    }
}

impl From<Metrics> for GlyphMetrics {
    fn from(metrics: Metrics) -> Self {
        Self {
            xmin: metrics.xmin,
            ymin: metrics.ymin,
            width: metrics.width as u32,
            height: metrics.height as u32,
            advance: metrics.advance_width,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct PlacedGlyph {
    c: char,
    /// Left edge of the bitmap relative to the run origin.
    x: i32,
    metrics: GlyphMetrics,
}

fn place_glyphs(glyphs: impl Iterator<Item = (char, GlyphMetrics)>) -> Vec<PlacedGlyph> {
    let mut pen = 0f32;
    glyphs
        .map(|(c, metrics)| {
            let glyph = PlacedGlyph {
                c,
                x: pen.round() as i32 + metrics.xmin,
                metrics,
            };
            pen += metrics.advance;
            glyph
        })
        .collect()
}

/// Computes the box around a run of placed glyphs.
///
/// Horizontally the box spans from the pen origin (or further left for
/// glyphs with a negative bearing) to the end of the last advance or the
/// rightmost bitmap edge. Vertically it spans the glyph bitmaps.
fn run_bounds(glyphs: &[PlacedGlyph]) -> GlyphBoundingBox {
    let pen_end = glyphs
        .iter()
        .map(|g| g.metrics.advance)
        .sum::<f32>()
        .round() as i32;

    let mut left = 0;
    let mut right = pen_end;
    let mut top = 0;
    let mut bottom = 0;
    for glyph in glyphs.iter().filter(|g| !g.metrics.is_empty()) {
        left = left.min(glyph.x);
        right = right.max(glyph.x + glyph.metrics.width as i32);
        top = top.min(-glyph.metrics.top());
        bottom = bottom.max(-glyph.metrics.ymin);
    }

    GlyphBoundingBox::from_edges(left, top, right, bottom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Canvas, ErrorLevel};

    fn glyph(xmin: i32, ymin: i32, width: u32, height: u32, advance: f32) -> GlyphMetrics {
        GlyphMetrics {
            xmin,
            ymin,
            width,
            height,
            advance,
        }
    }

    #[test]
    fn blit_thresholds_coverage() {
        let mut canvas = Canvas::new(4, 3).unwrap();
        let color = Color::rgb(59, 89, 152);
        #[rustfmt::skip]
        let coverage = [
            255, 128, 127,
            0,   200, 128,
        ];
        blit(&mut canvas, 1, 1, 3, &coverage, color);

        let painted: Vec<_> = (0..3)
            .flat_map(|y| (0..4).map(move |x| (x, y)))
            .filter(|&(x, y)| !canvas.pixel(x, y).is_transparent(ErrorLevel::Top))
            .collect();
        assert_eq!(painted, vec![(1, 1), (2, 1), (2, 2), (3, 2)]);
        assert_eq!(canvas.pixel(2, 1), color);
    }

    #[test]
    fn blit_clips_to_canvas() {
        let mut canvas = Canvas::new(3, 3).unwrap();
        let coverage = [255; 9];
        blit(&mut canvas, -1, 2, 3, &coverage, Color::BLACK);
        // Only the top row of the bitmap lands inside, minus its first column
        let painted: Vec<_> = (0..3)
            .flat_map(|y| (0..3).map(move |x| (x, y)))
            .filter(|&(x, y)| !canvas.pixel(x, y).is_transparent(ErrorLevel::Top))
            .collect();
        assert_eq!(painted, vec![(0, 2), (1, 2)]);

        blit(&mut canvas, 5, 5, 3, &coverage, Color::BLACK);
        blit(&mut canvas, 0, 0, 0, &[], Color::BLACK);
        assert_eq!(canvas.pixel(0, 0), Color::TRANSPARENT);
    }

    #[test]
    fn rejects_garbage() {
        assert!(Font::from_data(vec![0; 64]).is_err());
    }

    #[test]
    fn empty_run() {
        assert_eq!(run_bounds(&[]), GlyphBoundingBox::default());
    }

    #[test]
    fn places_by_advance() {
        let glyphs = place_glyphs(
            vec![
                ('A', glyph(1, 0, 8, 12, 10.4)),
                ('B', glyph(0, 0, 9, 12, 10.4)),
                ('C', glyph(2, 0, 7, 12, 10.)),
            ]
            .into_iter(),
        );
        let xs: Vec<_> = glyphs.iter().map(|g| g.x).collect();
        assert_eq!(xs, vec![1, 10, 23]);
    }

    #[test]
    fn bounds_of_run() {
        // "Ag": a cap sitting on the baseline and a descender
        let glyphs = place_glyphs(
            vec![
                ('A', glyph(0, 0, 10, 14, 11.)),
                ('g', glyph(1, -4, 8, 14, 9.)),
            ]
            .into_iter(),
        );
        let bbox = run_bounds(&glyphs);
        assert_eq!(bbox.left(), 0);
        assert_eq!(bbox.bottom(), 4);
        assert_eq!(bbox.width(), 20);
        assert_eq!(bbox.height(), 18);
    }

    #[test]
    fn negative_bearing_extends_left() {
        let glyphs = place_glyphs(vec![('j', glyph(-2, -3, 5, 13, 4.))].into_iter());
        let bbox = run_bounds(&glyphs);
        assert_eq!(bbox.left(), -2);
        assert_eq!(bbox.width(), 6);
        assert_eq!(bbox.bottom(), 3);
    }

    #[test]
    fn spaces_take_up_width() {
        let glyphs = place_glyphs(
            vec![
                ('a', glyph(0, 0, 8, 8, 9.)),
                (' ', glyph(0, 0, 0, 0, 5.)),
            ]
            .into_iter(),
        );
        let bbox = run_bounds(&glyphs);
        assert_eq!(bbox.width(), 14);
        assert_eq!(bbox.height(), 8);
    }
}
