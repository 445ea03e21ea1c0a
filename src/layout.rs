//! Text layout implementation.
//!
//! Text is split into paragraphs at line breaks, optionally chopped into
//! chunks of a fixed number of characters, and then wrapped greedily
//! against measured glyph widths. The result is a [`LayoutPlan`]: the
//! lines to draw, in reading order, and the size of the image that
//! holds them.

use std::mem;

use glam::{uvec2, UVec2};
use serde::{Deserialize, Serialize};

use crate::metrics::{GlyphBoundingBox, GlyphMetricsProvider, MetricsError};

/// Room added around the content on each axis when outlining,
/// on top of twice the outline width.
pub const OUTLINE_MARGIN: u32 = 4;

/// Settings for laying out text.
///
/// Zero disables the corresponding constraint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConstraints {
    /// Font size in pixels.
    pub font_size: f32,
    /// Maximum width of a line in pixels.
    pub line_width: u32,
    /// Minimum height of a line in pixels.
    pub line_height: u32,
    /// Maximum number of characters on a line.
    pub line_length: usize,
    /// Width of the outline that will be drawn around glyphs.
    pub outline_width: u32,
}

impl Default for LayoutConstraints {
    fn default() -> Self {
        Self {
            font_size: 18.,
            line_width: 0,
            line_height: 0,
            line_length: 0,
            outline_width: 0,
        }
    }
}

/// A single line of laid out text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSegment {
    pub content: String,
    /// Width of the line box.
    pub width: u32,
    /// Height of the line box: the glyph height or the
    /// configured line height, whichever is larger.
    pub height: u32,
    /// Actual height of the glyphs on this line.
    pub text_height: u32,
}

/// Lines of text that have been laid out and are ready for drawing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayoutPlan {
    lines: Vec<LineSegment>,
    content_width: u32,
    content_height: u32,
    padding: u32,
}

impl LayoutPlan {
    /// Creates a plan from already measured lines.
    ///
    /// Sizes saturate at `u32::MAX` instead of overflowing, which
    /// canvas allocation then refuses.
    ///
    /// When `outline_width` is nonzero, the image grows by
    /// `2 * outline_width + OUTLINE_MARGIN` on each axis so the outline
    /// is not clipped, and the content is inset by half of that.
    pub fn from_lines(lines: Vec<LineSegment>, outline_width: u32) -> Self {
        let content_size = lines.iter().fold(UVec2::ZERO, |size, line| {
            uvec2(size.x.max(line.width), size.y.saturating_add(line.height))
        });
        let padding = if outline_width > 0 {
            outline_width.saturating_add(OUTLINE_MARGIN / 2)
        } else {
            0
        };

        Self {
            lines,
            content_width: content_size.x,
            content_height: content_size.y,
            padding,
        }
    }

    pub fn lines(&self) -> &[LineSegment] {
        &self.lines
    }

    /// Offset of the content from the top-left corner of the image.
    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// The widest line width.
    pub fn content_width(&self) -> u32 {
        self.content_width
    }

    /// The sum of all line heights.
    pub fn content_height(&self) -> u32 {
        self.content_height
    }

    pub fn image_width(&self) -> u32 {
        self.content_width
            .saturating_add(self.padding.saturating_mul(2))
    }

    pub fn image_height(&self) -> u32 {
        self.content_height
            .saturating_add(self.padding.saturating_mul(2))
    }

    pub fn image_size(&self) -> UVec2 {
        uvec2(self.image_width(), self.image_height())
    }
}

/// Replaces escaped line breaks (a backslash followed by `n`)
/// with real ones.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// Splits a paragraph into chunks of `line_length` characters.
///
/// The last chunk holds the remainder. A `line_length` of zero
/// returns the paragraph unchanged.
pub fn split_by_length(paragraph: &str, line_length: usize) -> Vec<&str> {
    if line_length == 0 {
        return vec![paragraph];
    }

    let mut chunks = Vec::with_capacity(paragraph.len() / line_length + 1);
    let mut start = 0;
    for (count, (i, _)) in paragraph.char_indices().enumerate() {
        if count > 0 && count % line_length == 0 {
            chunks.push(&paragraph[start..i]);
            start = i;
        }
    }
    chunks.push(&paragraph[start..]);
    chunks
}

/// Lays out `text` into lines according to `constraints`.
///
/// Fails only if `metrics` fails to measure a line.
pub fn lay_out<M>(
    text: &str,
    constraints: &LayoutConstraints,
    metrics: &M,
) -> Result<LayoutPlan, MetricsError>
where
    M: GlyphMetricsProvider + ?Sized,
{
    let mut layouter = Layouter::new(constraints, metrics);
    for paragraph in normalize_newlines(text).split('\n') {
        for chunk in split_by_length(paragraph, constraints.line_length) {
            layouter.lay_out_chunk(chunk)?;
        }
    }

    let plan = LayoutPlan::from_lines(layouter.lines, constraints.outline_width);
    log::debug!(
        "Laid out {} lines into a {}x{} image",
        plan.lines().len(),
        plan.image_width(),
        plan.image_height()
    );
    Ok(plan)
}

struct Layouter<'a, M: ?Sized> {
    constraints: &'a LayoutConstraints,
    metrics: &'a M,
    lines: Vec<LineSegment>,
}

impl<'a, M> Layouter<'a, M>
where
    M: GlyphMetricsProvider + ?Sized,
{
    fn new(constraints: &'a LayoutConstraints, metrics: &'a M) -> Self {
        Self {
            constraints,
            metrics,
            lines: Vec::new(),
        }
    }

    fn measure(&self, text: &str) -> Result<GlyphBoundingBox, MetricsError> {
        self.metrics.measure(self.constraints.font_size, text)
    }

    fn lay_out_chunk(&mut self, chunk: &str) -> Result<(), MetricsError> {
        if self.constraints.line_width == 0 {
            let bbox = self.measure(chunk)?;
            self.push_line(chunk.to_owned(), bbox, bbox.width());
            Ok(())
        } else {
            self.wrap(chunk)
        }
    }

    /// Adds characters to the current line until it gets wider than
    /// the line width, then starts a new line with the character
    /// that overflowed.
    ///
    /// A character that is too wide on its own ends up alone on its line.
    /// If it starts the chunk, the empty line before it is kept.
    fn wrap(&mut self, chunk: &str) -> Result<(), MetricsError> {
        let line_width = self.constraints.line_width;
        let mut line = String::new();

        for c in chunk.chars() {
            let previous_len = line.len();
            line.push(c);
            if self.measure(&line)?.width() <= line_width {
                continue;
            }

            line.truncate(previous_len);
            let finished = mem::take(&mut line);
            self.push_wrapped_line(finished)?;
            line.push(c);
        }

        self.push_wrapped_line(line)
    }

    /// Wrapped lines take up the full line width, unless a single
    /// oversized character makes them wider.
    fn push_wrapped_line(&mut self, content: String) -> Result<(), MetricsError> {
        let bbox = self.measure(&content)?;
        let width = bbox.width().max(self.constraints.line_width);
        self.push_line(content, bbox, width);
        Ok(())
    }

    fn push_line(&mut self, content: String, bbox: GlyphBoundingBox, width: u32) {
        let text_height = bbox.height();
        self.lines.push(LineSegment {
            content,
            width,
            height: text_height.max(self.constraints.line_height),
            text_height,
        });
    }
}
