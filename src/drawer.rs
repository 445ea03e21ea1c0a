use serde::{Deserialize, Serialize};

use crate::{
    canvas::{Canvas, CanvasError},
    compositor::{self, Rasterizer},
    layout::{self, LayoutConstraints, LayoutPlan},
    metrics::{GlyphMetricsProvider, MetricsError},
    outline, Color,
};

/// The color of the outline unless one is configured.
pub const DEFAULT_OUTLINE_COLOR: Color = Color::rgb(254, 254, 254);

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    Validation(&'static str),
    #[error(transparent)]
    Metrics(#[from] MetricsError),
    #[error("failed to allocate canvas: {0}")]
    CanvasAllocation(#[from] CanvasError),
}

/// Settings for drawing text.
///
/// Zero disables the corresponding line or outline setting.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DrawOptions {
    /// Font size in pixels.
    pub font_size: f32,
    pub font_color: Color,
    /// Color of the fully transparent background.
    ///
    /// Only visible to consumers that ignore alpha.
    pub background_color: Color,
    /// Outline thickness in pixels.
    pub outline_width: u32,
    pub outline_color: Color,
    /// Maximum line width in pixels.
    pub line_width: u32,
    /// Minimum line height in pixels.
    pub line_height: u32,
    /// Maximum number of characters per line.
    pub line_length: usize,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            font_size: 18.,
            font_color: Color::BLACK,
            background_color: Color::TRANSPARENT,
            outline_width: 0,
            outline_color: DEFAULT_OUTLINE_COLOR,
            line_width: 0,
            line_height: 0,
            line_length: 0,
        }
    }
}

impl DrawOptions {
    pub fn font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn font_color(mut self, color: Color) -> Self {
        self.font_color = color;
        self
    }

    pub fn background_color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn outline(mut self, width: u32, color: Color) -> Self {
        self.outline_width = width;
        self.outline_color = color;
        self
    }

    pub fn line_width(mut self, line_width: u32) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn line_height(mut self, line_height: u32) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn line_length(mut self, line_length: usize) -> Self {
        self.line_length = line_length;
        self
    }

    pub fn constraints(&self) -> LayoutConstraints {
        LayoutConstraints {
            font_size: self.font_size,
            line_width: self.line_width,
            line_height: self.line_height,
            line_length: self.line_length,
            outline_width: self.outline_width,
        }
    }
}

/// Draws text onto new transparent images with a single font.
pub struct TextDrawer<F> {
    font: F,
    options: DrawOptions,
}

impl<F> TextDrawer<F>
where
    F: GlyphMetricsProvider + Rasterizer,
{
    pub fn new(font: F, options: DrawOptions) -> Self {
        Self { font, options }
    }

    pub fn options(&self) -> &DrawOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut DrawOptions {
        &mut self.options
    }

    pub fn font(&self) -> &F {
        &self.font
    }

    /// Lays out `text` without drawing it.
    pub fn layout(&self, text: &str) -> Result<LayoutPlan, Error> {
        if text.is_empty() {
            return Err(Error::Validation("text is required"));
        }
        Ok(layout::lay_out(text, &self.options.constraints(), &self.font)?)
    }

    /// Draws `text` onto a new canvas sized to fit it.
    ///
    /// Lines are drawn in the font color and, if an outline width is set,
    /// outlined afterwards.
    pub fn draw(&self, text: &str) -> Result<Canvas, Error> {
        let options = &self.options;
        let plan = self.layout(text)?;

        let mut canvas = Canvas::with_background(
            plan.image_width(),
            plan.image_height(),
            options.background_color,
        )?;
        compositor::render(
            &plan,
            options.font_size,
            options.font_color,
            &self.font,
            &mut canvas,
        )?;

        if options.outline_width > 0 {
            outline::dilate(
                &mut canvas,
                options.font_color,
                options.outline_color,
                options.outline_width,
            );
        }

        log::info!(
            "Drew {} lines of text onto a {}x{} image",
            plan.lines().len(),
            plan.image_width(),
            plan.image_height()
        );
        Ok(canvas)
    }
}
