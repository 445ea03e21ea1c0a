//! Drawing laid out text onto a canvas.

use glam::{ivec2, IVec2};

use crate::{
    canvas::PixelCanvas,
    layout::LayoutPlan,
    metrics::{GlyphMetricsProvider, MetricsError},
    Color,
};

/// Draws strings onto a canvas.
pub trait Rasterizer {
    /// Draws `text` at `size` pixels with its pen origin on the baseline at `pos`.
    ///
    /// Pixels falling outside the canvas are skipped.
    fn draw_text<C>(
        &self,
        canvas: &mut C,
        size: f32,
        pos: IVec2,
        color: Color,
        text: &str,
    ) -> Result<(), MetricsError>
    where
        C: PixelCanvas + ?Sized;
}

/// Computes where each line of `plan` is drawn.
///
/// Returns the pen origin of each line on its baseline. The first line's
/// box determines the horizontal and vertical origin so glyphs with a
/// negative bearing or a descender are not clipped. Each glyph run is
/// centered vertically in its line box, or sits on the bottom of the box
/// if it is at least as tall as the box.
pub fn baselines<M>(
    plan: &LayoutPlan,
    font_size: f32,
    metrics: &M,
) -> Result<Vec<IVec2>, MetricsError>
where
    M: GlyphMetricsProvider + ?Sized,
{
    let first = match plan.lines().first() {
        Some(line) => metrics.measure(font_size, &line.content)?,
        None => return Ok(Vec::new()),
    };

    let padding = plan.padding() as i32;
    let x = padding - first.left();
    let mut top = padding - first.bottom();

    let mut positions = Vec::with_capacity(plan.lines().len());
    for line in plan.lines() {
        let offset = if line.height <= line.text_height {
            line.text_height
        } else {
            line.text_height + (line.height - line.text_height) / 2
        };
        positions.push(ivec2(x, top + offset as i32));
        top += line.height as i32;
    }

    Ok(positions)
}

/// Draws every line of `plan` in `color`.
pub fn render<F, C>(
    plan: &LayoutPlan,
    font_size: f32,
    color: Color,
    font: &F,
    canvas: &mut C,
) -> Result<(), MetricsError>
where
    F: GlyphMetricsProvider + Rasterizer + ?Sized,
    C: PixelCanvas + ?Sized,
{
    let positions = baselines(plan, font_size, font)?;
    for (line, pos) in plan.lines().iter().zip(positions) {
        log::trace!("Drawing {:?} at {:?}", line.content, pos);
        font.draw_text(canvas, font_size, pos, color, &line.content)?;
    }
    Ok(())
}
