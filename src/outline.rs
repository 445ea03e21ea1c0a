//! Outline generation by pixel dilation.
//!
//! Each pass scans the whole canvas and paints the outline color onto
//! the transparent neighbors of every glyph or outline pixel, so the
//! outline grows by about one pixel per pass.

use ahash::AHashSet;

use crate::{canvas::PixelCanvas, Color, ErrorLevel};

/// Offsets of the eight pixels surrounding a pixel.
///
/// ```text
/// north-west  north   north-east
/// west        center  east
/// south-west  south   south-east
/// ```
const NEIGHBORS: [(i32, i32); 8] = [
    (-1, 1),
    (0, 1),
    (1, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Pixels below this opacity band count as background.
const TRANSPARENCY_LEVEL: ErrorLevel = ErrorLevel::Medium;

/// How closely a pixel's opacity must match the font or outline color.
///
/// This is loose: any pixel with the right RGB and an opacity of at
/// least 25 matches an opaque color.
const MATCH_LEVEL: ErrorLevel = ErrorLevel::Low;

/// Grows an outline of `outline_color` around the pixels of `font_color`
/// by running `steps` dilation passes over `canvas`.
///
/// Only pixels that are transparent when a pass reaches them are painted.
pub fn dilate<C>(canvas: &mut C, font_color: Color, outline_color: Color, steps: u32)
where
    C: PixelCanvas + ?Sized,
{
    for step in 0..steps {
        let painted = dilate_once(canvas, font_color, outline_color);
        log::trace!("Outline pass {} painted {} pixels", step + 1, painted);
    }
}

/// Runs a single pass and returns the number of painted pixels.
///
/// A pixel is handled at most once per pass, either as the center of a
/// dilation or as the neighbor of one. Pixels painted during the pass
/// are always handled, so they only spread in the next pass.
fn dilate_once<C>(canvas: &mut C, font_color: Color, outline_color: Color) -> usize
where
    C: PixelCanvas + ?Sized,
{
    let mut handled = AHashSet::new();
    let mut painted = 0;

    for x in 0..canvas.width() {
        for y in 0..canvas.height() {
            if handled.contains(&(x, y)) {
                continue;
            }

            let color = canvas.pixel(x, y);
            if color.is_transparent(TRANSPARENCY_LEVEL) {
                continue;
            }
            if !color.is_equal_to(&font_color, MATCH_LEVEL)
                && !color.is_equal_to(&outline_color, MATCH_LEVEL)
            {
                continue;
            }

            for &(dx, dy) in NEIGHBORS.iter() {
                let nx = i64::from(x) + i64::from(dx);
                let ny = i64::from(y) + i64::from(dy);
                if !canvas.contains(nx, ny) {
                    continue;
                }
                let (nx, ny) = (nx as u32, ny as u32);

                handled.insert((nx, ny));
                if canvas.pixel(nx, ny).is_transparent(TRANSPARENCY_LEVEL) {
                    canvas.set_pixel(nx, ny, outline_color);
                    painted += 1;
                }
            }

            handled.insert((x, y));
        }
    }

    painted
}
