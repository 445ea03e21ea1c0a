use image::{Rgba, RgbaImage};

use crate::Color;

/// Canvases larger than this many pixels are refused.
pub const MAX_CANVAS_PIXELS: u64 = 1 << 26;

#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("cannot create an empty {width}x{height} canvas")]
    Empty { width: u32, height: u32 },
    #[error("a {width}x{height} canvas exceeds the limit of {} pixels", MAX_CANVAS_PIXELS)]
    TooLarge { width: u32, height: u32 },
}

/// A grid of pixels that can be read and written one at a time.
pub trait PixelCanvas {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Gets the color at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the position is out of bounds.
    fn pixel(&self, x: u32, y: u32) -> Color;

    /// Sets the color at `(x, y)`, replacing whatever was there.
    ///
    /// # Panics
    /// Panics if the position is out of bounds.
    fn set_pixel(&mut self, x: u32, y: u32, color: Color);

    fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width()) && y < i64::from(self.height())
    }
}

impl PixelCanvas for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        Color::from(*self.get_pixel(x, y))
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.put_pixel(x, y, Rgba::from(color));
    }
}

/// An RGBA image that text is drawn onto.
///
/// The pixel buffer is released when the canvas is dropped.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Creates a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        Self::with_background(width, height, Color::TRANSPARENT)
    }

    /// Creates a canvas filled with `background` at zero opacity.
    ///
    /// Only the RGB components of `background` are used.
    pub fn with_background(
        width: u32,
        height: u32,
        background: Color,
    ) -> Result<Self, CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::Empty { width, height });
        }
        if u64::from(width) * u64::from(height) > MAX_CANVAS_PIXELS {
            return Err(CanvasError::TooLarge { width, height });
        }

        let fill = Rgba::from(background.with_opacity(0));
        Ok(Self {
            image: RgbaImage::from_pixel(width, height, fill),
        })
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl PixelCanvas for Canvas {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        self.image.pixel(x, y)
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.image.set_pixel(x, y, color)
    }
}

#[cfg(test)]
mod tests {
    use crate::ErrorLevel;

    use super::*;

    #[test]
    fn starts_transparent() {
        let canvas = Canvas::with_background(3, 2, Color::rgb(10, 20, 30)).unwrap();
        assert_eq!(canvas.width(), 3);
        assert_eq!(canvas.height(), 2);
        for x in 0..3 {
            for y in 0..2 {
                let pixel = canvas.pixel(x, y);
                assert!(pixel.is_transparent(ErrorLevel::Top));
                assert_eq!((pixel.red, pixel.green, pixel.blue), (10, 20, 30));
            }
        }
    }

    #[test]
    fn set_and_get() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.set_pixel(1, 2, Color::rgb(1, 2, 3));
        assert_eq!(canvas.pixel(1, 2), Color::rgb(1, 2, 3));
        assert_eq!(canvas.into_image().get_pixel(1, 2).0, [1, 2, 3, 255]);
    }

    #[test]
    fn contains() {
        let canvas = Canvas::new(4, 3).unwrap();
        assert!(canvas.contains(0, 0));
        assert!(canvas.contains(3, 2));
        assert!(!canvas.contains(-1, 0));
        assert!(!canvas.contains(4, 0));
        assert!(!canvas.contains(0, 3));
    }

    #[test]
    fn refuses_bad_sizes() {
        assert!(matches!(
            Canvas::new(0, 10),
            Err(CanvasError::Empty { .. })
        ));
        assert!(matches!(
            Canvas::new(1 << 14, 1 << 14),
            Err(CanvasError::TooLarge { .. })
        ));
    }
}
