//! RGBA pixel buffers.
//!
//! [`PixelBuffer`] is the unit every operation reads and produces. The
//! byte length is validated on construction, so the replay code can index
//! samples without bounds surprises.

use crate::error::EditError;

/// Number of bytes per RGBA8 sample.
pub const CHANNELS: usize = 4;

/// An owned 2-D grid of RGBA8 samples in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer from RGBA pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::PixelDataMismatch`] if `pixels.len()` is not
    /// `width * height * 4`, or [`EditError::DimensionsTooLarge`] if that
    /// product overflows.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, EditError> {
        let expected = byte_len(width, height)?;
        if pixels.len() != expected {
            return Err(EditError::PixelDataMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a buffer where every sample has the same RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, EditError> {
        let len = byte_len(width, height)?;
        let pixels = rgba.iter().copied().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a buffer of the given size from a per-sample function.
    pub(crate) fn from_fn(
        width: u32,
        height: u32,
        mut sample: impl FnMut(u32, u32) -> [u8; 4],
    ) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&sample(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a buffer from an `image::RgbaImage`.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert into an `image::RgbaImage` for encoding.
    pub fn into_rgba_image(self) -> image::RgbaImage {
        // Length was validated on construction, so this cannot fail.
        image::RgbaImage::from_raw(self.width, self.height, self.pixels)
            .unwrap_or_else(|| image::RgbaImage::new(0, 0))
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGBA bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Consume the buffer and return its RGBA bytes.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Sample at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.pixels[idx..idx + CHANNELS]);
        Some(out)
    }

    /// Sample at `(x, y)` for coordinates already known to be in bounds.
    #[inline]
    pub(crate) fn pixel_unchecked(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Total number of samples.
    pub fn pixel_count(&self) -> usize {
        self.pixels.len() / CHANNELS
    }

    /// Whether the raster has no samples (a valid, loaded 0-area image).
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

fn byte_len(width: u32, height: u32) -> Result<usize, EditError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or(EditError::DimensionsTooLarge { width, height })
}
