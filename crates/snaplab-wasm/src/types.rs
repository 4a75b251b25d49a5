//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core Snaplab types,
//! handling the conversion between Rust and JavaScript data representations.

use snaplab_core::{EditError, PixelBuffer};
use wasm_bindgen::prelude::*;

/// An RGBA image wrapper for JavaScript.
///
/// The byte layout matches `ImageData.data`, so a host can build one
/// straight from `ctx.getImageData(...)` and blit it back with
/// `putImageData`.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`.
#[wasm_bindgen]
pub struct JsPixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsPixelBuffer {
    /// Create a new JsPixelBuffer from dimensions and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
    ///
    /// The length is checked when the buffer is handed to the engine.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsPixelBuffer {
        JsPixelBuffer {
            width,
            height,
            pixels,
        }
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 4 for RGBA)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl JsPixelBuffer {
    pub(crate) fn from_buffer(buf: PixelBuffer) -> Self {
        let (width, height) = buf.dimensions();
        Self {
            width,
            height,
            pixels: buf.into_pixels(),
        }
    }

    /// Validate and convert to a core buffer. Clones the pixel data.
    pub(crate) fn to_buffer(&self) -> Result<PixelBuffer, EditError> {
        PixelBuffer::new(self.width, self.height, self.pixels.clone())
    }
}

/// Convert a core error into a JavaScript exception value.
pub(crate) fn js_error(err: EditError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
