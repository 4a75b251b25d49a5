//! Snaplab WASM - WebAssembly bindings for Snaplab
//!
//! This crate provides WASM bindings to expose the snaplab-core edit
//! engine to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `adjustments` - Brightness, contrast and saturation values
//! - `session` - Edit session with undo/redo and debounced slider commits
//! - `types` - WASM-compatible wrapper types for image data
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditSession, JsPixelBuffer } from '@snaplab/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const data = ctx.getImageData(0, 0, w, h);
//! const session = new JsEditSession();
//! session.load(new JsPixelBuffer(w, h, data.data));
//!
//! session.rotate_clockwise();
//! const out = session.current();
//! ctx.putImageData(new ImageData(new Uint8ClampedArray(out.pixels()), out.width), 0, 0);
//! ```

use wasm_bindgen::prelude::*;

mod adjustments;
mod session;
mod types;

// Re-export public types
pub use adjustments::{apply_adjustments, JsAdjustments};
pub use session::JsEditSession;
pub use types::JsPixelBuffer;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
