//! Adjustment WASM bindings.
//!
//! This module provides JavaScript bindings for the adjustment triple,
//! allowing slider values to be passed in from TypeScript.

use crate::types::{js_error, JsPixelBuffer};
use snaplab_core::adjustments::{self, AdjustmentTriple};
use wasm_bindgen::prelude::*;

/// Brightness / contrast / saturation wrapper for JavaScript.
///
/// Setters clamp raw slider values into 0-200.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsAdjustments {
    inner: AdjustmentTriple,
}

#[wasm_bindgen]
impl JsAdjustments {
    /// Create new adjustments at identity (100, 100, 100)
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: AdjustmentTriple::IDENTITY,
        }
    }

    /// Get brightness value
    #[wasm_bindgen(getter)]
    pub fn brightness(&self) -> u8 {
        self.inner.brightness
    }

    /// Set brightness value
    #[wasm_bindgen(setter)]
    pub fn set_brightness(&mut self, value: i32) {
        let AdjustmentTriple {
            contrast,
            saturation,
            ..
        } = self.inner;
        self.inner = AdjustmentTriple::clamped(value, contrast as i32, saturation as i32);
    }

    /// Get contrast value
    #[wasm_bindgen(getter)]
    pub fn contrast(&self) -> u8 {
        self.inner.contrast
    }

    /// Set contrast value
    #[wasm_bindgen(setter)]
    pub fn set_contrast(&mut self, value: i32) {
        let AdjustmentTriple {
            brightness,
            saturation,
            ..
        } = self.inner;
        self.inner = AdjustmentTriple::clamped(brightness as i32, value, saturation as i32);
    }

    /// Get saturation value
    #[wasm_bindgen(getter)]
    pub fn saturation(&self) -> u8 {
        self.inner.saturation
    }

    /// Set saturation value
    #[wasm_bindgen(setter)]
    pub fn set_saturation(&mut self, value: i32) {
        let AdjustmentTriple {
            brightness,
            contrast,
            ..
        } = self.inner;
        self.inner = AdjustmentTriple::clamped(brightness as i32, contrast as i32, value);
    }

    /// Check if all adjustments are at identity
    pub fn is_identity(&self) -> bool {
        self.inner.is_identity()
    }

    /// Serialize to JSON for storage
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Deserialize from JSON, rejecting out-of-range fields
    pub fn from_json(value: JsValue) -> Result<JsAdjustments, JsValue> {
        let inner: AdjustmentTriple =
            serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
        inner.validate().map_err(js_error)?;
        Ok(Self { inner })
    }
}

impl Default for JsAdjustments {
    fn default() -> Self {
        Self::new()
    }
}

impl JsAdjustments {
    pub(crate) fn from_triple(inner: AdjustmentTriple) -> Self {
        Self { inner }
    }

    pub(crate) fn triple(&self) -> AdjustmentTriple {
        self.inner
    }
}

/// Apply adjustments to an image outside any edit history.
///
/// # Example (TypeScript)
/// ```typescript
/// const adj = new JsAdjustments();
/// adj.brightness = 120;
///
/// const adjusted = apply_adjustments(sourceImage, adj);
/// ```
#[wasm_bindgen]
pub fn apply_adjustments(
    image: &JsPixelBuffer,
    adjustments: &JsAdjustments,
) -> Result<JsPixelBuffer, JsValue> {
    let buf = image.to_buffer().map_err(js_error)?;
    let adjusted = adjustments::apply(&buf, adjustments.triple());
    Ok(JsPixelBuffer::from_buffer(adjusted))
}
