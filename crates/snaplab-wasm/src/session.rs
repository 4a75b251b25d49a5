//! Edit session WASM bindings.
//!
//! Wraps the core `EditSession` so a browser host can drive history and
//! debounced slider commits from toolbar clicks and input events.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const session = new JsEditSession();
//! session.load(new JsPixelBuffer(w, h, imageData.data));
//!
//! slider.oninput = () => {
//!   adj.brightness = Number(slider.value);
//!   const token = session.set_adjustments(adj, performance.now());
//!   setTimeout(() => { session.fire(token); redraw(); }, 500);
//!   redraw();
//! };
//! ```

use std::time::Duration;

use crate::adjustments::JsAdjustments;
use crate::types::{js_error, JsPixelBuffer};
use snaplab_core::{EditSession, FlipAxis, Generation, RotateStep, SessionOptions, TransformKind};
use wasm_bindgen::prelude::*;

/// Convert a `performance.now()` style millisecond timestamp.
///
/// Negative, NaN or infinite values map to zero.
fn duration_from_ms(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms.max(0.0) / 1000.0).unwrap_or(Duration::ZERO)
}

/// Edit session wrapper for JavaScript.
#[wasm_bindgen]
pub struct JsEditSession {
    inner: EditSession,
}

#[wasm_bindgen]
impl JsEditSession {
    /// Create a session with the default 500ms settle window
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: EditSession::default(),
        }
    }

    /// Create a session with a custom settle window in milliseconds
    pub fn with_settle_window(window_ms: u32) -> Self {
        let options = SessionOptions::new().settle_window(Duration::from_millis(window_ms as u64));
        Self {
            inner: EditSession::new(options),
        }
    }

    /// Start editing an image, discarding any previous history.
    pub fn load(&mut self, image: &JsPixelBuffer) -> Result<(), JsValue> {
        let buf = image.to_buffer().map_err(js_error)?;
        self.inner.load(buf);
        Ok(())
    }

    /// Preview in-flight slider values and re-arm the settle timer.
    ///
    /// Returns a generation token for `fire`.
    pub fn set_adjustments(
        &mut self,
        adjustments: &JsAdjustments,
        now_ms: f64,
    ) -> Result<u64, JsValue> {
        self.inner
            .set_adjustments(adjustments.triple(), duration_from_ms(now_ms))
            .map(Generation::get)
            .map_err(js_error)
    }

    /// Commit the pending adjustment if the settle window has elapsed.
    pub fn poll(&mut self, now_ms: f64) -> Result<bool, JsValue> {
        self.inner.poll(duration_from_ms(now_ms)).map_err(js_error)
    }

    /// Commit the pending adjustment if `generation` is the latest token.
    pub fn fire(&mut self, generation: u64) -> Result<bool, JsValue> {
        self.inner.fire(Generation::from(generation)).map_err(js_error)
    }

    /// Rotate by 90 (clockwise) or -90 (counter-clockwise) degrees.
    pub fn rotate(&mut self, angle_degrees: i32) -> Result<(), JsValue> {
        self.inner.rotate(angle_degrees).map_err(js_error)
    }

    pub fn rotate_clockwise(&mut self) -> Result<(), JsValue> {
        self.transform(TransformKind::Rotate(RotateStep::Clockwise))
    }

    pub fn rotate_counter_clockwise(&mut self) -> Result<(), JsValue> {
        self.transform(TransformKind::Rotate(RotateStep::CounterClockwise))
    }

    pub fn flip_horizontal(&mut self) -> Result<(), JsValue> {
        self.transform(TransformKind::Flip(FlipAxis::Horizontal))
    }

    pub fn flip_vertical(&mut self) -> Result<(), JsValue> {
        self.transform(TransformKind::Flip(FlipAxis::Vertical))
    }

    /// Step back; returns false if nothing was undone
    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }

    /// Step forward; returns false if nothing was redone
    pub fn redo(&mut self) -> bool {
        self.inner.redo()
    }

    #[wasm_bindgen(getter)]
    pub fn can_undo(&self) -> bool {
        self.inner.engine().can_undo()
    }

    #[wasm_bindgen(getter)]
    pub fn can_redo(&self) -> bool {
        self.inner.engine().can_redo()
    }

    /// Number of history entries, including the redo tail
    #[wasm_bindgen(getter)]
    pub fn history_length(&self) -> usize {
        self.inner.engine().len()
    }

    /// Index of the operation in effect, `undefined` before load
    #[wasm_bindgen(getter)]
    pub fn cursor(&self) -> Option<usize> {
        self.inner.engine().cursor()
    }

    /// The image to display.
    ///
    /// Throws if no image has been loaded.
    pub fn current(&self) -> Result<JsPixelBuffer, JsValue> {
        let buf = self.inner.current_buffer().map_err(js_error)?;
        Ok(JsPixelBuffer::from_buffer((*buf).clone()))
    }

    /// Slider values to show: pending input, else the logged snapshot.
    pub fn adjustments(&self) -> Option<JsAdjustments> {
        self.inner
            .displayed_adjustments()
            .map(JsAdjustments::from_triple)
    }

    /// Milliseconds timestamp at which the pending adjustment settles
    #[wasm_bindgen(getter)]
    pub fn settle_deadline_ms(&self) -> Option<f64> {
        self.inner
            .settle_deadline()
            .map(|d| d.as_secs_f64() * 1000.0)
    }

    /// The history log as `{ operations, cursor }`, or `undefined` before load.
    pub fn history(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.engine().log())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for JsEditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl JsEditSession {
    fn transform(&mut self, kind: TransformKind) -> Result<(), JsValue> {
        self.inner.transform(kind).map_err(js_error)
    }
}
