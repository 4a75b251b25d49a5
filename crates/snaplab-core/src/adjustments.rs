//! Brightness, contrast and saturation adjustment.
//!
//! Applies an [`AdjustmentTriple`] to RGBA pixel data.
//!
//! ## Adjustment Order
//! 1. Brightness
//! 2. Contrast
//! 3. Saturation
//!
//! The order is fixed: each stage reads the channel values the previous
//! stage produced, so reordering changes the output bytes.
//!
//! ## Rounding
//! Every stage rounds half away from zero and clamps to `[0, 255]` before
//! the next stage reads the value. Alpha passes through untouched.

use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::error::EditError;

/// Upper bound of every adjustment percentage.
pub const MAX_PERCENT: u8 = 200;

/// Percentage that leaves a channel unchanged.
pub const NEUTRAL_PERCENT: u8 = 100;

/// Luma coefficient for the red channel in the saturation stage.
pub const GRAY_R: f64 = 0.2989;

/// Luma coefficient for the green channel in the saturation stage.
pub const GRAY_G: f64 = 0.587;

/// Luma coefficient for the blue channel in the saturation stage.
pub const GRAY_B: f64 = 0.114;

/// Absolute adjustment state, each field a percentage in `0..=200`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdjustmentTriple {
    /// Brightness (100 = unchanged)
    pub brightness: u8,
    /// Contrast (100 = unchanged)
    pub contrast: u8,
    /// Saturation (100 = unchanged, 0 = grayscale)
    pub saturation: u8,
}

impl Default for AdjustmentTriple {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AdjustmentTriple {
    /// The no-op triple `{100, 100, 100}`.
    pub const IDENTITY: Self = Self {
        brightness: NEUTRAL_PERCENT,
        contrast: NEUTRAL_PERCENT,
        saturation: NEUTRAL_PERCENT,
    };

    /// Create a triple, rejecting fields above 200.
    pub fn new(brightness: u8, contrast: u8, saturation: u8) -> Result<Self, EditError> {
        let triple = Self {
            brightness,
            contrast,
            saturation,
        };
        triple.validate()?;
        Ok(triple)
    }

    /// Create a triple from raw slider values, saturating into `0..=200`.
    pub fn clamped(brightness: i32, contrast: i32, saturation: i32) -> Self {
        let clamp = |v: i32| v.clamp(0, MAX_PERCENT as i32) as u8;
        Self {
            brightness: clamp(brightness),
            contrast: clamp(contrast),
            saturation: clamp(saturation),
        }
    }

    /// Check that every field lies in the 0-200 domain.
    pub fn validate(&self) -> Result<(), EditError> {
        for (field, value) in [
            ("brightness", self.brightness),
            ("contrast", self.contrast),
            ("saturation", self.saturation),
        ] {
            if value > MAX_PERCENT {
                return Err(EditError::AdjustmentOutOfRange { field, value });
            }
        }
        Ok(())
    }

    /// Check if this is the identity triple
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// Apply an adjustment triple, returning a new buffer.
///
/// The identity triple returns an exact copy.
///
/// # Example
/// ```
/// use snaplab_core::{AdjustmentTriple, PixelBuffer, adjustments::apply};
///
/// let buf = PixelBuffer::new(1, 1, vec![10, 10, 10, 255]).unwrap();
/// let adj = AdjustmentTriple::new(120, 100, 100).unwrap();
/// assert_eq!(apply(&buf, adj).pixels(), &[61, 61, 61, 255]);
/// ```
pub fn apply(buffer: &PixelBuffer, adj: AdjustmentTriple) -> PixelBuffer {
    let mut out = buffer.clone();
    apply_in_place(&mut out, adj);
    out
}

/// Apply an adjustment triple to a buffer in place.
pub fn apply_in_place(buffer: &mut PixelBuffer, adj: AdjustmentTriple) {
    // Early exit if no adjustments
    if adj.is_identity() {
        return;
    }

    let stages = Stages::new(adj);
    for chunk in buffer.pixels_mut().chunks_exact_mut(CHANNELS) {
        let rgb = stages.run([chunk[0], chunk[1], chunk[2]]);
        chunk[..3].copy_from_slice(&rgb);
    }
}

/// Per-triple constants, computed once per buffer.
struct Stages {
    brightness_offset: f64,
    contrast_factor: f64,
    saturation_factor: f64,
    adj: AdjustmentTriple,
}

impl Stages {
    fn new(adj: AdjustmentTriple) -> Self {
        Self {
            brightness_offset: brightness_offset(adj.brightness),
            contrast_factor: contrast_factor(adj.contrast),
            saturation_factor: adj.saturation as f64 / 100.0,
            adj,
        }
    }

    #[inline]
    fn run(&self, mut rgb: [u8; 3]) -> [u8; 3] {
        if self.adj.brightness != NEUTRAL_PERCENT {
            rgb = rgb.map(|c| quantize(c as f64 + self.brightness_offset));
        }
        if self.adj.contrast != NEUTRAL_PERCENT {
            rgb = rgb.map(|c| quantize(self.contrast_factor * (c as f64 - 128.0) + 128.0));
        }
        if self.adj.saturation != NEUTRAL_PERCENT {
            let gray = gray_level(rgb);
            rgb = rgb.map(|c| quantize(gray + self.saturation_factor * (c as f64 - gray)));
        }
        rgb
    }
}

/// Additive brightness shift: `(brightness - 100) * 2.55`.
#[inline]
fn brightness_offset(brightness: u8) -> f64 {
    // Multiply before dividing so whole-number offsets stay exact.
    (brightness as f64 - 100.0) * 255.0 / 100.0
}

/// Contrast multiplier around mid-gray.
///
/// Formula: `259 * (k + 255) / (255 * (259 - k))` with `k = contrast - 100`,
/// giving exactly 1.0 at `contrast = 100`. For any `u8` input the divisor
/// stays at or above 104.
#[inline]
fn contrast_factor(contrast: u8) -> f64 {
    let k = contrast as f64 - 100.0;
    (259.0 * (k + 255.0)) / (255.0 * (259.0 - k))
}

/// Weighted gray level of post-contrast channels.
#[inline]
fn gray_level([r, g, b]: [u8; 3]) -> f64 {
    GRAY_R * r as f64 + GRAY_G * g as f64 + GRAY_B * b as f64
}

#[inline]
fn quantize(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
