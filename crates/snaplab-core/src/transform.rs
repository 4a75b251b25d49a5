//! Geometric transforms: quarter-turn rotation and mirroring.
//!
//! Individual [`TransformKind`] steps are never applied one by one. Replay
//! folds them into a [`NetTransform`] and remaps the raster once.
//!
//! # Transform Order
//!
//! A net transform is applied as:
//! 1. Rotation (0, 90, 180 or 270 degrees clockwise)
//! 2. Horizontal flip, then vertical flip, within the rotated dimensions
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y grows downward
//! - Positive angles rotate clockwise

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::error::EditError;

/// One discrete rotation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RotateStep {
    /// +90 degrees.
    Clockwise,
    /// -90 degrees.
    CounterClockwise,
}

impl RotateStep {
    /// Signed angle of this step in degrees.
    pub fn angle_degrees(self) -> i32 {
        match self {
            RotateStep::Clockwise => 90,
            RotateStep::CounterClockwise => -90,
        }
    }

    /// Quarter turns this step adds, modulo 4.
    fn quarter_turns(self) -> u8 {
        match self {
            RotateStep::Clockwise => 1,
            RotateStep::CounterClockwise => 3,
        }
    }
}

impl TryFrom<i32> for RotateStep {
    type Error = EditError;

    /// Only +90 and -90 are accepted; anything else is rejected rather than
    /// normalized.
    fn try_from(angle: i32) -> Result<Self, Self::Error> {
        match angle {
            90 => Ok(RotateStep::Clockwise),
            -90 => Ok(RotateStep::CounterClockwise),
            other => Err(EditError::InvalidRotation(other)),
        }
    }
}

/// Mirror axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlipAxis {
    /// Mirror left-right.
    Horizontal,
    /// Mirror top-bottom.
    Vertical,
}

/// A single incremental geometric edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformKind {
    Rotate(RotateStep),
    Flip(FlipAxis),
}

impl TransformKind {
    /// Rotation step from a signed angle, rejecting anything but +/-90.
    pub fn rotate(angle_degrees: i32) -> Result<Self, EditError> {
        RotateStep::try_from(angle_degrees).map(TransformKind::Rotate)
    }
}

/// Net clockwise rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Rotation::R0,
            1 => Rotation::R90,
            2 => Rotation::R180,
            _ => Rotation::R270,
        }
    }

    fn quarter_turns(self) -> u8 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 1,
            Rotation::R180 => 2,
            Rotation::R270 => 3,
        }
    }

    /// Clockwise angle in `{0, 90, 180, 270}`.
    pub fn degrees(self) -> u16 {
        self.quarter_turns() as u16 * 90
    }

    /// Returns true if this rotation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::R90 | Rotation::R270)
    }
}

/// Accumulated rotation and flip state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NetTransform {
    pub rotation: Rotation,
    pub flip_h: bool,
    pub flip_v: bool,
}

impl NetTransform {
    /// The no-op transform.
    pub const IDENTITY: Self = Self {
        rotation: Rotation::R0,
        flip_h: false,
        flip_v: false,
    };

    /// Fold a sequence of steps into their net effect.
    pub fn accumulate<'a>(steps: impl IntoIterator<Item = &'a TransformKind>) -> Self {
        steps.into_iter().fold(Self::IDENTITY, |net, step| net.then(*step))
    }

    /// The net transform after one more step.
    pub fn then(self, step: TransformKind) -> Self {
        match step {
            TransformKind::Rotate(r) => Self {
                rotation: Rotation::from_quarter_turns(
                    self.rotation.quarter_turns() + r.quarter_turns(),
                ),
                ..self
            },
            TransformKind::Flip(FlipAxis::Horizontal) => Self {
                flip_h: !self.flip_h,
                ..self
            },
            TransformKind::Flip(FlipAxis::Vertical) => Self {
                flip_v: !self.flip_v,
                ..self
            },
        }
    }

    /// Check if this transform leaves the raster unchanged
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Dimensions of a `width x height` raster after this transform.
    pub fn output_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        if self.rotation.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Map an output coordinate back to its source coordinate.
    ///
    /// `(x, y)` is in output space; `(src_w, src_h)` are the source
    /// dimensions. Flips are undone first since they were applied last.
    #[inline]
    fn source_coords(&self, x: u32, y: u32, src_w: u32, src_h: u32) -> (u32, u32) {
        let (out_w, out_h) = self.output_dimensions(src_w, src_h);
        let x = if self.flip_h { out_w - 1 - x } else { x };
        let y = if self.flip_v { out_h - 1 - y } else { y };

        match self.rotation {
            Rotation::R0 => (x, y),
            Rotation::R90 => (y, src_h - 1 - x),
            Rotation::R180 => (src_w - 1 - x, src_h - 1 - y),
            Rotation::R270 => (src_w - 1 - y, x),
        }
    }

    /// Apply the transform in a single pass.
    ///
    /// Rotation is a full-raster remap: no cropping, no padding, only the
    /// width/height swap for 90 and 270 degrees.
    pub fn apply(&self, image: &PixelBuffer) -> PixelBuffer {
        // Fast path: nothing to remap
        if self.is_identity() {
            return image.clone();
        }

        let (src_w, src_h) = image.dimensions();
        let (dst_w, dst_h) = self.output_dimensions(src_w, src_h);
        PixelBuffer::from_fn(dst_w, dst_h, |x, y| {
            let (sx, sy) = self.source_coords(x, y, src_w, src_h);
            image.pixel_unchecked(sx, sy)
        })
    }
}
