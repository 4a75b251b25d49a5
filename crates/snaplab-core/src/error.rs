//! Error type shared by the edit engine.

use thiserror::Error;

/// Errors raised at the engine boundary.
///
/// The engine itself is total over valid inputs; every variant here is a
/// precondition the caller failed to meet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// An image-dependent operation was requested before `load`.
    #[error("No image loaded")]
    NoImageLoaded,

    /// An adjustment field lies outside the 0-200 percentage domain.
    #[error("Adjustment {field} out of range: {value} (expected 0-200)")]
    AdjustmentOutOfRange { field: &'static str, value: u8 },

    /// A rotation step other than +90 or -90 degrees.
    #[error("Invalid rotation angle: {0} (expected 90 or -90)")]
    InvalidRotation(i32),

    /// Pixel data length doesn't match the declared dimensions.
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    PixelDataMismatch { expected: usize, actual: usize },

    /// The byte length of a buffer with these dimensions overflows `usize`.
    #[error("Image dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_error_display() {
        let err = EditError::AdjustmentOutOfRange {
            field: "contrast",
            value: 201,
        };
        assert_eq!(
            err.to_string(),
            "Adjustment contrast out of range: 201 (expected 0-200)"
        );

        let err = EditError::InvalidRotation(45);
        assert_eq!(err.to_string(), "Invalid rotation angle: 45 (expected 90 or -90)");

        assert_eq!(EditError::NoImageLoaded.to_string(), "No image loaded");
    }
}
