//! Snaplab Core - Edit history and compositing engine
//!
//! This crate records image edits as a branchable log of operations and
//! replays that log from the original pixels to produce the displayed
//! image: quarter-turn rotation, mirroring, and brightness / contrast /
//! saturation adjustment.
//!
//! # Module Structure
//!
//! - `buffer` - RGBA pixel buffers
//! - `adjustments` - Per-pixel color adjustment
//! - `transform` - Rotation and flip, folded into one net transform
//! - `history` - Operation log, cursor and replay engine
//! - `settle` - Generation-counted single-shot timer
//! - `session` - Engine plus debounced slider commits

pub mod adjustments;
pub mod buffer;
pub mod error;
pub mod history;
pub mod session;
pub mod settle;
pub mod transform;

pub use adjustments::AdjustmentTriple;
pub use buffer::PixelBuffer;
pub use error::EditError;
pub use history::{HistoryEngine, HistoryLog, Operation};
pub use session::{EditSession, SessionOptions, DEFAULT_SETTLE_WINDOW};
pub use settle::{Generation, SettleTimer};
pub use transform::{FlipAxis, NetTransform, RotateStep, Rotation, TransformKind};
