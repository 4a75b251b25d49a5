//! Edit history: the operation log and the engine that replays it.
//!
//! The log is the single source of truth. Rotation, flip state and the
//! adjustment in effect are derived from it on every replay and never
//! stored alongside it.
//!
//! # Replay
//!
//! For the operations `[0..=cursor]`:
//! 1. Fold every transform into one [`NetTransform`](crate::transform::NetTransform)
//! 2. Remap the base image once (rotate, then flip)
//! 3. Color-adjust with the last adjustment snapshot (identity if none)

mod engine;
mod log;

pub use engine::HistoryEngine;
pub use log::{HistoryLog, Operation};
