//! Edit session: history engine plus debounced slider commits.
//!
//! Slider drags call [`EditSession::set_adjustments`] for every
//! intermediate value. Each call previews the value live and re-arms the
//! settle timer; only once input has been quiet for the settle window does
//! a single adjustment snapshot reach the history log.
//!
//! Loading an image or navigating history discards a pending value.
//! Committing a transform flushes it first.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adjustments::AdjustmentTriple;
use crate::buffer::PixelBuffer;
use crate::error::EditError;
use crate::history::HistoryEngine;
use crate::settle::{Generation, SettleTimer};
use crate::transform::{FlipAxis, TransformKind};

/// Quiet period before a slider value is committed.
pub const DEFAULT_SETTLE_WINDOW: Duration = Duration::from_millis(500);

/// Options for an [`EditSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Quiet period before a pending adjustment is committed.
    /// Default: 500ms
    #[serde(rename = "settle_window_ms", with = "duration_ms")]
    pub settle_window: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            settle_window: DEFAULT_SETTLE_WINDOW,
        }
    }
}

impl SessionOptions {
    /// Create new session options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the settle window.
    pub fn settle_window(mut self, window: Duration) -> Self {
        self.settle_window = window;
        self
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis().min(u64::MAX as u128) as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// A [`HistoryEngine`] driven by discrete actions and continuous slider input.
#[derive(Debug)]
pub struct EditSession {
    engine: HistoryEngine,
    timer: SettleTimer<AdjustmentTriple>,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl EditSession {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            engine: HistoryEngine::new(),
            timer: SettleTimer::new(options.settle_window),
        }
    }

    /// Start editing `base`. A pending adjustment is discarded, never committed.
    pub fn load(&mut self, base: PixelBuffer) {
        if self.timer.cancel().is_some() {
            debug!("discarding pending adjustment on load");
        }
        self.engine.load(base);
    }

    /// Preview an in-flight slider value and (re)arm the settle timer.
    ///
    /// Returns the token a host-side timer can hand to [`fire`](Self::fire).
    pub fn set_adjustments(
        &mut self,
        adj: AdjustmentTriple,
        now: Duration,
    ) -> Result<Generation, EditError> {
        self.engine.preview(adj)?;
        Ok(self.timer.arm(adj, now))
    }

    /// Commit the pending adjustment if the settle window has elapsed.
    ///
    /// Returns true if a snapshot was appended to the log.
    pub fn poll(&mut self, now: Duration) -> Result<bool, EditError> {
        match self.timer.poll(now) {
            Some(adj) => self.commit_settled(adj),
            None => Ok(false),
        }
    }

    /// Commit the pending adjustment if `generation` is still the latest arm.
    pub fn fire(&mut self, generation: Generation) -> Result<bool, EditError> {
        match self.timer.fire(generation) {
            Some(adj) => self.commit_settled(adj),
            None => {
                debug!(generation = generation.get(), "ignoring stale settle timer");
                Ok(false)
            }
        }
    }

    /// Commit the pending adjustment now, without waiting for the window.
    pub fn flush(&mut self) -> Result<bool, EditError> {
        match self.timer.cancel() {
            Some(adj) => self.commit_settled(adj),
            None => Ok(false),
        }
    }

    fn commit_settled(&mut self, adj: AdjustmentTriple) -> Result<bool, EditError> {
        if self.engine.current_adjustments() == Some(adj) {
            debug!(?adj, "settled adjustment unchanged, not committing");
            self.engine.discard_preview();
            return Ok(false);
        }
        debug!(?adj, "committing settled adjustment");
        self.engine.commit(adj)?;
        Ok(true)
    }

    /// Commit one geometric step, flushing any pending adjustment first.
    pub fn transform(&mut self, kind: TransformKind) -> Result<(), EditError> {
        if !self.engine.is_loaded() {
            return Err(EditError::NoImageLoaded);
        }
        self.flush()?;
        self.engine.commit(kind)
    }

    /// Rotate by +90 or -90 degrees.
    pub fn rotate(&mut self, angle_degrees: i32) -> Result<(), EditError> {
        self.transform(TransformKind::rotate(angle_degrees)?)
    }

    pub fn flip(&mut self, axis: FlipAxis) -> Result<(), EditError> {
        self.transform(TransformKind::Flip(axis))
    }

    /// Undo one step. A pending adjustment is discarded, never committed.
    pub fn undo(&mut self) -> bool {
        let discarded = self.timer.cancel().is_some();
        let moved = self.engine.undo();
        self.after_navigation(discarded, moved)
    }

    /// Redo one step. A pending adjustment is discarded, never committed.
    pub fn redo(&mut self) -> bool {
        let discarded = self.timer.cancel().is_some();
        let moved = self.engine.redo();
        self.after_navigation(discarded, moved)
    }

    fn after_navigation(&mut self, discarded: bool, moved: bool) -> bool {
        if discarded {
            debug!("discarding pending adjustment on history navigation");
            if !moved {
                self.engine.discard_preview();
            }
        }
        moved
    }

    pub fn current_buffer(&self) -> Result<Arc<PixelBuffer>, EditError> {
        self.engine.current_buffer()
    }

    /// Adjustment a slider UI should show: the pending value, else the
    /// logged one.
    pub fn displayed_adjustments(&self) -> Option<AdjustmentTriple> {
        self.timer
            .pending()
            .copied()
            .or_else(|| self.engine.current_adjustments())
    }

    pub fn pending(&self) -> Option<AdjustmentTriple> {
        self.timer.pending().copied()
    }

    /// When the pending adjustment will settle.
    pub fn settle_deadline(&self) -> Option<Duration> {
        self.timer.deadline()
    }

    pub fn settle_window(&self) -> Duration {
        self.timer.window()
    }

    pub fn engine(&self) -> &HistoryEngine {
        &self.engine
    }
}
