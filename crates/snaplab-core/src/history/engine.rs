//! Replay of the history log into the displayed image.

use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use super::log::{HistoryLog, Operation};
use crate::adjustments::{self, AdjustmentTriple};
use crate::buffer::PixelBuffer;
use crate::error::EditError;
use crate::transform::NetTransform;

/// Owns the base image, the operation log and the working image.
///
/// The working image is recomputed in full from the base image on every
/// cursor change. Nothing outside the engine can mutate it; readers get an
/// `Arc` to the last complete result.
#[derive(Debug, Default)]
pub struct HistoryEngine {
    loaded: Option<Loaded>,
}

#[derive(Debug)]
struct Loaded {
    base: Arc<PixelBuffer>,
    log: HistoryLog,
    working: Arc<PixelBuffer>,
    preview: Option<AdjustmentTriple>,
}

impl Loaded {
    /// Recompute the working image from the log.
    fn replay(&mut self) {
        let net = self.log.net_transform();
        let adj = self.log.current_adjustments();
        let working = composite(&self.base, net, adj);
        debug!(
            cursor = self.log.cursor(),
            rotation = net.rotation.degrees(),
            flip_h = net.flip_h,
            flip_v = net.flip_v,
            ?adj,
            width = working.width(),
            height = working.height(),
            "replayed history"
        );
        self.working = Arc::new(working);
        self.preview = None;
    }
}

/// Remap the base image once, then color-adjust it once.
fn composite(base: &PixelBuffer, net: NetTransform, adj: AdjustmentTriple) -> PixelBuffer {
    let mut out = net.apply(base);
    adjustments::apply_in_place(&mut out, adj);
    out
}

impl HistoryEngine {
    /// An engine with no image loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new editing session on `base`, discarding any previous one.
    pub fn load(&mut self, base: PixelBuffer) {
        info!(
            width = base.width(),
            height = base.height(),
            "loading image"
        );
        let base = Arc::new(base);
        // Identity replay: the working image is the base itself.
        self.loaded = Some(Loaded {
            working: Arc::clone(&base),
            base,
            log: HistoryLog::new(),
            preview: None,
        });
    }

    /// Append `op` after the cursor, discarding any redo tail, and replay.
    ///
    /// # Errors
    ///
    /// [`EditError::NoImageLoaded`] before `load`, or the operation's own
    /// validation error.
    pub fn commit(&mut self, op: impl Into<Operation>) -> Result<(), EditError> {
        let op = op.into();
        let loaded = self.loaded.as_mut().ok_or(EditError::NoImageLoaded)?;
        if let Err(err) = op.validate() {
            warn!(?op, %err, "rejected operation");
            return Err(err);
        }

        let discarded = loaded.log.len() - loaded.log.cursor() - 1;
        loaded.log.push(op);
        debug!(?op, cursor = loaded.log.cursor(), discarded, "committed operation");
        loaded.replay();
        Ok(())
    }

    /// Step back one operation. A no-op returning false at the baseline or
    /// with no image loaded.
    pub fn undo(&mut self) -> bool {
        let Some(loaded) = self.loaded.as_mut() else {
            return false;
        };
        if !loaded.log.undo() {
            return false;
        }
        debug!(cursor = loaded.log.cursor(), "undo");
        loaded.replay();
        true
    }

    /// Step forward one operation. A no-op returning false at the end of
    /// the log or with no image loaded.
    pub fn redo(&mut self) -> bool {
        let Some(loaded) = self.loaded.as_mut() else {
            return false;
        };
        if !loaded.log.redo() {
            return false;
        }
        debug!(cursor = loaded.log.cursor(), "redo");
        loaded.replay();
        true
    }

    /// Show `adj` in place of the logged adjustment without touching the log.
    pub fn preview(&mut self, adj: AdjustmentTriple) -> Result<(), EditError> {
        let loaded = self.loaded.as_mut().ok_or(EditError::NoImageLoaded)?;
        adj.validate()?;
        trace!(?adj, "previewing adjustment");
        loaded.working = Arc::new(composite(&loaded.base, loaded.log.net_transform(), adj));
        loaded.preview = Some(adj);
        Ok(())
    }

    /// Drop any preview and show the logged state again.
    pub fn discard_preview(&mut self) {
        if let Some(loaded) = self.loaded.as_mut() {
            if loaded.preview.is_some() {
                trace!("discarding preview");
                loaded.replay();
            }
        }
    }

    /// The working image.
    ///
    /// # Errors
    ///
    /// [`EditError::NoImageLoaded`] before `load`. A loaded 0x0 image is
    /// returned as an empty buffer, not an error.
    pub fn current_buffer(&self) -> Result<Arc<PixelBuffer>, EditError> {
        self.loaded
            .as_ref()
            .map(|l| Arc::clone(&l.working))
            .ok_or(EditError::NoImageLoaded)
    }

    /// The image as it was loaded.
    pub fn base_buffer(&self) -> Result<Arc<PixelBuffer>, EditError> {
        self.loaded
            .as_ref()
            .map(|l| Arc::clone(&l.base))
            .ok_or(EditError::NoImageLoaded)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.loaded.as_ref().is_some_and(|l| l.log.can_undo())
    }

    pub fn can_redo(&self) -> bool {
        self.loaded.as_ref().is_some_and(|l| l.log.can_redo())
    }

    /// Cursor position, `None` with no image loaded.
    pub fn cursor(&self) -> Option<usize> {
        self.loaded.as_ref().map(|l| l.log.cursor())
    }

    /// Number of logged operations, 0 with no image loaded.
    pub fn len(&self) -> usize {
        self.loaded.as_ref().map_or(0, |l| l.log.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every logged operation, including the redo tail.
    pub fn operations(&self) -> &[Operation] {
        match &self.loaded {
            Some(l) => l.log.operations(),
            None => &[],
        }
    }

    /// The log itself, for inspection or serialization.
    pub fn log(&self) -> Option<&HistoryLog> {
        self.loaded.as_ref().map(|l| &l.log)
    }

    /// Net rotation and flips at the cursor.
    pub fn net_transform(&self) -> Option<NetTransform> {
        self.loaded.as_ref().map(|l| l.log.net_transform())
    }

    /// Adjustment snapshot in effect at the cursor.
    pub fn current_adjustments(&self) -> Option<AdjustmentTriple> {
        self.loaded.as_ref().map(|l| l.log.current_adjustments())
    }

    /// The in-flight triple currently shown, if any.
    pub fn previewing(&self) -> Option<AdjustmentTriple> {
        self.loaded.as_ref().and_then(|l| l.preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{FlipAxis, RotateStep, TransformKind};

    const CW: TransformKind = TransformKind::Rotate(RotateStep::Clockwise);
    const CCW: TransformKind = TransformKind::Rotate(RotateStep::CounterClockwise);
    const FLIP_H: TransformKind = TransformKind::Flip(FlipAxis::Horizontal);

    fn triple(brightness: u8, contrast: u8, saturation: u8) -> AdjustmentTriple {
        AdjustmentTriple::new(brightness, contrast, saturation).unwrap()
    }

    /// 3x2 image, red channel = 1..=6 in row-major order.
    fn fixture() -> PixelBuffer {
        PixelBuffer::from_fn(3, 2, |x, y| [(y * 3 + x + 1) as u8, 0, 0, 255])
    }

    fn labels(buf: &PixelBuffer) -> Vec<u8> {
        buf.pixels().chunks_exact(4).map(|px| px[0]).collect()
    }

    fn loaded(base: PixelBuffer) -> HistoryEngine {
        let mut engine = HistoryEngine::new();
        engine.load(base);
        engine
    }

    #[test]
    fn test_no_image_is_distinct_from_empty_image() {
        let mut engine = HistoryEngine::new();
        assert_eq!(engine.current_buffer().unwrap_err(), EditError::NoImageLoaded);
        assert_eq!(engine.commit(CW).unwrap_err(), EditError::NoImageLoaded);
        assert!(!engine.undo());
        assert!(!engine.redo());
        assert!(engine.is_empty());

        engine.load(PixelBuffer::new(0, 0, vec![]).unwrap());
        let current = engine.current_buffer().unwrap();
        assert!(current.is_empty());
    }

    #[test]
    fn test_load_is_identity_replay() {
        let engine = loaded(fixture());
        assert_eq!(*engine.current_buffer().unwrap(), fixture());
        assert_eq!(engine.len(), 1);
        assert_eq!(engine.cursor(), Some(0));
        assert_eq!(engine.current_adjustments(), Some(AdjustmentTriple::IDENTITY));
    }

    #[test]
    fn test_brightness_scenario() {
        let base = PixelBuffer::new(2, 1, vec![10, 10, 10, 255, 250, 250, 250, 255]).unwrap();
        let mut engine = loaded(base);
        engine.commit(triple(120, 100, 100)).unwrap();
        assert_eq!(
            engine.current_buffer().unwrap().pixels(),
            &[61, 61, 61, 255, 255, 255, 255, 255]
        );
    }

    #[test]
    fn test_rotate_scenario() {
        let mut engine = loaded(fixture());
        engine.commit(CW).unwrap();
        let out = engine.current_buffer().unwrap();
        assert_eq!(out.dimensions(), (2, 3));
        assert_eq!(labels(&out), vec![4, 1, 5, 2, 6, 3]);
    }

    #[test]
    fn test_branch_truncation() {
        let mut engine = loaded(fixture());
        engine.commit(triple(110, 100, 100)).unwrap(); // A
        engine.commit(CW).unwrap(); // B
        assert!(engine.undo());
        engine.commit(FLIP_H).unwrap(); // C

        assert_eq!(engine.len(), 3);
        assert!(!engine.redo());
        assert_eq!(engine.operations()[2], Operation::Transform(FLIP_H));
        assert!(!engine.operations().contains(&Operation::Transform(CW)));
    }

    #[test]
    fn test_undo_redo_boundaries_are_noops() {
        let mut engine = loaded(fixture());
        assert!(!engine.undo());
        assert!(!engine.can_undo());

        engine.commit(CW).unwrap();
        assert!(!engine.redo());
        assert!(engine.can_undo());
        assert!(engine.undo());
        assert!(engine.can_redo());
        assert_eq!(*engine.current_buffer().unwrap(), fixture());
    }

    #[test]
    fn test_flip_involution() {
        let mut engine = loaded(fixture());
        engine.commit(CW).unwrap();
        let before = engine.current_buffer().unwrap();
        engine.commit(FLIP_H).unwrap();
        engine.commit(FLIP_H).unwrap();
        assert_eq!(engine.current_buffer().unwrap(), before);
    }

    #[test]
    fn test_rotation_periodicity() {
        let mut engine = loaded(fixture());
        for _ in 0..4 {
            engine.commit(CW).unwrap();
        }
        assert_eq!(*engine.current_buffer().unwrap(), fixture());
        assert!(engine.net_transform().unwrap().is_identity());
    }

    #[test]
    fn test_counter_clockwise_cancels_clockwise() {
        let mut engine = loaded(fixture());
        engine.commit(CCW).unwrap();
        assert_eq!(engine.current_buffer().unwrap().dimensions(), (2, 3));
        engine.commit(CW).unwrap();
        assert_eq!(*engine.current_buffer().unwrap(), fixture());
    }

    #[test]
    fn test_latest_snapshot_wins_across_transforms() {
        let base = PixelBuffer::filled(2, 1, [100, 100, 100, 255]).unwrap();
        let mut engine = loaded(base);
        engine.commit(triple(200, 100, 100)).unwrap();
        engine.commit(CW).unwrap();
        engine.commit(triple(80, 100, 100)).unwrap();

        // 100 + (80 - 100) * 2.55 = 49
        let out = engine.current_buffer().unwrap();
        assert_eq!(out.dimensions(), (1, 2));
        assert_eq!(out.pixels(), &[49, 49, 49, 255, 49, 49, 49, 255]);

        // Earlier snapshot is still reachable through undo.
        engine.undo();
        engine.undo();
        assert_eq!(engine.current_buffer().unwrap().pixels()[0], 255);
    }

    #[test]
    fn test_commit_rejects_invalid_snapshot() {
        let mut engine = loaded(fixture());
        let bad = AdjustmentTriple {
            brightness: 201,
            ..AdjustmentTriple::IDENTITY
        };
        assert!(matches!(
            engine.commit(bad),
            Err(EditError::AdjustmentOutOfRange { field: "brightness", value: 201 })
        ));
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn test_load_discards_previous_session() {
        let mut engine = loaded(fixture());
        engine.commit(CW).unwrap();
        engine.commit(FLIP_H).unwrap();

        let next = PixelBuffer::filled(1, 1, [7, 7, 7, 7]).unwrap();
        engine.load(next.clone());
        assert_eq!(engine.len(), 1);
        assert!(!engine.can_undo());
        assert_eq!(*engine.current_buffer().unwrap(), next);
        assert_eq!(*engine.base_buffer().unwrap(), next);
    }

    #[test]
    fn test_preview_leaves_log_untouched() {
        let base = PixelBuffer::filled(1, 1, [10, 10, 10, 255]).unwrap();
        let mut engine = loaded(base.clone());
        engine.commit(CW).unwrap();

        engine.preview(triple(120, 100, 100)).unwrap();
        assert_eq!(engine.current_buffer().unwrap().pixels(), &[61, 61, 61, 255]);
        assert_eq!(engine.len(), 2);
        assert_eq!(engine.previewing(), Some(triple(120, 100, 100)));
        assert_eq!(engine.current_adjustments(), Some(AdjustmentTriple::IDENTITY));

        engine.discard_preview();
        assert_eq!(*engine.current_buffer().unwrap(), base);
        assert_eq!(engine.previewing(), None);
    }

    #[test]
    fn test_readers_keep_previous_buffer() {
        let mut engine = loaded(fixture());
        let held = engine.current_buffer().unwrap();
        engine.commit(CW).unwrap();
        assert_eq!(*held, fixture());
        assert_ne!(*engine.current_buffer().unwrap(), *held);
    }

    #[test]
    fn test_base_is_never_mutated() {
        let mut engine = loaded(fixture());
        engine.commit(triple(150, 150, 50)).unwrap();
        engine.commit(CW).unwrap();
        assert_eq!(*engine.base_buffer().unwrap(), fixture());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn op_strategy() -> impl Strategy<Value = Operation> {
            prop_oneof![
                Just(Operation::Transform(CW)),
                Just(Operation::Transform(CCW)),
                Just(Operation::Transform(FLIP_H)),
                Just(Operation::Transform(TransformKind::Flip(FlipAxis::Vertical))),
                (0u8..=200, 0u8..=200, 0u8..=200).prop_map(|(b, c, s)| {
                    Operation::AdjustmentSnapshot(AdjustmentTriple {
                        brightness: b,
                        contrast: c,
                        saturation: s,
                    })
                }),
            ]
        }

        fn buffer_strategy() -> impl Strategy<Value = PixelBuffer> {
            (1u32..=5, 1u32..=5).prop_flat_map(|(w, h)| {
                prop::collection::vec(any::<u8>(), (w * h * 4) as usize)
                    .prop_map(move |px| PixelBuffer::new(w, h, px).unwrap())
            })
        }

        proptest! {
            /// Property: Loading any buffer displays it unchanged.
            #[test]
            fn prop_identity_replay(buf in buffer_strategy()) {
                let engine = loaded(buf.clone());
                prop_assert_eq!(&*engine.current_buffer().unwrap(), &buf);
            }

            /// Property: Undoing to the baseline and redoing to the end revisits
            /// exactly the buffers produced at commit time.
            #[test]
            fn prop_undo_redo_round_trip(
                buf in buffer_strategy(),
                ops in prop::collection::vec(op_strategy(), 1..8),
            ) {
                let mut engine = loaded(buf.clone());
                let mut produced = vec![engine.current_buffer().unwrap()];
                for op in &ops {
                    engine.commit(*op).unwrap();
                    produced.push(engine.current_buffer().unwrap());
                }

                for expected in produced.iter().rev().skip(1) {
                    prop_assert!(engine.undo());
                    prop_assert_eq!(&engine.current_buffer().unwrap(), expected);
                }
                prop_assert!(!engine.undo());

                for expected in produced.iter().skip(1) {
                    prop_assert!(engine.redo());
                    prop_assert_eq!(&engine.current_buffer().unwrap(), expected);
                }
                prop_assert!(!engine.redo());
            }

            /// Property: Replay is a pure function of the applied log.
            #[test]
            fn prop_replay_deterministic(
                buf in buffer_strategy(),
                ops in prop::collection::vec(op_strategy(), 0..8),
            ) {
                let mut a = loaded(buf.clone());
                let mut b = loaded(buf);
                for op in &ops {
                    a.commit(*op).unwrap();
                    b.commit(*op).unwrap();
                }
                // Navigating away and back must not change the result.
                b.undo();
                b.redo();
                prop_assert_eq!(a.current_buffer().unwrap(), b.current_buffer().unwrap());
            }
        }
    }
}
