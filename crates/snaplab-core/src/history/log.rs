//! The operation log and its cursor.

use serde::{Deserialize, Serialize};

use crate::adjustments::AdjustmentTriple;
use crate::error::EditError;
use crate::transform::{NetTransform, TransformKind};

/// One logged edit action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// A committed, absolute adjustment state. Supersedes earlier snapshots.
    AdjustmentSnapshot(AdjustmentTriple),
    /// One incremental geometric step.
    Transform(TransformKind),
}

impl Operation {
    /// Check the operation's parameters against their domains.
    pub fn validate(&self) -> Result<(), EditError> {
        match self {
            Operation::AdjustmentSnapshot(adj) => adj.validate(),
            Operation::Transform(_) => Ok(()),
        }
    }
}

impl From<AdjustmentTriple> for Operation {
    fn from(adj: AdjustmentTriple) -> Self {
        Operation::AdjustmentSnapshot(adj)
    }
}

impl From<TransformKind> for Operation {
    fn from(kind: TransformKind) -> Self {
        Operation::Transform(kind)
    }
}

/// Ordered operations plus the index of the last applied one.
///
/// Always non-empty: index 0 holds the identity adjustment snapshot, so
/// `cursor` never drops below 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryLog {
    operations: Vec<Operation>,
    cursor: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryLog {
    /// A fresh log holding only the identity baseline.
    pub fn new() -> Self {
        Self {
            operations: vec![Operation::AdjustmentSnapshot(AdjustmentTriple::IDENTITY)],
            cursor: 0,
        }
    }

    /// Drop the redo tail, append `op` and move the cursor onto it.
    pub fn push(&mut self, op: Operation) {
        self.operations.truncate(self.cursor + 1);
        self.operations.push(op);
        self.cursor = self.operations.len() - 1;
    }

    /// Step the cursor back. Returns false at the baseline.
    pub fn undo(&mut self) -> bool {
        if self.can_undo() {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Step the cursor forward. Returns false at the end.
    pub fn redo(&mut self) -> bool {
        if self.can_redo() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.operations.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Never true; the baseline entry is always present.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Every operation, including the redo tail.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Operations `[0..=cursor]`.
    pub fn applied(&self) -> &[Operation] {
        &self.operations[..=self.cursor]
    }

    /// Net geometric effect of the applied operations.
    pub fn net_transform(&self) -> NetTransform {
        NetTransform::accumulate(self.applied().iter().filter_map(|op| match op {
            Operation::Transform(kind) => Some(kind),
            Operation::AdjustmentSnapshot(_) => None,
        }))
    }

    /// The most recent applied adjustment snapshot, or identity.
    pub fn current_adjustments(&self) -> AdjustmentTriple {
        self.applied()
            .iter()
            .rev()
            .find_map(|op| match op {
                Operation::AdjustmentSnapshot(adj) => Some(*adj),
                Operation::Transform(_) => None,
            })
            .unwrap_or(AdjustmentTriple::IDENTITY)
    }
}
