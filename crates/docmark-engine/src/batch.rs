//! # Batch Planning
//!
//! Splits a compiled operation list into the phase-ordered batches a remote
//! executor sends. All deletes go first, then all inserts, then every style
//! and bullet operation. Later phases address offsets that assume earlier
//! phases have completed, so phases never interleave and the original order
//! within a phase is kept.

use std::fmt;

use serde::Serialize;

use crate::ops::EditOperation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Delete,
    Insert,
    Style,
}

impl Phase {
    pub fn of(op: &EditOperation) -> Self {
        match op {
            EditOperation::DeleteContentRange { .. } => Phase::Delete,
            EditOperation::InsertText { .. } => Phase::Insert,
            EditOperation::UpdateTextStyle { .. }
            | EditOperation::UpdateParagraphStyle { .. }
            | EditOperation::CreateBulletRange { .. } => Phase::Style,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Delete => f.write_str("delete"),
            Phase::Insert => f.write_str("insert"),
            Phase::Style => f.write_str("style"),
        }
    }
}

/// Operations sent together in one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Batch {
    pub phase: Phase,
    pub operations: Vec<EditOperation>,
}

/// Plans batches of at most `max_batch_size` operations (a size of 0 is
/// treated as 1).
pub fn plan_batches(operations: &[EditOperation], max_batch_size: usize) -> Vec<Batch> {
    let size = max_batch_size.max(1);
    let mut batches = Vec::new();

    for phase in [Phase::Delete, Phase::Insert, Phase::Style] {
        let ops: Vec<&EditOperation> = operations
            .iter()
            .filter(|op| Phase::of(op) == phase)
            .collect();
        for chunk in ops.chunks(size) {
            batches.push(Batch {
                phase,
                operations: chunk.iter().map(|op| (*op).clone()).collect(),
            });
        }
    }

    log::debug!("{}", BatchSummary::of(&batches));
    batches
}

/// Per-phase counts of a plan, for logging and reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub batches: usize,
    pub deletes: usize,
    pub inserts: usize,
    pub styles: usize,
}

impl BatchSummary {
    pub fn of(batches: &[Batch]) -> Self {
        let mut summary = Self {
            batches: batches.len(),
            ..Self::default()
        };
        for batch in batches {
            let count = batch.operations.len();
            match batch.phase {
                Phase::Delete => summary.deletes += count,
                Phase::Insert => summary.inserts += count,
                Phase::Style => summary.styles += count,
            }
        }
        summary
    }

    pub fn operations(&self) -> usize {
        self.deletes + self.inserts + self.styles
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} operations in {} batches ({} delete, {} insert, {} style)",
            self.operations(),
            self.batches,
            self.deletes,
            self.inserts,
            self.styles
        )
    }
}
