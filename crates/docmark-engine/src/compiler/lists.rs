use std::sync::LazyLock;

use regex::Regex;

use crate::ops::BulletPreset;
use crate::span::Span;

/// Task-list checkbox prefix: `[ ]`, `[x]` or `[X]` followed by whitespace.
static TASK_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[[ xX]\]\s+").expect("task prefix pattern is valid"));

/// Byte length of a leading task-list checkbox prefix, if present.
pub(crate) fn task_prefix_len(text: &str) -> Option<usize> {
    TASK_PREFIX.find(text).map(|m| m.end())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListKind {
    Bullet,
    Ordered,
}

impl ListKind {
    pub fn preset(self) -> BulletPreset {
        match self {
            ListKind::Bullet => BulletPreset::Unordered,
            ListKind::Ordered => BulletPreset::Ordered,
        }
    }
}

/// An open list; `nesting_level` is the list-stack depth when it opened.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ListFrame {
    pub kind: ListKind,
    pub nesting_level: usize,
}

/// A list item awaiting bullet assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingListItem {
    pub start: usize,
    /// Offset just before the item's trailing newline, once known.
    pub end: Option<usize>,
    pub nesting_level: usize,
    pub preset: BulletPreset,
    pub task_prefix_consumed: bool,
}

impl PendingListItem {
    fn span(&self) -> Option<Span> {
        self.end
            .filter(|end| *end > self.start)
            .map(|end| Span::new(self.start, end))
    }
}

/// A merged run of adjacent list items sharing one preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BulletRange {
    pub span: Span,
    pub preset: BulletPreset,
}

/// Merges list items into contiguous bullet ranges.
///
/// Items are merged only when the next one starts at or before
/// `last_end + 1` (nothing but a separating newline between them) and carries
/// the same preset. Ranges come back in descending start order so applying
/// them, which strips nesting tabs and shifts later offsets, never
/// invalidates a range still to be applied.
pub(crate) fn merge_bullet_ranges(items: &[PendingListItem]) -> Vec<BulletRange> {
    let mut valid: Vec<(Span, BulletPreset)> = items
        .iter()
        .filter_map(|item| item.span().map(|span| (span, item.preset)))
        .collect();
    valid.sort_by_key(|(span, _)| span.start);

    let mut merged: Vec<BulletRange> = Vec::new();
    for (span, preset) in valid {
        if let Some(last) = merged.last_mut()
            && last.preset == preset
            && span.start <= last.span.end + 1
        {
            last.span.end = last.span.end.max(span.end);
            continue;
        }
        merged.push(BulletRange { span, preset });
    }

    merged.sort_by(|a, b| b.span.start.cmp(&a.span.start));
    merged
}
