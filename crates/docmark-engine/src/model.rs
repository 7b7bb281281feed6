//! # Document Model
//!
//! Read-only input to the reverse renderer: the body of an already-fetched
//! document plus the registry describing each list's per-level glyphs.
//!
//! Deserializes from JSON shaped like:
//!
//! ```json
//! {
//!   "blocks": [
//!     {"type": "paragraph", "namedStyle": "HEADING_1", "runs": [{"text": "Title\n"}]},
//!     {"type": "paragraph", "bullet": {"listId": "l1", "nestingLevel": 0},
//!      "runs": [{"text": "item\n", "bold": true}]},
//!     {"type": "table", "rows": [{"cells": [{"runs": [{"text": "a\n"}]}]}]},
//!     {"type": "sectionBreak"}
//!   ],
//!   "lists": {"l1": [{"glyphType": "DECIMAL"}, {"glyphSymbol": "●"}]}
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ops::NamedStyle;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentModel {
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub lists: ListRegistry,
}

/// A top-level structural element of the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    SectionBreak,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_style: Option<NamedStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullet: Option<BulletInfo>,
    #[serde(default)]
    pub runs: Vec<InlineRun>,
}

impl Paragraph {
    /// Concatenated raw text of every run.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

/// List membership of a bulleted paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletInfo {
    pub list_id: String,
    #[serde(default)]
    pub nesting_level: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default)]
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(default)]
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    #[serde(default)]
    pub runs: Vec<InlineRun>,
}

/// A run of text sharing one inline style.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InlineRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

impl InlineRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Glyph descriptor of one nesting level of a list.
///
/// Ordered levels carry a glyph type (`DECIMAL`, `ALPHA`, ...), unordered
/// levels a literal glyph symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListLevel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glyph_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glyph_symbol: Option<String>,
}

impl ListLevel {
    pub fn is_ordered(&self) -> bool {
        self.glyph_type
            .as_deref()
            .is_some_and(|t| !t.is_empty() && t != "GLYPH_TYPE_UNSPECIFIED")
    }
}

/// List id to per-nesting-level glyph descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListRegistry(pub BTreeMap<String, Vec<ListLevel>>);

impl ListRegistry {
    /// Whether `list_id` is ordered at `nesting_level`. Unknown lists and
    /// levels count as unordered.
    pub fn is_ordered(&self, list_id: &str, nesting_level: usize) -> bool {
        self.0
            .get(list_id)
            .and_then(|levels| levels.get(nesting_level))
            .is_some_and(ListLevel::is_ordered)
    }
}
