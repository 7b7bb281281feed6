//! # Edit Operations
//!
//! Output of the forward compiler and input to the remote batch executor.
//! Every operation names exactly one action and serializes to the request
//! shape the remote document API accepts:
//!
//! ```json
//! {"insertText": {"location": {"index": 1, "tabId": "t.0"}, "text": "Hello\n"}}
//! {"updateTextStyle": {"range": {"startIndex": 1, "endIndex": 6}, "textStyle": {"bold": true}, "fields": "bold"}}
//! ```
//!
//! Offsets are absolute and only valid when insertions are applied strictly
//! in the order they were produced.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// Font applied to inline code and code block lines.
pub const MONOSPACE_FONT: &str = "Courier New";

const CODE_FOREGROUND: RgbColor = RgbColor {
    red: 0.2,
    green: 0.2,
    blue: 0.2,
};
const CODE_BACKGROUND: RgbColor = RgbColor {
    red: 0.95,
    green: 0.95,
    blue: 0.95,
};
const RULE_COLOR: RgbColor = RgbColor {
    red: 0.6,
    green: 0.6,
    blue: 0.6,
};

/// A single insertion point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<String>,
}

/// A half-open `[start_index, end_index)` range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub start_index: usize,
    pub end_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<String>,
}

impl Range {
    pub fn new(span: Span, tab_id: Option<String>) -> Self {
        Self {
            start_index: span.start,
            end_index: span.end,
            tab_id,
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.start_index, self.end_index)
    }
}

/// Paragraph-level semantic role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum NamedStyle {
    NormalText,
    Title,
    Subtitle,
    /// `HEADING_N`; the remote model defines levels 1 through 6.
    Heading(u8),
}

impl NamedStyle {
    /// Markdown heading level this style renders as, if any.
    ///
    /// Title maps to 1, subtitle to 2, heading-N to N capped at 6.
    pub fn heading_level(self) -> Option<u8> {
        match self {
            NamedStyle::NormalText => None,
            NamedStyle::Title => Some(1),
            NamedStyle::Subtitle => Some(2),
            NamedStyle::Heading(0) => None,
            NamedStyle::Heading(level) => Some(level.min(6)),
        }
    }
}

impl fmt::Display for NamedStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamedStyle::NormalText => f.write_str("NORMAL_TEXT"),
            NamedStyle::Title => f.write_str("TITLE"),
            NamedStyle::Subtitle => f.write_str("SUBTITLE"),
            NamedStyle::Heading(level) => write!(f, "HEADING_{level}"),
        }
    }
}

impl From<NamedStyle> for String {
    fn from(style: NamedStyle) -> Self {
        style.to_string()
    }
}

impl From<String> for NamedStyle {
    /// Unknown style names degrade to normal text.
    fn from(name: String) -> Self {
        match name.as_str() {
            "TITLE" => NamedStyle::Title,
            "SUBTITLE" => NamedStyle::Subtitle,
            other => other
                .strip_prefix("HEADING_")
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|n| *n > 0)
                .map(NamedStyle::Heading)
                .unwrap_or(NamedStyle::NormalText),
        }
    }
}

/// Rendering treatment for a merged run of list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BulletPreset {
    #[serde(rename = "BULLET_DISC_CIRCLE_SQUARE")]
    Unordered,
    #[serde(rename = "NUMBERED_DECIMAL_ALPHA_ROMAN")]
    Ordered,
    #[serde(rename = "BULLET_CHECKBOX")]
    Checkbox,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RgbColor {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub rgb_color: RgbColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptionalColor {
    pub color: Color,
}

impl From<RgbColor> for OptionalColor {
    fn from(rgb_color: RgbColor) -> Self {
        Self {
            color: Color { rgb_color },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedFontFamily {
    pub font_family: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub url: String,
}

/// Inline style payload. Only attributes that are `Some` are sent, and the
/// accompanying field mask names exactly those.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted_font_family: Option<WeightedFontFamily>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<OptionalColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<OptionalColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

impl TextStyle {
    /// Monospace font with the fixed code foreground/background colours.
    pub fn monospace() -> Self {
        Self {
            weighted_font_family: Some(WeightedFontFamily {
                font_family: MONOSPACE_FONT.to_string(),
            }),
            foreground_color: Some(CODE_FOREGROUND.into()),
            background_color: Some(CODE_BACKGROUND.into()),
            ..Self::default()
        }
    }

    pub fn link(url: impl Into<String>) -> Self {
        Self {
            link: Some(Link { url: url.into() }),
            ..Self::default()
        }
    }

    /// Comma-separated field mask naming every attribute that is set.
    pub fn fields(&self) -> String {
        let mut fields = Vec::new();
        if self.bold.is_some() {
            fields.push("bold");
        }
        if self.italic.is_some() {
            fields.push("italic");
        }
        if self.strikethrough.is_some() {
            fields.push("strikethrough");
        }
        if self.weighted_font_family.is_some() {
            fields.push("weightedFontFamily");
        }
        if self.foreground_color.is_some() {
            fields.push("foregroundColor");
        }
        if self.background_color.is_some() {
            fields.push("backgroundColor");
        }
        if self.link.is_some() {
            fields.push("link");
        }
        fields.join(",")
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Unit {
    #[serde(rename = "PT")]
    Pt,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dimension {
    pub magnitude: f64,
    pub unit: Unit,
}

impl Dimension {
    pub fn pt(magnitude: f64) -> Self {
        Self {
            magnitude,
            unit: Unit::Pt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum DashStyle {
    #[serde(rename = "SOLID")]
    Solid,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphBorder {
    pub color: OptionalColor,
    pub width: Dimension,
    pub padding: Dimension,
    pub dash_style: DashStyle,
}

impl ParagraphBorder {
    /// Thin solid rule used as the horizontal-rule placeholder treatment.
    pub fn thin_rule() -> Self {
        Self {
            color: RULE_COLOR.into(),
            width: Dimension::pt(1.0),
            padding: Dimension::pt(6.0),
            dash_style: DashStyle::Solid,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_style_type: Option<NamedStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<ParagraphBorder>,
}

impl ParagraphStyle {
    pub fn named(style: NamedStyle) -> Self {
        Self {
            named_style_type: Some(style),
            ..Self::default()
        }
    }

    pub fn bottom_rule() -> Self {
        Self {
            border_bottom: Some(ParagraphBorder::thin_rule()),
            ..Self::default()
        }
    }

    pub fn fields(&self) -> String {
        let mut fields = Vec::new();
        if self.named_style_type.is_some() {
            fields.push("namedStyleType");
        }
        if self.border_bottom.is_some() {
            fields.push("borderBottom");
        }
        fields.join(",")
    }
}

/// One position-addressed edit against the target document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EditOperation {
    InsertText {
        location: Location,
        text: String,
    },
    UpdateTextStyle {
        range: Range,
        text_style: TextStyle,
        fields: String,
    },
    UpdateParagraphStyle {
        range: Range,
        paragraph_style: ParagraphStyle,
        fields: String,
    },
    CreateBulletRange {
        range: Range,
        bullet_preset: BulletPreset,
    },
    DeleteContentRange {
        range: Range,
    },
}

impl EditOperation {
    pub fn insert_text(index: usize, text: impl Into<String>, tab_id: Option<String>) -> Self {
        EditOperation::InsertText {
            location: Location { index, tab_id },
            text: text.into(),
        }
    }

    pub fn text_style(span: Span, text_style: TextStyle, tab_id: Option<String>) -> Self {
        let fields = text_style.fields();
        EditOperation::UpdateTextStyle {
            range: Range::new(span, tab_id),
            text_style,
            fields,
        }
    }

    pub fn paragraph_style(
        span: Span,
        paragraph_style: ParagraphStyle,
        tab_id: Option<String>,
    ) -> Self {
        let fields = paragraph_style.fields();
        EditOperation::UpdateParagraphStyle {
            range: Range::new(span, tab_id),
            paragraph_style,
            fields,
        }
    }

    pub fn bullets(span: Span, bullet_preset: BulletPreset, tab_id: Option<String>) -> Self {
        EditOperation::CreateBulletRange {
            range: Range::new(span, tab_id),
            bullet_preset,
        }
    }

    pub fn delete(span: Span, tab_id: Option<String>) -> Self {
        EditOperation::DeleteContentRange {
            range: Range::new(span, tab_id),
        }
    }

    /// Sub-document identifier this operation targets.
    pub fn tab_id(&self) -> Option<&str> {
        match self {
            EditOperation::InsertText { location, .. } => location.tab_id.as_deref(),
            EditOperation::UpdateTextStyle { range, .. }
            | EditOperation::UpdateParagraphStyle { range, .. }
            | EditOperation::CreateBulletRange { range, .. }
            | EditOperation::DeleteContentRange { range } => range.tab_id.as_deref(),
        }
    }

    /// The range addressed by a non-insert operation.
    pub fn range(&self) -> Option<&Range> {
        match self {
            EditOperation::InsertText { .. } => None,
            EditOperation::UpdateTextStyle { range, .. }
            | EditOperation::UpdateParagraphStyle { range, .. }
            | EditOperation::CreateBulletRange { range, .. }
            | EditOperation::DeleteContentRange { range } => Some(range),
        }
    }
}
