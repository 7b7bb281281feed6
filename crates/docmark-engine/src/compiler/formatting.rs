use crate::ops::TextStyle;

/// The attribute a style mark carries, used to match closing tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MarkKind {
    Bold,
    Italic,
    Strikethrough,
    Link,
}

/// A partial style pushed by an opening inline token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StyleMark {
    Bold,
    Italic,
    Strikethrough,
    Link(String),
}

impl StyleMark {
    fn kind(&self) -> MarkKind {
        match self {
            StyleMark::Bold => MarkKind::Bold,
            StyleMark::Italic => MarkKind::Italic,
            StyleMark::Strikethrough => MarkKind::Strikethrough,
            StyleMark::Link(_) => MarkKind::Link,
        }
    }
}

/// Merged formatting in effect for a span of inserted text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineFormat {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub link: Option<String>,
}

impl InlineFormat {
    pub fn code() -> Self {
        Self {
            code: true,
            ..Self::default()
        }
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    /// Text decoration payload, excluding the link.
    ///
    /// Links are always sent as their own operation so decoration and link
    /// styling never share a field mask.
    pub fn decoration(&self) -> Option<TextStyle> {
        if !(self.bold || self.italic || self.strikethrough || self.code) {
            return None;
        }
        let mut style = if self.code {
            TextStyle::monospace()
        } else {
            TextStyle::default()
        };
        style.bold = self.bold.then_some(true);
        style.italic = self.italic.then_some(true);
        style.strikethrough = self.strikethrough.then_some(true);
        Some(style)
    }
}

/// Stack of open inline styles.
///
/// Closing a style removes the most recently pushed mark of that attribute,
/// which need not be the top, so out-of-order and unmatched closes are
/// tolerated.
#[derive(Debug, Default)]
pub(crate) struct FormattingStack {
    marks: Vec<StyleMark>,
}

impl FormattingStack {
    pub fn push(&mut self, mark: StyleMark) {
        self.marks.push(mark);
    }

    /// Removes the innermost mark of `kind`. Returns false when none is open.
    pub fn pop(&mut self, kind: MarkKind) -> bool {
        match self.marks.iter().rposition(|m| m.kind() == kind) {
            Some(idx) => {
                self.marks.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Folds the stack bottom to top; the topmost mark wins per attribute.
    pub fn snapshot(&self) -> InlineFormat {
        let mut format = InlineFormat::default();
        for mark in &self.marks {
            match mark {
                StyleMark::Bold => format.bold = true,
                StyleMark::Italic => format.italic = true,
                StyleMark::Strikethrough => format.strikethrough = true,
                StyleMark::Link(url) => format.link = Some(url.clone()),
            }
        }
        format
    }
}
