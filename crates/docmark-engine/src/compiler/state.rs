use crate::error::CompileError;
use crate::ops::{BulletPreset, EditOperation, NamedStyle, ParagraphStyle, TextStyle};
use crate::span::{Span, offset_len};
use crate::tokens::Token;

use super::CompileOptions;
use super::formatting::{FormattingStack, InlineFormat, MarkKind, StyleMark};
use super::lists::{ListFrame, ListKind, PendingListItem, merge_bullet_ranges, task_prefix_len};

/// Inserted text carrying non-default inline formatting.
#[derive(Debug, Clone)]
struct TextRange {
    span: Span,
    format: InlineFormat,
}

/// Heading content that needs a named paragraph style.
#[derive(Debug, Clone)]
struct ParagraphRange {
    span: Span,
    style: NamedStyle,
}

#[derive(Debug, Clone, Copy)]
struct OpenHeading {
    start: usize,
    level: u8,
}

/// Mutable state of a single compilation.
///
/// Insertions are emitted immediately as tokens are applied, advancing the
/// cursor. Ranges for styling, headings, rules and bullets are collected and
/// only turned into operations by [`CompilerState::finish`], once every
/// offset they reference exists.
pub(crate) struct CompilerState {
    cursor: usize,
    tab_id: Option<String>,
    title_for_first_h1: bool,
    title_consumed: bool,
    /// True when the last inserted character is a newline, or nothing has
    /// been inserted yet.
    at_line_start: bool,
    inserts: Vec<EditOperation>,
    formatting: FormattingStack,
    lists: Vec<ListFrame>,
    items: Vec<PendingListItem>,
    /// Indices into `items` for the items currently open, innermost last.
    open_items: Vec<usize>,
    heading: Option<OpenHeading>,
    text_ranges: Vec<TextRange>,
    paragraph_ranges: Vec<ParagraphRange>,
    rule_ranges: Vec<Span>,
}

impl CompilerState {
    pub fn new(options: &CompileOptions) -> Self {
        Self {
            cursor: options.start_index,
            tab_id: options.tab_id.clone(),
            title_for_first_h1: options.title_for_first_h1,
            title_consumed: false,
            at_line_start: true,
            inserts: Vec::new(),
            formatting: FormattingStack::default(),
            lists: Vec::new(),
            items: Vec::new(),
            open_items: Vec::new(),
            heading: None,
            text_ranges: Vec::new(),
            paragraph_ranges: Vec::new(),
            rule_ranges: Vec::new(),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Applies one non-container token.
    pub fn apply(&mut self, token: &Token) -> Result<(), CompileError> {
        match token {
            Token::HeadingOpen { level } => self.open_heading(*level)?,
            Token::HeadingClose => self.close_heading()?,
            Token::ParagraphOpen => {}
            Token::ParagraphClose => self.ensure_line_start()?,
            Token::Text(text) => self.text(text)?,
            Token::CodeInline(code) => {
                let mut format = self.formatting.snapshot();
                format.code = true;
                self.insert_styled(code, format)?;
            }
            Token::StrongOpen => self.formatting.push(StyleMark::Bold),
            Token::EmOpen => self.formatting.push(StyleMark::Italic),
            Token::StrikethroughOpen => self.formatting.push(StyleMark::Strikethrough),
            Token::LinkOpen { href } => self.formatting.push(StyleMark::Link(href.clone())),
            Token::StrongClose => self.close_mark(MarkKind::Bold),
            Token::EmClose => self.close_mark(MarkKind::Italic),
            Token::StrikethroughClose => self.close_mark(MarkKind::Strikethrough),
            Token::LinkClose => self.close_mark(MarkKind::Link),
            Token::BulletListOpen => self.open_list(ListKind::Bullet)?,
            Token::OrderedListOpen => self.open_list(ListKind::Ordered)?,
            Token::BulletListClose | Token::OrderedListClose => {
                if self.lists.pop().is_none() {
                    log::debug!("ignoring {} with no open list", token.name());
                }
            }
            Token::ListItemOpen => self.open_item()?,
            Token::ListItemClose => self.close_item()?,
            Token::SoftBreak => {
                self.insert(" ")?;
            }
            Token::HardBreak => {
                self.insert("\n")?;
            }
            Token::Fence { content, .. } | Token::CodeBlock(content) => self.code_block(content)?,
            Token::Hr => {
                self.ensure_line_start()?;
                let span = self.insert("\n")?;
                self.rule_ranges.push(span);
            }
            // Containers whose children carry all the content.
            Token::BlockquoteOpen
            | Token::BlockquoteClose
            | Token::TableOpen
            | Token::TableClose
            | Token::TableRowOpen
            | Token::TableRowClose
            | Token::TableCellOpen
            | Token::TableCellClose => {}
            // Flattened by the caller before reaching here.
            Token::Inline(_) => {}
        }
        Ok(())
    }

    fn insert(&mut self, text: &str) -> Result<Span, CompileError> {
        let start = self.cursor;
        if text.is_empty() {
            return Ok(Span::new(start, start));
        }
        let end = start
            .checked_add(offset_len(text))
            .ok_or_else(|| CompileError::failure("document offset overflow"))?;
        self.inserts
            .push(EditOperation::insert_text(start, text, self.tab_id.clone()));
        self.cursor = end;
        self.at_line_start = text.ends_with('\n');
        Ok(Span::new(start, end))
    }

    fn insert_styled(&mut self, text: &str, format: InlineFormat) -> Result<(), CompileError> {
        let span = self.insert(text)?;
        if !span.is_empty() && !format.is_plain() {
            self.text_ranges.push(TextRange { span, format });
        }
        Ok(())
    }

    fn ensure_line_start(&mut self) -> Result<(), CompileError> {
        if !self.at_line_start {
            self.insert("\n")?;
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), CompileError> {
        let text = self.strip_task_prefix(text);
        let format = self.formatting.snapshot();
        self.insert_styled(text, format)
    }

    /// Strips a checkbox prefix from the first text of the innermost open
    /// item, switching that item to the checkbox preset.
    fn strip_task_prefix<'t>(&mut self, text: &'t str) -> &'t str {
        if text.is_empty() {
            return text;
        }
        let Some(&idx) = self.open_items.last() else {
            return text;
        };
        let item = &mut self.items[idx];
        if item.task_prefix_consumed {
            return text;
        }
        item.task_prefix_consumed = true;
        match task_prefix_len(text) {
            Some(len) => {
                item.preset = BulletPreset::Checkbox;
                &text[len..]
            }
            None => text,
        }
    }

    fn close_mark(&mut self, kind: MarkKind) {
        if !self.formatting.pop(kind) {
            log::debug!("ignoring unmatched close of {kind:?}");
        }
    }

    fn open_heading(&mut self, level: u8) -> Result<(), CompileError> {
        if self.heading.is_some() {
            return Err(CompileError::structural(
                "heading_open",
                "heading opened while another heading is still open",
            ));
        }
        if !(1..=6).contains(&level) {
            log::warn!("heading level {level} out of range, clamping to 1..=6");
        }
        self.ensure_line_start()?;
        self.heading = Some(OpenHeading {
            start: self.cursor,
            level: level.clamp(1, 6),
        });
        Ok(())
    }

    fn close_heading(&mut self) -> Result<(), CompileError> {
        let Some(heading) = self.heading.take() else {
            log::debug!("ignoring heading_close with no open heading");
            return Ok(());
        };
        let style = self.heading_style(heading.level);
        let span = Span::new(heading.start, self.cursor);
        if !span.is_empty() {
            self.paragraph_ranges.push(ParagraphRange { span, style });
        }
        self.insert("\n")?;
        Ok(())
    }

    /// The first level-1 heading becomes the title when requested, even if
    /// it turns out to be empty.
    fn heading_style(&mut self, level: u8) -> NamedStyle {
        if level == 1 && self.title_for_first_h1 && !self.title_consumed {
            self.title_consumed = true;
            NamedStyle::Title
        } else {
            NamedStyle::Heading(level)
        }
    }

    fn open_list(&mut self, kind: ListKind) -> Result<(), CompileError> {
        // A nested list ends the parent item's own line.
        if let Some(&idx) = self.open_items.last()
            && self.items[idx].end.is_none()
        {
            let end = self.finish_item_line()?;
            self.items[idx].end = Some(end);
        }
        self.ensure_line_start()?;
        self.lists.push(ListFrame {
            kind,
            nesting_level: self.lists.len(),
        });
        Ok(())
    }

    fn open_item(&mut self) -> Result<(), CompileError> {
        let Some(frame) = self.lists.last().copied() else {
            return Err(CompileError::structural(
                "list_item_open",
                "list item outside of any list",
            ));
        };
        self.ensure_line_start()?;
        let start = self.cursor;
        // Leading tabs encode the nesting level; the remote side strips them
        // when the bullet range is created.
        self.insert(&"\t".repeat(frame.nesting_level))?;
        self.items.push(PendingListItem {
            start,
            end: None,
            nesting_level: frame.nesting_level,
            preset: frame.kind.preset(),
            task_prefix_consumed: false,
        });
        self.open_items.push(self.items.len() - 1);
        Ok(())
    }

    fn close_item(&mut self) -> Result<(), CompileError> {
        let Some(idx) = self.open_items.pop() else {
            log::debug!("ignoring list_item_close with no open item");
            return Ok(());
        };
        if self.items[idx].end.is_none() {
            let end = self.finish_item_line()?;
            self.items[idx].end = Some(end);
        } else {
            self.ensure_line_start()?;
        }
        let item = &self.items[idx];
        log::trace!(
            "list item at level {} spans {}..{:?}",
            item.nesting_level,
            item.start,
            item.end
        );
        Ok(())
    }

    /// Terminates the current item line, returning the offset just before
    /// its newline.
    fn finish_item_line(&mut self) -> Result<usize, CompileError> {
        if self.at_line_start {
            Ok(self.cursor.saturating_sub(1))
        } else {
            let end = self.cursor;
            self.insert("\n")?;
            Ok(end)
        }
    }

    /// Inserts a code block one line at a time so each line is its own
    /// monospace paragraph, followed by a blank separator line.
    fn code_block(&mut self, content: &str) -> Result<(), CompileError> {
        self.ensure_line_start()?;
        let body = content.strip_suffix('\n').unwrap_or(content);
        for line in body.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            // Empty paragraphs cannot carry text style.
            let line = if line.is_empty() { " " } else { line };
            let span = self.insert(&format!("{line}\n"))?;
            self.text_ranges.push(TextRange {
                span: Span::new(span.start, span.end - 1),
                format: InlineFormat::code(),
            });
        }
        self.insert("\n")?;
        Ok(())
    }

    /// Emits all deferred operations after the insertions.
    ///
    /// Order: text decoration and links, heading styles, rule borders, then
    /// bullet ranges in descending start order.
    pub fn finish(self) -> Vec<EditOperation> {
        let tab_id = self.tab_id;
        let mut ops = self.inserts;
        let insert_count = ops.len();

        for range in &self.text_ranges {
            if let Some(style) = range.format.decoration() {
                ops.push(EditOperation::text_style(range.span, style, tab_id.clone()));
            }
            if let Some(url) = &range.format.link {
                ops.push(EditOperation::text_style(
                    range.span,
                    TextStyle::link(url.clone()),
                    tab_id.clone(),
                ));
            }
        }

        for range in &self.paragraph_ranges {
            ops.push(EditOperation::paragraph_style(
                range.span,
                ParagraphStyle::named(range.style),
                tab_id.clone(),
            ));
        }

        for span in &self.rule_ranges {
            ops.push(EditOperation::paragraph_style(
                *span,
                ParagraphStyle::bottom_rule(),
                tab_id.clone(),
            ));
        }

        let bullets = merge_bullet_ranges(&self.items);
        let bullet_count = bullets.len();
        for bullet in bullets {
            ops.push(EditOperation::bullets(
                bullet.span,
                bullet.preset,
                tab_id.clone(),
            ));
        }

        log::debug!(
            "compiled {} inserts, {} style ops, {} bullet ranges; cursor at {}",
            insert_count,
            ops.len() - insert_count - bullet_count,
            bullet_count,
            self.cursor
        );
        ops
    }
}
