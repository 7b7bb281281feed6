//! # Reverse Renderer
//!
//! Renders a fetched [`DocumentModel`] back into Markdown. Pure and total:
//! any well-formed model renders, an empty body renders as `""`.
//!
//! ## Block rules
//!
//! - Section break: `---`
//! - Table: pipe grid with a `---` separator row after the first row
//! - Paragraph with a heading-level named style and visible text: `#` heading
//! - Bulleted paragraph: `"  " * nesting_level` then `-` or `1.`
//! - Anything else: plain paragraph followed by a blank line
//!
//! Ordered items always use the literal `1.` marker; Markdown renumbers
//! them on display.
//!
//! ## Modules
//!
//! - [`inline`]: per-run emphasis, code, underline and link markers

pub mod inline;

use crate::model::{Block, DocumentModel, ListRegistry, Paragraph, Table};

use inline::format_runs;

/// Renders the document as Markdown ending in exactly one newline.
pub fn render(document: &DocumentModel) -> String {
    let mut writer = MarkdownWriter::new(&document.lists);
    for block in &document.blocks {
        writer.block(block);
    }
    let markdown = writer.finish();
    log::debug!(
        "rendered {} blocks into {} bytes of markdown",
        document.blocks.len(),
        markdown.len()
    );
    markdown
}

/// Accumulates output lines; a list run is closed by a blank line before
/// the next non-list block.
struct MarkdownWriter<'a> {
    lists: &'a ListRegistry,
    lines: Vec<String>,
    in_list: bool,
}

impl<'a> MarkdownWriter<'a> {
    fn new(lists: &'a ListRegistry) -> Self {
        Self {
            lists,
            lines: Vec::new(),
            in_list: false,
        }
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Paragraph(paragraph) => self.paragraph(paragraph),
            Block::Table(table) => self.table(table),
            Block::SectionBreak => {
                self.end_list();
                self.lines.push("---".to_string());
                self.lines.push(String::new());
            }
        }
    }

    fn paragraph(&mut self, paragraph: &Paragraph) {
        if paragraph.text().trim().is_empty() {
            return;
        }
        let rendered = format_runs(&paragraph.runs);
        let text = rendered.trim();

        if let Some(level) = paragraph.named_style.and_then(|s| s.heading_level()) {
            self.end_list();
            self.lines
                .push(format!("{} {}", "#".repeat(level as usize), text));
            self.lines.push(String::new()); // Empty line after heading
        } else if let Some(bullet) = &paragraph.bullet {
            let marker = if self.lists.is_ordered(&bullet.list_id, bullet.nesting_level) {
                "1."
            } else {
                "-"
            };
            let indent = "  ".repeat(bullet.nesting_level);
            self.lines.push(format!("{indent}{marker} {text}"));
            self.in_list = true;
        } else {
            self.end_list();
            self.lines.push(text.to_string());
            self.lines.push(String::new()); // Empty line after paragraph
        }
    }

    fn table(&mut self, table: &Table) {
        if table.rows.is_empty() {
            return;
        }
        self.end_list();
        for (i, row) in table.rows.iter().enumerate() {
            let cells: Vec<String> = row
                .cells
                .iter()
                .map(|cell| format_runs(&cell.runs).replace('\n', " ").trim().to_string())
                .collect();
            self.lines.push(format!("| {} |", cells.join(" | ")));
            if i == 0 {
                let separator = vec!["---"; cells.len().max(1)];
                self.lines.push(format!("| {} |", separator.join(" | ")));
            }
        }
        self.lines.push(String::new());
    }

    fn end_list(&mut self) {
        if self.in_list {
            self.lines.push(String::new());
            self.in_list = false;
        }
    }

    fn finish(self) -> String {
        let joined = self.lines.join("\n");
        let body = joined.trim_end_matches('\n');
        if body.is_empty() {
            String::new()
        } else {
            format!("{body}\n")
        }
    }
}
