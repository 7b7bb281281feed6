use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, TextMergeStream};

use super::Token;

/// Tokenizes Markdown into the compiler's token contract.
///
/// Inline events between two block events are grouped into a single
/// [`Token::Inline`]. Adjacent text is merged so a task-list prefix such as
/// `[x] done` reaches the compiler as one text token.
pub fn tokenize(markdown: &str) -> Vec<Token> {
    let parser = Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH);
    let mut builder = TokenBuilder::default();

    for event in TextMergeStream::new(parser) {
        builder.process_event(event);
    }

    builder.finish()
}

/// Code block being accumulated between its start and end events.
struct PendingCode {
    /// Info string for fenced blocks, `None` for indented ones.
    info: Option<String>,
    content: String,
}

/// Converts the flat `pulldown-cmark` event stream into tokens.
///
/// # Event flow for lists
///
/// ```markdown
/// - Parent
///   - Child
/// ```
/// Events: `Start(List)`, `Start(Item)`, `Text("Parent")`, `Start(List)`,
/// `Start(Item)`, `Text("Child")`, `End(Item)`, `End(List)`, `End(Item)`,
/// `End(List)`. Nested lists appear inside their parent item, which the
/// compiler relies on to derive nesting levels.
#[derive(Default)]
struct TokenBuilder {
    tokens: Vec<Token>,
    /// Inline tokens of the block currently open.
    inline: Vec<Token>,
    code: Option<PendingCode>,
}

impl TokenBuilder {
    fn process_event(&mut self, event: Event<'_>) {
        if let Some(code) = self.code.as_mut() {
            match event {
                Event::Text(text) => code.content.push_str(&text),
                Event::End(TagEnd::CodeBlock) => self.finish_code_block(),
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.inline.push(Token::Text(text.into_string())),
            Event::Code(code) => self.inline.push(Token::CodeInline(code.into_string())),
            Event::SoftBreak => self.inline.push(Token::SoftBreak),
            Event::HardBreak => self.inline.push(Token::HardBreak),
            Event::Rule => self.block(Token::Hr),
            Event::TaskListMarker(checked) => {
                // Only reachable if a caller enables task lists; keep the
                // literal prefix so checkbox detection stays in the compiler.
                let marker = if checked { "[x] " } else { "[ ] " };
                self.inline.push(Token::Text(marker.to_string()));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.block(Token::ParagraphOpen),
            Tag::Heading { level, .. } => self.block(Token::HeadingOpen {
                level: level as u8,
            }),
            Tag::BlockQuote(_) => self.block(Token::BlockquoteOpen),
            Tag::CodeBlock(kind) => {
                self.flush_inline();
                let info = match kind {
                    CodeBlockKind::Fenced(info) => Some(info.into_string()),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(PendingCode {
                    info,
                    content: String::new(),
                });
            }
            Tag::List(Some(_)) => self.block(Token::OrderedListOpen),
            Tag::List(None) => self.block(Token::BulletListOpen),
            Tag::Item => self.block(Token::ListItemOpen),
            Tag::Table(_) => self.block(Token::TableOpen),
            Tag::TableHead | Tag::TableRow => self.block(Token::TableRowOpen),
            Tag::TableCell => self.block(Token::TableCellOpen),
            Tag::Emphasis => self.inline.push(Token::EmOpen),
            Tag::Strong => self.inline.push(Token::StrongOpen),
            Tag::Strikethrough => self.inline.push(Token::StrikethroughOpen),
            Tag::Link { dest_url, .. } => self.inline.push(Token::LinkOpen {
                href: dest_url.into_string(),
            }),
            // Images contribute their alt text only.
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.block(Token::ParagraphClose),
            TagEnd::Heading(_) => self.block(Token::HeadingClose),
            TagEnd::BlockQuote(_) => self.block(Token::BlockquoteClose),
            TagEnd::List(true) => self.block(Token::OrderedListClose),
            TagEnd::List(false) => self.block(Token::BulletListClose),
            TagEnd::Item => self.block(Token::ListItemClose),
            TagEnd::Table => self.block(Token::TableClose),
            TagEnd::TableHead | TagEnd::TableRow => self.block(Token::TableRowClose),
            TagEnd::TableCell => self.block(Token::TableCellClose),
            TagEnd::Emphasis => self.inline.push(Token::EmClose),
            TagEnd::Strong => self.inline.push(Token::StrongClose),
            TagEnd::Strikethrough => self.inline.push(Token::StrikethroughClose),
            TagEnd::Link => self.inline.push(Token::LinkClose),
            _ => {}
        }
    }

    fn finish_code_block(&mut self) {
        if let Some(PendingCode { info, content }) = self.code.take() {
            self.tokens.push(match info {
                Some(info) => Token::Fence { info, content },
                None => Token::CodeBlock(content),
            });
        }
    }

    /// Pushes a block-level token, closing the pending inline group first.
    fn block(&mut self, token: Token) {
        self.flush_inline();
        self.tokens.push(token);
    }

    fn flush_inline(&mut self) {
        if !self.inline.is_empty() {
            let children = std::mem::take(&mut self.inline);
            self.tokens.push(Token::Inline(children));
        }
    }

    fn finish(mut self) -> Vec<Token> {
        self.flush_inline();
        self.finish_code_block();
        self.tokens
    }
}
