//! # Markup Tokens
//!
//! The token contract consumed by the forward compiler: an ordered, possibly
//! nested sequence of block and inline tokens forming a well-nested
//! open/close tree flattened to a sequence.
//!
//! Any conformant tokenizer can produce these. [`tokenize`] is the bundled
//! adapter over `pulldown-cmark`.
//!
//! ## Shape
//!
//! ```text
//! "# Title\n\n- **a**"  =>  HeadingOpen{1}, Inline[Text("Title")], HeadingClose,
//!                           BulletListOpen, ListItemOpen,
//!                           Inline[StrongOpen, Text("a"), StrongClose],
//!                           ListItemClose, BulletListClose
//! ```

mod markdown;

pub use markdown::tokenize;

/// A single markup token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Heading start; `level` is 1 through 6.
    HeadingOpen { level: u8 },
    HeadingClose,
    ParagraphOpen,
    ParagraphClose,
    /// Literal text.
    Text(String),
    /// Inline code span content, without delimiters.
    CodeInline(String),
    StrongOpen,
    StrongClose,
    EmOpen,
    EmClose,
    StrikethroughOpen,
    StrikethroughClose,
    /// Link start carrying the resolved destination URL.
    LinkOpen { href: String },
    LinkClose,
    BulletListOpen,
    BulletListClose,
    OrderedListOpen,
    OrderedListClose,
    ListItemOpen,
    ListItemClose,
    SoftBreak,
    HardBreak,
    /// Fenced code block with its info string and raw content.
    Fence { info: String, content: String },
    /// Indented code block raw content.
    CodeBlock(String),
    /// Horizontal rule.
    Hr,
    BlockquoteOpen,
    BlockquoteClose,
    TableOpen,
    TableClose,
    TableRowOpen,
    TableRowClose,
    TableCellOpen,
    TableCellClose,
    /// Inline children of a block, in order.
    Inline(Vec<Token>),
}

impl Token {
    /// Stable snake_case name, used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Token::HeadingOpen { .. } => "heading_open",
            Token::HeadingClose => "heading_close",
            Token::ParagraphOpen => "paragraph_open",
            Token::ParagraphClose => "paragraph_close",
            Token::Text(_) => "text",
            Token::CodeInline(_) => "code_inline",
            Token::StrongOpen => "strong_open",
            Token::StrongClose => "strong_close",
            Token::EmOpen => "em_open",
            Token::EmClose => "em_close",
            Token::StrikethroughOpen => "s_open",
            Token::StrikethroughClose => "s_close",
            Token::LinkOpen { .. } => "link_open",
            Token::LinkClose => "link_close",
            Token::BulletListOpen => "bullet_list_open",
            Token::BulletListClose => "bullet_list_close",
            Token::OrderedListOpen => "ordered_list_open",
            Token::OrderedListClose => "ordered_list_close",
            Token::ListItemOpen => "list_item_open",
            Token::ListItemClose => "list_item_close",
            Token::SoftBreak => "softbreak",
            Token::HardBreak => "hardbreak",
            Token::Fence { .. } => "fence",
            Token::CodeBlock(_) => "code_block",
            Token::Hr => "hr",
            Token::BlockquoteOpen => "blockquote_open",
            Token::BlockquoteClose => "blockquote_close",
            Token::TableOpen => "table_open",
            Token::TableClose => "table_close",
            Token::TableRowOpen => "tr_open",
            Token::TableRowClose => "tr_close",
            Token::TableCellOpen => "td_open",
            Token::TableCellClose => "td_close",
            Token::Inline(_) => "inline",
        }
    }
}

/// Returns true when the stream would produce no visible content: no rule,
/// no code block, and no text beyond whitespace.
pub fn is_blank(tokens: &[Token]) -> bool {
    tokens.iter().all(|token| match token {
        Token::Text(text) | Token::CodeInline(text) => text.trim().is_empty(),
        Token::Fence { .. } | Token::CodeBlock(_) | Token::Hr => false,
        Token::Inline(children) => is_blank(children),
        _ => true,
    })
}
