//! # Forward Compiler
//!
//! Turns a [`Token`] stream into position-addressed [`EditOperation`]s.
//!
//! One forward pass maintains a single running cursor. Every insertion is
//! emitted as it happens; styling, heading, rule and bullet ranges are
//! collected on the side and emitted after the last insertion. The output is
//! therefore only valid when applied strictly in order.
//!
//! ## Modules
//!
//! - [`state`]: per-call compiler state and token handling
//! - [`formatting`]: inline style stack
//! - [`lists`]: list frames, task prefixes and bullet range merging

mod formatting;
mod lists;
mod state;

#[cfg(test)]
mod tests;

use crate::error::CompileError;
use crate::ops::EditOperation;
use crate::span::Span;
use crate::tokens::{Token, is_blank, tokenize};

use state::CompilerState;

/// Parameters of a single compilation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Offset of the first insertion. Document bodies start at 1.
    pub start_index: usize,
    /// Sub-document (tab) every operation targets, if not the default.
    pub tab_id: Option<String>,
    /// Style the first level-1 heading as the document title.
    pub title_for_first_h1: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            start_index: 1,
            tab_id: None,
            title_for_first_h1: false,
        }
    }
}

/// Compiles a token stream into edit operations.
///
/// Returns an empty list for an empty or whitespace-only stream. Fails with
/// [`CompileError::StructuralViolation`] on nesting it cannot default, such
/// as a list item outside any list.
pub fn compile(
    tokens: &[Token],
    options: &CompileOptions,
) -> Result<Vec<EditOperation>, CompileError> {
    if options.start_index == 0 {
        return Err(CompileError::failure("start index must be at least 1"));
    }
    if is_blank(tokens) {
        log::debug!("blank token stream, nothing to compile");
        return Ok(Vec::new());
    }

    let mut state = CompilerState::new(options);
    walk(tokens, &mut state)?;
    Ok(state.finish())
}

/// Tokenizes `markdown` with [`tokenize`] and compiles the result.
pub fn compile_markdown(
    markdown: &str,
    options: &CompileOptions,
) -> Result<Vec<EditOperation>, CompileError> {
    compile(&tokenize(markdown), options)
}

/// Compiles operations that replace an existing document body.
///
/// `body_end_index` is the end index of the current body. Its final newline
/// cannot be deleted, so the cleared range is `[1, body_end_index - 1)`, and
/// the new content is compiled at index 1 regardless of
/// `options.start_index`.
pub fn compile_replacement(
    tokens: &[Token],
    body_end_index: usize,
    options: &CompileOptions,
) -> Result<Vec<EditOperation>, CompileError> {
    let options = CompileOptions {
        start_index: 1,
        ..options.clone()
    };

    let mut ops = Vec::new();
    let existing = Span::new(1, body_end_index.saturating_sub(1));
    if !existing.is_empty() {
        ops.push(EditOperation::delete(existing, options.tab_id.clone()));
    }
    ops.extend(compile(tokens, &options)?);
    Ok(ops)
}

/// Depth-first walk that expands `Inline` children in place, using an
/// explicit stack of iterators instead of recursion.
fn walk(tokens: &[Token], state: &mut CompilerState) -> Result<(), CompileError> {
    let mut work = vec![tokens.iter()];
    while let Some(iter) = work.last_mut() {
        let Some(token) = iter.next() else {
            work.pop();
            continue;
        };
        match token {
            Token::Inline(children) => work.push(children.iter()),
            token => {
                log::trace!("{} at offset {}", token.name(), state.cursor());
                state.apply(token)?;
            }
        }
    }
    Ok(())
}
