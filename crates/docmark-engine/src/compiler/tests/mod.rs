//! Behaviour tests for the forward compiler.
//!
//! Markdown goes through the bundled tokenizer; hand-built token streams
//! cover shapes a conformant tokenizer may emit that ours never does.


use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::compiler::{CompileOptions, compile, compile_markdown, compile_replacement};
use crate::error::CompileError;
use crate::ops::{BulletPreset, EditOperation, NamedStyle, ParagraphStyle, TextStyle};
use crate::span::Span;
use crate::tokens::{Token, tokenize};

fn compile_with(md: &str, options: &CompileOptions) -> Vec<EditOperation> {
    let ops = compile_markdown(md, options).unwrap();
    invariants::check(&ops, options);
    ops
}

fn compile_md(md: &str) -> Vec<EditOperation> {
    compile_with(md, &CompileOptions::default())
}

fn inserted(ops: &[EditOperation]) -> Vec<&str> {
    ops.iter()
        .filter_map(|op| match op {
            EditOperation::InsertText { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

fn bullet_ranges(ops: &[EditOperation]) -> Vec<(Span, BulletPreset)> {
    ops.iter()
        .filter_map(|op| match op {
            EditOperation::CreateBulletRange {
                range,
                bullet_preset,
            } => Some((range.span(), *bullet_preset)),
            _ => None,
        })
        .collect()
}

fn named_styles(ops: &[EditOperation]) -> Vec<(Span, NamedStyle)> {
    ops.iter()
        .filter_map(|op| match op {
            EditOperation::UpdateParagraphStyle {
                range,
                paragraph_style,
                ..
            } => paragraph_style
                .named_style_type
                .map(|style| (range.span(), style)),
            _ => None,
        })
        .collect()
}

fn text_styles(ops: &[EditOperation]) -> Vec<(Span, TextStyle)> {
    ops.iter()
        .filter_map(|op| match op {
            EditOperation::UpdateTextStyle {
                range, text_style, ..
            } => Some((range.span(), text_style.clone())),
            _ => None,
        })
        .collect()
}

fn bold() -> TextStyle {
    TextStyle {
        bold: Some(true),
        ..TextStyle::default()
    }
}

// Empty input

#[rstest]
#[case("")]
#[case("   ")]
#[case("\n\n\t\n")]
fn blank_markdown_compiles_to_nothing(#[case] md: &str) {
    assert!(compile_md(md).is_empty());
}

#[test]
fn whitespace_only_tokens_compile_to_nothing() {
    let tokens = vec![
        Token::ParagraphOpen,
        Token::Inline(vec![Token::Text("  ".into()), Token::SoftBreak]),
        Token::ParagraphClose,
    ];
    assert_eq!(compile(&tokens, &CompileOptions::default()), Ok(Vec::new()));
}

// Text and paragraphs

#[test]
fn paragraph_inserts_text_then_newline() {
    assert_eq!(
        compile_md("Hello"),
        vec![
            EditOperation::insert_text(1, "Hello", None),
            EditOperation::insert_text(6, "\n", None),
        ]
    );
}

#[test]
fn start_index_offsets_every_insertion() {
    let options = CompileOptions {
        start_index: 42,
        ..CompileOptions::default()
    };
    let ops = compile_with("Hi\n\nthere", &options);
    assert_eq!(
        ops,
        vec![
            EditOperation::insert_text(42, "Hi", None),
            EditOperation::insert_text(44, "\n", None),
            EditOperation::insert_text(45, "there", None),
            EditOperation::insert_text(50, "\n", None),
        ]
    );
}

#[test]
fn breaks_insert_space_and_newline() {
    let ops = compile_md("a\nb  \nc");
    assert_eq!(inserted(&ops), vec!["a", " ", "b", "\n", "c", "\n"]);
}

#[test]
fn offsets_count_utf16_units() {
    let ops = compile_md("😀 **b**");
    assert_eq!(text_styles(&ops), vec![(Span::new(4, 5), bold())]);
}

// Inline formatting

#[test]
fn bold_and_link_get_separate_operations() {
    let ops = compile_md("**bold** and [link](https://example.com)");
    assert_eq!(
        text_styles(&ops),
        vec![
            (Span::new(1, 5), bold()),
            (Span::new(10, 14), TextStyle::link("https://example.com")),
        ]
    );
}

#[test]
fn decorated_link_emits_decoration_before_link() {
    let ops = compile_md("[**x**](https://example.com)");
    assert_eq!(
        text_styles(&ops),
        vec![
            (Span::new(1, 2), bold()),
            (Span::new(1, 2), TextStyle::link("https://example.com")),
        ]
    );
}

#[test]
fn nested_emphasis_merges_attributes() {
    let ops = compile_md("***x*** ~~y~~");
    assert_eq!(
        text_styles(&ops),
        vec![
            (
                Span::new(1, 2),
                TextStyle {
                    bold: Some(true),
                    italic: Some(true),
                    ..TextStyle::default()
                }
            ),
            (
                Span::new(3, 4),
                TextStyle {
                    strikethrough: Some(true),
                    ..TextStyle::default()
                }
            ),
        ]
    );
}

#[test]
fn inline_code_is_monospace_and_keeps_outer_formatting() {
    let ops = compile_md("**a `b`**");
    let mut expected = TextStyle::monospace();
    expected.bold = Some(true);
    assert_eq!(
        text_styles(&ops),
        vec![(Span::new(1, 3), bold()), (Span::new(3, 4), expected)]
    );
}

#[test]
fn unmatched_closes_are_ignored() {
    let tokens = vec![
        Token::ParagraphOpen,
        Token::Inline(vec![
            Token::StrongClose,
            Token::Text("x".into()),
            Token::EmClose,
            Token::LinkClose,
        ]),
        Token::ParagraphClose,
        Token::HeadingClose,
        Token::ListItemClose,
        Token::BulletListClose,
    ];
    let ops = compile(&tokens, &CompileOptions::default()).unwrap();
    assert_eq!(inserted(&ops), vec!["x", "\n"]);
    assert!(text_styles(&ops).is_empty());
}

// Headings

#[rstest]
#[case("# X", 1)]
#[case("### X", 3)]
#[case("###### X", 6)]
fn heading_level_maps_to_named_style(#[case] md: &str, #[case] level: u8) {
    let ops = compile_md(md);
    assert_eq!(inserted(&ops), vec!["X", "\n"]);
    assert_eq!(
        named_styles(&ops),
        vec![(Span::new(1, 2), NamedStyle::Heading(level))]
    );
}

#[test]
fn heading_style_operation_has_wire_fields() {
    let ops = compile_md("## Sub");
    assert_eq!(
        ops[2],
        EditOperation::paragraph_style(
            Span::new(1, 4),
            ParagraphStyle::named(NamedStyle::Heading(2)),
            None
        )
    );
}

#[test]
fn first_h1_is_promoted_to_title_once() {
    let options = CompileOptions {
        title_for_first_h1: true,
        ..CompileOptions::default()
    };
    let ops = compile_with("# T\n\n# U", &options);
    assert_eq!(
        named_styles(&ops),
        vec![
            (Span::new(1, 2), NamedStyle::Title),
            (Span::new(3, 4), NamedStyle::Heading(1)),
        ]
    );
}

#[test]
fn title_promotion_skips_lower_levels() {
    let options = CompileOptions {
        title_for_first_h1: true,
        ..CompileOptions::default()
    };
    let ops = compile_with("## A\n\n# B", &options);
    assert_eq!(
        named_styles(&ops),
        vec![
            (Span::new(1, 2), NamedStyle::Heading(2)),
            (Span::new(3, 4), NamedStyle::Title),
        ]
    );
}

#[test]
fn empty_first_h1_still_consumes_title() {
    let options = CompileOptions {
        title_for_first_h1: true,
        ..CompileOptions::default()
    };
    let ops = compile_with("#\n\n# U", &options);
    assert_eq!(
        named_styles(&ops),
        vec![(Span::new(2, 3), NamedStyle::Heading(1))]
    );
}

#[test]
fn without_flag_h1_stays_heading() {
    let ops = compile_md("# T");
    assert_eq!(
        named_styles(&ops),
        vec![(Span::new(1, 2), NamedStyle::Heading(1))]
    );
}

#[test]
fn heading_inside_heading_is_structural_violation() {
    let tokens = vec![
        Token::HeadingOpen { level: 1 },
        Token::HeadingOpen { level: 2 },
        Token::Inline(vec![Token::Text("x".into())]),
    ];
    let err = compile(&tokens, &CompileOptions::default()).unwrap_err();
    assert!(matches!(err, CompileError::StructuralViolation { .. }));
}

#[test]
fn out_of_range_heading_level_is_clamped() {
    let tokens = vec![
        Token::HeadingOpen { level: 9 },
        Token::Inline(vec![Token::Text("x".into())]),
        Token::HeadingClose,
    ];
    let ops = compile(&tokens, &CompileOptions::default()).unwrap();
    assert_eq!(
        named_styles(&ops),
        vec![(Span::new(1, 2), NamedStyle::Heading(6))]
    );
}

// Lists

#[test]
fn adjacent_items_merge_into_one_bullet_range() {
    let ops = compile_md("- A\n- B\n- C");
    assert_eq!(inserted(&ops), vec!["A", "\n", "B", "\n", "C", "\n"]);
    assert_eq!(
        bullet_ranges(&ops),
        vec![(Span::new(1, 6), BulletPreset::Unordered)]
    );
}

#[test]
fn interposed_paragraph_splits_bullet_ranges() {
    let ops = compile_md("- A\n\n**X**\n\n- B");
    let bullets = bullet_ranges(&ops);
    assert_eq!(
        bullets,
        vec![
            (Span::new(5, 6), BulletPreset::Unordered),
            (Span::new(1, 2), BulletPreset::Unordered),
        ]
    );
    let paragraph = Span::new(3, 4);
    assert_eq!(text_styles(&ops), vec![(paragraph, bold())]);
    assert!(bullets.iter().all(|(span, _)| !span.overlaps(paragraph)));
}

#[test]
fn ordered_list_uses_numbered_preset() {
    let ops = compile_md("1. one\n2. two");
    assert_eq!(
        bullet_ranges(&ops),
        vec![(Span::new(1, 8), BulletPreset::Ordered)]
    );
}

#[test]
fn differing_presets_do_not_merge() {
    let ops = compile_md("1. a\n2. b\n\n- c");
    assert_eq!(
        bullet_ranges(&ops),
        vec![
            (Span::new(5, 6), BulletPreset::Unordered),
            (Span::new(1, 4), BulletPreset::Ordered),
        ]
    );
}

#[test]
fn loose_list_items_still_merge() {
    let ops = compile_md("- a\n\n- b");
    assert_eq!(inserted(&ops), vec!["a", "\n", "b", "\n"]);
    assert_eq!(
        bullet_ranges(&ops),
        vec![(Span::new(1, 4), BulletPreset::Unordered)]
    );
}

#[test]
fn nested_items_are_indented_with_tabs() {
    let ops = compile_md("- a\n  - b\n- c");
    assert_eq!(
        inserted(&ops),
        vec!["a", "\n", "\t", "b", "\n", "c", "\n"]
    );
    assert_eq!(
        bullet_ranges(&ops),
        vec![(Span::new(1, 7), BulletPreset::Unordered)]
    );
}

#[test]
fn task_items_become_checkbox_range_without_prefix() {
    let ops = compile_md("- [x] done\n- [ ] todo");
    let texts = inserted(&ops);
    assert_eq!(texts, vec!["done", "\n", "todo", "\n"]);
    assert!(texts.iter().all(|t| !t.contains("[x]") && !t.contains("[ ]")));
    assert_eq!(
        bullet_ranges(&ops),
        vec![(Span::new(1, 10), BulletPreset::Checkbox)]
    );
}

#[test]
fn empty_text_before_task_prefix_is_skipped() {
    let tokens = vec![
        Token::BulletListOpen,
        Token::ListItemOpen,
        Token::Inline(vec![Token::Text(String::new()), Token::Text("[x] done".into())]),
        Token::ListItemClose,
        Token::BulletListClose,
    ];
    let ops = compile(&tokens, &CompileOptions::default()).unwrap();
    assert_eq!(inserted(&ops), vec!["done", "\n"]);
    assert_eq!(
        bullet_ranges(&ops),
        vec![(Span::new(1, 5), BulletPreset::Checkbox)]
    );
}

#[test]
fn malformed_task_prefix_is_plain_text() {
    let ops = compile_md("- [x]done");
    assert_eq!(inserted(&ops), vec!["[x]done", "\n"]);
    assert_eq!(
        bullet_ranges(&ops),
        vec![(Span::new(1, 8), BulletPreset::Unordered)]
    );
}

#[test]
fn item_outside_list_is_structural_violation() {
    let tokens = vec![
        Token::ListItemOpen,
        Token::Inline(vec![Token::Text("x".into())]),
        Token::ListItemClose,
    ];
    let err = compile(&tokens, &CompileOptions::default()).unwrap_err();
    assert_eq!(
        err,
        CompileError::StructuralViolation {
            token: "list_item_open".into(),
            reason: "list item outside of any list".into(),
        }
    );
}

// Rules and code

#[test]
fn horizontal_rule_is_bordered_newline() {
    let ops = compile_md("a\n\n---\n\nb");
    assert_eq!(inserted(&ops), vec!["a", "\n", "\n", "b", "\n"]);
    assert!(ops.contains(&EditOperation::paragraph_style(
        Span::new(3, 4),
        ParagraphStyle::bottom_rule(),
        None
    )));
}

#[test]
fn code_block_styles_each_line() {
    let ops = compile_md("```rust\nfn a\n\nb\n```");
    assert_eq!(inserted(&ops), vec!["fn a\n", " \n", "b\n", "\n"]);
    let monospace = TextStyle::monospace();
    assert_eq!(
        text_styles(&ops),
        vec![
            (Span::new(1, 5), monospace.clone()),
            (Span::new(6, 7), monospace.clone()),
            (Span::new(8, 9), monospace),
        ]
    );
}

#[test]
fn code_block_after_text_starts_on_new_line() {
    let tokens = vec![
        Token::Inline(vec![Token::Text("a".into())]),
        Token::CodeBlock("x\r\n".into()),
    ];
    let ops = compile(&tokens, &CompileOptions::default()).unwrap();
    assert_eq!(inserted(&ops), vec!["a", "\n", "x\n", "\n"]);
}

#[test]
fn blockquote_wrappers_emit_nothing() {
    let ops = compile_md("> quoted");
    assert_eq!(inserted(&ops), vec!["quoted", "\n"]);
    assert_eq!(ops.len(), 2);
}

// Options and errors

#[test]
fn tab_id_is_attached_to_every_operation() {
    let options = CompileOptions {
        tab_id: Some("t.1".into()),
        ..CompileOptions::default()
    };
    let ops = compile_with("# H\n\n- **a** [b](https://x.test)\n\n---", &options);
    assert!(!ops.is_empty());
    assert!(ops.iter().all(|op| op.tab_id() == Some("t.1")));
}

#[test]
fn zero_start_index_is_compile_failure() {
    let options = CompileOptions {
        start_index: 0,
        ..CompileOptions::default()
    };
    let err = compile_markdown("x", &options).unwrap_err();
    assert!(matches!(err, CompileError::CompileFailure { .. }));
}

#[test]
fn offset_overflow_is_compile_failure() {
    let options = CompileOptions {
        start_index: usize::MAX,
        ..CompileOptions::default()
    };
    let err = compile_markdown("x", &options).unwrap_err();
    assert!(matches!(err, CompileError::CompileFailure { .. }));
}

#[test]
fn replacement_deletes_existing_body_first() {
    let options = CompileOptions {
        start_index: 99,
        tab_id: Some("t.0".into()),
        ..CompileOptions::default()
    };
    let ops = compile_replacement(&tokenize("new"), 10, &options).unwrap();
    assert_eq!(
        ops,
        vec![
            EditOperation::delete(Span::new(1, 9), Some("t.0".into())),
            EditOperation::insert_text(1, "new", Some("t.0".into())),
            EditOperation::insert_text(4, "\n", Some("t.0".into())),
        ]
    );
}

#[test]
fn replacement_of_empty_body_skips_delete() {
    let ops = compile_replacement(&tokenize("x"), 2, &CompileOptions::default()).unwrap();
    assert_eq!(inserted(&ops), vec!["x", "\n"]);
    assert_eq!(ops.len(), 2);
}
