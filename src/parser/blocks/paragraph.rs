/// Paragraphs: the fallback consumer when no block rule identifies a line
use crate::ast::Block;
use crate::error::Result;
use crate::flavor::BlockKind;
use crate::parser::Context;

/// Block types that end a paragraph without a blank line in between
const INTERRUPTERS: [BlockKind; 7] = [
    BlockKind::FencedQuote,
    BlockKind::Quote,
    BlockKind::FencedCode,
    BlockKind::Ul,
    BlockKind::Ol,
    BlockKind::Hr,
    BlockKind::Html,
];

/// Collect lines until a blank line or the start of another block
pub fn consume(ctx: &mut Context<'_>, lines: &[String], current: usize) -> Result<(Block, usize)> {
    let mut content = Vec::new();
    let mut i = current;

    while i < lines.len() {
        let line = &lines[i];
        let trimmed = line.trim_start();

        if i > current && (trimmed.is_empty() || interrupts(ctx, lines, i, trimmed)) {
            break;
        }

        content.push(trimmed);
        i += 1;
    }

    let text = content.join("\n");
    let children = ctx.parse_inline(text.trim())?;

    Ok((Block::Paragraph(children), i - 1))
}

fn interrupts(ctx: &Context<'_>, lines: &[String], i: usize, trimmed: &str) -> bool {
    // Only lines opening with punctuation or a digit can start one of these
    let gated = trimmed
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_punctuation() || c.is_ascii_digit());

    (gated
        && INTERRUPTERS
            .iter()
            .any(|&kind| ctx.identifies(kind, lines, i)))
        || ctx.identifies(BlockKind::Headline, lines, i)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::blocks;
    use crate::ast::{Block, Inline};
    use crate::flavor::FlavorKind;

    #[test]
    fn joins_lines_and_trims_indentation() {
        assert_eq!(
            blocks(FlavorKind::Markdown, "one\n   two\nthree  "),
            vec![Block::Paragraph(vec![Inline::Text("one\ntwo\nthree".into())])]
        );
    }

    #[test]
    fn list_marker_interrupts() {
        let parsed = blocks(FlavorKind::Markdown, "text line\n- item");
        assert_eq!(parsed.len(), 2);
        assert!(matches!(parsed[0], Block::Paragraph(_)));
        assert!(matches!(parsed[1], Block::List { ordered: None, .. }));
    }

    #[test]
    fn quote_interrupts() {
        let parsed = blocks(FlavorKind::Markdown, "text\n> quoted");
        assert!(matches!(parsed[1], Block::Quote(_)));
    }

    #[test]
    fn digits_interrupt_but_letters_do_not() {
        let parsed = blocks(FlavorKind::Markdown, "text\n1. item");
        assert_eq!(parsed.len(), 2);

        let parsed = blocks(FlavorKind::Markdown, "text\na. item\n    indented");
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn setext_underline_ends_the_previous_paragraph() {
        let parsed = blocks(FlavorKind::Markdown, "first\nsecond\n======");
        assert_eq!(parsed.len(), 2);
        assert!(matches!(parsed[1], Block::Heading { level: 1, .. }));
    }

    #[test]
    fn fenced_quote_interrupts_only_where_registered() {
        let gitlab = blocks(FlavorKind::Gitlab, "text\n>>>\nquoted\n>>>");
        assert!(matches!(gitlab[1], Block::Quote(_)));

        // In the base flavor `>>>` is an ordinary nested quote marker
        let base = blocks(FlavorKind::Markdown, "text\n>>>\nquoted\n>>>");
        assert!(matches!(base[1], Block::Quote(_)));
    }
}
