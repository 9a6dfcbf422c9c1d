/// ATX (`# Title`) and setext (underlined) headings
use crate::ast::Block;
use crate::error::Result;
use crate::flavor::BlockKind;
use crate::lines::leading_spaces;
use crate::parser::{BlockRule, Context};

pub struct HeadlineRule;

/// Level and text of an ATX heading line
fn atx_heading(line: &str) -> Option<(u8, &str)> {
    let indent = leading_spaces(line);
    if indent > 3 {
        return None;
    }

    let trimmed = &line[indent..];
    let hashes = trimmed.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }

    let after_hashes = &trimmed[hashes..];
    if !after_hashes.is_empty() && !after_hashes.starts_with([' ', '\t']) {
        return None;
    }

    Some((hashes as u8, strip_closing_sequence(after_hashes.trim())))
}

/// Drop an optional closing run of `#`, which must follow whitespace
fn strip_closing_sequence(text: &str) -> &str {
    let without_hashes = text.trim_end_matches('#');
    if without_hashes.is_empty() {
        return "";
    }
    if without_hashes.len() < text.len() && without_hashes.ends_with([' ', '\t']) {
        return without_hashes.trim_end();
    }
    text
}

/// Level of a setext underline: `=` for 1, `-` for 2
fn setext_level(line: &str) -> Option<u8> {
    if leading_spaces(line) > 3 {
        return None;
    }
    let trimmed = line.trim();
    let first = trimmed.bytes().next()?;
    if !matches!(first, b'=' | b'-') || !trimmed.bytes().all(|b| b == first) {
        return None;
    }
    Some(if first == b'=' { 1 } else { 2 })
}

impl BlockRule for HeadlineRule {
    fn kind(&self) -> BlockKind {
        BlockKind::Headline
    }

    fn identify(&self, lines: &[String], current: usize) -> bool {
        atx_heading(&lines[current]).is_some()
            || lines
                .get(current + 1)
                .is_some_and(|next| setext_level(next).is_some())
    }

    fn consume(
        &self,
        ctx: &mut Context<'_>,
        lines: &[String],
        current: usize,
    ) -> Result<(Block, usize)> {
        if let Some((level, text)) = atx_heading(&lines[current]) {
            let content = ctx.parse_inline(text)?;
            return Ok((Block::Heading { level, content }, current));
        }

        let level = lines
            .get(current + 1)
            .and_then(|next| setext_level(next))
            .unwrap_or(2);
        let content = ctx.parse_inline(lines[current].trim())?;
        Ok((Block::Heading { level, content }, current + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::blocks;
    use super::*;
    use crate::ast::Inline;
    use crate::flavor::FlavorKind;

    #[test]
    fn atx_levels_and_closing_hashes() {
        assert_eq!(atx_heading("# Title"), Some((1, "Title")));
        assert_eq!(atx_heading("### Title ###"), Some((3, "Title")));
        assert_eq!(atx_heading("## C#"), Some((2, "C#")));
        assert_eq!(atx_heading("#"), Some((1, "")));
        assert_eq!(atx_heading("#hashtag"), None);
        assert_eq!(atx_heading("####### seven"), None);
    }

    #[test]
    fn setext_underlines() {
        assert_eq!(setext_level("==="), Some(1));
        assert_eq!(setext_level("---  "), Some(2));
        assert_eq!(setext_level("- - -"), None);
        assert_eq!(setext_level("=-="), None);
    }

    #[test]
    fn setext_heading_consumes_two_lines() {
        let parsed = blocks(FlavorKind::Markdown, "Title\n-----\nbody");
        assert_eq!(
            parsed[0],
            Block::Heading {
                level: 2,
                content: vec![Inline::Text("Title".into())]
            }
        );
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn rule_standing_alone_is_not_an_underline() {
        let parsed = blocks(FlavorKind::Markdown, "---\ntext");
        assert_eq!(parsed[0], Block::HorizontalRule);
    }
}
