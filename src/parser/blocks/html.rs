/// Raw HTML blocks, passed through verbatim
use crate::ast::Block;
use crate::error::Result;
use crate::flavor::BlockKind;
use crate::lines::is_blank;
use crate::parser::{BlockRule, Context};

/// Elements that start span-level HTML, never an HTML block
const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "acronym", "b", "basefont", "bdo", "big", "br", "button", "blink", "cite",
    "code", "del", "dfn", "em", "font", "i", "img", "ins", "input", "iframe", "kbd", "label",
    "map", "object", "output", "q", "s", "samp", "script", "select", "small", "span", "strike",
    "strong", "sub", "sup", "textarea", "tt", "u", "var",
];

pub struct HtmlRule;

fn is_block_tag(line: &str) -> bool {
    let Some(rest) = line.strip_prefix('<') else {
        return false;
    };
    if rest.starts_with(' ') {
        return false;
    }
    if rest.starts_with("!--") {
        return true;
    }

    let Some(end) = rest.find(['>', ' ']) else {
        return false;
    };
    let tag = rest[..end].trim_end_matches('/');
    !tag.is_empty()
        && tag.bytes().all(|b| b.is_ascii_alphanumeric())
        && !INLINE_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str())
}

impl BlockRule for HtmlRule {
    fn kind(&self) -> BlockKind {
        BlockKind::Html
    }

    fn identify(&self, lines: &[String], current: usize) -> bool {
        is_block_tag(&lines[current])
    }

    fn consume(
        &self,
        _ctx: &mut Context<'_>,
        lines: &[String],
        current: usize,
    ) -> Result<(Block, usize)> {
        let end = lines[current..]
            .iter()
            .position(|line| is_blank(line))
            .map_or(lines.len(), |offset| current + offset);

        let html = lines[current..end].join("\n");
        Ok((Block::HtmlBlock(html), end.min(lines.len() - 1)))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::blocks;
    use super::*;
    use crate::flavor::FlavorKind;

    #[test]
    fn block_level_tags() {
        assert!(is_block_tag("<div>"));
        assert!(is_block_tag("<div class=\"x\">"));
        assert!(is_block_tag("<hr/>"));
        assert!(is_block_tag("<!-- note"));
    }

    #[test]
    fn inline_tags_and_non_tags() {
        assert!(!is_block_tag("<span>x</span>"));
        assert!(!is_block_tag("<B>bold</B>"));
        assert!(!is_block_tag("< div>"));
        assert!(!is_block_tag("<div"));
        assert!(!is_block_tag(" <div>"));
        assert!(!is_block_tag("</table>"));
    }

    #[test]
    fn consumes_until_a_blank_line() {
        let parsed = blocks(FlavorKind::Markdown, "<div>\n*raw*\n</div>\n\ntext");
        assert_eq!(parsed[0], Block::HtmlBlock("<div>\n*raw*\n</div>".into()));
        assert_eq!(parsed.len(), 2);
    }
}
