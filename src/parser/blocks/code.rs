/// Indented and fenced code blocks
use crate::ast::Block;
use crate::error::Result;
use crate::flavor::BlockKind;
use crate::lines::is_blank;
use crate::parser::inline::escape::unescape;
use crate::parser::{BlockRule, Context};

/// Code indented by four spaces or a tab
pub struct IndentedCodeRule;

fn is_code_indented(line: &str) -> bool {
    line.starts_with('\t') || line.starts_with("    ")
}

/// Remove one tab or four columns of spaces
fn remove_code_indent(line: &str) -> &str {
    match line.strip_prefix('\t') {
        Some(rest) => rest,
        None => line.get(4..).unwrap_or(""),
    }
}

impl BlockRule for IndentedCodeRule {
    fn kind(&self) -> BlockKind {
        BlockKind::Code
    }

    fn identify(&self, lines: &[String], current: usize) -> bool {
        is_code_indented(&lines[current])
    }

    fn consume(
        &self,
        _ctx: &mut Context<'_>,
        lines: &[String],
        current: usize,
    ) -> Result<(Block, usize)> {
        let mut content = Vec::new();
        let mut i = current;

        while i < lines.len() {
            let line = &lines[i];
            if is_code_indented(line) {
                content.push(remove_code_indent(line));
            } else if is_blank(line)
                && lines.get(i + 1).is_some_and(|next| is_code_indented(next))
            {
                // Blank lines belong to the block only when more code follows
                content.push(remove_code_indent(line));
            } else {
                break;
            }
            i += 1;
        }

        Ok((
            Block::CodeBlock {
                content: content.join("\n"),
                language: None,
            },
            i - 1,
        ))
    }
}

/// Code between fences of three or more backticks or tildes
pub struct FencedCodeRule;

impl BlockRule for FencedCodeRule {
    fn kind(&self) -> BlockKind {
        BlockKind::FencedCode
    }

    fn identify(&self, lines: &[String], current: usize) -> bool {
        let line = &lines[current];
        if line.starts_with("~~~") {
            return true;
        }
        // A backtick fence cannot carry backticks in its info string
        let run = line.bytes().take_while(|&b| b == b'`').count();
        run >= 3 && !line[run..].contains('`')
    }

    fn consume(
        &self,
        _ctx: &mut Context<'_>,
        lines: &[String],
        current: usize,
    ) -> Result<(Block, usize)> {
        let opening = lines[current].trim_start();
        let fence_char = opening.as_bytes()[0];
        let fence_len = opening.bytes().take_while(|&b| b == fence_char).count();

        let language = opening[fence_len..]
            .split_whitespace()
            .next()
            .map(unescape);

        let mut content = Vec::new();
        let mut i = current + 1;
        while i < lines.len() {
            let line = &lines[i];
            let run = line.bytes().take_while(|&b| b == fence_char).count();
            if run >= fence_len && line[run..].trim_start().is_empty() {
                break;
            }
            content.push(line.as_str());
            i += 1;
        }

        // An unclosed fence runs to the end of the document
        let last = i.min(lines.len() - 1);

        Ok((
            Block::CodeBlock {
                content: content.join("\n"),
                language,
            },
            last,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::blocks;
    use crate::ast::Block;
    use crate::flavor::FlavorKind;

    fn code(content: &str, language: Option<&str>) -> Block {
        Block::CodeBlock {
            content: content.to_string(),
            language: language.map(str::to_string),
        }
    }

    #[test]
    fn indented_code_keeps_inner_blank_lines() {
        let parsed = blocks(FlavorKind::Markdown, "    a\n\n\tb\n\nafter");
        assert_eq!(parsed[0], code("a\n\nb", None));
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn fenced_code_with_language() {
        let parsed = blocks(FlavorKind::Markdown, "```rust extra\nlet *x* = 1;\n```\ntail");
        assert_eq!(parsed[0], code("let *x* = 1;", Some("rust")));
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn language_tag_is_unescaped() {
        let parsed = blocks(FlavorKind::Markdown, "~~~ c\\+\\+\nint x;\n~~~");
        assert_eq!(parsed[0], code("int x;", Some("c++")));
    }

    #[test]
    fn closing_fence_must_be_long_enough() {
        let parsed = blocks(FlavorKind::Markdown, "````\n```\n````");
        assert_eq!(parsed, vec![code("```", None)]);
    }

    #[test]
    fn unclosed_fence_runs_to_the_end() {
        let parsed = blocks(FlavorKind::Markdown, "```\n# not a heading\n\n- nor a list");
        assert_eq!(parsed, vec![code("# not a heading\n\n- nor a list", None)]);
    }

    #[test]
    fn backticks_in_info_string_are_not_a_fence() {
        let parsed = blocks(FlavorKind::Markdown, "``` a`b\ntext");
        assert!(matches!(parsed[0], Block::Paragraph(_)));
    }
}
