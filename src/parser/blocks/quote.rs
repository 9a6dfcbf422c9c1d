/// Block quotes (`>`) and fenced quotes (`>>>`)
use crate::ast::Block;
use crate::error::Result;
use crate::flavor::BlockKind;
use crate::lines::{is_blank, leading_spaces};
use crate::parser::{BlockRule, Context};

pub struct QuoteRule;

/// The text after an up-to-three-space indent, when it opens with `>`
fn after_marker(line: &str) -> Option<&str> {
    let indent = leading_spaces(line);
    if indent > 3 {
        return None;
    }
    line[indent..].strip_prefix('>')
}

impl BlockRule for QuoteRule {
    fn kind(&self) -> BlockKind {
        BlockKind::Quote
    }

    fn identify(&self, lines: &[String], current: usize) -> bool {
        after_marker(&lines[current])
            .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', '\t', '>']))
    }

    fn consume(
        &self,
        ctx: &mut Context<'_>,
        lines: &[String],
        current: usize,
    ) -> Result<(Block, usize)> {
        let mut content = Vec::new();
        let mut i = current;

        // Lines without a marker are lazy continuations and kept as they are
        while i < lines.len() && !is_blank(&lines[i]) {
            let line = &lines[i];
            let stripped = match after_marker(line) {
                Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
                None => line.as_str(),
            };
            content.push(stripped.to_string());
            i += 1;
        }

        let children = ctx.parse_blocks(&content)?;
        Ok((Block::Quote(children), i.min(lines.len() - 1)))
    }
}

/// A quote opened and closed by lines of three or more `>`
pub struct FencedQuoteRule;

fn fence_len(line: &str) -> Option<usize> {
    let run = line.bytes().take_while(|&b| b == b'>').count();
    (run >= 3 && line[run..].trim().is_empty()).then_some(run)
}

impl BlockRule for FencedQuoteRule {
    fn kind(&self) -> BlockKind {
        BlockKind::FencedQuote
    }

    fn identify(&self, lines: &[String], current: usize) -> bool {
        fence_len(&lines[current]).is_some()
    }

    fn consume(
        &self,
        ctx: &mut Context<'_>,
        lines: &[String],
        current: usize,
    ) -> Result<(Block, usize)> {
        let opening = fence_len(&lines[current]).unwrap_or(3);

        let mut i = current + 1;
        while i < lines.len() {
            if fence_len(&lines[i]).is_some_and(|len| len >= opening) {
                break;
            }
            i += 1;
        }

        let children = ctx.parse_blocks(&lines[current + 1..i])?;
        Ok((Block::Quote(children), i.min(lines.len() - 1)))
    }
}
