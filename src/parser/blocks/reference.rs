/// Link reference definitions: `[label]: url "title"`
use crate::ast::Block;
use crate::error::Result;
use crate::flavor::BlockKind;
use crate::lines::leading_spaces;
use crate::parser::inline::escape::unescape;
use crate::parser::{BlockRule, Context};
use crate::references::normalize_key;

pub struct ReferenceRule;

/// Label and remainder of a `[label]:` line
fn split_label(line: &str) -> Option<(&str, &str)> {
    if leading_spaces(line) > 3 {
        return None;
    }
    let rest = line.trim_start().strip_prefix('[')?;
    if rest.starts_with('[') {
        return None;
    }
    let end = rest.find("]:")?;
    let label = &rest[..end];
    if label.trim().is_empty() {
        return None;
    }
    Some((label, &rest[end + 2..]))
}

/// Parse a quoted or parenthesized title filling all of `text`
fn parse_title(text: &str) -> Option<String> {
    let text = text.trim();
    let close = match text.chars().next()? {
        '"' => '"',
        '\'' => '\'',
        '(' => ')',
        _ => return None,
    };
    let inner = text[1..].strip_suffix(close)?;
    Some(unescape(inner))
}

/// Url and optional same-line title after the label
fn parse_destination(rest: &str) -> Option<(String, Option<String>)> {
    let rest = rest.trim();
    let (url, after) = if let Some(bracketed) = rest.strip_prefix('<') {
        let end = bracketed.find('>')?;
        (&bracketed[..end], &bracketed[end + 1..])
    } else {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        (&rest[..end], &rest[end..])
    };
    if url.is_empty() {
        return None;
    }

    let title = if after.trim().is_empty() {
        None
    } else if after.starts_with(char::is_whitespace) {
        Some(parse_title(after)?)
    } else {
        return None;
    };
    Some((unescape(url), title))
}

impl BlockRule for ReferenceRule {
    fn kind(&self) -> BlockKind {
        BlockKind::Reference
    }

    fn identify(&self, lines: &[String], current: usize) -> bool {
        split_label(&lines[current])
            .and_then(|(_, rest)| parse_destination(rest))
            .is_some()
    }

    fn consume(
        &self,
        _ctx: &mut Context<'_>,
        lines: &[String],
        current: usize,
    ) -> Result<(Block, usize)> {
        let (label, rest) = split_label(&lines[current]).unwrap_or_default();
        let (url, mut title) = parse_destination(rest).unwrap_or_default();

        let mut last = current;
        if title.is_none()
            && let Some(next) = lines.get(current + 1)
            && next.starts_with([' ', '\t'])
            && let Some(next_title) = parse_title(next)
        {
            title = Some(next_title);
            last += 1;
        }

        Ok((
            Block::Reference {
                key: normalize_key(label),
                url,
                title,
            },
            last,
        ))
    }
}
