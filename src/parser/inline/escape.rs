/// Backslash escapes, hard line breaks and character entities
use crate::ast::Inline;
use crate::error::Result;
use crate::parser::{Context, InlineRule};

/// Strip backslashes in front of ASCII punctuation
pub fn unescape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(&next) = chars.peek()
            && next.is_ascii_punctuation()
        {
            result.push(next);
            chars.next();
        } else {
            result.push(c);
        }
    }
    result
}

/// `\*` is a literal star; a backslash before a newline is a hard break
pub struct EscapeRule;

impl InlineRule for EscapeRule {
    fn markers(&self) -> &'static [&'static str] {
        &["\\"]
    }

    fn parse(&self, _ctx: &mut Context<'_>, text: &str) -> Result<Option<(Inline, usize)>> {
        Ok(match text[1..].chars().next() {
            Some('\n') => Some((Inline::LineBreak, 2)),
            Some(c) if c.is_ascii_punctuation() => Some((Inline::Text(c.to_string()), 2)),
            _ => None,
        })
    }
}

/// Two or more spaces at the end of a line
pub struct HardBreakRule;

impl InlineRule for HardBreakRule {
    fn markers(&self) -> &'static [&'static str] {
        &["  "]
    }

    fn parse(&self, _ctx: &mut Context<'_>, text: &str) -> Result<Option<(Inline, usize)>> {
        let spaces = text.bytes().take_while(|&b| b == b' ').count();
        if text[spaces..].starts_with('\n') {
            return Ok(Some((Inline::LineBreak, spaces + 1)));
        }
        Ok(Some((Inline::Text(text[..spaces].to_string()), spaces)))
    }
}

/// Named and numeric entities pass through untouched
pub struct EntityRule;

impl InlineRule for EntityRule {
    fn markers(&self) -> &'static [&'static str] {
        &["&"]
    }

    fn parse(&self, _ctx: &mut Context<'_>, text: &str) -> Result<Option<(Inline, usize)>> {
        let body = &text[1..];
        let body = body.strip_prefix('#').unwrap_or(body);
        let name = body.bytes().take_while(|b| b.is_ascii_alphanumeric()).count();
        if name == 0 || !body[name..].starts_with(';') {
            return Ok(None);
        }
        let len = text.len() - body.len() + name + 1;
        Ok(Some((Inline::RawHtml(text[..len].to_string()), len)))
    }
}
