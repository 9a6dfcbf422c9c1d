/// Emphasis, strong emphasis and strikeout
use crate::ast::Inline;
use crate::error::Result;
use crate::parser::{Context, InlineRule};

/// Length of the run of `marker` bytes starting at `pos`
fn run_length(bytes: &[u8], pos: usize, marker: u8) -> usize {
    bytes[pos..].iter().take_while(|&&b| b == marker).count()
}

/// Find the next double marker at or after `from`
fn find_double(bytes: &[u8], from: usize, marker: u8) -> Option<usize> {
    (from..bytes.len().saturating_sub(1)).find(|&i| bytes[i] == marker && bytes[i + 1] == marker)
}

/// Byte offset of the closing marker for an opener of `count` markers
///
/// Escaped markers are skipped, and so are complete pairs of the other
/// strength (`*a*` inside strong text, `**a**` inside emphasis).
fn find_closer(bytes: &[u8], marker: u8, count: usize) -> Option<usize> {
    let start = count;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if bytes.get(i + 1) == Some(&marker) => i += 2,
            b if b == marker => {
                let run = run_length(bytes, i, marker);
                if count == 2 {
                    if run >= 2 {
                        return (i > start).then_some(i);
                    }
                    let inner_close = bytes[i + 1..].iter().position(|&b| b == marker)?;
                    i += inner_close + 2;
                } else if run == 2 && i + 2 < bytes.len() {
                    let close = find_double(bytes, i + 3, marker)?;
                    i = close + 2;
                } else {
                    // An underscore inside a word neither closes nor belongs to the content
                    let next = bytes.get(i + 1);
                    if marker == b'_' && next.is_some_and(|b| b.is_ascii_alphanumeric()) {
                        return None;
                    }
                    return (i > start).then_some(i);
                }
            }
            _ => i += 1,
        }
    }
    None
}

/// `*em*`, `_em_`, `**strong**` and `__strong__`
pub struct EmphasisRule;

impl InlineRule for EmphasisRule {
    fn markers(&self) -> &'static [&'static str] {
        &["*", "_"]
    }

    fn parse(&self, ctx: &mut Context<'_>, text: &str) -> Result<Option<(Inline, usize)>> {
        let bytes = text.as_bytes();
        let marker = bytes[0];
        let count = if bytes.get(1) == Some(&marker) { 2 } else { 1 };

        let Some(close) = find_closer(bytes, marker, count) else {
            return Ok(literal_opener(text, count));
        };
        let content = &text[count..close];
        if content.is_empty() || content.starts_with(char::is_whitespace) {
            return Ok(literal_opener(text, count));
        }

        let children = ctx.parse_inline(content)?;
        Ok(Some((
            Inline::Emphasis {
                strong: count == 2,
                children,
            },
            close + count,
        )))
    }
}

/// A double marker that opens nothing stays literal as a pair
fn literal_opener(text: &str, count: usize) -> Option<(Inline, usize)> {
    (count == 2).then(|| (Inline::Text(text[..2].to_string()), 2))
}

/// `~~struck~~`
pub struct StrikeoutRule;

impl InlineRule for StrikeoutRule {
    fn markers(&self) -> &'static [&'static str] {
        &["~~"]
    }

    fn parse(&self, ctx: &mut Context<'_>, text: &str) -> Result<Option<(Inline, usize)>> {
        let bytes = text.as_bytes();
        let mut i = 2;
        let close = loop {
            match bytes.get(i) {
                None => return Ok(None),
                Some(b'\\') => i += 2,
                Some(b'~') if bytes.get(i + 1) == Some(&b'~') && i > 2 => break i,
                Some(_) => i += 1,
            }
        };

        let content = &text[2..close];
        if content.starts_with(char::is_whitespace) {
            return Ok(None);
        }
        let children = ctx.parse_inline(content)?;
        Ok(Some((Inline::Strikeout(children), close + 2)))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{inlines, text};
    use crate::ast::Inline;
    use crate::flavor::FlavorKind;
    use rstest::rstest;

    fn em(children: Vec<Inline>) -> Inline {
        Inline::Emphasis {
            strong: false,
            children,
        }
    }

    fn strong(children: Vec<Inline>) -> Inline {
        Inline::Emphasis {
            strong: true,
            children,
        }
    }

    #[rstest]
    #[case("*a*")]
    #[case("_a_")]
    fn single_markers(#[case] input: &str) {
        assert_eq!(inlines(FlavorKind::Markdown, input), vec![em(vec![text("a")])]);
    }

    #[rstest]
    #[case("**a**")]
    #[case("__a__")]
    fn double_markers(#[case] input: &str) {
        assert_eq!(inlines(FlavorKind::Markdown, input), vec![strong(vec![text("a")])]);
    }

    #[test]
    fn nested_pairs_are_skipped_when_closing() {
        assert_eq!(
            inlines(FlavorKind::Markdown, "**a *b* c**"),
            vec![strong(vec![text("a "), em(vec![text("b")]), text(" c")])]
        );
        assert_eq!(
            inlines(FlavorKind::Markdown, "*a **b** c*"),
            vec![em(vec![text("a "), strong(vec![text("b")]), text(" c")])]
        );
    }

    #[test]
    fn content_cannot_start_with_whitespace() {
        assert_eq!(inlines(FlavorKind::Markdown, "* a*"), vec![text("* a*")]);
        assert_eq!(inlines(FlavorKind::Markdown, "** a**"), vec![text("** a**")]);
    }

    #[test]
    fn intraword_underscores_do_not_close() {
        assert_eq!(
            inlines(FlavorKind::Markdown, "snake_case_name"),
            vec![text("snake_case_name")]
        );
        assert_eq!(
            inlines(FlavorKind::Markdown, "_snake_case_"),
            vec![text("_snake"), em(vec![text("case")])]
        );
    }

    #[test]
    fn escaped_marker_inside_emphasis() {
        assert_eq!(
            inlines(FlavorKind::Markdown, r"*a\*b*"),
            vec![em(vec![text("a*b")])]
        );
    }

    #[test]
    fn strikeout_only_in_extended_flavors() {
        assert_eq!(
            inlines(FlavorKind::Github, "~~gone~~ kept"),
            vec![Inline::Strikeout(vec![text("gone")]), text(" kept")]
        );
        assert_eq!(inlines(FlavorKind::Markdown, "~~gone~~"), vec![text("~~gone~~")]);
        assert_eq!(inlines(FlavorKind::Github, "~~~~"), vec![text("~~~~")]);
    }
}
