/// Links and images, inline (`[text](url "title")`) or by reference
use super::escape::unescape;
use crate::ast::{Inline, LinkTarget};
use crate::error::Result;
use crate::parser::{Context, InlineRule};
use crate::references::normalize_key;

/// Byte offset just past the `]` matching the `[` at `open`
fn closing_bracket(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Parse `(url "title")` at the start of `text`, returning the target and its length
fn inline_destination(text: &str) -> Option<(LinkTarget, usize)> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'(') {
        return None;
    }
    let mut i = 1;
    i += skip_whitespace(&text[i..]);

    let url = if bytes.get(i) == Some(&b'<') {
        let end = text[i..].find('>')? + i;
        let url = &text[i + 1..end];
        i = end + 1;
        url
    } else {
        let start = i;
        let mut parens = 0usize;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 1,
                b'(' => parens += 1,
                b')' if parens == 0 => break,
                b')' => parens -= 1,
                b if b.is_ascii_whitespace() => break,
                _ => {}
            }
            i += 1;
        }
        i = i.min(bytes.len());
        &text[start..i]
    };

    let spacing = skip_whitespace(&text[i..]);
    i += spacing;
    let title = match bytes.get(i) {
        Some(&quote @ (b'"' | b'\'')) if spacing > 0 => {
            let (title, len) = quoted(&text[i..], quote)?;
            i += len;
            i += skip_whitespace(&text[i..]);
            Some(title)
        }
        _ => None,
    };

    if bytes.get(i) != Some(&b')') {
        return None;
    }
    Some((
        LinkTarget::Resolved {
            url: unescape(url),
            title,
        },
        i + 1,
    ))
}

fn skip_whitespace(text: &str) -> usize {
    text.len() - text.trim_start().len()
}

/// A title between matching quotes, with backslash-escaped quotes inside
fn quoted(text: &str, quote: u8) -> Option<(String, usize)> {
    let bytes = text.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b if b == quote => return Some((unescape(&text[1..i]), i + 1)),
            _ => {}
        }
        i += 1;
    }
    None
}

/// `[key]`, `[]` or nothing after the link text, as a pending reference
fn reference_target(text: &str, label: &str) -> (LinkTarget, usize) {
    let gap = match text.as_bytes().first() {
        Some(b' ' | b'\n') => 1,
        _ => 0,
    };
    let explicit = text[gap..]
        .strip_prefix('[')
        .and_then(|rest| rest.find([']', '[']).filter(|&end| rest.as_bytes()[end] == b']'))
        .map(|end| (&text[gap + 1..gap + 1 + end], gap + end + 2));

    match explicit {
        Some((key, len)) if !key.trim().is_empty() => (
            LinkTarget::Pending {
                key: normalize_key(key),
            },
            len,
        ),
        Some((_, len)) => (
            LinkTarget::Pending {
                key: normalize_key(label),
            },
            len,
        ),
        None => (
            LinkTarget::Pending {
                key: normalize_key(label),
            },
            0,
        ),
    }
}

/// Bracketed label and target of a link starting with `[` at `open`
fn parse_link_parts(text: &str, open: usize) -> Option<(&str, LinkTarget, usize)> {
    let after = closing_bracket(text, open)?;
    let label = &text[open + 1..after - 1];
    let rest = &text[after..];

    if let Some((target, len)) = inline_destination(rest) {
        return Some((label, target, after + len));
    }
    let (target, len) = reference_target(rest, label);
    Some((label, target, after + len))
}

pub struct LinkRule;

impl InlineRule for LinkRule {
    fn markers(&self) -> &'static [&'static str] {
        &["["]
    }

    fn parse(&self, ctx: &mut Context<'_>, text: &str) -> Result<Option<(Inline, usize)>> {
        if ctx.in_link() {
            return Ok(None);
        }
        let Some((label, target, len)) = parse_link_parts(text, 0) else {
            return Ok(None);
        };

        let children = ctx.parse_link_text(label)?;
        Ok(Some((
            Inline::Link {
                target,
                children,
                source: text[..len].to_string(),
            },
            len,
        )))
    }
}

pub struct ImageRule;

impl InlineRule for ImageRule {
    fn markers(&self) -> &'static [&'static str] {
        &["!["]
    }

    fn parse(&self, ctx: &mut Context<'_>, text: &str) -> Result<Option<(Inline, usize)>> {
        let Some((alt, target, len)) = parse_link_parts(text, 1) else {
            return Ok(None);
        };
        let children = ctx.parse_link_text(alt)?;
        Ok(Some((
            Inline::Image {
                target,
                alt: alt.to_string(),
                children,
                source: text[..len].to_string(),
            },
            len,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{inlines, text};
    use super::*;
    use crate::flavor::FlavorKind;

    fn resolved(url: &str, title: Option<&str>) -> LinkTarget {
        LinkTarget::Resolved {
            url: url.to_string(),
            title: title.map(str::to_string),
        }
    }

    fn pending(key: &str) -> LinkTarget {
        LinkTarget::Pending {
            key: key.to_string(),
        }
    }

    #[test]
    fn inline_destinations() {
        assert_eq!(inline_destination("(/u)"), Some((resolved("/u", None), 4)));
        assert_eq!(
            inline_destination("( /u \"T\" )"),
            Some((resolved("/u", Some("T")), 10))
        );
        assert_eq!(
            inline_destination("(/wiki/A_(b) 'x')"),
            Some((resolved("/wiki/A_(b)", Some("x")), 17))
        );
        assert_eq!(
            inline_destination("(<a b>)"),
            Some((resolved("a b", None), 7))
        );
        assert_eq!(inline_destination("(/u junk)"), None);
        assert_eq!(inline_destination("(/u"), None);
    }

    #[test]
    fn reference_forms() {
        assert_eq!(reference_target("[Key] x", "text"), (pending("key"), 5));
        assert_eq!(reference_target(" [] x", "Text"), (pending("text"), 3));
        assert_eq!(reference_target(" x", "Text"), (pending("text"), 0));
    }

    #[test]
    fn inline_link_node() {
        let nodes = inlines(FlavorKind::Markdown, "see [the *docs*](/d \"Docs\").");
        assert_eq!(
            nodes,
            vec![
                text("see "),
                Inline::Link {
                    target: resolved("/d", Some("Docs")),
                    children: vec![
                        text("the "),
                        Inline::Emphasis {
                            strong: false,
                            children: vec![text("docs")]
                        }
                    ],
                    source: "[the *docs*](/d \"Docs\")".into(),
                },
                text("."),
            ]
        );
    }

    #[test]
    fn links_do_not_nest() {
        let nodes = inlines(FlavorKind::Markdown, "[a [b](/x) c](/y)");
        match &nodes[0] {
            Inline::Link {
                target, children, ..
            } => {
                assert_eq!(target, &resolved("/y", None));
                assert_eq!(children, &vec![text("a [b](/x) c")]);
            }
            other => panic!("expected a link, got {:?}", other),
        }
    }

    #[test]
    fn images_keep_raw_alt_text_beside_parsed_alt() {
        let nodes = inlines(FlavorKind::Markdown, "![a *b*](/i.png)");
        assert_eq!(
            nodes,
            vec![Inline::Image {
                target: resolved("/i.png", None),
                alt: "a *b*".into(),
                children: vec![
                    text("a "),
                    Inline::Emphasis {
                        strong: false,
                        children: vec![text("b")]
                    }
                ],
                source: "![a *b*](/i.png)".into(),
            }]
        );
    }

    #[test]
    fn unbalanced_bracket_is_text() {
        assert_eq!(inlines(FlavorKind::Markdown, "[oops"), vec![text("[oops")]);
    }
}
