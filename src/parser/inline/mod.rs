/// Span-level markup: a single scan that hands trigger characters to rules
pub mod autolink;
pub mod checkbox;
pub mod code;
pub mod emphasis;
pub mod escape;
pub mod link;

use super::Context;
use crate::ast::Inline;
use crate::error::Result;

/// Tokenize `text` with the flavor's inline rules
///
/// At each trigger character the rules whose marker the text starts with are
/// tried in registration order and the first match wins. Without a match a
/// single character is kept as text.
pub(crate) fn tokenize(ctx: &mut Context<'_>, text: &str) -> Result<Vec<Inline>> {
    let flavor = ctx.flavor;
    let mut nodes = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];

        let plain = rest
            .find(|c: char| flavor.is_trigger(c))
            .unwrap_or(rest.len());
        if plain > 0 {
            push_text(&mut nodes, &rest[..plain]);
            pos += plain;
            continue;
        }

        let mut matched = None;
        for rule in flavor.inline_rules() {
            if !rule.markers().iter().any(|marker| rest.starts_with(marker)) {
                continue;
            }
            if let Some((node, len)) = rule.parse(ctx, rest)?
                && len > 0
            {
                matched = Some((node, len));
                break;
            }
        }

        match matched {
            Some((node, len)) => {
                push_node(&mut nodes, node);
                pos += len;
            }
            None => {
                let len = rest.chars().next().map_or(1, char::len_utf8);
                push_text(&mut nodes, &rest[..len]);
                pos += len;
            }
        }
    }

    Ok(nodes)
}

/// Append a node, merging adjacent text
pub fn push_node(nodes: &mut Vec<Inline>, node: Inline) {
    match node {
        Inline::Text(text) => push_text(nodes, &text),
        other => nodes.push(other),
    }
}

fn push_text(nodes: &mut Vec<Inline>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Inline::Text(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(Inline::Text(text.to_string()));
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::ast::Inline;
    use crate::flavor::{Flavor, FlavorKind};
    use crate::options::Options;
    use crate::parser::Context;

    /// Inline-parse `text` with a flavor's stock rules
    pub fn inlines(kind: FlavorKind, text: &str) -> Vec<Inline> {
        let flavor = Flavor::new(kind);
        let options = Options::default();
        let mut ctx = Context::new(&flavor, &options);
        ctx.parse_inline(text).unwrap()
    }

    pub fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{inlines, text};
    use super::*;
    use crate::flavor::FlavorKind;

    #[test]
    fn plain_text_is_one_node() {
        assert_eq!(inlines(FlavorKind::Markdown, "just words"), vec![text("just words")]);
    }

    #[test]
    fn unmatched_triggers_merge_into_text() {
        assert_eq!(
            inlines(FlavorKind::Markdown, "a * b [c & d"),
            vec![text("a * b [c & d")]
        );
    }

    #[test]
    fn non_ascii_text_survives() {
        assert_eq!(inlines(FlavorKind::Markdown, "héllo *wörld*")[0], text("héllo "));
    }

    #[test]
    fn push_node_merges_text() {
        let mut nodes = vec![text("a")];
        push_node(&mut nodes, text("b"));
        push_node(&mut nodes, Inline::LineBreak);
        push_node(&mut nodes, text("c"));
        assert_eq!(nodes, vec![text("ab"), Inline::LineBreak, text("c")]);
    }
}
