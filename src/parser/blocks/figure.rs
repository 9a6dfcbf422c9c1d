/// Figures: `: ` content lines with an optional `:: ` caption run at either end
use crate::ast::{Block, Endcap};
use crate::error::Result;
use crate::flavor::BlockKind;
use crate::lines::is_blank;
use crate::parser::{BlockRule, Context};

pub struct FigureRule;

enum FigureLine<'a> {
    Content(&'a str),
    Caption(&'a str),
}

fn classify(line: &str) -> Option<FigureLine<'_>> {
    if line == ":" {
        Some(FigureLine::Content(""))
    } else if let Some(rest) = line.strip_prefix(": ") {
        Some(FigureLine::Content(rest))
    } else {
        line.strip_prefix(":: ").map(FigureLine::Caption)
    }
}

impl BlockRule for FigureRule {
    fn kind(&self) -> BlockKind {
        BlockKind::Figure
    }

    fn identify(&self, lines: &[String], current: usize) -> bool {
        classify(&lines[current]).is_some()
    }

    fn consume(
        &self,
        ctx: &mut Context<'_>,
        lines: &[String],
        current: usize,
    ) -> Result<(Block, usize)> {
        let mut figure = Vec::new();
        let mut i = current;
        let mut ended_by_blank = false;
        while i < lines.len() {
            if is_blank(&lines[i]) {
                ended_by_blank = true;
                break;
            }
            let Some(line) = classify(&lines[i]) else {
                break;
            };
            figure.push(line);
            i += 1;
        }

        let is_caption = |line: &FigureLine<'_>| matches!(line, FigureLine::Caption(_));
        let leading = figure.iter().take_while(|l| is_caption(*l)).count();
        let trailing = figure.iter().rev().take_while(|l| is_caption(*l)).count();

        // Only one contiguous run touching an edge is kept as the caption
        let (endcap, caption_range) = if leading > 0 {
            (Endcap::Before, 0..leading)
        } else if trailing > 0 {
            (Endcap::After, figure.len() - trailing..figure.len())
        } else {
            (Endcap::None, 0..0)
        };

        let mut content = Vec::new();
        let mut caption = Vec::new();
        for (n, line) in figure.iter().enumerate() {
            match line {
                FigureLine::Content(text) => content.push(text.to_string()),
                FigureLine::Caption(text) if caption_range.contains(&n) => {
                    caption.push(text.to_string())
                }
                FigureLine::Caption(_) => {}
            }
        }

        let content = ctx.parse_blocks(&content)?;
        let caption = ctx.parse_blocks(&caption)?;

        // A blank line is consumed with the figure; any other line is left alone
        let last = if ended_by_blank { i } else { i - 1 };
        Ok((
            Block::Figure {
                endcap,
                content,
                caption,
            },
            last,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::blocks;
    use super::*;
    use crate::ast::Inline;
    use crate::flavor::FlavorKind;

    fn para(text: &str) -> Block {
        Block::Paragraph(vec![Inline::Text(text.to_string())])
    }

    #[test]
    fn caption_after_content() {
        let parsed = blocks(FlavorKind::Chyrp, ": body line\n:: caption line");
        assert_eq!(
            parsed,
            vec![Block::Figure {
                endcap: Endcap::After,
                content: vec![para("body line")],
                caption: vec![para("caption line")],
            }]
        );
    }

    #[test]
    fn caption_before_content_drops_stray_captions() {
        let parsed = blocks(FlavorKind::Chyrp, ":: top\n: body\n:: stray\n: more");
        assert_eq!(
            parsed,
            vec![Block::Figure {
                endcap: Endcap::Before,
                content: vec![para("body\nmore")],
                caption: vec![para("top")],
            }]
        );
    }

    #[test]
    fn no_caption_at_an_edge() {
        let parsed = blocks(FlavorKind::Chyrp, ": a\n:: middle\n: b");
        assert!(matches!(
            &parsed[0],
            Block::Figure { endcap: Endcap::None, caption, .. } if caption.is_empty()
        ));
    }

    #[test]
    fn bare_colon_is_an_empty_content_line() {
        let parsed = blocks(FlavorKind::Chyrp, ": one\n:\n: two");
        match &parsed[0] {
            Block::Figure { content, .. } => assert_eq!(content, &vec![para("one"), para("two")]),
            other => panic!("expected a figure, got {:?}", other),
        }
    }

    #[test]
    fn unprefixed_line_ends_the_figure_with_its_caption() {
        let parsed = blocks(FlavorKind::Chyrp, ": body\n:: caption\nafter");
        assert_eq!(parsed.len(), 2);
        assert!(matches!(parsed[0], Block::Figure { endcap: Endcap::After, .. }));
        assert_eq!(parsed[1], para("after"));
    }

    #[test]
    fn figures_are_chyrp_only() {
        let parsed = blocks(FlavorKind::Gitlab, ": body");
        assert_eq!(parsed, vec![para(": body")]);
    }
}
