/// Horizontal rules
use crate::ast::Block;
use crate::error::Result;
use crate::flavor::BlockKind;
use crate::lines::leading_spaces;
use crate::parser::{BlockRule, Context};

pub struct HorizontalRuleRule;

/// Three or more matching `-`, `*` or `_`, optionally separated by spaces
pub fn is_horizontal_rule(line: &str) -> bool {
    if leading_spaces(line) > 3 {
        return false;
    }

    let mut marks = line.chars().filter(|c| !c.is_whitespace());
    let first = match marks.next() {
        Some(c @ ('-' | '*' | '_')) => c,
        _ => return false,
    };

    let mut count = 1;
    for c in marks {
        if c != first {
            return false;
        }
        count += 1;
    }
    count >= 3
}

impl BlockRule for HorizontalRuleRule {
    fn kind(&self) -> BlockKind {
        BlockKind::Hr
    }

    fn identify(&self, lines: &[String], current: usize) -> bool {
        is_horizontal_rule(&lines[current])
    }

    fn consume(
        &self,
        _ctx: &mut Context<'_>,
        _lines: &[String],
        current: usize,
    ) -> Result<(Block, usize)> {
        Ok((Block::HorizontalRule, current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_rules() {
        assert!(is_horizontal_rule("---"));
        assert!(is_horizontal_rule(" * * *"));
        assert!(is_horizontal_rule("___   "));
        assert!(is_horizontal_rule("- - - -"));
    }

    #[test]
    fn rejects_non_rules() {
        assert!(!is_horizontal_rule("--"));
        assert!(!is_horizontal_rule("-*-"));
        assert!(!is_horizontal_rule("    ---"));
        assert!(!is_horizontal_rule("--- a"));
        assert!(!is_horizontal_rule("==="));
    }
}
