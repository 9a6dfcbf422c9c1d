/// Task list checkboxes: `[ ]`, `[x]`, `[X]` and `[~]`
use crate::ast::{CheckboxState, Inline};
use crate::error::Result;
use crate::parser::{Context, InlineRule};

pub struct CheckboxRule;

impl InlineRule for CheckboxRule {
    fn markers(&self) -> &'static [&'static str] {
        &["[ ]", "[x]", "[X]", "[~]"]
    }

    fn parse(&self, _ctx: &mut Context<'_>, text: &str) -> Result<Option<(Inline, usize)>> {
        let state = match text.as_bytes().get(1) {
            Some(b' ') => CheckboxState::Unchecked,
            Some(b'~') => CheckboxState::Inapplicable,
            _ => CheckboxState::Checked,
        };
        Ok(Some((
            Inline::Checkbox {
                state,
                marker: text[..3].to_string(),
            },
            3,
        )))
    }
}
