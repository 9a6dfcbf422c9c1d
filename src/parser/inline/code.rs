/// Code spans
use crate::ast::Inline;
use crate::error::Result;
use crate::parser::{Context, InlineRule};

pub struct CodeSpanRule;

impl InlineRule for CodeSpanRule {
    fn markers(&self) -> &'static [&'static str] {
        &["`"]
    }

    fn parse(&self, _ctx: &mut Context<'_>, text: &str) -> Result<Option<(Inline, usize)>> {
        let bytes = text.as_bytes();
        let opening = bytes.iter().take_while(|&&b| b == b'`').count();

        let mut j = opening;
        while j < bytes.len() {
            if bytes[j] != b'`' {
                j += 1;
                continue;
            }
            let close_start = j;
            while j < bytes.len() && bytes[j] == b'`' {
                j += 1;
            }
            if j - close_start == opening {
                let mut content = text[opening..close_start].replace('\n', " ");
                if content.len() > 2
                    && content.starts_with(' ')
                    && content.ends_with(' ')
                    && !content.trim().is_empty()
                {
                    content = content[1..content.len() - 1].to_string();
                }
                return Ok(Some((Inline::CodeSpan(content), j)));
            }
        }

        // An unmatched run stays literal as a whole
        Ok(Some((Inline::Text(text[..opening].to_string()), opening)))
    }
}
