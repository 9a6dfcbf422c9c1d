/// Autolinks and inline HTML
use crate::ast::Inline;
use crate::error::Result;
use crate::parser::{Context, InlineRule};

/// `scheme://` with a scheme of letters, digits, `+`, `.` or `-`
fn has_url_scheme(text: &str) -> bool {
    let Some(colon) = text.find("://") else {
        return false;
    };
    let scheme = &text[..colon];
    scheme.len() >= 2
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
        && text.len() > colon + 3
}

fn is_email_address(text: &str) -> bool {
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-!#$&'*/=?^`{|}~".contains(c))
        && domain.contains('.')
        && domain.split('.').all(|part| {
            !part.is_empty()
                && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
                && !part.starts_with('-')
                && !part.ends_with('-')
        })
}

/// An HTML tag such as `<span class="x">`, `</em>` or `<br/>`
fn is_html_tag(content: &str) -> bool {
    let name = content.strip_prefix('/').unwrap_or(content);
    name.starts_with(|c: char| c.is_ascii_alphabetic())
        && name
            .chars()
            .take_while(|c| !c.is_whitespace() && *c != '/')
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// `<url>`, `<user@host>`, `<!-- comments -->` and inline tags
pub struct AngleBracketRule;

impl InlineRule for AngleBracketRule {
    fn markers(&self) -> &'static [&'static str] {
        &["<"]
    }

    fn parse(&self, ctx: &mut Context<'_>, text: &str) -> Result<Option<(Inline, usize)>> {
        if text.starts_with("<!--") {
            return Ok(text[4..].find("-->").map(|end| {
                let len = end + 7;
                (Inline::RawHtml(text[..len].to_string()), len)
            }));
        }

        let Some(end) = text[1..].find(['>', '<']).map(|end| end + 1) else {
            return Ok(None);
        };
        if text.as_bytes()[end] != b'>' {
            return Ok(None);
        }
        let content = &text[1..end];
        let len = end + 1;

        if !content.contains(char::is_whitespace) {
            if has_url_scheme(content) {
                if ctx.in_link() {
                    return Ok(None);
                }
                let url = content.to_string();
                return Ok(Some((Inline::AutoLink { url, email: false }, len)));
            }
            if is_email_address(content) {
                if ctx.in_link() {
                    return Ok(None);
                }
                let url = content.to_string();
                return Ok(Some((Inline::AutoLink { url, email: true }, len)));
            }
        }

        if is_html_tag(content) {
            return Ok(Some((Inline::RawHtml(text[..len].to_string()), len)));
        }
        Ok(None)
    }
}

/// Trailing punctuation that ends a sentence rather than the url
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ':', ';', '\'', '"', '!', '?'];

/// Cut trailing punctuation and closing parentheses that have no opener
fn trim_url_end(url: &str) -> &str {
    let mut url = url;
    loop {
        if let Some(stripped) = url.strip_suffix(TRAILING_PUNCTUATION) {
            url = stripped;
        } else if url.ends_with(')') && url.matches(')').count() > url.matches('(').count() {
            url = &url[..url.len() - 1];
        } else {
            return url;
        }
    }
}

/// Bare `http://`, `https://`, `ftp://` and `www.` urls
pub struct BareUrlRule;

impl InlineRule for BareUrlRule {
    fn markers(&self) -> &'static [&'static str] {
        &["http://", "https://", "ftp://", "www."]
    }

    fn parse(&self, ctx: &mut Context<'_>, text: &str) -> Result<Option<(Inline, usize)>> {
        if ctx.in_link() {
            return Ok(None);
        }

        let Some(marker) = self.markers().iter().find(|marker| text.starts_with(**marker)) else {
            return Ok(None);
        };
        let end = text
            .find(|c: char| c.is_whitespace() || c == '<')
            .unwrap_or(text.len());
        let url = trim_url_end(&text[..end]);
        if !url.starts_with(*marker) || url.len() == marker.len() {
            return Ok(None);
        }

        Ok(Some((
            Inline::AutoLink {
                url: url.to_string(),
                email: false,
            },
            url.len(),
        )))
    }
}
