/// A Markdown to HTML converter with pluggable flavors
///
/// Documents are parsed in two passes. Block rules split the lines into a
/// tree, then inline rules tokenize the text each block carries. Reference
/// links are resolved once the whole tree exists, and the resolved tree is
/// rendered to HTML.
pub mod ast;
pub mod error;
pub mod flavor;
pub mod lines;
pub mod options;
pub mod parser;
pub mod references;
pub mod renderer;

pub use ast::{Block, Document, ExtensionNode, Inline};
pub use error::{Error, Result};
pub use flavor::{BlockKind, Flavor, FlavorKind};
pub use options::Options;
pub use parser::{BlockRule, Context, InlineRule, Parser};
pub use renderer::HtmlRenderer;

/// Convert Markdown to HTML with the base flavor and default options
pub fn markdown_to_html(markdown: &str) -> Result<String> {
    Parser::default().parse(markdown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(markdown_to_html("").unwrap(), "");
    }

    #[test]
    fn test_basic_image() {
        let result = markdown_to_html("![foo](/url \"title\")\n").unwrap();
        assert_eq!(
            result,
            "<p><img src=\"/url\" alt=\"foo\" title=\"title\" /></p>\n"
        );
    }

    #[test]
    fn test_image_without_title() {
        let result = markdown_to_html("![bar](/path)\n").unwrap();
        assert_eq!(result, "<p><img src=\"/path\" alt=\"bar\" /></p>\n");
    }

    #[test]
    fn test_paragraph_interrupted_by_list() {
        let result = markdown_to_html("para\n- item").unwrap();
        assert_eq!(result, "<p>para</p>\n<ul>\n<li>item</li>\n</ul>\n");
    }
}
