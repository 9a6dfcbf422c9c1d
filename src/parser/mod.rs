/// Block dispatcher, parse context and the extension traits handlers implement
pub mod blocks;
pub mod inline;

use crate::ast::{Block, Document, ExtensionNode, Inline};
use crate::error::{Error, Result};
use crate::flavor::{BlockKind, Flavor, FlavorKind};
use crate::lines::{is_blank, split_lines};
use crate::options::Options;
use crate::references::{self, ReferenceTable};
use crate::renderer::HtmlRenderer;

/// A block handler: a pure predicate paired with a line consumer
///
/// `consume` returns the block and the index of the last line it consumed.
/// Returning the index before the line it stopped on signals that the line
/// was only looked at.
///
/// A rule for a new block type returns `BlockKind::Custom` from `kind`,
/// produces `Block::Extension` nodes carrying that name and renders them in
/// `render`.
pub trait BlockRule: Send + Sync {
    fn kind(&self) -> BlockKind;

    fn identify(&self, lines: &[String], current: usize) -> bool;

    fn consume(
        &self,
        ctx: &mut Context<'_>,
        lines: &[String],
        current: usize,
    ) -> Result<(Block, usize)>;

    /// HTML for an extension block this rule produced
    ///
    /// `None` renders the node's children in its place.
    fn render(&self, _node: &ExtensionNode<Block>, _renderer: &HtmlRenderer<'_>) -> Option<String> {
        None
    }
}

/// An inline handler triggered by one or more literal markers
///
/// `parse` is only called when the text starts with one of `markers()`;
/// it returns the node and the number of bytes consumed, or `None` when the
/// text at this position is not a match after all.
pub trait InlineRule: Send + Sync {
    /// Name carried by the `Inline::Extension` nodes this rule produces
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn markers(&self) -> &'static [&'static str];

    fn parse(&self, ctx: &mut Context<'_>, text: &str) -> Result<Option<(Inline, usize)>>;

    /// HTML for an extension node this rule produced
    fn render(&self, _node: &ExtensionNode<Inline>, _renderer: &HtmlRenderer<'_>) -> Option<String> {
        None
    }
}

/// Per-call parse state handed to every handler
pub struct Context<'a> {
    flavor: &'a Flavor,
    options: &'a Options,
    depth: usize,
    in_link: bool,
}

impl<'a> Context<'a> {
    pub(crate) fn new(flavor: &'a Flavor, options: &'a Options) -> Self {
        Context {
            flavor,
            options,
            depth: 0,
            in_link: false,
        }
    }

    pub fn options(&self) -> &Options {
        self.options
    }

    /// True when a link is being parsed, so links must not nest
    pub fn in_link(&self) -> bool {
        self.in_link
    }

    /// Ask the flavor's registered rule for `kind`, if any, to identify a line
    pub fn identifies(&self, kind: BlockKind, lines: &[String], current: usize) -> bool {
        self.flavor
            .block_rule(kind)
            .is_some_and(|rule| rule.identify(lines, current))
    }

    fn enter(&mut self) -> Result<()> {
        let limit = self.options.max_nesting_depth;
        if self.depth >= limit {
            log::warn!("nesting depth limit of {} reached", limit);
            return Err(Error::RecursionLimitExceeded { limit });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Parse a run of lines into blocks, skipping blank lines between them
    pub fn parse_blocks(&mut self, lines: &[String]) -> Result<Vec<Block>> {
        self.enter()?;

        let mut blocks = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            if is_blank(&lines[i]) {
                i += 1;
                continue;
            }

            let (block, last) = self.parse_block(lines, i)?;
            blocks.push(block);
            // A consumer always owns at least the line it was handed
            i = last.max(i) + 1;
        }

        self.leave();
        Ok(blocks)
    }

    /// Dispatch one line to the first identifying rule, falling back to a paragraph
    fn parse_block(&mut self, lines: &[String], current: usize) -> Result<(Block, usize)> {
        let flavor = self.flavor;
        for rule in flavor.block_rules() {
            if rule.identify(lines, current) {
                log::trace!("line {}: {}", current, rule.kind().name());
                return rule.consume(self, lines, current);
            }
        }

        log::trace!("line {}: Paragraph", current);
        blocks::paragraph::consume(self, lines, current)
    }

    /// Parse span-level markup
    pub fn parse_inline(&mut self, text: &str) -> Result<Vec<Inline>> {
        self.enter()?;
        let nodes = inline::tokenize(self, text)?;
        self.leave();
        Ok(nodes)
    }

    /// Parse link text: like `parse_inline`, but links cannot start inside
    pub fn parse_link_text(&mut self, text: &str) -> Result<Vec<Inline>> {
        let outer = self.in_link;
        self.in_link = true;
        let nodes = self.parse_inline(text);
        self.in_link = outer;
        nodes
    }
}

/// Markdown to HTML converter for one flavor
///
/// A parser holds only configuration, so one instance can serve many
/// documents, including from several threads at once.
pub struct Parser {
    flavor: Flavor,
    options: Options,
}

impl Parser {
    pub fn new(kind: FlavorKind) -> Self {
        Parser {
            flavor: Flavor::new(kind),
            options: Options::default(),
        }
    }

    /// Build a parser, applying `options.block_priorities` when present
    pub fn with_options(kind: FlavorKind, options: Options) -> Self {
        let mut flavor = Flavor::new(kind);
        if let Some(priorities) = &options.block_priorities {
            flavor.set_block_priorities(priorities);
        }
        Parser { flavor, options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn flavor(&self) -> &Flavor {
        &self.flavor
    }

    /// Register extension handlers before parsing
    pub fn flavor_mut(&mut self) -> &mut Flavor {
        &mut self.flavor
    }

    /// Build the resolved document tree
    pub fn parse_document(&self, input: &str) -> Result<Document> {
        if input.trim().is_empty() {
            return Ok(Document::default());
        }

        let lines = split_lines(input);
        log::debug!(
            "parsing {} lines with the {} flavor",
            lines.len(),
            self.flavor.kind().name()
        );

        let mut ctx = Context::new(&self.flavor, &self.options);
        let mut blocks = ctx.parse_blocks(&lines)?;

        let table = ReferenceTable::collect(&blocks);
        references::resolve(&mut blocks, &table);

        Ok(Document { blocks })
    }

    pub fn render(&self, document: &Document) -> String {
        HtmlRenderer::new(&self.options, &self.flavor).render(document)
    }

    /// Convert a document to HTML
    pub fn parse(&self, input: &str) -> Result<String> {
        let document = self.parse_document(input)?;
        let html = self.render(&document);
        log::debug!("rendered {} bytes of HTML", html.len());
        Ok(html)
    }

    /// Build the document tree from raw bytes, rejecting input that is not UTF-8
    pub fn parse_document_bytes(&self, input: &[u8]) -> Result<Document> {
        let text = std::str::from_utf8(input)?;
        self.parse_document(text)
    }

    /// Convert raw bytes, rejecting input that is not UTF-8
    pub fn parse_bytes(&self, input: &[u8]) -> Result<String> {
        let text = std::str::from_utf8(input)?;
        self.parse(text)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(FlavorKind::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Block, Inline};

    fn lines(text: &str) -> Vec<String> {
        split_lines(text)
    }

    #[test]
    fn blank_lines_separate_paragraphs() {
        let parser = Parser::default();
        let doc = parser.parse_document("one\n\n\ntwo").unwrap();
        assert_eq!(
            doc.blocks,
            vec![
                Block::Paragraph(vec![Inline::Text("one".into())]),
                Block::Paragraph(vec![Inline::Text("two".into())]),
            ]
        );
    }

    #[test]
    fn whitespace_only_input_is_empty() {
        let parser = Parser::default();
        assert_eq!(parser.parse(" \n\t\n").unwrap(), "");
    }

    #[test]
    fn depth_limit_fails_the_parse() {
        let options = Options {
            max_nesting_depth: 3,
            ..Options::default()
        };
        let parser = Parser::with_options(FlavorKind::Markdown, options);
        let err = parser.parse("> > > > deep").unwrap_err();
        assert!(matches!(err, Error::RecursionLimitExceeded { limit: 3 }));
    }

    #[test]
    fn identifies_only_registered_rules() {
        let flavor = Flavor::new(FlavorKind::Markdown);
        let options = Options::default();
        let ctx = Context::new(&flavor, &options);
        let doc = lines(">>>\nquoted\n>>>");
        assert!(!ctx.identifies(BlockKind::FencedQuote, &doc, 0));
        assert!(ctx.identifies(BlockKind::Quote, &doc, 0));
    }

    #[test]
    fn invalid_utf8_is_an_encoding_error() {
        let parser = Parser::default();
        let err = parser.parse_bytes(&[b'a', 0xff, b'b']).unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }

    #[test]
    fn document_bytes_decode_before_parsing() {
        let parser = Parser::default();
        let doc = parser.parse_document_bytes("caf\u{e9}".as_bytes()).unwrap();
        assert_eq!(
            doc.blocks,
            vec![Block::Paragraph(vec![Inline::Text("caf\u{e9}".into())])]
        );
        assert!(matches!(
            parser.parse_document_bytes(&[0xc3]),
            Err(Error::Encoding(_))
        ));
    }
}
