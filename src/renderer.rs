/// HTML renderer for a resolved document tree
use crate::ast::{
    Alignment, Block, CheckboxState, Document, Endcap, ExtensionNode, Inline, LinkTarget,
    OrderedAttrs,
};
use crate::flavor::Flavor;
use crate::options::Options;
use html_escape::{encode_double_quoted_attribute, encode_text};

const VIDEO_EXTENSIONS: &[&str] = &["mpeg", "mpg", "mp4", "m4v", "mov", "webm", "ogv"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "oga", "ogg", "spx", "wav", "aif", "aiff"];

/// Renders a document with the flavor's rules, which own extension nodes
pub struct HtmlRenderer<'a> {
    options: &'a Options,
    flavor: &'a Flavor,
}

impl<'a> HtmlRenderer<'a> {
    pub fn new(options: &'a Options, flavor: &'a Flavor) -> Self {
        HtmlRenderer { options, flavor }
    }

    pub fn options(&self) -> &Options {
        self.options
    }

    pub fn render(&self, document: &Document) -> String {
        self.render_blocks(&document.blocks)
    }

    pub fn render_blocks(&self, blocks: &[Block]) -> String {
        blocks.iter().map(|block| self.render_block(block)).collect()
    }

    fn render_block(&self, block: &Block) -> String {
        match block {
            Block::Paragraph(content) => format!("<p>{}</p>\n", self.render_inlines(content)),
            Block::Heading { level, content } => {
                format!("<h{}>{}</h{}>\n", level, self.render_inlines(content), level)
            }
            Block::CodeBlock { content, language } => {
                let code = encode_text(&format!("{}\n", content)).into_owned();
                match language {
                    Some(language) => format!(
                        "<pre><code class=\"language-{}\">{}</code></pre>\n",
                        encode_double_quoted_attribute(language),
                        code
                    ),
                    None => format!("<pre><code>{}</code></pre>\n", code),
                }
            }
            Block::HorizontalRule => format!("<hr{}\n", self.options.void_close()),
            Block::Quote(children) => {
                format!("<blockquote>\n{}</blockquote>\n", self.render_blocks(children))
            }
            Block::HtmlBlock(html) => format!("{}\n", html),
            Block::List {
                ordered,
                loose,
                items,
            } => self.render_list(ordered.as_ref(), *loose, items),
            Block::Figure {
                endcap,
                content,
                caption,
            } => {
                let content = self.render_blocks(content);
                let caption = format!("<figcaption>\n{}</figcaption>\n", self.render_blocks(caption));
                match endcap {
                    Endcap::Before => format!("<figure>\n{}{}</figure>\n", caption, content),
                    Endcap::After => format!("<figure>\n{}{}</figure>\n", content, caption),
                    Endcap::None => format!("<figure>\n{}</figure>\n", content),
                }
            }
            Block::Table {
                alignments,
                head,
                rows,
            } => {
                let head_row = self.render_row("th", alignments, head);
                let body: String = rows
                    .iter()
                    .map(|row| self.render_row("td", alignments, row))
                    .collect();
                format!(
                    "<table>\n<thead>\n{}</thead>\n<tbody>\n{}</tbody>\n</table>\n",
                    head_row, body
                )
            }
            Block::Reference { .. } => String::new(),
            Block::Extension(node) => self.render_block_extension(node),
        }
    }

    fn render_block_extension(&self, node: &ExtensionNode<Block>) -> String {
        self.flavor
            .block_rules()
            .iter()
            .filter(|rule| rule.kind().name() == node.name)
            .find_map(|rule| rule.render(node, self))
            .unwrap_or_else(|| {
                log::debug!("no renderer for block {}, rendering its children", node.name);
                self.render_blocks(&node.children)
            })
    }

    fn render_inline_extension(&self, node: &ExtensionNode<Inline>) -> String {
        self.flavor
            .inline_rules()
            .iter()
            .filter(|rule| rule.name() == node.name)
            .find_map(|rule| rule.render(node, self))
            .unwrap_or_else(|| {
                log::debug!("no renderer for inline {}, rendering its children", node.name);
                self.render_inlines(&node.children)
            })
    }

    fn render_list(&self, ordered: Option<&OrderedAttrs>, loose: bool, items: &[Vec<Block>]) -> String {
        let open = match ordered {
            None => "<ul>\n".to_string(),
            Some(attrs) => {
                let mut open = String::from("<ol");
                if let Some(start) = attrs.start {
                    open.push_str(&format!(" start=\"{}\"", start));
                }
                if attrs.reversed {
                    open.push_str(" reversed=\"\"");
                }
                open.push_str(">\n");
                open
            }
        };

        let mut output = open;
        for blocks in items {
            match blocks.first() {
                None => output.push_str("<li></li>\n"),
                // Tight items show their leading paragraph without <p>
                Some(Block::Paragraph(content)) if !loose => {
                    output.push_str(&format!(
                        "<li>{}{}</li>\n",
                        self.render_inlines(content),
                        self.render_blocks(&blocks[1..])
                    ));
                }
                Some(_) => {
                    output.push_str(&format!("<li>\n{}</li>\n", self.render_blocks(blocks)));
                }
            }
        }
        output.push_str(if ordered.is_some() { "</ol>\n" } else { "</ul>\n" });
        output
    }

    fn render_row(&self, tag: &str, alignments: &[Alignment], cells: &[Vec<Inline>]) -> String {
        let cells: String = cells
            .iter()
            .zip(alignments)
            .map(|(cell, alignment)| {
                let style = match alignment {
                    Alignment::None => "",
                    Alignment::Left => " style=\"text-align: left\"",
                    Alignment::Right => " style=\"text-align: right\"",
                    Alignment::Center => " style=\"text-align: center\"",
                };
                format!("<{}{}>{}</{}>", tag, style, self.render_inlines(cell), tag)
            })
            .collect();
        format!("<tr>{}</tr>\n", cells)
    }

    pub fn render_inlines(&self, nodes: &[Inline]) -> String {
        nodes.iter().map(|node| self.render_inline(node)).collect()
    }

    fn render_inline(&self, node: &Inline) -> String {
        match node {
            Inline::Text(text) => self.render_text(text),
            Inline::Emphasis { strong, children } => {
                let tag = if *strong { "strong" } else { "em" };
                format!("<{}>{}</{}>", tag, self.render_inlines(children), tag)
            }
            Inline::Strikeout(children) => format!("<del>{}</del>", self.render_inlines(children)),
            Inline::CodeSpan(code) => format!("<code>{}</code>", encode_text(code)),
            Inline::Link {
                target,
                children,
                source,
            } => match target {
                LinkTarget::Resolved { url, title } => format!(
                    "<a href=\"{}\"{}>{}</a>",
                    encode_double_quoted_attribute(url),
                    title_attribute(title.as_deref()),
                    self.render_inlines(children)
                ),
                LinkTarget::Pending { .. } => encode_text(source).into_owned(),
            },
            Inline::Image {
                target,
                alt,
                children,
                source,
            } => match target {
                LinkTarget::Resolved { url, title } => {
                    self.render_image(url, title.as_deref(), alt, children)
                }
                LinkTarget::Pending { .. } => encode_text(source).into_owned(),
            },
            Inline::AutoLink { url, email } => {
                let href = if *email {
                    format!("mailto:{}", url)
                } else if url.starts_with("www.") {
                    format!("http://{}", url)
                } else {
                    url.clone()
                };
                format!(
                    "<a href=\"{}\">{}</a>",
                    encode_double_quoted_attribute(&href),
                    encode_text(url)
                )
            }
            Inline::Checkbox { state, marker } => self.render_checkbox(*state, marker),
            Inline::LineBreak => format!("<br{}\n", self.options.void_close()),
            Inline::RawHtml(html) => html.clone(),
            Inline::Extension(node) => self.render_inline_extension(node),
        }
    }

    /// Escape text, turning newlines into breaks when `enable_newlines` is set
    pub fn render_text(&self, text: &str) -> String {
        if !self.options.enable_newlines || !text.contains('\n') {
            return encode_text(text).into_owned();
        }
        let line_break = format!("<br{}\n", self.options.void_close());
        let lines: Vec<String> = text
            .split('\n')
            .map(|line| encode_text(line).into_owned())
            .collect();
        // Spaces before a newline belong to the break
        let mut output = String::new();
        for (n, line) in lines.iter().enumerate() {
            if n + 1 < lines.len() {
                output.push_str(line.trim_end_matches(' '));
                output.push_str(&line_break);
            } else {
                output.push_str(line);
            }
        }
        output
    }

    fn render_image(&self, url: &str, title: Option<&str>, alt: &str, children: &[Inline]) -> String {
        if self.flavor.media_links() {
            let element = match media_extension(url) {
                Some(ext) if VIDEO_EXTENSIONS.contains(&ext.as_str()) => Some("video"),
                Some(ext) if AUDIO_EXTENSIONS.contains(&ext.as_str()) => Some("audio"),
                _ => None,
            };
            if let Some(element) = element {
                return format!(
                    "<{} src=\"{}\"{}>{}</{}>",
                    element,
                    encode_double_quoted_attribute(url),
                    title_attribute(title),
                    self.render_inlines(children),
                    element
                );
            }
        }
        format!(
            "<img src=\"{}\" alt=\"{}\"{}{}",
            encode_double_quoted_attribute(url),
            encode_double_quoted_attribute(alt),
            title_attribute(title),
            self.options.void_close()
        )
    }

    fn render_checkbox(&self, state: CheckboxState, marker: &str) -> String {
        if !self.options.render_checkbox_inputs {
            return encode_text(marker).into_owned();
        }
        let attributes = match state {
            CheckboxState::Unchecked => "",
            CheckboxState::Checked => " checked=\"\"",
            CheckboxState::Inapplicable => " checked=\"\" disabled=\"\"",
        };
        format!("<input type=\"checkbox\"{}{}", attributes, self.options.void_close())
    }
}

fn title_attribute(title: Option<&str>) -> String {
    match title {
        Some(title) if !title.is_empty() => {
            format!(" title=\"{}\"", encode_double_quoted_attribute(title))
        }
        _ => String::new(),
    }
}

/// Lowercased file extension of a url's path
fn media_extension(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let (_, ext) = path.rsplit_once('.')?;
    (!ext.contains('/')).then(|| ext.to_ascii_lowercase())
}
