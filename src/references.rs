/// Reference definitions and the resolution pass over a parsed tree
///
/// Block parsing records `[key]: url` definitions as `Block::Reference`
/// nodes and leaves reference-style links pending. Once the whole tree is
/// built, every definition is collected into a table and pending links are
/// resolved against it, so a definition may appear after its first use.
use crate::ast::{Block, Inline, LinkTarget};
use std::collections::HashMap;
use unicode_casefold::UnicodeCaseFold;

/// Case-fold a label and collapse its internal whitespace
pub fn normalize_key(label: &str) -> String {
    let folded: String = label.chars().case_fold().collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDefinition {
    pub url: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    definitions: HashMap<String, LinkDefinition>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a definition; a later definition of the same key replaces it
    pub fn insert(&mut self, key: String, definition: LinkDefinition) {
        if self.definitions.insert(key.clone(), definition).is_some() {
            log::debug!("reference [{}] redefined", key);
        }
    }

    pub fn get(&self, key: &str) -> Option<&LinkDefinition> {
        self.definitions.get(key)
    }

    /// Gather every definition in the tree, in document order
    pub fn collect(blocks: &[Block]) -> Self {
        let mut table = Self::new();
        table.collect_from(blocks);
        log::debug!("collected {} reference definitions", table.len());
        table
    }

    fn collect_from(&mut self, blocks: &[Block]) {
        for block in blocks {
            if let Block::Reference { key, url, title } = block {
                self.insert(
                    key.clone(),
                    LinkDefinition {
                        url: url.clone(),
                        title: title.clone(),
                    },
                );
            }
            for children in block.children() {
                self.collect_from(children);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Resolve pending links and images in place
///
/// A reference without a definition is replaced by its literal source text.
pub fn resolve(blocks: &mut [Block], table: &ReferenceTable) {
    for block in blocks {
        match block {
            Block::Paragraph(content) | Block::Heading { content, .. } => {
                resolve_inlines(content, table)
            }
            Block::Table { head, rows, .. } => {
                for cell in head.iter_mut().chain(rows.iter_mut().flatten()) {
                    resolve_inlines(cell, table);
                }
            }
            Block::List { items, .. } => {
                for item in items {
                    resolve(item, table);
                }
            }
            Block::Quote(children) => resolve(children, table),
            Block::Figure {
                content, caption, ..
            } => {
                resolve(content, table);
                resolve(caption, table);
            }
            Block::Extension(node) => resolve(&mut node.children, table),
            Block::CodeBlock { .. }
            | Block::HorizontalRule
            | Block::HtmlBlock(_)
            | Block::Reference { .. } => {}
        }
    }
}

fn resolve_inlines(nodes: &mut Vec<Inline>, table: &ReferenceTable) {
    for node in nodes.iter_mut() {
        let unresolved = match node {
            Inline::Link {
                target, children, ..
            } => {
                resolve_inlines(children, table);
                !resolve_target(target, table)
            }
            Inline::Image {
                target, children, ..
            } => {
                resolve_inlines(children, table);
                !resolve_target(target, table)
            }
            Inline::Emphasis { children, .. } | Inline::Strikeout(children) => {
                resolve_inlines(children, table);
                false
            }
            Inline::Extension(node) => {
                resolve_inlines(&mut node.children, table);
                false
            }
            _ => false,
        };

        if unresolved {
            let source = match node {
                Inline::Link { source, .. } | Inline::Image { source, .. } => {
                    std::mem::take(source)
                }
                _ => String::new(),
            };
            *node = Inline::Text(source);
        }
    }
    merge_text(nodes);
}

/// Returns false when the target names an undefined reference
fn resolve_target(target: &mut LinkTarget, table: &ReferenceTable) -> bool {
    let LinkTarget::Pending { key } = target else {
        return true;
    };
    match table.get(key) {
        Some(definition) => {
            *target = LinkTarget::Resolved {
                url: definition.url.clone(),
                title: definition.title.clone(),
            };
            true
        }
        None => {
            log::debug!("no definition for reference [{}]", key);
            false
        }
    }
}

fn merge_text(nodes: &mut Vec<Inline>) {
    let mut merged: Vec<Inline> = Vec::with_capacity(nodes.len());
    for node in nodes.drain(..) {
        if let Inline::Text(text) = &node
            && let Some(Inline::Text(last)) = merged.last_mut()
        {
            last.push_str(text);
            continue;
        }
        merged.push(node);
    }
    *nodes = merged;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flavor::FlavorKind;
    use crate::parser::Parser;

    fn link_target(blocks: &[Block]) -> &LinkTarget {
        match &blocks[0] {
            Block::Paragraph(content) => match &content[0] {
                Inline::Link { target, .. } => target,
                other => panic!("expected a link, got {:?}", other),
            },
            other => panic!("expected a paragraph, got {:?}", other),
        }
    }

    #[test]
    fn keys_fold_case_and_whitespace() {
        assert_eq!(normalize_key("  Foo\n  BAR "), "foo bar");
        assert_eq!(normalize_key("Straße"), "strasse");
    }

    #[test]
    fn definitions_after_use_resolve() {
        let parser = Parser::new(FlavorKind::Markdown);
        let doc = parser
            .parse_document("[text][Ref]\n\n[ref]: /url \"T\"")
            .unwrap();
        assert_eq!(
            link_target(&doc.blocks),
            &LinkTarget::Resolved {
                url: "/url".into(),
                title: Some("T".into())
            }
        );
    }

    #[test]
    fn last_definition_wins() {
        let parser = Parser::new(FlavorKind::Markdown);
        let doc = parser
            .parse_document("[a]\n\n[a]: /first\n[a]: /second")
            .unwrap();
        assert_eq!(
            link_target(&doc.blocks),
            &LinkTarget::Resolved {
                url: "/second".into(),
                title: None
            }
        );
    }

    #[test]
    fn definitions_nested_in_quotes_count() {
        let parser = Parser::new(FlavorKind::Markdown);
        let doc = parser.parse_document("[a]\n\n> [a]: /inner").unwrap();
        assert!(matches!(link_target(&doc.blocks), LinkTarget::Resolved { url, .. } if url == "/inner"));
    }

    #[test]
    fn undefined_reference_becomes_its_source() {
        let parser = Parser::new(FlavorKind::Markdown);
        let doc = parser.parse_document("x [missing] y").unwrap();
        assert_eq!(
            doc.blocks,
            vec![Block::Paragraph(vec![Inline::Text("x [missing] y".into())])]
        );
    }

    #[test]
    fn extension_children_are_resolved() {
        use crate::ast::ExtensionNode;

        let pending = Inline::Link {
            target: LinkTarget::Pending { key: "a".into() },
            children: vec![Inline::Text("a".into())],
            source: "[a]".into(),
        };
        let mut blocks = vec![Block::Extension(
            ExtensionNode::new("Note").with_children(vec![
                Block::Paragraph(vec![pending]),
                Block::Reference {
                    key: "a".into(),
                    url: "/in-note".into(),
                    title: None,
                },
            ]),
        )];
        let table = ReferenceTable::collect(&blocks);
        resolve(&mut blocks, &table);

        let Block::Extension(node) = &blocks[0] else {
            panic!("expected an extension block");
        };
        assert!(matches!(link_target(&node.children), LinkTarget::Resolved { url, .. } if url == "/in-note"));
    }
}
