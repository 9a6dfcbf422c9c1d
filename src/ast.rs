/// AST node types produced by the block and inline passes
use serde::{Deserialize, Serialize};

/// A parsed document: the top-level block sequence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(Vec<Inline>),
    List {
        /// `None` for bullet lists
        ordered: Option<OrderedAttrs>,
        loose: bool,
        /// One block sequence per list item
        items: Vec<Vec<Block>>,
    },
    CodeBlock {
        content: String,
        language: Option<String>,
    },
    Quote(Vec<Block>),
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    HorizontalRule,
    HtmlBlock(String),
    Figure {
        endcap: Endcap,
        content: Vec<Block>,
        caption: Vec<Block>,
    },
    Table {
        alignments: Vec<Alignment>,
        head: Vec<Vec<Inline>>,
        rows: Vec<Vec<Vec<Inline>>>,
    },
    /// A link reference definition; renders nothing
    Reference {
        key: String,
        url: String,
        title: Option<String>,
    },
    /// A block produced by a rule registered outside the crate
    Extension(ExtensionNode<Block>),
}

/// A node owned by an extension rule, which renders it
///
/// `name` matches the producing rule: `BlockKind::name` for block rules,
/// `InlineRule::name` for inline rules. Children take part in reference
/// resolution like any other nested content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionNode<T> {
    pub name: String,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default = "Vec::new")]
    pub children: Vec<T>,
}

impl<T> ExtensionNode<T> {
    pub fn new(name: impl Into<String>) -> Self {
        ExtensionNode {
            name: name.into(),
            data: serde_json::Value::Null,
            children: Vec::new(),
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    pub fn with_children(mut self, children: Vec<T>) -> Self {
        self.children = children;
        self
    }
}

/// Attributes kept on an ordered list's opening tag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderedAttrs {
    pub start: Option<u32>,
    pub reversed: bool,
}

/// Where a figure caption is placed relative to the figure content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endcap {
    Before,
    After,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    None,
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Inline {
    Text(String),
    Emphasis {
        strong: bool,
        children: Vec<Inline>,
    },
    Strikeout(Vec<Inline>),
    CodeSpan(String),
    Link {
        target: LinkTarget,
        children: Vec<Inline>,
        /// Literal source, rendered when a reference cannot be resolved
        source: String,
    },
    Image {
        target: LinkTarget,
        /// Raw alt text, used for the `alt` attribute
        alt: String,
        /// Inline-parsed alt text, the body of audio and video elements
        children: Vec<Inline>,
        source: String,
    },
    AutoLink {
        url: String,
        email: bool,
    },
    Checkbox {
        state: CheckboxState,
        /// Literal marker as written, such as `[X]`
        marker: String,
    },
    LineBreak,
    /// Inline HTML tags and character references, emitted verbatim
    RawHtml(String),
    Extension(ExtensionNode<Inline>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LinkTarget {
    Resolved { url: String, title: Option<String> },
    Pending { key: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckboxState {
    Unchecked,
    Checked,
    /// `[~]`: rendered checked and disabled
    Inapplicable,
}

impl Block {
    /// Nested block sequences, in document order
    pub fn children(&self) -> Vec<&[Block]> {
        match self {
            Block::List { items, .. } => items.iter().map(Vec::as_slice).collect(),
            Block::Quote(children) => vec![children.as_slice()],
            Block::Figure {
                endcap,
                content,
                caption,
            } => match endcap {
                Endcap::Before => vec![caption.as_slice(), content.as_slice()],
                _ => vec![content.as_slice(), caption.as_slice()],
            },
            Block::Extension(node) => vec![node.children.as_slice()],
            _ => Vec::new(),
        }
    }
}
