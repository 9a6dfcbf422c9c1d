/// Markdown flavors: which handlers are registered, and in which order
///
/// A flavor is built once per parser. Block rules are kept in priority
/// order; inline rules in the order they are tried at a trigger character.
use crate::error::{Error, Result};
use crate::parser::blocks::{
    code::{FencedCodeRule, IndentedCodeRule},
    figure::FigureRule,
    heading::HeadlineRule,
    html::HtmlRule,
    list::ListRule,
    quote::{FencedQuoteRule, QuoteRule},
    reference::ReferenceRule,
    rule::HorizontalRuleRule,
    table::TableRule,
};
use crate::parser::inline::{
    autolink::{AngleBracketRule, BareUrlRule},
    checkbox::CheckboxRule,
    code::CodeSpanRule,
    emphasis::{EmphasisRule, StrikeoutRule},
    escape::{EntityRule, EscapeRule, HardBreakRule},
    link::{ImageRule, LinkRule},
};
use crate::parser::{BlockRule, InlineRule};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Names of the block types a flavor can order
///
/// `Custom` names a block type added by an extension rule. It never collides
/// with a built-in kind, and is not accepted from configuration since its
/// rule has to be registered in code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Hr,
    Ul,
    Code,
    FencedCode,
    Html,
    Ol,
    FencedQuote,
    Quote,
    Figure,
    Reference,
    Table,
    Headline,
    Custom(&'static str),
}

impl BlockKind {
    pub const ALL: [BlockKind; 12] = [
        BlockKind::Hr,
        BlockKind::Ul,
        BlockKind::Code,
        BlockKind::FencedCode,
        BlockKind::Html,
        BlockKind::Ol,
        BlockKind::FencedQuote,
        BlockKind::Quote,
        BlockKind::Figure,
        BlockKind::Reference,
        BlockKind::Table,
        BlockKind::Headline,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Hr => "Hr",
            BlockKind::Ul => "Ul",
            BlockKind::Code => "Code",
            BlockKind::FencedCode => "FencedCode",
            BlockKind::Html => "Html",
            BlockKind::Ol => "Ol",
            BlockKind::FencedQuote => "FencedQuote",
            BlockKind::Quote => "Quote",
            BlockKind::Figure => "Figure",
            BlockKind::Reference => "Reference",
            BlockKind::Table => "Table",
            BlockKind::Headline => "Headline",
            BlockKind::Custom(name) => name,
        }
    }

    /// The stock rule for this block type; custom kinds have none
    pub fn builtin_rule(self) -> Option<Arc<dyn BlockRule>> {
        let rule: Arc<dyn BlockRule> = match self {
            BlockKind::Hr => Arc::new(HorizontalRuleRule),
            BlockKind::Ul => Arc::new(ListRule::unordered()),
            BlockKind::Ol => Arc::new(ListRule::ordered()),
            BlockKind::Code => Arc::new(IndentedCodeRule),
            BlockKind::FencedCode => Arc::new(FencedCodeRule),
            BlockKind::Html => Arc::new(HtmlRule),
            BlockKind::FencedQuote => Arc::new(FencedQuoteRule),
            BlockKind::Quote => Arc::new(QuoteRule),
            BlockKind::Figure => Arc::new(FigureRule),
            BlockKind::Reference => Arc::new(ReferenceRule),
            BlockKind::Table => Arc::new(TableRule),
            BlockKind::Headline => Arc::new(HeadlineRule),
            BlockKind::Custom(_) => return None,
        };
        Some(rule)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlockKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        BlockKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownBlockType(s.to_string()))
    }
}

impl Serialize for BlockKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for BlockKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// The dialects shipped with the crate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlavorKind {
    /// Traditional Markdown
    #[default]
    Markdown,
    /// GitHub: tables, strikeout, bare URLs, checkboxes
    Github,
    /// GitLab: GitHub plus `>>>` fenced quotes and audio/video images
    Gitlab,
    /// Chyrp: GitLab plus figures
    Chyrp,
}

impl FlavorKind {
    pub fn name(&self) -> &'static str {
        match self {
            FlavorKind::Markdown => "markdown",
            FlavorKind::Github => "github",
            FlavorKind::Gitlab => "gitlab",
            FlavorKind::Chyrp => "chyrp",
        }
    }

    /// Block types tried for each new block, highest priority first
    pub fn block_priorities(&self) -> &'static [BlockKind] {
        use BlockKind::*;
        match self {
            FlavorKind::Markdown => &[
                Hr, Ul, Code, FencedCode, Html, Ol, Quote, Reference, Headline,
            ],
            FlavorKind::Github => &[
                Hr, Ul, Code, FencedCode, Html, Ol, Quote, Reference, Table, Headline,
            ],
            FlavorKind::Gitlab => &[
                Hr,
                Ul,
                Code,
                FencedCode,
                Html,
                Ol,
                FencedQuote,
                Quote,
                Reference,
                Table,
                Headline,
            ],
            FlavorKind::Chyrp => &[
                Hr,
                Ul,
                Code,
                FencedCode,
                Html,
                Ol,
                FencedQuote,
                Quote,
                Figure,
                Reference,
                Table,
                Headline,
            ],
        }
    }

    fn is_extended(&self) -> bool {
        !matches!(self, FlavorKind::Markdown)
    }
}

impl fmt::Display for FlavorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Registered handlers for one dialect
#[derive(Clone)]
pub struct Flavor {
    kind: FlavorKind,
    blocks: Vec<Arc<dyn BlockRule>>,
    inlines: Vec<Arc<dyn InlineRule>>,
    triggers: Vec<char>,
    media_links: bool,
}

impl Flavor {
    pub fn new(kind: FlavorKind) -> Self {
        let blocks = kind
            .block_priorities()
            .iter()
            .filter_map(|kind| kind.builtin_rule())
            .collect();

        // Checkboxes claim `[ ]` before links see it
        let mut inlines: Vec<Arc<dyn InlineRule>> = vec![
            Arc::new(EscapeRule),
            Arc::new(HardBreakRule),
            Arc::new(EntityRule),
            Arc::new(CodeSpanRule),
        ];
        if kind.is_extended() {
            inlines.push(Arc::new(CheckboxRule));
            inlines.push(Arc::new(StrikeoutRule));
        }
        inlines.push(Arc::new(ImageRule));
        inlines.push(Arc::new(LinkRule));
        inlines.push(Arc::new(EmphasisRule));
        inlines.push(Arc::new(AngleBracketRule));
        if kind.is_extended() {
            inlines.push(Arc::new(BareUrlRule));
        }

        let mut flavor = Flavor {
            kind,
            blocks,
            inlines,
            triggers: Vec::new(),
            media_links: matches!(kind, FlavorKind::Gitlab | FlavorKind::Chyrp),
        };
        flavor.refresh_triggers();
        flavor
    }

    pub fn kind(&self) -> FlavorKind {
        self.kind
    }

    /// Whether images pointing at audio or video files render as media elements
    pub fn media_links(&self) -> bool {
        self.media_links
    }

    pub fn set_media_links(&mut self, enabled: bool) {
        self.media_links = enabled;
    }

    pub fn block_rules(&self) -> &[Arc<dyn BlockRule>] {
        &self.blocks
    }

    pub fn block_rule(&self, kind: BlockKind) -> Option<&dyn BlockRule> {
        self.blocks
            .iter()
            .find(|rule| rule.kind() == kind)
            .map(|rule| rule.as_ref())
    }

    pub fn block_priorities(&self) -> Vec<BlockKind> {
        self.blocks.iter().map(|rule| rule.kind()).collect()
    }

    /// Reorder block rules; kinds the flavor lacks get their stock rule
    ///
    /// A custom kind that was never registered is skipped.
    pub fn set_block_priorities(&mut self, priorities: &[BlockKind]) {
        let mut reordered = Vec::with_capacity(priorities.len());
        for &kind in priorities {
            if reordered.iter().any(|rule: &Arc<dyn BlockRule>| rule.kind() == kind) {
                continue;
            }
            let rule = self
                .blocks
                .iter()
                .find(|rule| rule.kind() == kind)
                .cloned()
                .or_else(|| kind.builtin_rule());
            match rule {
                Some(rule) => reordered.push(rule),
                None => log::warn!("no rule registered for block type {}", kind),
            }
        }
        self.blocks = reordered;
    }

    /// Register a block rule at `position` in the priority list
    ///
    /// A rule already registered for the same kind is removed first, so a
    /// built-in rule is only displaced by a rule claiming its kind. New
    /// block types use `BlockKind::Custom`.
    pub fn insert_block_rule(&mut self, position: usize, rule: Arc<dyn BlockRule>) {
        let kind = rule.kind();
        self.blocks.retain(|existing| existing.kind() != kind);
        let position = position.min(self.blocks.len());
        self.blocks.insert(position, rule);
    }

    /// Swap the rule registered for a kind, keeping its priority
    ///
    /// Returns false when the flavor has no rule of that kind.
    pub fn replace_block_rule(&mut self, rule: Arc<dyn BlockRule>) -> bool {
        let kind = rule.kind();
        match self.blocks.iter().position(|existing| existing.kind() == kind) {
            Some(index) => {
                self.blocks[index] = rule;
                true
            }
            None => false,
        }
    }

    pub fn inline_rules(&self) -> &[Arc<dyn InlineRule>] {
        &self.inlines
    }

    /// Register an inline rule tried after the existing ones
    pub fn push_inline_rule(&mut self, rule: Arc<dyn InlineRule>) {
        self.inlines.push(rule);
        self.refresh_triggers();
    }

    /// Register an inline rule tried before the existing ones
    pub fn prepend_inline_rule(&mut self, rule: Arc<dyn InlineRule>) {
        self.inlines.insert(0, rule);
        self.refresh_triggers();
    }

    pub fn is_trigger(&self, ch: char) -> bool {
        self.triggers.contains(&ch)
    }

    fn refresh_triggers(&mut self) {
        let mut triggers: Vec<char> = self
            .inlines
            .iter()
            .flat_map(|rule| rule.markers().iter())
            .filter_map(|marker| marker.chars().next())
            .collect();
        triggers.sort_unstable();
        triggers.dedup();
        self.triggers = triggers;
    }
}

impl fmt::Debug for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flavor")
            .field("kind", &self.kind)
            .field("blocks", &self.block_priorities())
            .field("triggers", &self.triggers)
            .field("media_links", &self.media_links)
            .finish()
    }
}
