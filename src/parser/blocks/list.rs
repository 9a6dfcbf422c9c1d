/// Ordered and unordered lists
///
/// Lines are tab-expanded with placeholders while the list is collected, so
/// the marker width can be cut off exactly and tabs restored afterwards.
use crate::ast::{Block, OrderedAttrs};
use crate::error::Result;
use crate::flavor::BlockKind;
use crate::lines::{TAB_PAD, expand_tabs, indent_width, is_blank, leading_spaces, strip_columns};
use crate::parser::{BlockRule, Context};

/// A matched list item marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ItemMarker {
    indent: usize,
    number: Option<u32>,
    /// Bullet character, or the delimiter after an ordinal
    marker: char,
    /// Indentation, marker and following spacing, in columns
    width: usize,
}

/// Match `^ {0,3}[-+*]` or `^ {0,3}\d{1,9}[.)]` followed by spacing or end of line
fn match_item(line: &str, ordered: bool) -> Option<ItemMarker> {
    let bytes = line.as_bytes();
    let indent = leading_spaces(line);
    if indent > 3 {
        return None;
    }

    let mut pos = indent;
    let number = if ordered {
        let digits = bytes[pos..].iter().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 || digits > 9 {
            return None;
        }
        let number = line[pos..pos + digits].parse().ok()?;
        pos += digits;
        Some(number)
    } else {
        None
    };

    let marker = match (ordered, bytes.get(pos)) {
        (true, Some(b'.')) => '.',
        (true, Some(b')')) => ')',
        (false, Some(b'-')) => '-',
        (false, Some(b'+')) => '+',
        (false, Some(b'*')) => '*',
        _ => return None,
    };
    pos += 1;

    let spacing = bytes[pos..]
        .iter()
        .take_while(|&&b| b == b' ' || b == b'\t' || b == TAB_PAD as u8)
        .count();
    if spacing == 0 && pos < bytes.len() {
        return None;
    }

    Some(ItemMarker {
        indent,
        number,
        marker,
        width: pos + spacing,
    })
}

pub struct ListRule {
    ordered: bool,
}

impl ListRule {
    pub fn ordered() -> Self {
        ListRule { ordered: true }
    }

    pub fn unordered() -> Self {
        ListRule { ordered: false }
    }
}

impl BlockRule for ListRule {
    fn kind(&self) -> BlockKind {
        if self.ordered { BlockKind::Ol } else { BlockKind::Ul }
    }

    fn identify(&self, lines: &[String], current: usize) -> bool {
        match_item(&lines[current], self.ordered).is_some()
    }

    fn consume(
        &self,
        ctx: &mut Context<'_>,
        lines: &[String],
        current: usize,
    ) -> Result<(Block, usize)> {
        let mut items: Vec<Vec<String>> = Vec::new();
        let mut loose = false;
        let mut first_marker = None;
        let mut width = 0;
        let mut numbers = Vec::new();

        let mut i = current;
        while i < lines.len() {
            let line = expand_tabs(&lines[i], TAB_PAD);

            // A marker indented past the current item's content belongs to a sub-list
            let item = match_item(&line, self.ordered).filter(|m| i == current || m.indent < width);

            if let Some(item) = item {
                if i == current {
                    first_marker = Some(item.marker);
                } else if first_marker != Some(item.marker) {
                    // Marker changed: end of list
                    i -= 1;
                    break;
                }
                numbers.extend(item.number);
                width = item.width;
                items.push(vec![strip_columns(&line, width)]);
            } else if is_blank(&line) {
                let Some(next) = lines.get(i + 1) else {
                    break;
                };
                let next = expand_tabs(next, TAB_PAD);
                let continues = is_blank(&next)
                    || indent_width(&next) >= width
                    || match_item(&next, self.ordered).is_some();
                if !continues {
                    break;
                }
                if !is_blank(&next) {
                    loose = true;
                }
                if let Some(item_lines) = items.last_mut() {
                    item_lines.push(strip_columns(&line, width));
                }
            } else if indent_width(&line) >= width {
                if let Some(item_lines) = items.last_mut() {
                    item_lines.push(strip_columns(&line, width));
                }
            } else {
                i = i.saturating_sub(1);
                break;
            }

            // A horizontal rule always ends the list
            if lines.get(i + 1).is_some_and(|next| !next.is_empty())
                && ctx.identifies(BlockKind::Hr, lines, i + 1)
            {
                break;
            }
            i += 1;
        }
        let last = i.min(lines.len() - 1);

        let mut parsed = Vec::with_capacity(items.len());
        for item_lines in &items {
            let blocks = ctx.parse_blocks(item_lines)?;
            if blocks.len() > 1 {
                loose = true;
            }
            parsed.push(blocks);
        }

        let ordered = if self.ordered {
            let options = ctx.options();
            let first = numbers.first().copied().unwrap_or(1);
            let end = numbers.last().copied().unwrap_or(first);
            Some(OrderedAttrs {
                start: (first != 1 && options.keep_list_start_number).then_some(first),
                reversed: first > end && options.keep_reversed_list,
            })
        } else {
            None
        };

        Ok((
            Block::List {
                ordered,
                loose,
                items: parsed,
            },
            last,
        ))
    }
}
