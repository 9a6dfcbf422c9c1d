/// Pipe tables with a delimiter row under the head
use crate::ast::{Alignment, Block, Inline};
use crate::error::Result;
use crate::flavor::BlockKind;
use crate::lines::is_blank;
use crate::parser::{BlockRule, Context};

pub struct TableRule;

/// Split a row on unescaped pipes, dropping the outer ones
fn split_cells(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = match line.strip_suffix('|') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => line,
    };

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut cell)),
            _ => cell.push(c),
        }
    }
    cells.push(cell);
    cells.into_iter().map(|c| c.trim().to_string()).collect()
}

/// Column alignments of a delimiter row such as `| :-- | :-: | --: |`
fn parse_delimiter_row(line: &str) -> Option<Vec<Alignment>> {
    if !line.contains('|') {
        return None;
    }

    line.trim()
        .trim_matches('|')
        .split('|')
        .map(|cell| {
            let cell = cell.trim();
            let left = cell.starts_with(':');
            let right = cell.len() > 1 && cell.ends_with(':');
            let core = cell.trim_start_matches(':').trim_end_matches(':');
            if core.is_empty() || !core.starts_with('-') || !core.chars().all(|c| c == '-' || c == ' ') {
                return None;
            }
            Some(match (left, right) {
                (true, true) => Alignment::Center,
                (true, false) => Alignment::Left,
                (false, true) => Alignment::Right,
                (false, false) => Alignment::None,
            })
        })
        .collect()
}

impl BlockRule for TableRule {
    fn kind(&self) -> BlockKind {
        BlockKind::Table
    }

    fn identify(&self, lines: &[String], current: usize) -> bool {
        lines[current].contains('|')
            && lines
                .get(current + 1)
                .is_some_and(|next| parse_delimiter_row(next).is_some())
            && current + 2 < lines.len()
    }

    fn consume(
        &self,
        ctx: &mut Context<'_>,
        lines: &[String],
        current: usize,
    ) -> Result<(Block, usize)> {
        let alignments = parse_delimiter_row(&lines[current + 1]).unwrap_or_default();
        let columns = alignments.len();

        let head = parse_row(ctx, &lines[current], columns)?;

        let mut rows = Vec::new();
        let mut i = current + 2;
        while i < lines.len() {
            let line = &lines[i];
            if is_blank(line) || line.starts_with("    ") {
                break;
            }
            rows.push(parse_row(ctx, line, columns)?);
            i += 1;
        }

        Ok((
            Block::Table {
                alignments,
                head,
                rows,
            },
            i - 1,
        ))
    }
}

/// Inline-parse each cell, padding or truncating to the column count
fn parse_row(ctx: &mut Context<'_>, line: &str, columns: usize) -> Result<Vec<Vec<Inline>>> {
    let mut cells = Vec::with_capacity(columns);
    for cell in split_cells(line).iter().take(columns) {
        cells.push(ctx.parse_inline(cell)?);
    }
    cells.resize_with(columns, Vec::new);
    Ok(cells)
}
