/// Line buffer and tab expansion
///
/// Tabs are expanded to 4-column stops using a placeholder character instead
/// of spaces. Indentation arithmetic then works on single-byte columns, and
/// the placeholders can be turned back into tabs once a prefix has been
/// sliced off, so content keeps its original tabs.

/// Placeholder written in place of the columns a tab occupies.
pub const TAB_PAD: char = '\u{1D}';

const TAB_STOP: usize = 4;

/// Split a document into lines, normalizing `\r\n`, `\n\r` and `\r` to `\n`
pub fn split_lines(input: &str) -> Vec<String> {
    let normalized = input
        .replace("\r\n", "\n")
        .replace("\n\r", "\n")
        .replace('\r', "\n");
    normalized.split('\n').map(str::to_string).collect()
}

/// A line is blank when it is empty or holds only whitespace
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Expand tabs to the next multiple of 4 columns, filling with `pad`
pub fn expand_tabs(line: &str, pad: char) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }

    let mut result = String::with_capacity(line.len() + TAB_STOP);
    let mut col = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let width = TAB_STOP - col % TAB_STOP;
            result.extend(std::iter::repeat_n(pad, width));
            col += width;
        } else {
            result.push(ch);
            col += 1;
        }
    }
    result
}

/// Turn runs of placeholders back into tabs, one tab per 1-4 placeholders
pub fn restore_tabs(line: &str) -> String {
    if !line.contains(TAB_PAD) {
        return line.to_string();
    }

    let mut result = String::with_capacity(line.len());
    let mut run = 0;
    for ch in line.chars() {
        if ch == TAB_PAD {
            run += 1;
            continue;
        }
        flush_pad_run(&mut result, run);
        run = 0;
        result.push(ch);
    }
    flush_pad_run(&mut result, run);
    result
}

fn flush_pad_run(out: &mut String, run: usize) {
    for _ in 0..run.div_ceil(TAB_STOP) {
        out.push('\t');
    }
}

/// Count leading spaces and tab placeholders
pub fn indent_width(line: &str) -> usize {
    line.bytes()
        .take_while(|&b| b == b' ' || b == TAB_PAD as u8)
        .count()
}

/// Count leading spaces only
pub fn leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}

/// Drop the first `width` bytes of an expanded line, then restore tabs
///
/// Callers only pass widths covering spaces, placeholders or an ASCII list
/// marker, so the cut always lands on a char boundary for non-blank lines.
pub fn strip_columns(line: &str, width: usize) -> String {
    restore_tabs(line.get(width..).unwrap_or(""))
}
