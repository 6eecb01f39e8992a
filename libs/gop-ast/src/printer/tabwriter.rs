//! # Elastic Tabstops
//!
//! Aligns cells of consecutive lines into columns. A column block is a
//! run of adjacent lines that all have a terminated cell in that column;
//! its width is the widest cell plus padding. Blocks end at blank lines,
//! at indentation changes and after section breaks.
//!
//! Columns whose cells are all empty collapse to zero width.

use config::constants::{CELL_PADDING, TAB_WIDTH};

/// One output line: indentation depth plus cells.
///
/// Every cell but the last is terminated and takes part in alignment.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Line {
    pub indent: usize,
    pub cells: Vec<String>,
    /// The line ended a section; alignment does not continue past it.
    pub section_end: bool,
}

impl Line {
    pub fn new() -> Self {
        Self {
            indent: 0,
            cells: vec![String::new()],
            section_end: false,
        }
    }

    fn terminated(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    fn is_blank(&self) -> bool {
        self.cells.iter().all(String::is_empty)
    }
}

/// Render lines with aligned columns, joined by newlines.
pub(crate) fn render(lines: &[Line]) -> String {
    let mut widths: Vec<Vec<usize>> = lines.iter().map(|l| vec![0; l.terminated()]).collect();
    format_columns(lines, &mut widths, 0, lines.len(), 0);

    let rendered: Vec<String> = lines
        .iter()
        .zip(&widths)
        .map(|(line, widths)| render_line(line, widths))
        .collect();
    rendered.join("\n")
}

fn format_columns(
    lines: &[Line],
    widths: &mut [Vec<usize>],
    line0: usize,
    line1: usize,
    column: usize,
) {
    let mut i = line0;
    while i < line1 {
        if lines[i].terminated() <= column {
            i += 1;
            continue;
        }

        let start = i;
        let mut width = 0;
        let mut discardable = true;
        while i < line1 && continues_block(lines, start, i, column) {
            let cell = &lines[i].cells[column];
            width = width.max(cell_width(cell) + CELL_PADDING);
            if !cell.is_empty() {
                discardable = false;
            }
            i += 1;
        }
        if discardable {
            width = 0;
        }
        for w in &mut widths[start..i] {
            w[column] = width;
        }
        format_columns(lines, widths, start, i, column + 1);
    }
}

fn continues_block(lines: &[Line], start: usize, i: usize, column: usize) -> bool {
    let line = &lines[i];
    if line.terminated() <= column {
        return false;
    }
    i == start || (line.indent == lines[start].indent && !lines[i - 1].section_end)
}

fn render_line(line: &Line, widths: &[usize]) -> String {
    if line.is_blank() {
        return String::new();
    }
    let mut out = "\t".repeat(line.indent);
    let last = line.cells.len() - 1;
    for (j, cell) in line.cells.iter().enumerate() {
        out.push_str(cell);
        if j < last {
            let pad = widths[j].saturating_sub(cell_width(cell));
            out.extend(std::iter::repeat(' ').take(pad));
        }
    }
    out.truncate(out.trim_end_matches([' ', '\t']).len());
    out
}

fn cell_width(cell: &str) -> usize {
    cell.chars()
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(indent: usize, cells: &[&str]) -> Line {
        Line {
            indent,
            cells: cells.iter().map(|c| c.to_string()).collect(),
            section_end: false,
        }
    }

    #[test]
    fn test_aligns_first_column() {
        let lines = vec![
            line(0, &["type a struct {"]),
            line(1, &["v", "map[int]chan int"]),
            line(1, &["arr", "*[2]func()"]),
            line(1, &["i", "interface{}"]),
            line(0, &["}"]),
        ];
        assert_eq!(
            render(&lines),
            "type a struct {\n\tv   map[int]chan int\n\tarr *[2]func()\n\ti   interface{}\n}"
        );
    }

    #[test]
    fn test_blank_line_breaks_block() {
        let lines = vec![
            line(1, &["a", "int"]),
            line(0, &[""]),
            line(1, &["bbbb", "int"]),
        ];
        assert_eq!(render(&lines), "\ta int\n\n\tbbbb int");
    }

    #[test]
    fn test_section_end_breaks_block() {
        let mut first = line(1, &["a", "int"]);
        first.section_end = true;
        let lines = vec![first, line(1, &["bbbb", "int"])];
        assert_eq!(render(&lines), "\ta int\n\tbbbb int");
    }

    #[test]
    fn test_nested_columns_and_comments() {
        let lines = vec![
            line(1, &["a", "int", "// first"]),
            line(1, &["bcd", "string", "// second"]),
        ];
        assert_eq!(
            render(&lines),
            "\ta   int    // first\n\tbcd string // second"
        );
    }

    #[test]
    fn test_empty_columns_collapse() {
        let lines = vec![
            line(1, &["x", "", "= 1"]),
            line(1, &["yy", "", "= 2"]),
        ];
        assert_eq!(render(&lines), "\tx  = 1\n\tyy = 2");
    }

    #[test]
    fn test_trailing_padding_is_trimmed() {
        let lines = vec![line(0, &["f()", ""])];
        assert_eq!(render(&lines), "f()");
    }
}
