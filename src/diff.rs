//! Two-pane comparison: pairing old/new lines and rendering them side by
//! side in the terminal.

use owo_colors::OwoColorize;
use similar::{DiffTag, TextDiff};

use crate::highlighting::SyntaxHighlighter;
use crate::panel::{content_uri, FileDiff};

/// One cell of a pane: a 1-based line number and the line's text.
#[derive(Debug, Clone, PartialEq)]
pub struct PaneCell {
    pub number: usize,
    pub text: String,
    pub changed: bool,
}

/// One aligned row of the comparison. A side is `None` when the row has no
/// counterpart there (pure insertion or deletion).
#[derive(Debug, Clone, PartialEq)]
pub struct DiffRow {
    pub left: Option<PaneCell>,
    pub right: Option<PaneCell>,
}

/// Pair old and new lines into aligned rows, grouped into hunks with the
/// given amount of surrounding context.
///
/// Replace runs pair positionally; the longer side's remainder renders
/// against an empty opposite cell.
pub fn side_by_side(old: &str, new: &str, context: usize) -> Vec<Vec<DiffRow>> {
    let diff = TextDiff::from_lines(old, new);
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();

    let mut hunks = Vec::new();
    for group in diff.grouped_ops(context) {
        let mut rows = Vec::new();
        for op in group {
            match op.tag() {
                DiffTag::Equal => {
                    for (o, n) in op.old_range().zip(op.new_range()) {
                        rows.push(DiffRow {
                            left: Some(cell(o, &old_lines, false)),
                            right: Some(cell(n, &new_lines, false)),
                        });
                    }
                }
                DiffTag::Delete => {
                    for o in op.old_range() {
                        rows.push(DiffRow {
                            left: Some(cell(o, &old_lines, true)),
                            right: None,
                        });
                    }
                }
                DiffTag::Insert => {
                    for n in op.new_range() {
                        rows.push(DiffRow {
                            left: None,
                            right: Some(cell(n, &new_lines, true)),
                        });
                    }
                }
                DiffTag::Replace => {
                    let mut olds = op.old_range();
                    let mut news = op.new_range();
                    loop {
                        let (o, n) = (olds.next(), news.next());
                        if o.is_none() && n.is_none() {
                            break;
                        }
                        rows.push(DiffRow {
                            left: o.map(|i| cell(i, &old_lines, true)),
                            right: n.map(|i| cell(i, &new_lines, true)),
                        });
                    }
                }
            }
        }
        hunks.push(rows);
    }
    hunks
}

fn cell(index: usize, lines: &[&str], changed: bool) -> PaneCell {
    PaneCell {
        number: index + 1,
        text: lines.get(index).copied().unwrap_or("").to_string(),
        changed,
    }
}

/// Null bytes in the first 8 KiB mean the content is not renderable text.
pub fn is_binary(content: &str) -> bool {
    content.bytes().take(8192).any(|b| b == 0)
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub pane_width: usize,
    pub context_lines: usize,
    pub color: bool,
}

/// Render a [`FileDiff`] as a side-by-side comparison.
///
/// Missing sides (the file is new on this branch, or gone from the working
/// tree) and binary content produce a readable notice instead of failing.
pub fn render_file_diff(
    diff: &FileDiff,
    opts: &RenderOptions,
    highlighter: &SyntaxHighlighter,
) -> String {
    let mut out = String::new();

    let title = format!("{}: HEAD vs {}", diff.path, diff.branch);
    let source = content_uri(&diff.path, &diff.branch);
    if opts.color {
        out.push_str(&format!("{}\n{}\n", title.bold(), source.dimmed()));
    } else {
        out.push_str(&format!("{title}\n{source}\n"));
    }

    if diff.old.is_none() {
        out.push_str(&format!(
            "note: {} does not exist at {} (newly added)\n",
            diff.path, diff.branch
        ));
    }
    if diff.new.is_none() {
        out.push_str(&format!(
            "note: {} is missing from the working tree (deleted)\n",
            diff.path
        ));
    }

    let old_text = diff.old.as_deref().unwrap_or("");
    let new_text = diff.new.as_deref().unwrap_or("");

    if is_binary(old_text) || is_binary(new_text) {
        out.push_str("note: binary content, comparison not rendered\n");
        return out;
    }

    if old_text == new_text {
        out.push_str("no differences\n");
        return out;
    }

    let old_painted = paint_pane(old_text, &diff.path, opts, highlighter);
    let new_painted = paint_pane(new_text, &diff.path, opts, highlighter);

    let hunks = side_by_side(old_text, new_text, opts.context_lines);
    let num_width = digits(old_text.lines().count().max(new_text.lines().count()));
    let cell_width = num_width + 2 + opts.pane_width;

    for (i, hunk) in hunks.iter().enumerate() {
        if i > 0 {
            let rule = "┈".repeat(2 * cell_width + 3);
            if opts.color {
                out.push_str(&format!("{}\n", rule.dimmed()));
            } else {
                out.push_str(&rule);
                out.push('\n');
            }
        }
        for row in hunk {
            let left = render_cell(row.left.as_ref(), &old_painted, num_width, '-', opts);
            let right = render_cell(row.right.as_ref(), &new_painted, num_width, '+', opts);
            out.push_str(&format!("{left} │ {right}"));
            out.push('\n');
        }
    }

    out
}

/// A pane line ready for display: highlighted text plus the raw character
/// count the layout pads against.
struct PaintedLine {
    text: String,
    width: usize,
}

fn paint_pane(
    content: &str,
    path: &str,
    opts: &RenderOptions,
    highlighter: &SyntaxHighlighter,
) -> Vec<PaintedLine> {
    let raw: Vec<&str> = content.lines().collect();

    let highlighted = if opts.color {
        Some(highlighter.highlight_lines(content, path))
    } else {
        None
    };

    raw.iter()
        .enumerate()
        .map(|(i, line)| {
            let width = line.chars().count();
            if width > opts.pane_width {
                // Truncated lines stay unhighlighted: slicing an escaped
                // string mid-sequence would corrupt the output.
                let clipped: String = line
                    .chars()
                    .take(opts.pane_width.saturating_sub(1))
                    .collect();
                PaintedLine {
                    text: format!("{clipped}…"),
                    width: opts.pane_width,
                }
            } else {
                let text = highlighted
                    .as_ref()
                    .and_then(|lines| lines.get(i).cloned())
                    .unwrap_or_else(|| (*line).to_string());
                PaintedLine { text, width }
            }
        })
        .collect()
}

fn render_cell(
    cell: Option<&PaneCell>,
    painted: &[PaintedLine],
    num_width: usize,
    marker: char,
    opts: &RenderOptions,
) -> String {
    let Some(cell) = cell else {
        return " ".repeat(num_width + 2 + opts.pane_width);
    };

    let number = format!("{:>num_width$}", cell.number);
    let number = if opts.color {
        format!("{}", number.dimmed())
    } else {
        number
    };

    let mark = if cell.changed { marker } else { ' ' };
    let mark = if opts.color && cell.changed {
        match marker {
            '-' => format!("{}", mark.red()),
            _ => format!("{}", mark.green()),
        }
    } else {
        mark.to_string()
    };

    let line = painted.get(cell.number - 1);
    let text = line.map(|l| l.text.as_str()).unwrap_or("");
    let width = line.map(|l| l.width).unwrap_or(0);
    let pad = " ".repeat(opts.pane_width.saturating_sub(width));

    format!("{number} {mark}{text}{pad}")
}

fn digits(mut n: usize) -> usize {
    let mut width = 1;
    while n >= 10 {
        n /= 10;
        width += 1;
    }
    width
}
