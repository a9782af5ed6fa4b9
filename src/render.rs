//! Side-by-side row construction.
//!
//! One row per hunk header, per context line (duplicated on both sides), and
//! per change. A paired deletion/addition collapses into a single row with
//! both sides populated and inline highlights from the blockwise token diff.
//! Row order follows the original line order exactly; selection maps rows
//! back to line indices through the cells.

use crate::diff::{Hunk, LineKind};
use crate::pair;
use crate::token::{self, Mark, MarkedText, Segment};
use std::collections::BTreeMap;

/// One side of a row: which body line it came from, its file line number on
/// that side, and the content with inline highlights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCell {
    pub line_index: usize,
    pub number: Option<u32>,
    pub text: MarkedText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    HunkHeader { text: String },
    Context { old: RowCell, new: RowCell },
    Change { old: Option<RowCell>, new: Option<RowCell> },
}

impl Row {
    pub fn is_change(&self) -> bool {
        matches!(self, Row::Change { .. })
    }

    /// Body line indices this row covers; a paired change row contributes
    /// both sides.
    pub fn line_indices(&self) -> Vec<usize> {
        match self {
            Row::HunkHeader { .. } => Vec::new(),
            Row::Context { old, .. } => vec![old.line_index],
            Row::Change { old, new } => old
                .iter()
                .chain(new.iter())
                .map(|cell| cell.line_index)
                .collect(),
        }
    }
}

fn plain(text: &str) -> MarkedText {
    if text.is_empty() {
        return MarkedText::default();
    }
    MarkedText {
        segments: vec![Segment {
            mark: Mark::Equal,
            text: text.to_string(),
        }],
    }
}

/// Inline highlights for every change line, keyed by body line index.
///
/// Each change block with lines on both sides gets a blockwise token diff;
/// one-sided blocks stay unhighlighted.
fn block_highlights(hunk: &Hunk) -> BTreeMap<usize, MarkedText> {
    let mut highlights = BTreeMap::new();
    for block in pair::change_blocks(hunk) {
        if block.dels.is_empty() || block.adds.is_empty() {
            continue;
        }
        let side_text = |indices: &[usize]| {
            indices
                .iter()
                .map(|&i| hunk.lines[i - 1].content())
                .collect::<Vec<_>>()
                .join("\n")
        };
        let diff = token::diff_tokens(&side_text(&block.dels), &side_text(&block.adds));
        for (index, marked) in block.dels.iter().zip(diff.old_marked.split_lines()) {
            highlights.insert(*index, marked);
        }
        for (index, marked) in block.adds.iter().zip(diff.new_marked.split_lines()) {
            highlights.insert(*index, marked);
        }
    }
    highlights
}

/// Build the side-by-side rows for a hunk, using the positional pairing
/// from [`pair::pair`].
pub fn render(hunk: &Hunk, pairing: &BTreeMap<usize, usize>) -> Vec<Row> {
    let highlights = block_highlights(hunk);
    let cell = |index: usize| {
        let line = &hunk.lines[index - 1];
        let text = highlights
            .get(&index)
            .cloned()
            .unwrap_or_else(|| plain(line.content()));
        RowCell {
            line_index: index,
            number: match line.kind {
                LineKind::Context | LineKind::Del => line.old_line,
                LineKind::Add => line.new_line,
            },
            text,
        }
    };

    let mut rows = vec![Row::HunkHeader {
        text: hunk.header.clone(),
    }];
    for line in &hunk.lines {
        match line.kind {
            LineKind::Context => rows.push(Row::Context {
                old: RowCell {
                    line_index: line.index,
                    number: line.old_line,
                    text: plain(line.content()),
                },
                new: RowCell {
                    line_index: line.index,
                    number: line.new_line,
                    text: plain(line.content()),
                },
            }),
            LineKind::Del => rows.push(Row::Change {
                old: Some(cell(line.index)),
                new: pairing.get(&line.index).map(|&add| cell(add)),
            }),
            LineKind::Add => {
                // A paired addition was already emitted on its deletion's row.
                if !pairing.contains_key(&line.index) {
                    rows.push(Row::Change {
                        old: None,
                        new: Some(cell(line.index)),
                    });
                }
            }
        }
    }
    rows
}
