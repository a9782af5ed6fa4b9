//! Partial patch synthesis.
//!
//! Builds a unified-diff patch from a subset of a hunk's change lines. The
//! same selection produces different patches per direction: a staging patch
//! is applied forward against the worktree, an unstaging patch is applied in
//! reverse against the index, and the conversion rules for unselected lines
//! mirror that.

use crate::diff::hunk::{self, Hunk};
use crate::diff::{DiffLine, LineKind};
use crate::pair;
use error_set::error_set;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

error_set! {
    /// Errors from partial patch synthesis
    PatchError := {
        /// A selected line index does not fall inside the hunk body
        #[display("Selected line {index} is outside the hunk (1..={len})")]
        OutOfRangeSelection { index: usize, len: usize },
        /// The hunk header is not a valid `@@ -a,b +c,d @@` header
        #[display("Unparsable hunk header '{header}'")]
        UnparsableHunkHeader { header: String },
        /// The header's declared counts disagree with the hunk body
        #[display(
            "Hunk declares -{declared_old},+{declared_new} but body tallies -{actual_old},+{actual_new}"
        )]
        CountMismatch {
            declared_old: u32,
            declared_new: u32,
            actual_old: u32,
            actual_new: u32,
        },
    }
}

/// Which way the produced patch will be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Forward apply to the index; the patch describes worktree order.
    Stage,
    /// Reverse apply to the index; the patch describes index order.
    Unstage,
}

/// A synthesized single-hunk patch. `body` carries one emitted line per
/// entry, markers included; the header counts are literal tallies over the
/// body, not the source hunk's counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub header: String,
    pub body: String,
    pub old_count: u32,
    pub new_count: u32,
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        write!(f, "{}", self.body)
    }
}

struct Emitter {
    body: String,
    old_count: u32,
    new_count: u32,
}

impl Emitter {
    fn new() -> Self {
        Emitter {
            body: String::new(),
            old_count: 0,
            new_count: 0,
        }
    }

    fn context(&mut self, line: &DiffLine) {
        self.body.push(' ');
        self.push_content(line);
        self.old_count += 1;
        self.new_count += 1;
    }

    fn deletion(&mut self, line: &DiffLine) {
        self.body.push('-');
        self.push_content(line);
        self.old_count += 1;
    }

    fn addition(&mut self, line: &DiffLine) {
        self.body.push('+');
        self.push_content(line);
        self.new_count += 1;
    }

    fn push_content(&mut self, line: &DiffLine) {
        self.body.push_str(line.content());
        self.body.push('\n');
        if line.missing_newline {
            self.body.push_str("\\ No newline at end of file\n");
        }
    }
}

/// Build a partial patch from the selected body lines of a hunk.
///
/// Lines keep their original relative order with one exception per paired
/// selected change: staging pulls the paired addition up to sit directly
/// after its deletion (worktree order), unstaging holds the deletion back
/// until its paired addition's position (index order). An unselected
/// deletion becomes context when staging and is dropped when unstaging; an
/// unselected addition is dropped when staging and becomes context when
/// unstaging. A converted context line always keeps its own text, never its
/// paired counterpart's.
pub fn synthesize(
    hunk: &Hunk,
    selected: &BTreeSet<usize>,
    direction: Direction,
) -> Result<Patch, PatchError> {
    let len = hunk.lines.len();
    for &index in selected {
        if index == 0 || index > len {
            return Err(PatchError::OutOfRangeSelection { index, len });
        }
    }
    if hunk::parse_header(&hunk.header).is_none() {
        return Err(PatchError::UnparsableHunkHeader {
            header: hunk.header.clone(),
        });
    }
    let (actual_old, actual_new) = hunk.tally();
    if (actual_old, actual_new) != (hunk.old_count, hunk.new_count) {
        return Err(PatchError::CountMismatch {
            declared_old: hunk.old_count,
            declared_new: hunk.new_count,
            actual_old,
            actual_new,
        });
    }

    let pairing = pair::pair(hunk);
    let mut out = Emitter::new();
    // Unstage: selected deletions held back, keyed by their paired
    // addition's index.
    let mut deferred: BTreeMap<usize, usize> = BTreeMap::new();
    // Stage: paired additions already emitted alongside their deletion.
    let mut consumed: BTreeSet<usize> = BTreeSet::new();

    for line in &hunk.lines {
        let is_selected = selected.contains(&line.index);
        match line.kind {
            LineKind::Context => out.context(line),
            LineKind::Del => {
                if !is_selected {
                    if direction == Direction::Stage {
                        out.context(line);
                    }
                    continue;
                }
                match pairing.get(&line.index) {
                    Some(&add) if direction == Direction::Unstage => {
                        deferred.insert(add, line.index);
                    }
                    Some(&add) if selected.contains(&add) => {
                        out.deletion(line);
                        out.addition(&hunk.lines[add - 1]);
                        consumed.insert(add);
                    }
                    _ => out.deletion(line),
                }
            }
            LineKind::Add => {
                if let Some(del) = deferred.remove(&line.index) {
                    out.deletion(&hunk.lines[del - 1]);
                }
                if consumed.contains(&line.index) {
                    continue;
                }
                if is_selected {
                    out.addition(line);
                } else if direction == Direction::Unstage {
                    out.context(line);
                }
            }
        }
    }

    Ok(Patch {
        header: hunk::format_header(
            hunk.old_start,
            out.old_count,
            hunk.new_start,
            out.new_count,
        ),
        body: out.body,
        old_count: out.old_count,
        new_count: out.new_count,
    })
}
