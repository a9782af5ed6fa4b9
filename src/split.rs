//! Splitting a hunk in two at a context line.

use crate::diff::hunk::{self, Hunk};
use crate::diff::LineKind;
use error_set::error_set;

error_set! {
    /// Errors from hunk splitting
    SplitError := {
        /// The split index does not fall inside the hunk body
        #[display("Split line {index} is outside the hunk (1..={len})")]
        OutOfRangeSelection { index: usize, len: usize },
        /// Only a context line can divide a hunk
        #[display("Split line {index} is not a context line")]
        SplitTargetNotContextLine { index: usize },
    }
}

/// Split a hunk at a context line, which is removed rather than duplicated.
///
/// The first half keeps the original starts; the second half's starts are
/// recomputed by walking the old/new counters over every line up to and
/// including the split line. Each half's counts are fresh tallies over its
/// own body, and an empty half is omitted from the result.
pub fn split(hunk: &Hunk, at_index: usize) -> Result<Vec<Hunk>, SplitError> {
    let len = hunk.lines.len();
    if at_index == 0 || at_index > len {
        return Err(SplitError::OutOfRangeSelection {
            index: at_index,
            len,
        });
    }
    if hunk.lines[at_index - 1].kind != LineKind::Context {
        return Err(SplitError::SplitTargetNotContextLine { index: at_index });
    }

    let mut second_old_start = hunk.old_start;
    let mut second_new_start = hunk.new_start;
    for line in &hunk.lines[..at_index] {
        match line.kind {
            LineKind::Context => {
                second_old_start += 1;
                second_new_start += 1;
            }
            LineKind::Del => second_old_start += 1,
            LineKind::Add => second_new_start += 1,
        }
    }

    let halves = [
        build_half(hunk, 0, at_index - 1, hunk.old_start, hunk.new_start),
        build_half(hunk, at_index, len, second_old_start, second_new_start),
    ];
    Ok(halves.into_iter().flatten().collect())
}

fn build_half(
    hunk: &Hunk,
    from: usize,
    to: usize,
    old_start: u32,
    new_start: u32,
) -> Option<Hunk> {
    if from == to {
        return None;
    }
    let mut lines = hunk.lines[from..to].to_vec();
    for (position, line) in lines.iter_mut().enumerate() {
        line.index = position + 1;
    }
    let mut half = Hunk {
        header: String::new(),
        old_start,
        old_count: 0,
        new_start,
        new_count: 0,
        lines,
    };
    let (old_count, new_count) = half.tally();
    half.old_count = old_count;
    half.new_count = new_count;
    half.header = hunk::format_header(old_start, old_count, new_start, new_count);
    Some(half)
}
