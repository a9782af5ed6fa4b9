//! Row-range selection over rendered rows.

use crate::render::Row;
use std::collections::BTreeSet;

/// A normalized, inclusive row range. `good` records whether the range
/// covers at least one change row, which is what makes it actionable for
/// patch synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    pub good: bool,
}

/// Normalize a drag between two row indices, in either direction.
pub fn select(rows: &[Row], from: usize, to: usize) -> Selection {
    if rows.is_empty() {
        return Selection {
            start: 0,
            end: 0,
            good: false,
        };
    }
    let (start, end) = if from <= to { (from, to) } else { (to, from) };
    let end = end.min(rows.len().saturating_sub(1));
    let start = start.min(end);
    let good = rows[start..=end].iter().any(Row::is_change);
    Selection { start, end, good }
}

/// Body line indices covered by the selection; a paired change row
/// contributes both of its sides.
pub fn selected_line_indices(rows: &[Row], selection: &Selection) -> BTreeSet<usize> {
    rows[selection.start..=selection.end]
        .iter()
        .flat_map(Row::line_indices)
        .collect()
}

/// A selection of exactly one context row designates a hunk split point
/// rather than a stageable range. Returns that row's body line index.
pub fn split_target(rows: &[Row], selection: &Selection) -> Option<usize> {
    if selection.start != selection.end {
        return None;
    }
    match &rows[selection.start] {
        Row::Context { old, .. } => Some(old.line_index),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::parse;
    use crate::render::render;
    use similar_asserts::assert_eq;

    fn rows_of(body: &str) -> Vec<Row> {
        let text = format!(
            "diff --git a/f b/f\n--- a/f\n+++ b/f\n@@ -1,1 +1,1 @@\n{body}"
        );
        let hunk = parse(&text).remove(0).hunks.remove(0);
        render(&hunk, &crate::pair::pair(&hunk))
    }

    #[test]
    fn drag_direction_is_normalized() {
        let rows = rows_of(" a\n-b\n+c\n d\n");
        assert_eq!(select(&rows, 3, 1), select(&rows, 1, 3));
        let sel = select(&rows, 3, 1);
        assert_eq!((sel.start, sel.end), (1, 3));
    }

    #[test]
    fn selection_covering_a_change_is_good() {
        let rows = rows_of(" a\n-b\n+c\n d\n");
        assert!(select(&rows, 1, 2).good);
    }

    #[test]
    fn context_only_selection_is_not_good() {
        let rows = rows_of(" a\n-b\n+c\n d\n");
        // Row 1 is the first context line.
        assert!(!select(&rows, 1, 1).good);
        // The hunk header alone is not actionable either.
        assert!(!select(&rows, 0, 0).good);
    }

    #[test]
    fn out_of_range_end_is_clamped() {
        let rows = rows_of(" a\n-b\n+c\n");
        let sel = select(&rows, 1, 99);
        assert_eq!(sel.end, rows.len() - 1);
        assert!(sel.good);
    }

    #[test]
    fn paired_row_selects_both_line_indices() {
        let rows = rows_of(" a\n-b\n+c\n d\n");
        // Row 2 is the paired change row covering lines 2 and 3.
        let sel = select(&rows, 2, 2);
        let picked = selected_line_indices(&rows, &sel);
        assert_eq!(picked.into_iter().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn full_drag_selects_every_body_line() {
        let rows = rows_of(" a\n-b\n+c\n d\n");
        let sel = select(&rows, 0, rows.len() - 1);
        let picked = selected_line_indices(&rows, &sel);
        assert_eq!(picked.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn single_context_row_is_a_split_target() {
        let rows = rows_of(" a\n-b\n+c\n d\n");
        let sel = select(&rows, 1, 1);
        assert_eq!(split_target(&rows, &sel), Some(1));
    }

    #[test]
    fn change_row_is_not_a_split_target() {
        let rows = rows_of(" a\n-b\n+c\n d\n");
        let sel = select(&rows, 2, 2);
        assert_eq!(split_target(&rows, &sel), None);
    }

    #[test]
    fn multi_row_selection_is_not_a_split_target() {
        let rows = rows_of(" a\n-b\n+c\n d\n");
        let sel = select(&rows, 1, 3);
        assert_eq!(split_target(&rows, &sel), None);
    }
}
