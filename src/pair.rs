//! Positional pairing of deletions and additions.
//!
//! Within each change block (a maximal run of consecutive change lines) the
//! k-th deletion is paired with the k-th addition. Pairing is strictly
//! positional; line content never participates. Leftover lines on the longer
//! side stay unpaired.

use crate::diff::Hunk;
use std::collections::BTreeMap;

/// A maximal run of consecutive change lines, split by side.
///
/// Indices refer to `DiffLine::index` within the hunk body, in original
/// order on each side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeBlock {
    pub dels: Vec<usize>,
    pub adds: Vec<usize>,
}

/// Collect the change blocks of a hunk body. Context lines terminate blocks
/// and never appear in one.
pub fn change_blocks(hunk: &Hunk) -> Vec<ChangeBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<ChangeBlock> = None;
    for line in &hunk.lines {
        use crate::diff::LineKind::*;
        match line.kind {
            Context => {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
            }
            Del => current
                .get_or_insert_with(|| ChangeBlock {
                    dels: Vec::new(),
                    adds: Vec::new(),
                })
                .dels
                .push(line.index),
            Add => current
                .get_or_insert_with(|| ChangeBlock {
                    dels: Vec::new(),
                    adds: Vec::new(),
                })
                .adds
                .push(line.index),
        }
    }
    if let Some(block) = current {
        blocks.push(block);
    }
    blocks
}

/// Symmetric pairing map over the hunk body: a paired deletion maps to its
/// addition and vice versa. Unpaired change lines and context lines are
/// absent from the map.
pub fn pair(hunk: &Hunk) -> BTreeMap<usize, usize> {
    let mut map = BTreeMap::new();
    for block in change_blocks(hunk) {
        for (del, add) in block.dels.iter().zip(block.adds.iter()) {
            map.insert(*del, *add);
            map.insert(*add, *del);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::parse;
    use similar_asserts::assert_eq;

    fn hunk_of(body: &str) -> Hunk {
        let text = format!(
            "diff --git a/f b/f\n--- a/f\n+++ b/f\n@@ -1,1 +1,1 @@\n{body}"
        );
        parse(&text).remove(0).hunks.remove(0)
    }

    #[test]
    fn balanced_block_pairs_rank_for_rank() {
        let hunk = hunk_of("-one\n-two\n+uno\n+dos\n");
        let pairing = pair(&hunk);
        assert_eq!(pairing.get(&1), Some(&3));
        assert_eq!(pairing.get(&2), Some(&4));
        assert_eq!(pairing.get(&3), Some(&1));
        assert_eq!(pairing.get(&4), Some(&2));
    }

    #[test]
    fn leftover_lines_stay_unpaired() {
        let hunk = hunk_of("-one\n+uno\n+extra\n");
        let pairing = pair(&hunk);
        assert_eq!(pairing.get(&1), Some(&2));
        assert_eq!(pairing.get(&3), None);
    }

    #[test]
    fn context_terminates_blocks() {
        let hunk = hunk_of("-a\n b\n+c\n");
        let pairing = pair(&hunk);
        // Separate blocks on each side of the context line, nothing pairs.
        assert!(pairing.is_empty());
        let blocks = change_blocks(&hunk);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].dels, vec![1]);
        assert!(blocks[0].adds.is_empty());
        assert_eq!(blocks[1].adds, vec![3]);
    }

    #[test]
    fn pairing_is_positional_not_content_based() {
        // Identical content at mismatched ranks must not attract pairing.
        let hunk = hunk_of("-same\n-other\n+other\n+same\n");
        let pairing = pair(&hunk);
        assert_eq!(pairing.get(&1), Some(&3));
        assert_eq!(pairing.get(&2), Some(&4));
    }

    #[test]
    fn interleaved_changes_form_one_block() {
        let hunk = hunk_of("-a\n+b\n-c\n+d\n");
        let blocks = change_blocks(&hunk);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].dels, vec![1, 3]);
        assert_eq!(blocks[0].adds, vec![2, 4]);
    }
}
