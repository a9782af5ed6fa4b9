/// Classification of a hunk body line, assigned once at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Unchanged line, present on both sides (leading space).
    Context,
    /// Added line, present only on the new side (leading `+`).
    Add,
    /// Deleted line, present only on the old side (leading `-`).
    Del,
}

/// A single line from a hunk body.
///
/// `index` is the 1-based position of the line within its hunk's body;
/// indices are contiguous and never reordered after parsing. `old_line` and
/// `new_line` carry file line numbers where the side applies (a deletion has
/// no new-side number, an addition no old-side number).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: LineKind,
    /// Full line text including the marker character.
    pub raw: String,
    pub index: usize,
    pub old_line: Option<u32>,
    pub new_line: Option<u32>,
    /// Set when the line was followed by a `\ No newline at end of file`
    /// marker in the source diff.
    pub missing_newline: bool,
}

impl DiffLine {
    /// Line text without the leading marker character.
    pub fn content(&self) -> &str {
        if self.raw.is_empty() {
            ""
        } else {
            &self.raw[1..]
        }
    }

    pub fn is_change(&self) -> bool {
        matches!(self.kind, LineKind::Add | LineKind::Del)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn line(kind: LineKind, raw: &str) -> DiffLine {
        DiffLine {
            kind,
            raw: raw.to_string(),
            index: 1,
            old_line: None,
            new_line: None,
            missing_newline: false,
        }
    }

    #[test]
    fn content_strips_marker() {
        assert_eq!(line(LineKind::Add, "+added").content(), "added");
        assert_eq!(line(LineKind::Del, "-removed").content(), "removed");
        assert_eq!(line(LineKind::Context, " same").content(), "same");
    }

    #[test]
    fn content_of_empty_raw() {
        assert_eq!(line(LineKind::Context, "").content(), "");
    }

    #[test]
    fn change_classification() {
        assert!(line(LineKind::Add, "+x").is_change());
        assert!(line(LineKind::Del, "-x").is_change());
        assert!(!line(LineKind::Context, " x").is_change());
    }
}
