use super::line::{DiffLine, LineKind};
use std::fmt;

/// A single hunk from a unified diff.
///
/// `header` keeps the raw `@@ … @@` line from the source diff; the declared
/// starts and counts are parsed out of it once at parse time. `lines` is the
/// ordered hunk body with contiguous 1-based indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub header: String,
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    /// Tally the body: old side counts context + deletions, new side counts
    /// context + additions.
    pub fn tally(&self) -> (u32, u32) {
        let mut old = 0;
        let mut new = 0;
        for line in &self.lines {
            match line.kind {
                LineKind::Context => {
                    old += 1;
                    new += 1;
                }
                LineKind::Del => old += 1,
                LineKind::Add => new += 1,
            }
        }
        (old, new)
    }

    /// Whether the declared header counts agree with the actual body tally.
    pub fn counts_consistent(&self) -> bool {
        self.tally() == (self.old_count, self.new_count)
    }
}

/// Parse a hunk header of the form `@@ -a[,b] +c[,d] @@ …`.
///
/// Omitted counts default to 1 per the unified diff convention. Returns
/// `None` for anything that does not match the format exactly.
pub fn parse_header(header: &str) -> Option<(u32, u32, u32, u32)> {
    let rest = header.strip_prefix("@@ -")?;
    let end = rest.find(" @@")?;
    let (old_part, new_part) = rest[..end].split_once(" +")?;

    let (old_start, old_count) = parse_range(old_part)?;
    let (new_start, new_count) = parse_range(new_part)?;
    Some((old_start, old_count, new_start, new_count))
}

/// Parse `N` or `N,M` into (start, count), count defaulting to 1.
fn parse_range(range: &str) -> Option<(u32, u32)> {
    match range.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}

/// Format a hunk header with explicit counts, as the synthesizer emits them.
pub fn format_header(old_start: u32, old_count: u32, new_start: u32, new_count: u32) -> String {
    format!("@@ -{old_start},{old_count} +{new_start},{new_count} @@")
}

impl fmt::Display for Hunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        for line in &self.lines {
            writeln!(f, "{}", line.raw)?;
            if line.missing_newline {
                writeln!(f, "\\ No newline at end of file")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn parse_header_full_form() {
        assert_eq!(parse_header("@@ -10,2 +10,3 @@"), Some((10, 2, 10, 3)));
    }

    #[test]
    fn parse_header_omitted_counts() {
        assert_eq!(parse_header("@@ -15 +14,0 @@"), Some((15, 1, 14, 0)));
        assert_eq!(parse_header("@@ -136,0 +137 @@"), Some((136, 0, 137, 1)));
    }

    #[test]
    fn parse_header_with_function_context() {
        assert_eq!(
            parse_header("@@ -8,0 +10 @@ fn main() {"),
            Some((8, 0, 10, 1))
        );
    }

    #[test]
    fn parse_header_rejects_garbage() {
        assert_eq!(parse_header("@@ garbage @@"), None);
        assert_eq!(parse_header("@@ -a,b +c,d @@"), None);
        assert_eq!(parse_header("@@ -1,2 +1,2"), None);
        assert_eq!(parse_header("not a header"), None);
        // Combined-diff headers are not unified-diff headers.
        assert_eq!(parse_header("@@@ -1,2 -1,2 +1,3 @@@"), None);
    }

    #[test]
    fn format_header_always_explicit() {
        assert_eq!(format_header(10, 1, 10, 1), "@@ -10,1 +10,1 @@");
        assert_eq!(format_header(136, 0, 137, 2), "@@ -136,0 +137,2 @@");
    }

    fn body_line(kind: LineKind, raw: &str, index: usize) -> DiffLine {
        DiffLine {
            kind,
            raw: raw.to_string(),
            index,
            old_line: None,
            new_line: None,
            missing_newline: false,
        }
    }

    #[test]
    fn tally_counts_sides() {
        let hunk = Hunk {
            header: "@@ -1,3 +1,3 @@".to_string(),
            old_start: 1,
            old_count: 3,
            new_start: 1,
            new_count: 3,
            lines: vec![
                body_line(LineKind::Context, " a", 1),
                body_line(LineKind::Del, "-b", 2),
                body_line(LineKind::Add, "+c", 3),
                body_line(LineKind::Context, " d", 4),
            ],
        };
        assert_eq!(hunk.tally(), (3, 3));
        assert!(hunk.counts_consistent());
    }

    #[test]
    fn inconsistent_counts_detected() {
        let hunk = Hunk {
            header: "@@ -1,5 +1,5 @@".to_string(),
            old_start: 1,
            old_count: 5,
            new_start: 1,
            new_count: 5,
            lines: vec![body_line(LineKind::Context, " a", 1)],
        };
        assert!(!hunk.counts_consistent());
    }

    #[test]
    fn display_round_trips_body() {
        let hunk = Hunk {
            header: "@@ -3,1 +3,2 @@".to_string(),
            old_start: 3,
            old_count: 1,
            new_start: 3,
            new_count: 2,
            lines: vec![
                body_line(LineKind::Del, "-last line", 1),
                body_line(LineKind::Add, "+last line", 2),
                body_line(LineKind::Add, "+new final line", 3),
            ],
        };
        assert_eq!(
            hunk.to_string(),
            "@@ -3,1 +3,2 @@\n-last line\n+last line\n+new final line\n"
        );
    }

    #[test]
    fn display_emits_no_newline_marker() {
        let mut line = body_line(LineKind::Add, "+tail", 1);
        line.missing_newline = true;
        let hunk = Hunk {
            header: "@@ -0,0 +1,1 @@".to_string(),
            old_start: 0,
            old_count: 0,
            new_start: 1,
            new_count: 1,
            lines: vec![line],
        };
        assert_eq!(
            hunk.to_string(),
            "@@ -0,0 +1,1 @@\n+tail\n\\ No newline at end of file\n"
        );
    }
}
