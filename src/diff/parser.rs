//! Unified-diff text parser.
//!
//! Consumes the output of `git diff` (including extended headers: mode
//! changes, renames, binary notices) and produces an ordered [`FileDiff`]
//! model. Parsing never fails: malformed input is skipped following a
//! defined recovery policy rather than corrupting later well-formed entries.

use super::file::{FileDiff, ModeChange};
use super::hunk::{self, Hunk};
use super::line::{DiffLine, LineKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SeekFileHeader,
    InFileHeader,
    InHunkBody,
    /// A hunk header failed to parse: drop body lines until the next
    /// recognized file or hunk header.
    Recovering,
}

/// Parse raw unified-diff text into file diffs.
///
/// Best-effort: empty input yields an empty vec, malformed hunk headers
/// drop the hunk (header and body) until the next recognized header, and
/// combined/merge diffs (`diff --cc`, `diff --combined`) are rejected as
/// unsupported by skipping the whole file entry.
pub fn parse(text: &str) -> Vec<FileDiff> {
    let mut parser = Parser::new();
    for line in text.lines() {
        parser.feed(line);
    }
    parser.finish()
}

struct Parser {
    files: Vec<FileDiff>,
    current: Option<FileDiff>,
    hunk: Option<Hunk>,
    state: State,
    // Running file line counters while in a hunk body.
    old_no: u32,
    new_no: u32,
}

impl Parser {
    fn new() -> Self {
        Parser {
            files: Vec::new(),
            current: None,
            hunk: None,
            state: State::SeekFileHeader,
            old_no: 0,
            new_no: 0,
        }
    }

    fn feed(&mut self, line: &str) {
        if let Some(rest) = line.strip_prefix("diff ") {
            self.finish_file();
            if rest.starts_with("--cc") || rest.starts_with("--combined") {
                // Combined diffs are unsupported; skip the entire entry.
                self.state = State::SeekFileHeader;
                return;
            }
            let mut file = FileDiff::new();
            if let Some((old, new)) = parse_git_header(rest) {
                file.old_path = old;
                file.new_path = new;
            }
            self.current = Some(file);
            self.state = State::InFileHeader;
            return;
        }

        match self.state {
            State::SeekFileHeader => {}
            State::InFileHeader => self.feed_header_line(line),
            State::InHunkBody => self.feed_body_line(line),
            State::Recovering => {
                if line.starts_with("@@ ") {
                    self.start_hunk(line);
                }
            }
        }
    }

    fn feed_header_line(&mut self, line: &str) {
        if line.starts_with("@@ ") {
            self.start_hunk(line);
            return;
        }
        let Some(file) = self.current.as_mut() else {
            return;
        };
        if let Some(path) = line.strip_prefix("--- ") {
            file.old_path = strip_prefix_dir(path, "a/");
        } else if let Some(path) = line.strip_prefix("+++ ") {
            file.new_path = strip_prefix_dir(path, "b/");
        } else if line.starts_with("new file mode ") {
            file.old_path = "/dev/null".to_string();
        } else if line.starts_with("deleted file mode ") {
            file.new_path = "/dev/null".to_string();
        } else if let Some(mode) = line.strip_prefix("old mode ") {
            let new = file
                .mode_change
                .take()
                .map(|m| m.new)
                .unwrap_or_default();
            file.mode_change = Some(ModeChange {
                old: mode.to_string(),
                new,
            });
        } else if let Some(mode) = line.strip_prefix("new mode ") {
            let old = file
                .mode_change
                .take()
                .map(|m| m.old)
                .unwrap_or_default();
            file.mode_change = Some(ModeChange {
                old,
                new: mode.to_string(),
            });
        } else if let Some(path) = line.strip_prefix("rename from ") {
            file.old_path = path.to_string();
        } else if let Some(path) = line.strip_prefix("rename to ") {
            file.new_path = path.to_string();
        } else if line.starts_with("Binary files ") && line.ends_with(" differ") {
            file.is_binary = true;
        }
        // `index`, `similarity index`, and friends carry nothing we model.
    }

    fn feed_body_line(&mut self, line: &str) {
        if line.starts_with("@@ ") {
            self.start_hunk(line);
            return;
        }
        let Some(hunk) = self.hunk.as_mut() else {
            return;
        };
        let kind = match line.as_bytes().first() {
            Some(b' ') => LineKind::Context,
            Some(b'+') => LineKind::Add,
            Some(b'-') => LineKind::Del,
            Some(b'\\') => {
                // `\ No newline at end of file` belongs to the previous line.
                if let Some(last) = hunk.lines.last_mut() {
                    last.missing_newline = true;
                }
                return;
            }
            _ => return,
        };
        let (old_line, new_line) = match kind {
            LineKind::Context => {
                let pair = (Some(self.old_no), Some(self.new_no));
                self.old_no += 1;
                self.new_no += 1;
                pair
            }
            LineKind::Add => {
                let pair = (None, Some(self.new_no));
                self.new_no += 1;
                pair
            }
            LineKind::Del => {
                let pair = (Some(self.old_no), None);
                self.old_no += 1;
                pair
            }
        };
        hunk.lines.push(DiffLine {
            kind,
            raw: line.to_string(),
            index: hunk.lines.len() + 1,
            old_line,
            new_line,
            missing_newline: false,
        });
    }

    fn start_hunk(&mut self, line: &str) {
        self.finish_hunk();
        match hunk::parse_header(line) {
            Some((old_start, old_count, new_start, new_count)) => {
                self.old_no = old_start;
                self.new_no = new_start;
                self.hunk = Some(Hunk {
                    header: line.to_string(),
                    old_start,
                    old_count,
                    new_start,
                    new_count,
                    lines: Vec::new(),
                });
                self.state = State::InHunkBody;
            }
            None => self.state = State::Recovering,
        }
    }

    fn finish_hunk(&mut self) {
        if let (Some(hunk), Some(file)) = (self.hunk.take(), self.current.as_mut()) {
            file.hunks.push(hunk);
        }
    }

    fn finish_file(&mut self) {
        self.finish_hunk();
        if let Some(file) = self.current.take() {
            // A file entry with no usable identity is dropped.
            if !file.old_path.is_empty() || !file.new_path.is_empty() {
                self.files.push(file);
            }
        }
    }

    fn finish(mut self) -> Vec<FileDiff> {
        self.finish_file();
        self.files
    }
}

/// Extract `(old, new)` paths from the tail of a `diff --git a/X b/Y` line.
fn parse_git_header(rest: &str) -> Option<(String, String)> {
    let rest = rest.strip_prefix("--git a/")?;
    let (old, new) = rest.split_once(" b/")?;
    Some((old.to_string(), new.to_string()))
}

fn strip_prefix_dir(path: &str, prefix: &str) -> String {
    if path == "/dev/null" {
        return path.to_string();
    }
    path.strip_prefix(prefix).unwrap_or(path).to_string()
}
