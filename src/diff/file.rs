use super::hunk::Hunk;
use std::fmt;

/// File mode change recorded by `old mode` / `new mode` header lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeChange {
    pub old: String,
    pub new: String,
}

/// A complete diff for a single file.
///
/// `old_path` is `/dev/null` for a created file, `new_path` is `/dev/null`
/// for a deleted one. Binary entries and pure renames carry zero hunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub old_path: String,
    pub new_path: String,
    pub is_binary: bool,
    pub mode_change: Option<ModeChange>,
    pub hunks: Vec<Hunk>,
}

impl FileDiff {
    pub fn new() -> Self {
        FileDiff {
            old_path: String::new(),
            new_path: String::new(),
            is_binary: false,
            mode_change: None,
            hunks: Vec::new(),
        }
    }

    /// Display name: the surviving side, or `a renamed to b`.
    pub fn title(&self) -> String {
        if self.new_path == "/dev/null" {
            self.old_path.clone()
        } else if self.old_path == "/dev/null" || self.old_path == self.new_path {
            self.new_path.clone()
        } else {
            format!("{} renamed to {}", self.old_path, self.new_path)
        }
    }

    /// The `---`/`+++` header pair for a patch built from this file.
    pub fn patch_header(&self) -> String {
        let old = if self.old_path == "/dev/null" {
            "/dev/null".to_string()
        } else {
            format!("a/{}", self.old_path)
        };
        let new = if self.new_path == "/dev/null" {
            "/dev/null".to_string()
        } else {
            format!("b/{}", self.new_path)
        };
        format!("--- {old}\n+++ {new}\n")
    }
}

impl Default for FileDiff {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FileDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "diff --git a/{} b/{}",
            if self.old_path == "/dev/null" { &self.new_path } else { &self.old_path },
            if self.new_path == "/dev/null" { &self.old_path } else { &self.new_path },
        )?;
        if let Some(mode) = &self.mode_change {
            writeln!(f, "old mode {}", mode.old)?;
            writeln!(f, "new mode {}", mode.new)?;
        }
        if self.is_binary {
            writeln!(
                f,
                "Binary files a/{} and b/{} differ",
                self.old_path, self.new_path
            )?;
            return Ok(());
        }
        if !self.hunks.is_empty() {
            write!(f, "{}", self.patch_header())?;
            for hunk in &self.hunks {
                write!(f, "{hunk}")?;
            }
        }
        Ok(())
    }
}
