//! Interactive unified-diff engine: parse diff text into a structured model,
//! render side-by-side rows with word-level highlights, and synthesize
//! partial patches that stage, unstage, or discard a selected subset of a
//! hunk's lines.
//!
//! The core (`diff`, `pair`, `token`, `render`, `select`, `patch`, `split`)
//! is pure and does no I/O; [`DiffStage`] is the git boundary that feeds it
//! diff text and applies the patches it produces.

use error_set::error_set;
use std::process::Command;

pub mod diff;
pub mod pair;
pub mod parse;
pub mod patch;
pub mod render;
pub mod select;
pub mod split;
pub mod token;

pub use diff::{DiffLine, FileDiff, Hunk, LineKind, ModeChange};
pub use parse::{RefParseError, SelectionRef};
pub use patch::{Direction, Patch, PatchError};
pub use render::{Row, RowCell};
pub use select::Selection;
pub use split::SplitError;
pub use token::{Mark, MarkedText, Segment};

error_set! {
    /// Top-level error for diffstage operations
    DiffStageError := {
        #[display("No changes found in {file}")]
        NoChanges { file: String },
        #[display("{file} has {available} hunk(s), no hunk {hunk}")]
        NoSuchHunk {
            file: String,
            hunk: usize,
            available: usize,
        },
        RefParseError(RefParseError),
        PatchError(PatchError),
        SplitError(SplitError),
    } || GitCommandError

    /// Errors from git command execution
    GitCommandError := {
        #[display("Failed to run git diff: {message}")]
        DiffFailed { message: String },
        #[display("git diff failed: {stderr}")]
        DiffExitError { stderr: String },
        #[display("Invalid UTF-8 in git diff output: {message}")]
        InvalidUtf8 { message: String },
        #[display("Failed to spawn git apply: {message}")]
        ApplySpawnFailed { message: String },
        #[display("Failed to get stdin handle for git apply")]
        ApplyStdinFailed,
        #[display("Failed to write patch to git apply: {message}")]
        ApplyWriteFailed { message: String },
        #[display("Failed to wait for git apply: {message}")]
        ApplyWaitFailed { message: String },
        #[display("git apply failed: {stderr}")]
        ApplyExitError { stderr: String },
    }
}

/// Main interface for diffstage operations against a git repository
pub struct DiffStage<'a> {
    repo_path: &'a str,
    context_lines: Option<u32>,
}

impl<'a> DiffStage<'a> {
    /// Create a new DiffStage for the given repository path
    pub fn new(repo_path: &'a str) -> Self {
        Self {
            repo_path,
            context_lines: None,
        }
    }

    /// Override the diff context width (`-U<n>`); git's default otherwise.
    pub fn context_lines(mut self, lines: u32) -> Self {
        self.context_lines = Some(lines);
        self
    }

    /// Parse the current diff into the structured model.
    ///
    /// `staged` selects the index-vs-HEAD diff instead of the worktree one.
    ///
    /// # Examples
    /// ```no_run
    /// # use diffstage::DiffStage;
    /// let stage = DiffStage::new(".");
    /// let files = stage.diff(&[], false).unwrap();
    /// let staged = stage.diff(&["src/main.rs".to_string()], true).unwrap();
    /// ```
    pub fn diff(&self, files: &[String], staged: bool) -> Result<Vec<FileDiff>, DiffStageError> {
        Ok(diff::parse(&self.raw_diff(files, staged)?))
    }

    /// Stage the referenced lines into the index.
    ///
    /// # Examples
    /// ```no_run
    /// # use diffstage::DiffStage;
    /// let stage = DiffStage::new(".");
    /// stage.stage("src/main.rs:1/2..4").unwrap();
    /// ```
    pub fn stage(&self, file_ref: &str) -> Result<(), DiffStageError> {
        let selection = parse::parse_selection_ref(file_ref)?;
        let (file, hunk) = self.lookup(&selection, false)?;
        let patch = patch::synthesize(&hunk, &selection.line_indices(), Direction::Stage)?;
        Ok(self.apply_patch(&format!("{}{patch}", file.patch_header()), true, false)?)
    }

    /// Remove the referenced lines from the index, leaving the worktree
    /// untouched. The patch is built in index order and applied in reverse.
    pub fn unstage(&self, file_ref: &str) -> Result<(), DiffStageError> {
        let selection = parse::parse_selection_ref(file_ref)?;
        let (file, hunk) = self.lookup(&selection, true)?;
        let patch = patch::synthesize(&hunk, &selection.line_indices(), Direction::Unstage)?;
        Ok(self.apply_patch(&format!("{}{patch}", file.patch_header()), true, true)?)
    }

    /// Throw away the referenced worktree changes.
    ///
    /// Reverse-applying to the worktree means the patch's new side must
    /// match the worktree, so unselected lines convert the same way as for
    /// unstaging.
    pub fn discard(&self, file_ref: &str) -> Result<(), DiffStageError> {
        let selection = parse::parse_selection_ref(file_ref)?;
        let (file, hunk) = self.lookup(&selection, false)?;
        let patch = patch::synthesize(&hunk, &selection.line_indices(), Direction::Unstage)?;
        Ok(self.apply_patch(&format!("{}{patch}", file.patch_header()), false, true)?)
    }

    /// Split the referenced hunk at a context line and return the halves.
    ///
    /// The reference names a single body line, e.g. `src/main.rs:2/5`.
    pub fn split_hunk(&self, file_ref: &str) -> Result<Vec<Hunk>, DiffStageError> {
        let selection = parse::parse_selection_ref(file_ref)?;
        let (_, hunk) = self.lookup(&selection, false)?;
        let at = selection.ranges[0].start.get();
        Ok(split::split(&hunk, at)?)
    }

    /// Resolve a selection reference to its file and hunk in the current
    /// diff.
    fn lookup(
        &self,
        selection: &SelectionRef,
        staged: bool,
    ) -> Result<(FileDiff, Hunk), DiffStageError> {
        let files = self.diff(std::slice::from_ref(&selection.file), staged)?;
        let file = files
            .into_iter()
            .find(|f| f.new_path == selection.file || f.old_path == selection.file)
            .ok_or_else(|| DiffStageError::NoChanges {
                file: selection.file.clone(),
            })?;
        let available = file.hunks.len();
        let Some(hunk) = file.hunks.get(selection.hunk.get() - 1).cloned() else {
            return Err(DiffStageError::NoSuchHunk {
                file: selection.file.clone(),
                hunk: selection.hunk.get(),
                available,
            });
        };
        Ok((file, hunk))
    }

    /// Get raw git diff output
    fn raw_diff(&self, files: &[String], staged: bool) -> Result<String, GitCommandError> {
        let mut args: Vec<String> = ["-C", self.repo_path, "diff", "--no-ext-diff", "--no-color"]
            .map(String::from)
            .into();
        if let Some(lines) = self.context_lines {
            args.push(format!("-U{lines}"));
        }
        if staged {
            args.push("--cached".to_string());
        }
        if !files.is_empty() {
            args.push("--".to_string());
            args.extend(files.iter().cloned());
        }

        let output =
            Command::new("git")
                .args(&args)
                .output()
                .map_err(|e| GitCommandError::DiffFailed {
                    message: e.to_string(),
                })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitCommandError::DiffExitError {
                stderr: stderr.into_owned(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| GitCommandError::InvalidUtf8 {
            message: e.to_string(),
        })
    }

    /// Pipe a patch through `git apply`
    fn apply_patch(
        &self,
        patch: &str,
        cached: bool,
        reverse: bool,
    ) -> Result<(), GitCommandError> {
        use std::io::Write;

        let mut args = vec!["-C", self.repo_path, "apply", "--unidiff-zero"];
        if cached {
            args.push("--cached");
        }
        if reverse {
            args.push("--reverse");
        }
        args.push("-");

        let mut child = Command::new("git")
            .args(&args)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .map_err(|e| GitCommandError::ApplySpawnFailed {
                message: e.to_string(),
            })?;

        child
            .stdin
            .take()
            .ok_or(GitCommandError::ApplyStdinFailed)?
            .write_all(patch.as_bytes())
            .map_err(|e| GitCommandError::ApplyWriteFailed {
                message: e.to_string(),
            })?;

        let output = child
            .wait_with_output()
            .map_err(|e| GitCommandError::ApplyWaitFailed {
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitCommandError::ApplyExitError {
                stderr: stderr.into_owned(),
            });
        }

        Ok(())
    }
}
