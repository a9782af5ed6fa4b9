//! Structured model of unified diff text.

pub mod file;
pub mod hunk;
pub mod line;
pub mod parser;

pub use file::{FileDiff, ModeChange};
pub use hunk::Hunk;
pub use line::{DiffLine, LineKind};
pub use parser::parse;
