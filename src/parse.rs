//! Parse `file:hunk/lines` selection references.
//!
//! This is the CLI's way of naming hunk body lines without an interactive
//! row selection:
//!
//! ```text
//! src/main.rs:1/4        # hunk 1, body line 4
//! src/main.rs:2/4..6     # hunk 2, body lines 4 through 6
//! src/main.rs:2/4..6,9   # hunk 2, lines 4-6 and line 9
//! ```
//!
//! Hunk numbers and line indices are both 1-based; line indices count every
//! body line of the hunk (context included) in diff order.

use error_set::error_set;
use std::collections::BTreeSet;
use std::num::NonZeroUsize;

error_set! {
    /// Errors from parsing file:hunk/lines syntax
    RefParseError := {
        /// Input string does not contain a colon separator
        #[display("Invalid format '{input}': expected 'file:hunk/lines'")]
        InvalidFormat { input: String },
        /// File name portion before the colon is empty or whitespace
        #[display("Invalid format '{input}': file name cannot be empty")]
        EmptyFileName { input: String },
        /// Selector lacks the hunk-number/lines separator
        #[display("Invalid selector '{selector}': expected 'hunk/lines'")]
        MissingHunkNumber { selector: String },
        /// Hunk number could not be parsed as a non-zero integer
        #[display("Invalid hunk number '{value}'")]
        InvalidHunkNumber { value: String },
        /// No line references provided after the hunk number
        #[display("No line references provided")]
        EmptyRefs,
        /// Line index could not be parsed as a non-zero integer
        #[display("Invalid line index '{value}'")]
        InvalidLineIndex { value: String },
        /// Range has start greater than end
        #[display("Invalid range {start}..{end}: start must be <= end")]
        InvalidRange { start: usize, end: usize },
    }
}

/// An inclusive range of hunk body line indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: NonZeroUsize,
    pub end: NonZeroUsize,
}

/// Parsed selection reference: one file, one hunk, one or more line ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRef {
    /// The file path as it appears in the diff
    pub file: String,
    /// 1-based hunk number within the file's diff
    pub hunk: NonZeroUsize,
    /// The body line ranges selected within that hunk
    pub ranges: Vec<LineRange>,
}

impl SelectionRef {
    /// Flatten the ranges into the set of selected body line indices.
    pub fn line_indices(&self) -> BTreeSet<usize> {
        self.ranges
            .iter()
            .flat_map(|range| range.start.get()..=range.end.get())
            .collect()
    }
}

/// Parse a `file:hunk/lines` string into structured data.
///
/// # Errors
///
/// Returns [`RefParseError`] if:
/// - Input doesn't contain `:` or the selector doesn't contain `/`
/// - File name is empty or whitespace
/// - No line references provided
/// - Hunk number or line indices are not positive integers
pub fn parse_selection_ref(input: &str) -> Result<SelectionRef, RefParseError> {
    let Some((file, selector)) = input.rsplit_once(':') else {
        return Err(RefParseError::InvalidFormat {
            input: input.to_string(),
        });
    };

    let file = file.trim();
    if file.is_empty() {
        return Err(RefParseError::EmptyFileName {
            input: input.to_string(),
        });
    }

    let Some((hunk, refs)) = selector.split_once('/') else {
        return Err(RefParseError::MissingHunkNumber {
            selector: selector.to_string(),
        });
    };
    let hunk = hunk
        .trim()
        .parse::<NonZeroUsize>()
        .map_err(|_| RefParseError::InvalidHunkNumber {
            value: hunk.trim().to_string(),
        })?;

    Ok(SelectionRef {
        file: file.to_string(),
        hunk,
        ranges: parse_ranges(refs)?,
    })
}

/// Parse the line references part (after the slash).
/// Examples: "4", "4..6", "4..6,9"
fn parse_ranges(input: &str) -> Result<Vec<LineRange>, RefParseError> {
    let ranges: Vec<LineRange> = input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_single_range)
        .collect::<Result<Vec<_>, _>>()?;

    if ranges.is_empty() {
        return Err(RefParseError::EmptyRefs);
    }

    Ok(ranges)
}

fn parse_single_range(input: &str) -> Result<LineRange, RefParseError> {
    if let Some((start, end)) = input.split_once("..") {
        let start = parse_index(start)?;
        let end = parse_index(end)?;
        if start > end {
            return Err(RefParseError::InvalidRange {
                start: start.get(),
                end: end.get(),
            });
        }
        Ok(LineRange { start, end })
    } else {
        let index = parse_index(input)?;
        Ok(LineRange {
            start: index,
            end: index,
        })
    }
}

fn parse_index(input: &str) -> Result<NonZeroUsize, RefParseError> {
    input
        .parse::<NonZeroUsize>()
        .map_err(|_| RefParseError::InvalidLineIndex {
            value: input.to_string(),
        })
}
