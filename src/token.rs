//! Word-level inline diff between the two sides of a change block.
//!
//! Tokens are runs of whitespace, runs of word characters, or single other
//! characters. Tokens whose text occurs exactly once on each side anchor the
//! alignment; matches extend greedily outward from anchors through adjacent
//! equal tokens. The result is heuristic (not optimal LCS) but stable, and it
//! only drives highlighting, never patch content.

use std::collections::HashMap;

/// Highlight classification for a span of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// Present on both sides.
    Equal,
    /// Present only on the new side.
    Insert,
    /// Present only on the old side.
    Delete,
    /// Trailing whitespace inside an insertion; flagged separately so the
    /// presentation layer can call it out.
    TrailingWhitespace,
}

/// A contiguous run of text under a single mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub mark: Mark,
    pub text: String,
}

/// Text annotated with highlight marks. Concatenating the segment texts
/// reproduces the input exactly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkedText {
    pub segments: Vec<Segment>,
}

impl MarkedText {
    fn push(&mut self, mark: Mark, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.segments.last_mut() {
            if last.mark == mark {
                last.text.push_str(text);
                return;
            }
        }
        self.segments.push(Segment {
            mark,
            text: text.to_string(),
        });
    }

    /// Split on newlines into one `MarkedText` per line, marks preserved.
    /// The newline characters themselves are not carried into any line.
    pub fn split_lines(&self) -> Vec<MarkedText> {
        let mut lines = vec![MarkedText::default()];
        for segment in &self.segments {
            let mut first = true;
            for piece in segment.text.split('\n') {
                if !first {
                    lines.push(MarkedText::default());
                }
                first = false;
                if let Some(line) = lines.last_mut() {
                    line.push(segment.mark, piece);
                }
            }
        }
        lines
    }

    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Inline diff of one change block: the old side, the new side, and a
/// combined sequence with deletions and insertions interleaved in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDiff {
    pub combined: MarkedText,
    pub old_marked: MarkedText,
    pub new_marked: MarkedText,
}

/// Split text into highlight tokens: a run of whitespace, a run of word
/// characters, or a single other character.
pub fn tokenize(text: &str) -> Vec<&str> {
    #[derive(PartialEq)]
    enum Class {
        Word,
        Space,
        Other,
    }
    fn class_of(c: char) -> Class {
        if c.is_alphanumeric() || c == '_' {
            Class::Word
        } else if c.is_whitespace() {
            Class::Space
        } else {
            Class::Other
        }
    }

    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current: Option<Class> = None;
    for (pos, c) in text.char_indices() {
        let class = class_of(c);
        let extends = matches!(
            (&current, &class),
            (Some(Class::Word), Class::Word) | (Some(Class::Space), Class::Space)
        );
        if !extends {
            if current.is_some() {
                tokens.push(&text[start..pos]);
            }
            start = pos;
        }
        current = Some(class);
    }
    if current.is_some() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Word-level diff of two texts. Never fails: with no common tokens the
/// result degrades to "old entirely deleted, new entirely inserted".
pub fn diff_tokens(old_text: &str, new_text: &str) -> TokenDiff {
    let old_toks = tokenize(old_text);
    let new_toks = tokenize(new_text);

    // link[i] on one side holds the matched index on the other side.
    let mut old_link: Vec<Option<usize>> = vec![None; old_toks.len()];
    let mut new_link: Vec<Option<usize>> = vec![None; new_toks.len()];

    // Anchor on tokens unique to both sides.
    let mut old_seen: HashMap<&str, (usize, usize)> = HashMap::new();
    for (i, &tok) in old_toks.iter().enumerate() {
        let entry = old_seen.entry(tok).or_insert((0, i));
        entry.0 += 1;
        entry.1 = i;
    }
    let mut new_seen: HashMap<&str, (usize, usize)> = HashMap::new();
    for (j, &tok) in new_toks.iter().enumerate() {
        let entry = new_seen.entry(tok).or_insert((0, j));
        entry.0 += 1;
        entry.1 = j;
    }
    for (tok, &(old_count, i)) in &old_seen {
        if old_count == 1 {
            if let Some(&(1, j)) = new_seen.get(tok) {
                old_link[i] = Some(j);
                new_link[j] = Some(i);
            }
        }
    }

    // Extend matches forward through adjacent equal tokens.
    for i in 0..old_toks.len() {
        if let Some(j) = old_link[i] {
            let (ni, nj) = (i + 1, j + 1);
            if ni < old_toks.len()
                && nj < new_toks.len()
                && old_link[ni].is_none()
                && new_link[nj].is_none()
                && old_toks[ni] == new_toks[nj]
            {
                old_link[ni] = Some(nj);
                new_link[nj] = Some(ni);
            }
        }
    }
    // And backward.
    for i in (1..old_toks.len()).rev() {
        if let Some(j) = old_link[i] {
            if j > 0 {
                let (pi, pj) = (i - 1, j - 1);
                if old_link[pi].is_none()
                    && new_link[pj].is_none()
                    && old_toks[pi] == new_toks[pj]
                {
                    old_link[pi] = Some(pj);
                    new_link[pj] = Some(pi);
                }
            }
        }
    }

    let mut old_marked = MarkedText::default();
    for (i, tok) in old_toks.iter().enumerate() {
        let mark = if old_link[i].is_some() {
            Mark::Equal
        } else {
            Mark::Delete
        };
        old_marked.push(mark, tok);
    }

    let mut new_marked = MarkedText::default();
    for (j, tok) in new_toks.iter().enumerate() {
        let mark = if new_link[j].is_some() {
            Mark::Equal
        } else {
            Mark::Insert
        };
        new_marked.push(mark, tok);
    }

    // Combined view: walk the new side, flushing unmatched old tokens as
    // deletions ahead of each matched token.
    let mut combined = MarkedText::default();
    let mut old_cursor = 0;
    for (j, tok) in new_toks.iter().enumerate() {
        match new_link[j] {
            Some(i) if i >= old_cursor => {
                for old_tok in &old_toks[old_cursor..i] {
                    combined.push(Mark::Delete, old_tok);
                }
                old_cursor = i + 1;
                combined.push(Mark::Equal, tok);
            }
            // A crossed match; its counterpart was already flushed.
            Some(_) => combined.push(Mark::Equal, tok),
            None => combined.push(Mark::Insert, tok),
        }
    }
    for old_tok in &old_toks[old_cursor..] {
        combined.push(Mark::Delete, old_tok);
    }

    mark_trailing_whitespace(&mut new_marked);
    mark_trailing_whitespace(&mut combined);

    TokenDiff {
        combined,
        old_marked,
        new_marked,
    }
}

/// Re-mark the trailing-whitespace portion of insertions: whitespace runs
/// that sit at the end of a line (or of the whole text).
fn mark_trailing_whitespace(marked: &mut MarkedText) {
    let full = marked.text();
    let trailing = trailing_ws_ranges(&full);
    if trailing.is_empty() {
        return;
    }

    let mut out = MarkedText::default();
    let mut offset = 0;
    for segment in &marked.segments {
        let end = offset + segment.text.len();
        if segment.mark != Mark::Insert {
            out.push(segment.mark, &segment.text);
            offset = end;
            continue;
        }
        let mut pos = offset;
        for &(ws_start, ws_end) in &trailing {
            if ws_end <= offset || ws_start >= end {
                continue;
            }
            let overlap_start = ws_start.max(offset);
            let overlap_end = ws_end.min(end);
            out.push(Mark::Insert, &full[pos..overlap_start]);
            out.push(Mark::TrailingWhitespace, &full[overlap_start..overlap_end]);
            pos = overlap_end;
        }
        out.push(Mark::Insert, &full[pos..end]);
        offset = end;
    }
    *marked = out;
}

/// Byte ranges of whitespace runs immediately preceding a newline or the end
/// of the text.
fn trailing_ws_ranges(text: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    for (line_start, line) in line_spans(text) {
        let trimmed = line.trim_end_matches([' ', '\t']);
        if trimmed.len() < line.len() {
            ranges.push((line_start + trimmed.len(), line_start + line.len()));
        }
    }
    ranges
}

fn line_spans(text: &str) -> Vec<(usize, &str)> {
    let mut spans = Vec::new();
    let mut start = 0;
    for (pos, c) in text.char_indices() {
        if c == '\n' {
            spans.push((start, &text[start..pos]));
            start = pos + 1;
        }
    }
    spans.push((start, &text[start..]));
    spans
}
