//! Line classification between reference content and buffer text.

use std::borrow::Cow;
use std::ops::Range;

use gutter_api::{DiffHunk, DiffResult};
use similar::{Algorithm, DiffTag, TextDiff};

/// Entry point for diff generation.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiffEngine;

impl DiffEngine {
    /// Construct a new diff engine instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Classify the rows of `buffer` against `reference`.
    ///
    /// Equal-length replacements are modified rows, surplus added lines are
    /// inserted rows and surplus removed lines leave a deletion marker on the
    /// row that follows them.
    #[must_use]
    pub fn diff(&self, reference: &str, buffer: &str) -> DiffResult {
        let reference = normalize_newlines(reference);
        let buffer = normalize_newlines(buffer);
        let diff = TextDiff::configure()
            .algorithm(Algorithm::Myers)
            .diff_lines(reference.as_ref(), buffer.as_ref());

        let old_lines = diff.old_slices();
        let new_lines = diff.new_slices();
        let mut result = DiffResult {
            line_count: to_row(new_lines.len()),
            ..DiffResult::default()
        };

        for group in diff.grouped_ops(0) {
            let mut old_span: Option<Range<usize>> = None;
            let mut new_span: Option<Range<usize>> = None;

            for op in &group {
                let (tag, old, new) = op.as_tag_tuple();
                match tag {
                    DiffTag::Equal => continue,
                    DiffTag::Insert => result.inserted.extend(rows(new.clone())),
                    DiffTag::Delete => result.deleted.push(to_row(new.start)),
                    DiffTag::Replace => {
                        let common = old.len().min(new.len());
                        result
                            .modified
                            .extend(rows(new.start..new.start + common));
                        if new.len() > common {
                            result.inserted.extend(rows(new.start + common..new.end));
                        }
                        if old.len() > common {
                            result.deleted.push(to_row(new.end));
                        }
                    }
                }
                old_span = Some(extend(old_span, &old));
                new_span = Some(extend(new_span, &new));
            }

            if let (Some(old), Some(new)) = (old_span, new_span) {
                result.hunks.push(DiffHunk {
                    base_row: to_row(old.start),
                    base_lines: to_row(old.len()),
                    head_row: to_row(new.start),
                    head_lines: to_row(new.len()),
                    removed: old_lines[old].iter().map(|line| strip_eol(line)).collect(),
                    added: new_lines[new].iter().map(|line| strip_eol(line)).collect(),
                });
            }
        }

        result.deleted.dedup();
        result
    }
}

fn extend(span: Option<Range<usize>>, other: &Range<usize>) -> Range<usize> {
    match span {
        Some(span) => span.start.min(other.start)..span.end.max(other.end),
        None => other.clone(),
    }
}

fn rows(range: Range<usize>) -> impl Iterator<Item = u32> {
    range.map(to_row)
}

fn to_row(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

fn strip_eol(line: &str) -> String {
    line.trim_end_matches(['\n', '\r']).to_owned()
}

fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}
