//! Field extraction for the `key: value` preamble of a `zpool status` report.
//!
//! A field starts at a header line (`  pool: tank`, `config:`, or a bare
//! `spares` line) and runs over every following line whose first
//! `key.len()` columns are blank. Blank lines only belong to the field when
//! another continuation line follows them.

use crate::error::ParseError;

/// Field value, or `SectionNotFound` when no header line names `key`.
pub fn extract(report: &str, key: &str, keep_newlines: bool) -> Result<String, ParseError> {
    find_field(report, key, keep_newlines)
        .ok_or_else(|| ParseError::SectionNotFound { key: key.to_string() })
}

/// Like [`extract`] but treats a missing field as absent rather than an error.
pub fn find_field(report: &str, key: &str, keep_newlines: bool) -> Option<String> {
    let mut lines = report.lines();
    let first = lines.by_ref().find_map(|line| header_value(line, key))?;

    let mut parts: Vec<&str> = vec![first];
    let mut pending_blank = 0usize;

    for line in lines {
        if line.trim().is_empty() {
            pending_blank += 1;
            continue;
        }
        let Some(body) = continuation(line, key.len()) else { break };
        if keep_newlines {
            parts.extend(std::iter::repeat("").take(pending_blank));
        }
        pending_blank = 0;
        parts.push(body);
    }

    let value = if keep_newlines {
        parts.join("\n")
    } else {
        parts.iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    };
    Some(value)
}

/// Cut a multi-pool dump into one slice per `pool:` header. Text before the
/// first header is dropped.
pub fn split_reports(text: &str) -> Vec<&str> {
    let mut starts = Vec::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        // A pool header always carries a name; a bare `pool` line does not count.
        if header_value(line.trim_end(), "pool").is_some_and(|v| !v.trim().is_empty()) {
            starts.push(offset);
        }
        offset += line.len();
    }

    starts.iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            &text[start..end]
        })
        .collect()
}

/// Value on a header line for `key`: the text after `key:`, or `""` for a
/// bare `key` line.
fn header_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let rest = line.trim_start().strip_prefix(key)?;
    if let Some(value) = rest.strip_prefix(':') {
        return Some(value);
    }
    rest.trim().is_empty().then_some("")
}

/// Body of a continuation line, or `None` when a non-blank character shows
/// up inside the first `width` columns (i.e. the next header).
///
/// The leading `width + 1` columns (the slice under `key:`) are dropped.
/// Tabs advance to the next multiple of 8, so tab-indented config rows keep
/// their relative indentation.
fn continuation(line: &str, width: usize) -> Option<&str> {
    let mut col = 0;
    for (i, c) in line.char_indices() {
        if col > width {
            return Some(&line[i..]);
        }
        if !c.is_whitespace() {
            return (col >= width).then(|| &line[i..]);
        }
        col = next_column(col, c);
    }
    Some("")
}

pub(crate) fn next_column(col: usize, c: char) -> usize {
    if c == '\t' { (col / 8 + 1) * 8 } else { col + 1 }
}
