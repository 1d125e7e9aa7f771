use crate::models::pool::ListRow;
use std::time::Duration;
use thiserror::Error;

/// Failures produced while decoding `zpool status` / `zpool list` text.
///
/// Unrecognised state or kind tokens are not errors: they fall back to
/// `DeviceState::Unavail` / `DeviceKind::Block`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("section `{key}` not found in report")]
    SectionNotFound { key: String },

    #[error("malformed line {line:?}: expected {expected}, found {found}")]
    MalformedLine {
        line:     String,
        expected: &'static str,
        found:    usize,
    },

    #[error("cannot parse {field} from {value:?}")]
    NumericParseFailure { field: &'static str, value: String },
}

impl ParseError {
    pub fn malformed(line: &str, expected: &'static str, found: usize) -> Self {
        ParseError::MalformedLine { line: line.to_string(), expected, found }
    }

    pub fn numeric(field: &'static str, value: &str) -> Self {
        ParseError::NumericParseFailure { field, value: value.to_string() }
    }
}

/// A tabular row that failed to decode, with enough context to find it again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("list row {index} ({row:?}): {source}")]
pub struct ListError {
    pub index:  usize,
    pub row:    String,
    #[source]
    pub source: ParseError,
}

/// Failure of the external `zpool` invocation.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source:  std::io::Error,
    },

    #[error("`{command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("`{command}` exited with {status}: {stderr}")]
    Failed {
        command: String,
        status:  String,
        stderr:  String,
    },

    #[error("{0}")]
    Other(String),
}

/// First failure of a batch hydration; later rows are not reported.
/// Carries the list row that could not be hydrated.
#[derive(Debug, Error)]
pub enum HydrateError {
    #[error("row {index} (pool {}): {source}", .row.name)]
    Fetch {
        index:  usize,
        row:    Box<ListRow>,
        #[source]
        source: FetchError,
    },

    #[error("row {index} (pool {}): {source}", .row.name)]
    Parse {
        index:  usize,
        row:    Box<ListRow>,
        #[source]
        source: ParseError,
    },
}

impl HydrateError {
    pub fn index(&self) -> usize {
        match self {
            HydrateError::Fetch { index, .. } | HydrateError::Parse { index, .. } => *index,
        }
    }

    pub fn row(&self) -> &ListRow {
        match self {
            HydrateError::Fetch { row, .. } | HydrateError::Parse { row, .. } => &**row,
        }
    }

    pub fn pool(&self) -> &str {
        &self.row().name
    }
}
