//! `zpool list -Hp` rows and their hydration into full [`PoolStatus`] records.

use crate::error::{FetchError, HydrateError, ListError, ParseError};
use crate::models::pool::{ListRow, PoolStatus};
use crate::parse::status::parse_status;
use serde::{Deserialize, Serialize};

/// Column order requested from `zpool list -o`.
pub const LIST_COLUMNS: &str = "name,size,allocated,free,fragmentation,capacity,dedupratio,health,altroot";

const FIELD_COUNT: usize = 9;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListOptions {
    /// Fill `capacity_percent` from the dedup-ratio column as well as
    /// `dedup_ratio`. Off: `capacity_percent` comes from the capacity column.
    pub capacity_from_dedup: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self { capacity_from_dedup: true }
    }
}

/// Decode one row. Runs of whitespace separate fields; exactly nine are required.
pub fn decode_row(line: &str, opts: &ListOptions) -> Result<ListRow, ParseError> {
    let f: Vec<&str> = line.split_whitespace().collect();
    if f.len() != FIELD_COUNT {
        return Err(ParseError::malformed(line, "9 fields", f.len()));
    }

    let capacity = parse_f64("capacity", f[5])?;
    let dedup    = parse_f64("dedup ratio", f[6])?;

    Ok(ListRow {
        name:                  f[0].to_string(),
        size:                  parse_u64("size", f[1])?,
        allocated:             parse_u64("allocated", f[2])?,
        free:                  parse_u64("free", f[3])?,
        fragmentation_percent: parse_f64("fragmentation", f[4])?,
        capacity_percent:      if opts.capacity_from_dedup { dedup } else { capacity },
        dedup_ratio:           dedup,
        health:                f[7].to_string(),
        alt_root:              f[8].to_string(),
    })
}

/// Decode every non-blank row; each row succeeds or fails on its own.
/// Indices count non-blank rows from 0.
pub fn decode_list(text: &str, opts: &ListOptions) -> Vec<Result<ListRow, ListError>> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .enumerate()
        .map(|(index, row)| {
            decode_row(row, opts).map_err(|source| ListError { index, row: row.to_string(), source })
        })
        .collect()
}

/// Like [`decode_list`] but stops at the first bad row.
pub fn decode_list_strict(text: &str, opts: &ListOptions) -> Result<Vec<ListRow>, ListError> {
    decode_list(text, opts).into_iter().collect()
}

/// Summary figures from `row` laid over a full status report for the same pool.
pub fn hydrate(row: &ListRow, mut status: PoolStatus) -> PoolStatus {
    if status.name != row.name {
        log::warn!("hydrating pool {} with status for {}", row.name, status.name);
    }
    status.apply_summary(row);
    status
}

/// Where full status reports come from. Implemented by the `zpool` command
/// collector; tests supply canned text.
pub trait StatusSource: Sync {
    fn fetch_status(&self, pool: &str) -> Result<String, FetchError>;
}

/// Fetch, parse and hydrate one row.
pub fn hydrate_row<S: StatusSource + ?Sized>(
    index:  usize,
    row:    &ListRow,
    source: &S,
) -> Result<PoolStatus, HydrateError> {
    let text = source.fetch_status(&row.name).map_err(|source| HydrateError::Fetch {
        index,
        row: Box::new(row.clone()),
        source,
    })?;
    let status = parse_status(&text).map_err(|source| HydrateError::Parse {
        index,
        row: Box::new(row.clone()),
        source,
    })?;
    Ok(hydrate(row, status))
}

/// Hydrate a batch with at most `max_concurrency` fetches in flight.
///
/// Results keep input order. The first failing row (lowest index) is
/// returned and no further batches are started.
pub fn hydrate_all<S: StatusSource + ?Sized>(
    rows:            &[ListRow],
    source:          &S,
    max_concurrency: usize,
) -> Result<Vec<PoolStatus>, HydrateError> {
    let width = max_concurrency.max(1);
    let mut out = Vec::with_capacity(rows.len());

    for (batch, chunk) in rows.chunks(width).enumerate() {
        let base = batch * width;
        let results: Vec<Result<PoolStatus, HydrateError>> = if chunk.len() == 1 {
            vec![hydrate_row(base, &chunk[0], source)]
        } else {
            std::thread::scope(|scope| {
                let handles: Vec<_> = chunk
                    .iter()
                    .enumerate()
                    .map(|(i, row)| scope.spawn(move || hydrate_row(base + i, row, source)))
                    .collect();
                handles
                    .into_iter()
                    .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                    .collect()
            })
        };

        for result in results {
            out.push(result?);
        }
    }

    Ok(out)
}

fn parse_u64(field: &'static str, value: &str) -> Result<u64, ParseError> {
    value.parse().map_err(|_| ParseError::numeric(field, value))
}

fn parse_f64(field: &'static str, value: &str) -> Result<f64, ParseError> {
    value.parse().map_err(|_| ParseError::numeric(field, value))
}
