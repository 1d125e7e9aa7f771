use crate::error::ParseError;
use crate::models::pool::PoolStatus;
use crate::parse::fields::{extract, find_field, split_reports};
use crate::parse::topology;

/// Parse the output of `zpool status <pool>`.
///
/// `pool` and `state` are required; every other section is optional and
/// reads as empty when missing.
pub fn parse_status(report: &str) -> Result<PoolStatus, ParseError> {
    let text = |key: &str| find_field(report, key, false).unwrap_or_default();

    let name  = extract(report, "pool", false)?;
    let state = extract(report, "state", false)?;

    // Newer releases print `scan:` where older ones printed `scrub:`.
    let scrub = find_field(report, "scrub", false)
        .or_else(|| find_field(report, "scan", false))
        .unwrap_or_default();

    let config = find_field(report, "config", true).unwrap_or_default();
    let spares = find_field(report, "spares", true);
    let topo   = topology::build(&config, spares.as_deref())?;

    let mut status = PoolStatus {
        name,
        state,
        status:  text("status"),
        action:  text("action"),
        see:     text("see"),
        scrub,
        errors:  text("errors"),
        devices: topo.devices,
        spares:  topo.spares,
        ..Default::default()
    };
    if let Some(pool) = topo.pool_line {
        status.read_errors     = pool.read_errors;
        status.write_errors    = pool.write_errors;
        status.checksum_errors = pool.checksum_errors;
        status.message         = pool.message;
    }

    log::debug!(
        "parsed pool {}: {} vdev node(s), {} spare(s)",
        status.name, status.devices.len(), status.spares.len()
    );
    Ok(status)
}

/// Parse every pool in a `zpool status` dump, in output order.
pub fn parse_status_all(text: &str) -> Result<Vec<PoolStatus>, ParseError> {
    split_reports(text).into_iter().map(parse_status).collect()
}

/// Condense a raw `scrub:`/`scan:` value into a short label.
pub fn summarize_scan(scan: &str) -> String {
    let scan = scan.trim();
    if scan.starts_with("scrub in progress") {
        return match extract_pct(scan) {
            Some(pct) => format!("scrubbing {:.1}%", pct),
            None      => "scrubbing…".to_string(),
        };
    }
    if scan.starts_with("resilver in progress") {
        return match extract_pct(scan) {
            Some(pct) => format!("resilvering {:.1}%", pct),
            None      => "resilvering…".to_string(),
        };
    }
    if scan.starts_with("scrub repaired") || scan.starts_with("scrub canceled") {
        // "scrub repaired 0B in 00:00:01 with 0 errors on Sun Feb  9 00:25:01 2026"
        let status = if scan.starts_with("scrub canceled") { "canceled" } else { "ok" };
        return match extract_short_date(scan) {
            Some(date) => format!("{} ({})", status, date),
            None       => status.to_string(),
        };
    }
    if scan == "none requested" || scan.is_empty() {
        return "no scrub".to_string();
    }
    scan.chars().take(24).collect()
}

// First "NN.N%" token.
fn extract_pct(s: &str) -> Option<f64> {
    s.split_whitespace()
        .filter_map(|part| part.strip_suffix('%'))
        .find_map(|p| p.parse::<f64>().ok())
}

// "Mon DD YYYY" around the last four-digit year.
fn extract_short_date(s: &str) -> Option<String> {
    let words: Vec<&str> = s.split_whitespace().collect();
    let year_idx = words.iter().rposition(|w| {
        w.len() == 4 && w.chars().all(|c| c.is_ascii_digit())
    })?;
    // The time token sits between day and year: "Feb  9 00:25:01 2026".
    let mut idx = year_idx;
    if idx >= 1 && words[idx - 1].contains(':') {
        idx -= 1;
    }
    if idx >= 2 {
        let month = words[idx - 2];
        let day   = words[idx - 1].trim_start_matches('0');
        Some(format!("{} {} {}", month, day, words[year_idx]))
    } else {
        Some(words[year_idx].to_string())
    }
}
