use crate::alerts::Alert;
use crate::models::pool::{DeviceNode, ListRow, PoolStatus};
use crate::util::human::{fmt_bytes, fmt_bytes_opt, fmt_pct, fmt_ratio};

/// Generate a human-readable pool health report to a String.
pub fn generate(pools: &[PoolStatus], alerts: &[Alert]) -> String {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let mut out = String::new();

    out.push_str("═══════════════════════════════════════════════\n");
    out.push_str(&format!("  zpstat Pool Report — {}\n", now));
    out.push_str("═══════════════════════════════════════════════\n\n");

    // ── Active alerts ──────────────────────────────────────────────────
    out.push_str(&format!("── Active Alerts ({}) ─────────────────────────\n", alerts.len()));
    if alerts.is_empty() {
        out.push_str("  ● All pools nominal\n");
    } else {
        for a in alerts {
            out.push_str(&format!("  [{}]  {}{}\n", a.severity.label(), a.prefix(), a.message));
        }
    }
    out.push('\n');

    // ── Pools ──────────────────────────────────────────────────────────
    for pool in pools {
        out.push_str(&pool_section(pool));
        out.push('\n');
    }

    out.push_str("═══════════════════════════════════════════════\n");
    out
}

/// One pool: summary lines followed by the device table.
pub fn pool_section(pool: &PoolStatus) -> String {
    let mut out = String::new();
    out.push_str(&format!("── Pool {} ({}) ───────────────────────────\n", pool.name, pool.state));

    if pool.size.is_some() {
        let used = pool.use_pct().map(fmt_pct).unwrap_or_else(|| "—".into());
        out.push_str(&format!(
            "  Size: {}  Alloc: {}  Free: {}  Used: {}  Frag: {}  Dedup: {}\n",
            fmt_bytes_opt(pool.size),
            fmt_bytes_opt(pool.allocated),
            fmt_bytes_opt(pool.free),
            used,
            pool.fragmentation_percent.map(fmt_pct).unwrap_or_else(|| "—".into()),
            pool.dedup_ratio.map(fmt_ratio).unwrap_or_else(|| "—".into()),
        ));
    }
    for (label, value) in [("Status", &pool.status), ("Action", &pool.action), ("See", &pool.see)] {
        if !value.is_empty() {
            out.push_str(&format!("  {:<7} {}\n", format!("{}:", label), value));
        }
    }
    out.push_str(&format!("  {:<7} {}\n", "Scrub:", pool.scrub_summary()));
    if !pool.errors.is_empty() {
        out.push_str(&format!("  {:<7} {}\n", "Errors:", pool.errors));
    }
    out.push('\n');

    out.push_str(&format!(
        "  {:<24} {:<9} {:>6} {:>6} {:>6}\n",
        "NAME", "STATE", "READ", "WRITE", "CKSUM"
    ));
    out.push_str(&format!("  {}\n", "─".repeat(55)));
    out.push_str(&row(
        &pool.name,
        0,
        &pool.state,
        (pool.read_errors, pool.write_errors, pool.checksum_errors),
        pool.message.as_deref(),
    ));
    for (id, depth) in pool.devices.walk() {
        out.push_str(&device_row(pool.devices.node(id), depth));
    }
    if !pool.spares.is_empty() {
        out.push_str("  spares\n");
        for spare in &pool.spares {
            let line = format!("  {}", spare.name);
            out.push_str(&format!("  {:<24} {:<9}", line, spare.state.label()));
            match &spare.message {
                Some(m) => out.push_str(&format!(" {}\n", m)),
                None    => out.push('\n'),
            }
        }
    }
    out
}

fn device_row(dev: &DeviceNode, depth: usize) -> String {
    row(
        &dev.name,
        depth,
        dev.state.label(),
        (dev.read_errors, dev.write_errors, dev.checksum_errors),
        dev.message.as_deref(),
    )
}

fn row(name: &str, depth: usize, state: &str, errors: (u64, u64, u64), message: Option<&str>) -> String {
    let name = format!("{}{}", "  ".repeat(depth), name);
    let mut line = format!(
        "  {:<24} {:<9} {:>6} {:>6} {:>6}",
        name, state, errors.0, errors.1, errors.2
    );
    if let Some(m) = message {
        line.push_str("  ");
        line.push_str(m);
    }
    line.push('\n');
    line
}

/// Table of `zpool list` rows without hydration.
pub fn list_table(rows: &[ListRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "  {:<16} {:>10} {:>10} {:>10} {:>6} {:>6} {:<9} {}\n",
        "NAME", "SIZE", "ALLOC", "FREE", "FRAG", "DEDUP", "HEALTH", "ALTROOT"
    ));
    out.push_str(&format!("  {}\n", "─".repeat(80)));
    for r in rows {
        out.push_str(&format!(
            "  {:<16} {:>10} {:>10} {:>10} {:>6} {:>6} {:<9} {}\n",
            r.name,
            fmt_bytes(r.size),
            fmt_bytes(r.allocated),
            fmt_bytes(r.free),
            fmt_pct(r.fragmentation_percent),
            fmt_ratio(r.dedup_ratio),
            r.health,
            r.alt_root,
        ));
    }
    out
}
