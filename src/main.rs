use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use std::fs;
use std::path::{Path, PathBuf};
use zpstat::alerts::{self, Severity};
use zpstat::collectors::zpool::ZpoolCommand;
use zpstat::config::Config;
use zpstat::parse::list::{decode_list, hydrate_all};
use zpstat::parse::status::parse_status_all;
use zpstat::util::report;
use zpstat::PoolStatus;

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser, Debug)]
#[command(name = "zpstat", about = "Structured ZFS pool status and topology", version)]
struct Cli {
    /// Only report these pools (default: every pool)
    pools: Vec<String>,

    /// Parse a saved `zpool status` dump instead of running zpool
    #[arg(long, value_name = "PATH")]
    status_file: Option<PathBuf>,

    /// Parse a saved `zpool list -Hp` dump and print its rows without hydration
    #[arg(long, value_name = "PATH")]
    list_file: Option<PathBuf>,

    /// Print JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// One-shot health check: exit 0=OK, 1=WARNING, 2=CRITICAL (nagios/cron compatible)
    #[arg(long)]
    check: bool,

    /// Print config file path and current values, then exit
    #[arg(long)]
    config: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    config_file: Option<PathBuf>,

    /// env_logger-style filter string (e.g. "debug,zpstat::parse=trace"); overrides RUST_LOG
    #[arg(long)]
    log_filter: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_filter.as_deref());

    let cfg = match &cli.config_file {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::load(),
    };

    if cli.config {
        return run_print_config(&cfg, cli.config_file.as_deref());
    }
    if let Some(path) = &cli.list_file {
        return run_list_file(path, &cfg, cli.json);
    }

    let pools = match &cli.status_file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let pools = parse_status_all(&text)
                .with_context(|| format!("parsing {}", path.display()))?;
            select(pools, &cli.pools, |p| &p.name)
        }
        None => collect_pools(&cfg, &cli.pools)?,
    };

    if cli.check {
        return run_check(&pools, &cfg);
    }
    if cli.json {
        return print_json(&pools);
    }

    let active = alerts::evaluate(&pools, &cfg.alerts.thresholds);
    print!("{}", report::generate(&pools, &active));
    Ok(())
}

fn init_logging(cli_filter: Option<&str>) {
    let env = Env::default().default_filter_or(DEFAULT_LOG_FILTER);
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(filter) = cli_filter {
        builder.parse_filters(filter);
    }
    builder.format_timestamp_secs();
    builder.init();
}

/// `zpool list` → one `zpool status` per selected pool → merged records.
fn collect_pools(cfg: &Config, wanted: &[String]) -> Result<Vec<PoolStatus>> {
    let cmd  = ZpoolCommand::from_config(&cfg.zpool);
    let rows = select(cmd.list(&cfg.list)?, wanted, |r| &r.name);
    log::info!("hydrating {} pool(s)", rows.len());
    let pools = hydrate_all(&rows, &cmd, cfg.zpool.max_concurrency)
        .context("collecting pool status")?;
    Ok(pools)
}

/// Keep items whose name is in `wanted`; everything when `wanted` is empty.
fn select<T>(items: Vec<T>, wanted: &[String], name: impl Fn(&T) -> &String) -> Vec<T> {
    if wanted.is_empty() {
        return items;
    }
    for w in wanted {
        if !items.iter().any(|i| name(i) == w) {
            log::warn!("pool {} not found", w);
        }
    }
    items.into_iter().filter(|i| wanted.contains(name(i))).collect()
}

fn run_list_file(path: &Path, cfg: &Config, json: bool) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;

    let mut rows = Vec::new();
    for result in decode_list(&text, &cfg.list) {
        match result {
            Ok(row) => rows.push(row),
            Err(e)  => eprintln!("skipping {}", e),
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", report::list_table(&rows));
    }
    Ok(())
}

fn print_json(pools: &[PoolStatus]) -> Result<()> {
    let snapshot = serde_json::json!({
        "zpstat_version": env!("CARGO_PKG_VERSION"),
        "timestamp":      chrono::Local::now().to_rfc3339(),
        "pools":          pools,
    });
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn run_check(pools: &[PoolStatus], cfg: &Config) -> Result<()> {
    let active = alerts::evaluate(pools, &cfg.alerts.thresholds);

    if active.iter().all(|a| a.severity == Severity::Info) {
        println!("OK — {} pool(s), no alerts", pools.len());
        std::process::exit(0);
    }

    for a in &active {
        println!("[{}] {}{}", a.severity.label(), a.prefix(), a.message);
    }

    let code = alerts::worst(&active).map(|s| s.exit_code()).unwrap_or(0);
    std::process::exit(code);
}

fn run_print_config(cfg: &Config, explicit: Option<&Path>) -> Result<()> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(Config::config_path)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    let t = &cfg.alerts.thresholds;
    println!("Config: {}", path);
    println!();
    println!("[zpool]");
    println!("  binary          = {}", cfg.zpool.binary);
    println!("  timeout_secs    = {}", cfg.zpool.timeout_secs);
    println!("  max_concurrency = {}", cfg.zpool.max_concurrency);
    println!();
    println!("[list]");
    println!("  capacity_from_dedup = {}", cfg.list.capacity_from_dedup);
    println!();
    println!("[alerts.thresholds]");
    println!("  capacity_warn_pct = {}%", t.capacity_warn_pct);
    println!("  capacity_crit_pct = {}%", t.capacity_crit_pct);
    println!("  error_warn_count  = {}", t.error_warn_count);
    println!("  error_crit_count  = {}", t.error_crit_count);
    Ok(())
}
