use crate::parse::list::ListOptions;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub zpool: ZpoolConfig,

    #[serde(default)]
    pub list: ListOptions,

    #[serde(default)]
    pub alerts: AlertConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZpoolConfig {
    /// Path or name of the zpool binary
    pub binary: String,
    /// Per-invocation timeout in seconds
    pub timeout_secs: u64,
    /// Concurrent `zpool status` calls while hydrating list rows (0 is treated as 1)
    pub max_concurrency: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertConfig {
    #[serde(default)]
    pub thresholds: AlertThresholds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Allocated share of the pool that raises a warning (percent).
    pub capacity_warn_pct: f64,
    /// Allocated share of the pool that raises a critical alert (percent).
    pub capacity_crit_pct: f64,
    /// Read+write+checksum errors on one device that raise a warning.
    pub error_warn_count:  u64,
    /// Read+write+checksum errors on one device that raise a critical alert.
    pub error_crit_count:  u64,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for ZpoolConfig {
    fn default() -> Self {
        Self { binary: "zpool".into(), timeout_secs: 30, max_concurrency: 4 }
    }
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            capacity_warn_pct: 80.0,
            capacity_crit_pct: 90.0,
            error_warn_count:  1,
            error_crit_count:  100,
        }
    }
}

// ── Load / Save ───────────────────────────────────────────────────────

impl Config {
    pub fn load() -> Self {
        match try_load() {
            Ok(c)  => c,
            Err(e) => {
                log::debug!("using default config: {:#}", e);
                // Write defaults on first run (best-effort)
                if let Err(e) = try_write_defaults() {
                    log::debug!("could not write default config: {:#}", e);
                }
                Config::default()
            }
        }
    }

    /// Read an explicit config file. Missing sections fall back to defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&text)?;
        Ok(cfg)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("zpstat").join("zpstat.toml"))
    }
}

fn try_load() -> Result<Config> {
    let path = Config::config_path().ok_or_else(|| anyhow::anyhow!("no config dir"))?;
    Config::load_from(&path)
}

fn try_write_defaults() -> Result<()> {
    let path = Config::config_path().ok_or_else(|| anyhow::anyhow!("no config dir"))?;
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(&Config::default())?;
    fs::write(path, format!("# zpstat configuration\n# Generated on first run, edit freely\n\n{}", text))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[zpool]\nbinary = \"/sbin/zpool\"\nmax_concurrency = 2\n").unwrap();
        writeln!(file, "[list]\ncapacity_from_dedup = false").unwrap();

        let cfg = Config::load_from(file.path()).unwrap();
        assert_eq!(cfg.zpool.binary, "/sbin/zpool");
        assert_eq!(cfg.zpool.max_concurrency, 2);
        assert_eq!(cfg.zpool.timeout_secs, 30);
        assert!(!cfg.list.capacity_from_dedup);
        assert_eq!(cfg.alerts.thresholds.capacity_crit_pct, 90.0);
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let cfg: Config = toml::from_str(&text).unwrap();
        assert_eq!(cfg.zpool.binary, "zpool");
        assert!(cfg.list.capacity_from_dedup);
        assert_eq!(cfg.alerts.thresholds.error_warn_count, 1);
    }

    #[test]
    fn bad_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[zpool]\ntimeout_secs = \"soon\"").unwrap();
        assert!(Config::load_from(file.path()).is_err());
        assert!(Config::load_from(Path::new("/nonexistent/zpstat.toml")).is_err());
    }
}
