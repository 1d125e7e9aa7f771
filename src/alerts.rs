use crate::config::AlertThresholds;
use crate::models::pool::PoolStatus;
use crate::models::vdev::DeviceState;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info     => "INFO",
            Severity::Warning  => "WARN",
            Severity::Critical => "CRIT",
        }
    }

    /// Nagios-style exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Severity::Info     => 0,
            Severity::Warning  => 1,
            Severity::Critical => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Alert {
    pub severity: Severity,
    pub pool:     String,
    pub device:   Option<String>,
    pub message:  String,
}

impl Alert {
    pub fn prefix(&self) -> String {
        match &self.device {
            Some(d) => format!("[{}/{}] ", self.pool, d),
            None    => format!("[{}] ", self.pool),
        }
    }
}

/// Evaluate every pool and device against the thresholds.
/// Returns a freshly built list sorted Critical → Warning → Info.
pub fn evaluate(pools: &[PoolStatus], thr: &AlertThresholds) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = Vec::new();

    for pool in pools {
        let pool_alert = |severity: Severity, message: String| Alert {
            severity,
            pool: pool.name.clone(),
            device: None,
            message,
        };

        // ── Pool state ────────────────────────────────────────────────
        match pool.state_kind() {
            DeviceState::Online => {}
            DeviceState::Degraded => {
                alerts.push(pool_alert(Severity::Warning, "pool is DEGRADED".into()));
            }
            other => {
                alerts.push(pool_alert(Severity::Critical, format!("pool is {}", other.label())));
            }
        }

        // ── Capacity ──────────────────────────────────────────────────
        if let Some(pct) = pool.use_pct() {
            if pct >= thr.capacity_crit_pct {
                alerts.push(pool_alert(
                    Severity::Critical,
                    format!("{:.1}% allocated ≥ critical threshold {}%", pct, thr.capacity_crit_pct),
                ));
            } else if pct >= thr.capacity_warn_pct {
                alerts.push(pool_alert(
                    Severity::Warning,
                    format!("{:.1}% allocated ≥ warning threshold {}%", pct, thr.capacity_warn_pct),
                ));
            }
        }

        // ── Devices ───────────────────────────────────────────────────
        for (_, dev) in pool.devices.iter() {
            let dev_alert = |severity: Severity, message: String| Alert {
                severity,
                pool: pool.name.clone(),
                device: Some(dev.name.clone()),
                message,
            };

            if !dev.state.is_healthy() {
                let severity = if dev.state == DeviceState::Faulted {
                    Severity::Critical
                } else {
                    Severity::Warning
                };
                alerts.push(dev_alert(severity, format!("{} is {}", dev.kind.label(), dev.state.label())));
            }

            let errors = dev.total_errors();
            if thr.error_crit_count > 0 && errors >= thr.error_crit_count {
                alerts.push(dev_alert(Severity::Critical, error_message(errors, dev.read_errors, dev.write_errors, dev.checksum_errors)));
            } else if thr.error_warn_count > 0 && errors >= thr.error_warn_count {
                alerts.push(dev_alert(Severity::Warning, error_message(errors, dev.read_errors, dev.write_errors, dev.checksum_errors)));
            }
        }

        for spare in &pool.spares {
            if !spare.state.is_healthy() {
                alerts.push(Alert {
                    severity: Severity::Info,
                    pool:     pool.name.clone(),
                    device:   Some(spare.name.clone()),
                    message:  format!("spare is {}", spare.state.label()),
                });
            }
        }
    }

    alerts.sort_by(|a, b| b.severity.cmp(&a.severity));
    alerts
}

fn error_message(total: u64, read: u64, write: u64, cksum: u64) -> String {
    format!("{} error(s) (read {}, write {}, cksum {})", total, read, write, cksum)
}

/// Worst severity present, or `None` when nothing fired.
pub fn worst(alerts: &[Alert]) -> Option<Severity> {
    alerts.iter().map(|a| a.severity.clone()).max()
}
