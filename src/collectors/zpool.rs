use crate::config::ZpoolConfig;
use crate::error::FetchError;
use crate::models::pool::ListRow;
use crate::parse::list::{decode_list_strict, ListOptions, StatusSource, LIST_COLUMNS};
use anyhow::{Context, Result};
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Runs the `zpool` binary with a per-call timeout.
#[derive(Debug, Clone)]
pub struct ZpoolCommand {
    pub binary:  String,
    pub timeout: Duration,
}

impl ZpoolCommand {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self { binary: binary.into(), timeout }
    }

    pub fn from_config(cfg: &ZpoolConfig) -> Self {
        Self::new(cfg.binary.clone(), Duration::from_secs(cfg.timeout_secs.max(1)))
    }

    /// `zpool list -Hp -o name,size,...,altroot`, decoded row by row.
    pub fn list(&self, opts: &ListOptions) -> Result<Vec<ListRow>> {
        let text = self.run(&["list", "-H", "-p", "-o", LIST_COLUMNS])?;
        let rows = decode_list_strict(&text, opts).context("decoding zpool list output")?;
        Ok(rows)
    }

    /// Raw stdout of `zpool <args>`.
    ///
    /// A non-zero exit is tolerated when stdout is non-empty; zpool prints
    /// usable output for healthy pools while warning about others.
    pub fn run(&self, args: &[&str]) -> Result<String, FetchError> {
        let command = format!("{} {}", self.binary, args.join(" "));
        log::debug!("running `{}`", command);

        let mut child = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| FetchError::Spawn { command: command.clone(), source })?;

        // A full pipe would block the child; read both while polling.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let started = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if started.elapsed() >= self.timeout => {
                    let _ = child.kill();
                    let _ = child.wait();
                    log::warn!("`{}` timed out after {:?}", command, self.timeout);
                    return Err(FetchError::Timeout { command, timeout: self.timeout });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(source) => return Err(FetchError::Spawn { command, source }),
            }
        };

        let out = join_drain(stdout);
        let err = join_drain(stderr);

        if !status.success() {
            if out.trim().is_empty() {
                return Err(FetchError::Failed {
                    command,
                    status: status.to_string(),
                    stderr: err.trim().to_string(),
                });
            }
            log::warn!("`{}` exited with {}; using its output", command, status);
        }
        Ok(out)
    }
}

impl StatusSource for ZpoolCommand {
    fn fetch_status(&self, pool: &str) -> Result<String, FetchError> {
        self.run(&["status", pool])
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<thread::JoinHandle<String>> {
    pipe.map(|mut p| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = p.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn join_drain(handle: Option<thread::JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}
