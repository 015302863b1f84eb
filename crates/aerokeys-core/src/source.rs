//! Where raw mode bindings come from.
//!
//! The pipeline only sees the [`ModeSource`] trait. [`AerospaceCli`] asks a
//! running AeroSpace through its CLI, [`ConfigFileSource`] reads an
//! `aerospace.toml` directly, and [`StaticSource`] holds bindings in memory.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::parse::RawBindings;

/// Install locations probed when no explicit binary is configured.
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "/opt/homebrew/bin/aerospace",
    "/usr/local/bin/aerospace",
    "/run/current-system/sw/bin/aerospace",
];

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug)]
pub enum SourceError {
    Io(io::Error),
    Timeout(Duration),
    CommandFailed { code: Option<i32>, stderr: String },
    Parse(String),
}

impl From<io::Error> for SourceError {
    fn from(e: io::Error) -> Self {
        SourceError::Io(e)
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Io(e) => write!(f, "IO error: {e}"),
            SourceError::Timeout(d) => write!(f, "Timed out after {:.1}s", d.as_secs_f64()),
            SourceError::CommandFailed { code: Some(c), stderr } => {
                write!(f, "Command exited with {c}: {}", stderr.trim())
            }
            SourceError::CommandFailed { code: None, stderr } => {
                write!(f, "Command killed by signal: {}", stderr.trim())
            }
            SourceError::Parse(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for SourceError {}

/// Provider of mode names and their raw bindings.
pub trait ModeSource: Send + Sync {
    fn mode_names(&self) -> Result<Vec<String>, SourceError>;
    fn bindings(&self, mode: &str) -> Result<RawBindings, SourceError>;
}

// ── AeroSpace CLI ──

/// Queries AeroSpace through `aerospace list-modes` and `aerospace config`.
#[derive(Debug, Clone)]
pub struct AerospaceCli {
    binary: PathBuf,
    timeout: Duration,
}

impl AerospaceCli {
    pub fn new(binary: PathBuf, timeout: Duration) -> Self {
        Self { binary, timeout }
    }

    /// First existing candidate, or plain `aerospace` to be resolved via `PATH`.
    pub fn locate<P: AsRef<Path>>(candidates: &[P]) -> PathBuf {
        candidates
            .iter()
            .map(|p| p.as_ref())
            .find(|p| p.is_file())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("aerospace"))
    }

    fn run(&self, args: &[&str]) -> Result<String, SourceError> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args);
        run_with_timeout(cmd, self.timeout)
    }
}

impl ModeSource for AerospaceCli {
    fn mode_names(&self) -> Result<Vec<String>, SourceError> {
        let out = self.run(&["list-modes"])?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    fn bindings(&self, mode: &str) -> Result<RawBindings, SourceError> {
        let key = format!("mode.{mode}.binding");
        let out = self.run(&["config", "--get", &key, "--json"])?;
        parse_json_bindings(&out)
    }
}

/// Run `cmd`, killing it if it outlives `timeout`. Returns stdout.
fn run_with_timeout(mut cmd: Command, timeout: Duration) -> Result<String, SourceError> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Drain both pipes off-thread so a chatty child cannot block on a full pipe.
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(SourceError::Timeout(timeout));
        }
        thread::sleep(POLL_INTERVAL);
    };

    let stdout = stdout.join().unwrap_or_default();
    let stderr = stderr.join().unwrap_or_default();
    if !status.success() {
        return Err(SourceError::CommandFailed {
            code: status.code(),
            stderr,
        });
    }
    Ok(stdout)
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_string(&mut buf);
        }
        buf
    })
}

/// Parse the `--json` output of `aerospace config --get mode.<id>.binding`.
///
/// Values are either a command string or a list of commands; lists are
/// joined with `; ` so they read like a single command line.
pub fn parse_json_bindings(json: &str) -> Result<RawBindings, SourceError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| SourceError::Parse(e.to_string()))?;
    let serde_json::Value::Object(map) = value else {
        return Err(SourceError::Parse("expected a JSON object of bindings".to_string()));
    };
    Ok(map
        .into_iter()
        .filter_map(|(key, v)| {
            let command = match v {
                serde_json::Value::String(s) => s,
                serde_json::Value::Array(items) => join_commands(items.iter().filter_map(|i| i.as_str())),
                _ => return None,
            };
            Some((key, command))
        })
        .collect())
}

fn join_commands<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.collect::<Vec<_>>().join("; ")
}

// ── aerospace.toml ──

/// Reads bindings straight from an `aerospace.toml` file.
///
/// The file is re-read on every call, so a reload picks up edits.
#[derive(Debug, Clone)]
pub struct ConfigFileSource {
    path: PathBuf,
}

impl ConfigFileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn modes_table(&self) -> Result<toml::Table, SourceError> {
        let content = fs::read_to_string(&self.path)?;
        let mut root: toml::Table =
            toml::from_str(&content).map_err(|e| SourceError::Parse(e.to_string()))?;
        match root.remove("mode") {
            Some(toml::Value::Table(modes)) => Ok(modes),
            Some(_) => Err(SourceError::Parse("`mode` is not a table".to_string())),
            None => Ok(toml::Table::new()),
        }
    }
}

impl ModeSource for ConfigFileSource {
    /// Mode ids with `main` first, the rest alphabetical.
    fn mode_names(&self) -> Result<Vec<String>, SourceError> {
        let mut names: Vec<String> = self.modes_table()?.keys().cloned().collect();
        names.sort_by_key(|n| (n != "main", n.clone()));
        Ok(names)
    }

    fn bindings(&self, mode: &str) -> Result<RawBindings, SourceError> {
        let modes = self.modes_table()?;
        let binding = modes
            .get(mode)
            .and_then(|m| m.get("binding"))
            .and_then(|b| b.as_table())
            .ok_or_else(|| SourceError::Parse(format!("no [mode.{mode}.binding] table")))?;
        Ok(binding
            .iter()
            .filter_map(|(key, v)| {
                let command = match v {
                    toml::Value::String(s) => s.clone(),
                    toml::Value::Array(items) => join_commands(items.iter().filter_map(|i| i.as_str())),
                    _ => return None,
                };
                Some((key.clone(), command))
            })
            .collect())
    }
}

// ── In memory ──

/// Fixed bindings, for tests and for replaying a captured configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    modes: Vec<(String, RawBindings)>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode<K, V>(mut self, id: &str, bindings: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let raw: BTreeMap<String, String> = bindings
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.modes.push((id.to_string(), raw));
        self
    }
}

impl ModeSource for StaticSource {
    fn mode_names(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.modes.iter().map(|(id, _)| id.clone()).collect())
    }

    fn bindings(&self, mode: &str) -> Result<RawBindings, SourceError> {
        self.modes
            .iter()
            .find(|(id, _)| id == mode)
            .map(|(_, raw)| raw.clone())
            .ok_or_else(|| SourceError::Parse(format!("unknown mode: {mode}")))
    }
}
