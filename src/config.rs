use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::notifier::Permission;
use crate::timer::SessionConfig;

pub const CONFIG_FILE: &str = "config.json";
pub const STORAGE_FILE: &str = "storage.json";
pub const LOG_FILE: &str = "pomotask.log";

#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "🍅 pomotask - Terminal Pomodoro Timer with a Task List")]
pub struct Args {
    /// Work session length in minutes (1-60)
    #[arg(short, long)]
    pub work: Option<u32>,
    /// Break length in minutes (1-30)
    #[arg(short, long = "break")]
    pub rest: Option<u32>,
    /// Desktop notification permission at startup
    #[arg(short, long, value_enum)]
    pub notifications: Option<Permission>,
    /// Directory holding config.json, storage.json and the log
    #[arg(long, default_value = "pomotask")]
    pub data_dir: PathBuf,
    /// Log filter used when POMOTASK_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Startup defaults read from `config.json`. Never written back.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub work_minutes: u32,
    pub break_minutes: u32,
    pub notifications: Permission,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            break_minutes: 5,
            notifications: Permission::Undetermined,
        }
    }
}

impl Config {
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(CONFIG_FILE);
        let Ok(raw) = fs::read_to_string(&path) else {
            return Self::default();
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), %err, "ignoring malformed config");
            Self::default()
        })
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(w) = args.work { self.work_minutes = w; }
        if let Some(r) = args.rest { self.break_minutes = r; }
        if let Some(n) = args.notifications { self.notifications = n; }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(self.work_minutes, self.break_minutes)
    }
}
