use std::collections::BTreeMap;
use std::path::PathBuf;

use nix::unistd::{getuid, User};
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_UNIT_DIR: &str = "/etc/systemd/system";

// SUDO_USER first, the daemon runs as the desktop user and not root.
const LOGIN_VARS: [&str; 3] = ["SUDO_USER", "LOGNAME", "USER"];

/// Everything read from the process environment, taken once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub display: Option<String>,
    pub user: Option<String>,
    pub cwd: PathBuf,
    pub unit_dir: PathBuf,
    pub extra_env: BTreeMap<String, String>,
}

impl Config {
    pub fn from_env(unit_dir: Option<PathBuf>, extra_env: Vec<(String, String)>) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let mut config = Self::from_lookup(|key| std::env::var(key).ok(), cwd);

        if config.user.is_none() {
            config.user = passwd_user();
        }
        if let Some(dir) = unit_dir {
            config.unit_dir = dir;
        }
        config.extra_env.extend(extra_env);

        debug!(?config, "Read environment");
        Ok(config)
    }

    // Empty values count as unset.
    pub fn from_lookup<F>(lookup: F, cwd: PathBuf) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            display: non_empty("DISPLAY"),
            user: LOGIN_VARS.iter().find_map(|key| non_empty(*key)),
            cwd,
            unit_dir: PathBuf::from(DEFAULT_UNIT_DIR),
            extra_env: BTreeMap::new(),
        }
    }
}

fn passwd_user() -> Option<String> {
    match User::from_uid(getuid()) {
        Ok(user) => user.map(|u| u.name),
        Err(e) => {
            debug!("Failed to look up passwd entry: {}", e);
            None
        }
    }
}

/// Parses a `KEY=VALUE` pair as given to `--env`.
pub fn parse_env_entry(entry: &str) -> Result<(String, String)> {
    let (key, value) = entry
        .split_once('=')
        .ok_or_else(|| Error::InvalidEnvironmentEntry(entry.to_string()))?;
    let key = key.trim();
    let valid_key = key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && key.chars().next().map_or(false, |c| !c.is_ascii_digit());
    if !valid_key || value.contains(char::is_control) {
        return Err(Error::InvalidEnvironmentEntry(entry.to_string()));
    }

    Ok((key.to_string(), value.to_string()))
}
