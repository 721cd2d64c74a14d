//! Thin wrapper around `systemctl`.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    Unmask(&'a str),
    Enable(&'a str),
    Disable(&'a str),
    Stop(&'a str),
    Restart(&'a str),
    DaemonReload,
    Status(&'a str),
}

impl<'a> Action<'a> {
    pub fn args(&self) -> Vec<&'a str> {
        match *self {
            Action::Unmask(unit) => vec!["unmask", unit],
            Action::Enable(unit) => vec!["enable", unit],
            Action::Disable(unit) => vec!["disable", unit],
            Action::Stop(unit) => vec!["stop", unit],
            Action::Restart(unit) => vec!["restart", unit],
            Action::DaemonReload => vec!["daemon-reload"],
            Action::Status(unit) => vec!["status", unit],
        }
    }
}

impl fmt::Display for Action<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args().join(" "))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait Supervisor {
    /// `Err` only when the command could not be spawned.
    fn run(&self, action: Action<'_>) -> io::Result<CommandOutput>;
}

pub struct Systemctl {
    program: PathBuf,
}

impl Systemctl {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Systemctl {
    fn default() -> Self {
        Self::new("systemctl")
    }
}

impl Supervisor for Systemctl {
    fn run(&self, action: Action<'_>) -> io::Result<CommandOutput> {
        debug!("Running {} {}", self.program.display(), action);
        let output = Command::new(&self.program).args(action.args()).output()?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Runs `action` and logs instead of failing when it does not succeed.
pub fn best_effort<S: Supervisor + ?Sized>(supervisor: &S, action: Action<'_>) -> Option<CommandOutput> {
    match supervisor.run(action) {
        Ok(output) => {
            if !output.success() {
                warn!(
                    code = ?output.code,
                    stderr = output.stderr.trim(),
                    "systemctl {} did not succeed",
                    action
                );
            }
            Some(output)
        }
        Err(e) => {
            warn!("Failed to run systemctl {}: {}", action, e);
            None
        }
    }
}
