use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};

pub const SERVICE_NAME: &str = "screen_timed";
const DESCRIPTION: &str = "Screen Time Daemon";
const INSTALL_TARGET: &str = "multi-user.target";

/// Daemon crate directory relative to the directory the installer is run from.
const DAEMON_DIR: &str = "daemon";
const RELEASE_DIR: &str = "target/release";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartPolicy {
    Always,
}

impl RestartPolicy {
    fn as_str(self) -> &'static str {
        match self {
            RestartPolicy::Always => "always",
        }
    }
}

/// Only obtainable through [`ServiceDescriptor::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    name: String,
    description: String,
    exec_path: PathBuf,
    working_directory: PathBuf,
    run_as_user: String,
    environment: BTreeMap<String, String>,
    restart_policy: RestartPolicy,
    install_target: String,
}

impl ServiceDescriptor {
    pub fn build(config: Config) -> Result<Self> {
        let Config {
            display,
            user,
            cwd,
            extra_env,
            ..
        } = config;

        let display = display.ok_or(Error::MissingEnvironment("DISPLAY"))?;
        let user = user.ok_or(Error::MissingEnvironment("login user"))?;
        if !cwd.is_absolute() {
            return Err(Error::RelativeWorkingDirectory(cwd));
        }

        check_unit_value("DISPLAY", &display)?;
        check_unit_value("user", &user)?;
        let cwd_str = cwd.to_str().ok_or_else(|| Error::UnsafeUnitValue {
            field: "working directory".to_string(),
            value: cwd.display().to_string(),
        })?;
        check_unit_value("working directory", cwd_str)?;
        for (key, value) in &extra_env {
            check_unit_value("environment name", key)?;
            check_unit_value(key, value)?;
        }

        let working_directory = cwd.join(DAEMON_DIR);
        let exec_path = working_directory.join(RELEASE_DIR).join(SERVICE_NAME);

        let mut environment = extra_env;
        environment.insert("DISPLAY".to_string(), display);

        Ok(Self {
            name: SERVICE_NAME.to_string(),
            description: DESCRIPTION.to_string(),
            exec_path,
            working_directory,
            run_as_user: user,
            environment,
            restart_policy: RestartPolicy::Always,
            install_target: INSTALL_TARGET.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_name(&self) -> String {
        unit_name(&self.name)
    }

    pub fn exec_path(&self) -> &Path {
        &self.exec_path
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    pub fn environment(&self) -> &BTreeMap<String, String> {
        &self.environment
    }

    /// Unit file text. Environment entries come out in key order.
    pub fn render(&self) -> String {
        let mut unit = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(unit, "[Unit]");
        let _ = writeln!(unit, "Description={}", self.description);
        let _ = writeln!(unit, "[Service]");
        let _ = writeln!(unit, "ExecStart={}", self.exec_path.display());
        let _ = writeln!(unit, "WorkingDirectory={}", self.working_directory.display());
        let _ = writeln!(unit, "Restart={}", self.restart_policy.as_str());
        let _ = writeln!(unit, "User={}", self.run_as_user);
        for (key, value) in &self.environment {
            let _ = writeln!(unit, "Environment={}={}", key, value);
        }
        let _ = writeln!(unit);
        let _ = writeln!(unit, "[Install]");
        let _ = write!(unit, "WantedBy={}", self.install_target);
        unit
    }
}

// systemd splits ExecStart= and Environment= on whitespace and expands `%` specifiers.
fn check_unit_value(field: &str, value: &str) -> Result<()> {
    let unsafe_char = |c: char| {
        c.is_whitespace() || c.is_control() || matches!(c, '%' | '"' | '\'' | '\\')
    };
    if value.contains(unsafe_char) {
        return Err(Error::UnsafeUnitValue {
            field: field.to_string(),
            value: value.to_string(),
        });
    }

    Ok(())
}

pub fn unit_name(name: &str) -> String {
    format!("{}.service", name)
}

pub fn unit_path(unit_dir: &Path, name: &str) -> PathBuf {
    unit_dir.join(unit_name(name))
}
