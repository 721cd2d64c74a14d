use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::descriptor::{unit_path, ServiceDescriptor};
use crate::error::{Error, Result};
use crate::supervisor::{best_effort, Action, Supervisor};

#[derive(Debug, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Operator did not confirm; nothing was written or run.
    Declined,
    Installed {
        unit_path: PathBuf,
        active: bool,
    },
}

/// Supervisor failures are only logged, the final status is what the operator goes by.
pub fn install_service<S, C>(
    descriptor: &ServiceDescriptor,
    unit_dir: &Path,
    supervisor: &S,
    mut confirm: C,
) -> Result<InstallOutcome>
where
    S: Supervisor + ?Sized,
    C: FnMut(&str) -> bool,
{
    let path = unit_path(unit_dir, descriptor.name());
    let unit = descriptor.unit_name();
    let contents = descriptor.render();

    println!("This will be written to {}: \n", path.display());
    println!("{}\n", contents);

    if !confirm(contents.as_str()) {
        println!("Exiting...");
        return Ok(InstallOutcome::Declined);
    }
    info!(
        exec = %descriptor.exec_path().display(),
        workdir = %descriptor.working_directory().display(),
        env = ?descriptor.environment(),
        "Installing {}",
        unit
    );

    best_effort(supervisor, Action::Unmask(&unit));
    fs::write(&path, &contents).map_err(|source| Error::WriteUnit {
        path: path.clone(),
        source,
    })?;
    info!("Wrote {}", path.display());
    println!("Service file written. \n");

    println!("Enabling daemon...");
    best_effort(supervisor, Action::Enable(&unit));
    best_effort(supervisor, Action::DaemonReload);
    best_effort(supervisor, Action::Restart(&unit));

    println!("Daemon should be enabled, take a look at the following logs... \n");
    let active = report_status(supervisor, &unit);
    if !active {
        println!("{}", journal_hint(&unit));
    }

    Ok(InstallOutcome::Installed {
        unit_path: path,
        active,
    })
}

pub fn report_status<S: Supervisor + ?Sized>(supervisor: &S, unit: &str) -> bool {
    match best_effort(supervisor, Action::Status(unit)) {
        Some(output) => {
            print!("{}", output.stdout);
            if !output.stderr.is_empty() {
                eprint!("{}", output.stderr);
            }
            is_active(&output.stdout)
        }
        None => false,
    }
}

fn is_active(status: &str) -> bool {
    status.lines().any(|line| {
        line.trim_start()
            .strip_prefix("Active:")
            .map_or(false, |state| state.split_whitespace().next() == Some("active"))
    })
}

fn journal_hint(unit: &str) -> String {
    format!(
        "If the status is not active, run this command: `sudo journalctl -u {} | less`. \
         The logs should give you some idea of why this isn't working on your machine. \n",
        unit
    )
}

pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}
