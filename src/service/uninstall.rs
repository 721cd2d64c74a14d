use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::info;

use super::descriptor::{unit_name, unit_path};
use crate::error::{Error, Result};
use crate::supervisor::{best_effort, Action, Supervisor};

/// A missing unit file is an error, the supervisor steps before it are not.
pub fn uninstall_service<S: Supervisor + ?Sized>(
    name: &str,
    unit_dir: &Path,
    supervisor: &S,
) -> Result<PathBuf> {
    let unit = unit_name(name);

    best_effort(supervisor, Action::Stop(&unit));
    best_effort(supervisor, Action::Disable(&unit));
    best_effort(supervisor, Action::Unmask(&unit));
    best_effort(supervisor, Action::DaemonReload);

    println!("Daemon stopped, removing service file... \n");
    let path = unit_path(unit_dir, name);
    fs::remove_file(&path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => Error::PersistedFileMissing(path.clone()),
        _ => Error::RemoveUnit {
            path: path.clone(),
            source,
        },
    })?;
    info!("Removed {}", path.display());
    println!("Service file removed. \n");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::Config;
    use crate::service::descriptor::{ServiceDescriptor, SERVICE_NAME};
    use crate::service::install::{install_service, InstallOutcome};
    use crate::supervisor::testing::RecordingSupervisor;

    const TEARDOWN: [&str; 4] = [
        "stop screen_timed.service",
        "disable screen_timed.service",
        "unmask screen_timed.service",
        "daemon-reload",
    ];

    #[test]
    fn removes_unit_after_teardown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screen_timed.service");
        fs::write(&path, "[Unit]").unwrap();
        let supervisor = RecordingSupervisor::default();

        let removed = uninstall_service(SERVICE_NAME, dir.path(), &supervisor).unwrap();

        assert_eq!(removed, path);
        assert!(!path.exists());
        assert_eq!(supervisor.calls(), TEARDOWN);
    }

    #[test]
    fn missing_unit_file_surfaces_after_teardown() {
        let dir = tempfile::tempdir().unwrap();
        let supervisor = RecordingSupervisor::default();

        let err = uninstall_service(SERVICE_NAME, dir.path(), &supervisor).unwrap_err();

        assert!(matches!(err, Error::PersistedFileMissing(p) if p == dir.path().join("screen_timed.service")));
        assert_eq!(supervisor.calls(), TEARDOWN);
    }

    #[test]
    fn second_uninstall_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("screen_timed.service"), "[Unit]").unwrap();
        let supervisor = RecordingSupervisor::default();

        uninstall_service(SERVICE_NAME, dir.path(), &supervisor).unwrap();
        let err = uninstall_service(SERVICE_NAME, dir.path(), &supervisor).unwrap_err();

        assert!(matches!(err, Error::PersistedFileMissing(_)));
        assert_eq!(supervisor.calls().len(), 8);
    }

    #[test]
    fn supervisor_failures_do_not_block_removal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screen_timed.service");
        fs::write(&path, "[Unit]").unwrap();
        let supervisor = RecordingSupervisor::failing("stop", 5);

        uninstall_service(SERVICE_NAME, dir.path(), &supervisor).unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn install_then_uninstall_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let supervisor = RecordingSupervisor::default();
        let descriptor = ServiceDescriptor::build(Config {
            display: Some(":1".to_string()),
            user: Some("bob".to_string()),
            cwd: PathBuf::from("/opt/screen-time"),
            unit_dir: dir.path().to_path_buf(),
            extra_env: BTreeMap::new(),
        })
        .unwrap();

        let outcome = install_service(&descriptor, dir.path(), &supervisor, |_| true).unwrap();
        assert!(matches!(outcome, InstallOutcome::Installed { .. }));
        uninstall_service(descriptor.name(), dir.path(), &supervisor).unwrap();

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
        assert_eq!(
            supervisor.calls().last().map(String::as_str),
            Some("daemon-reload")
        );
        assert!(supervisor
            .calls()
            .contains(&"disable screen_timed.service".to_string()));
    }
}
