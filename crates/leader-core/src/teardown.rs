//! Environment teardown

use std::fs;
use std::io::ErrorKind;

use tracing::{info, warn};

use crate::Result;
use crate::config::Workspace;
use crate::services::Services;

/// Stop every container, then remove the CLI directory and the Jenkins home.
///
/// Directories that are already gone are skipped; removal failures are
/// logged and do not abort the teardown.
pub fn destroy(workspace: &Workspace, services: &dyn Services) -> Result<()> {
    services.stop_all()?;

    let layout = workspace.layout();
    for dir in [&layout.cli_dir, &layout.home_dir] {
        let path = workspace.resolve(dir);
        match fs::remove_dir_all(&path) {
            Ok(()) => info!(path = %path.display(), "Removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::config::Settings;
    use std::cell::Cell;
    use tempfile::TempDir;

    struct Down {
        fail: bool,
        calls: Cell<u32>,
    }

    impl Services for Down {
        fn start_server(&self) -> Result<()> {
            unreachable!("teardown never starts containers")
        }

        fn start_sidecar(&self) -> Result<()> {
            unreachable!("teardown never starts containers")
        }

        fn stop_all(&self) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(Error::CommandFailed {
                    command: "docker-compose down".into(),
                    code: Some(1),
                    stderr: "no such project".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_destroy_removes_directories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("cli")).unwrap();
        fs::create_dir_all(temp.path().join("jenkins_home/init.groovy.d")).unwrap();
        let ws = Workspace::new(temp.path(), Settings::default());
        let services = Down {
            fail: false,
            calls: Cell::new(0),
        };

        destroy(&ws, &services).unwrap();

        assert_eq!(services.calls.get(), 1);
        assert!(!temp.path().join("cli").exists());
        assert!(!temp.path().join("jenkins_home").exists());
    }

    #[test]
    fn test_destroy_tolerates_missing_directories() {
        let temp = TempDir::new().unwrap();
        let ws = Workspace::new(temp.path(), Settings::default());
        let services = Down {
            fail: false,
            calls: Cell::new(0),
        };

        destroy(&ws, &services).unwrap();
    }

    #[test]
    fn test_destroy_keeps_directories_when_down_fails() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("cli")).unwrap();
        let ws = Workspace::new(temp.path(), Settings::default());
        let services = Down {
            fail: true,
            calls: Cell::new(0),
        };

        let err = destroy(&ws, &services).unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));
        assert!(temp.path().join("cli").exists());
    }
}
