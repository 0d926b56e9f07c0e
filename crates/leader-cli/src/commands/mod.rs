//! Command implementations for leader-cli

pub mod bootstrap;
pub mod maintenance;

pub use bootstrap::{run_create, run_verify};
pub use maintenance::{run_destroy, run_restart};

use std::path::Path;

use leader_core::{Config, Credentials, Workspace};

use crate::error::{CliError, Result};

/// Connection settings taken from flags or the environment
#[derive(Debug, Default)]
pub struct Connection {
    pub url: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl Connection {
    /// Combine connection settings with the project workspace into a full config
    pub fn into_config(self, workspace: Workspace) -> Result<Config> {
        let url = self
            .url
            .ok_or_else(|| CliError::user("Jenkins URL is not set (use --url or JENKINS_URL)"))?;
        let user = self.user.ok_or_else(|| {
            CliError::user("Admin user is not set (use --user or JENKINS_LEADER_ADMIN_USER)")
        })?;
        let password = self.password.ok_or_else(|| {
            CliError::user(
                "Admin password is not set (use --password or JENKINS_LEADER_ADMIN_PASSWORD)",
            )
        })?;

        Ok(Config::new(&url, Credentials::new(user, password), workspace)?)
    }
}

/// Load the workspace for `project_dir`
pub fn load_workspace(project_dir: &Path, settings: &Path) -> Result<Workspace> {
    Ok(Workspace::load(project_dir, settings)?)
}
