//! Container lifecycle
//!
//! Start and stop are delegated to the container orchestration tool; this
//! module only builds its command lines.

use tracing::info;

use crate::config::Workspace;
use crate::home::prepare_home;
use crate::process::{CommandRunner, Invocation};
use crate::{Error, Result};

/// Lifecycle of the Jenkins server and its CLI sidecar
pub trait Services {
    /// Prepare the server home and start the server container
    fn start_server(&self) -> Result<()>;

    /// Start the CLI sidecar container
    fn start_sidecar(&self) -> Result<()>;

    /// Stop and remove every container of the project
    fn stop_all(&self) -> Result<()>;
}

/// Compose command prefix from the layout, run in the project directory
pub(crate) fn compose_invocation(workspace: &Workspace) -> Result<Invocation> {
    let (program, rest) = workspace
        .layout()
        .compose_command
        .split_first()
        .ok_or_else(|| Error::config("layout.compose_command must not be empty"))?;

    Ok(Invocation::new(program.as_str())
        .args(rest.iter().map(String::as_str))
        .current_dir(workspace.project_dir()))
}

/// [`Services`] backed by `docker-compose` (or whatever the layout names)
pub struct ComposeServices<'a> {
    workspace: &'a Workspace,
    runner: &'a dyn CommandRunner,
}

impl<'a> ComposeServices<'a> {
    pub fn new(workspace: &'a Workspace, runner: &'a dyn CommandRunner) -> Self {
        Self { workspace, runner }
    }

    fn up(&self, service: &str) -> Result<()> {
        let invocation = compose_invocation(self.workspace)?.args(["up", "-d", service]);
        self.runner.run_checked(&invocation)?;
        info!(service, "Container up");
        Ok(())
    }
}

impl Services for ComposeServices<'_> {
    fn start_server(&self) -> Result<()> {
        prepare_home(self.workspace)?;
        self.up(&self.workspace.layout().server_service)
    }

    fn start_sidecar(&self) -> Result<()> {
        self.up(&self.workspace.layout().cli_service)
    }

    fn stop_all(&self) -> Result<()> {
        let invocation = compose_invocation(self.workspace)?.arg("down");
        self.runner.run_checked(&invocation)?;
        info!("Containers down");
        Ok(())
    }
}
