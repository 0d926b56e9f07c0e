//! Remote command interface
//!
//! Jenkins CLI commands are executed inside the CLI sidecar container:
//!
//! ```text
//! docker-compose exec -T cli java -jar jenkins-cli.jar -auth USER:SECRET <command>
//! ```
//!
//! `-T` disables TTY allocation. Without it the container tool refuses to
//! run when stdin is a file or `/dev/null`.

use std::path::Path;

use tracing::{debug, info};

use crate::Result;
use crate::config::{Credentials, Workspace};
use crate::process::{CommandRunner, Invocation};
use crate::services::compose_invocation;

/// Commands issued against the Jenkins management interface
pub trait RemoteCli {
    /// Install and activate one plugin without a restart
    fn install_plugin(&self, id: &str) -> Result<()>;

    /// Restart once running builds have finished
    fn safe_restart(&self) -> Result<()>;

    /// Create job `name` from the XML definition at `definition`
    fn create_job(&self, name: &str, definition: &Path) -> Result<()>;
}

/// [`RemoteCli`] backed by the Jenkins CLI jar in the sidecar container
pub struct ComposeCli<'a> {
    workspace: &'a Workspace,
    credentials: &'a Credentials,
    runner: &'a dyn CommandRunner,
}

impl<'a> ComposeCli<'a> {
    pub fn new(
        workspace: &'a Workspace,
        credentials: &'a Credentials,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            workspace,
            credentials,
            runner,
        }
    }

    /// Base invocation up to and including the `-auth` option
    pub fn invocation(&self) -> Result<Invocation> {
        let layout = self.workspace.layout();
        Ok(compose_invocation(self.workspace)?
            .args(["exec", "-T"])
            .arg(layout.cli_service.as_str())
            .args(["java", "-jar"])
            .arg(layout.cli_jar.as_str())
            .arg("-auth")
            .secret_arg(self.credentials.cli_auth()))
    }
}

impl RemoteCli for ComposeCli<'_> {
    fn install_plugin(&self, id: &str) -> Result<()> {
        let invocation = self.invocation()?.args(["install-plugin", id, "-deploy"]);
        self.runner.run_checked(&invocation)?;
        debug!(plugin = id, "Plugin install submitted");
        Ok(())
    }

    fn safe_restart(&self) -> Result<()> {
        info!("Requesting safe restart");
        let invocation = self.invocation()?.arg("safe-restart");
        self.runner.run_checked(&invocation)?;
        Ok(())
    }

    fn create_job(&self, name: &str, definition: &Path) -> Result<()> {
        let invocation = self
            .invocation()?
            .args(["create-job", name])
            .stdin_file(definition);
        self.runner.run_checked(&invocation)?;
        info!(job = name, "Job created");
        Ok(())
    }
}
