//! CLI artifact download

use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::client::JenkinsClient;
use crate::config::Workspace;
use crate::{Error, Result};

/// Where Jenkins serves its CLI jar
pub const CLI_JAR_ENDPOINT: &str = "jnlpJars/jenkins-cli.jar";

/// Makes the CLI artifact available locally
pub trait ArtifactFetcher {
    /// Return the local artifact path, downloading it first if absent
    fn ensure_cli_artifact(&self) -> Result<PathBuf>;
}

/// Downloads the CLI jar from the server into the layout's CLI directory.
///
/// An existing file is trusted as-is and never re-downloaded.
pub struct CliJarFetcher<'a> {
    workspace: &'a Workspace,
    client: &'a JenkinsClient<'a>,
}

impl<'a> CliJarFetcher<'a> {
    pub fn new(workspace: &'a Workspace, client: &'a JenkinsClient<'a>) -> Self {
        Self { workspace, client }
    }
}

impl ArtifactFetcher for CliJarFetcher<'_> {
    fn ensure_cli_artifact(&self) -> Result<PathBuf> {
        let layout = self.workspace.layout();
        let dir = self.workspace.resolve(&layout.cli_dir);
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;

        let dest = dir.join(&layout.cli_jar);
        if dest.is_file() {
            debug!(path = %dest.display(), "CLI jar already present");
            return Ok(dest);
        }

        let bytes = self.client.download(CLI_JAR_ENDPOINT, &dest)?;
        info!(path = %dest.display(), bytes, "Downloaded CLI jar");
        Ok(dest)
    }
}
