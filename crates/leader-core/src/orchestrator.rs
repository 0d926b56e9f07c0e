//! Bootstrap sequencing
//!
//! The bootstrap is a strictly linear state machine:
//!
//! ```text
//! ServiceStarting -> ServiceReady -> SidecarReady -> ArtifactFetched
//!   -> Installing -> Verifying -> Converged -> SeedJobCreated -> Done
//! ```
//!
//! The first failing stage ends the run and its error is returned unchanged.
//! Nothing is rolled back: installs and verification are safe to repeat on
//! the next invocation, seed job creation is not retried.

use std::fmt;
use std::path::PathBuf;

use tracing::{error, info};

use crate::artifact::ArtifactFetcher;
use crate::config::{Config, PollPolicy};
use crate::desired::DesiredState;
use crate::install::Installer;
use crate::poll::{Poller, Sleeper};
use crate::probe::AvailabilityProbe;
use crate::reconcile::{PluginInventory, Reconciler};
use crate::remote::RemoteCli;
use crate::services::Services;
use crate::{Error, Result};

/// Bootstrap progress, in the order stages are reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    ServiceStarting,
    ServiceReady,
    SidecarReady,
    ArtifactFetched,
    Installing,
    Verifying,
    Converged,
    SeedJobCreated,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ServiceStarting => "service-starting",
            Stage::ServiceReady => "service-ready",
            Stage::SidecarReady => "sidecar-ready",
            Stage::ArtifactFetched => "artifact-fetched",
            Stage::Installing => "installing",
            Stage::Verifying => "verifying",
            Stage::Converged => "converged",
            Stage::SeedJobCreated => "seed-job-created",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// The external seams a bootstrap run drives
pub struct Collaborators<'a> {
    pub services: &'a dyn Services,
    pub probe: &'a dyn AvailabilityProbe,
    pub sleeper: &'a dyn Sleeper,
    pub artifacts: &'a dyn ArtifactFetcher,
    pub cli: &'a dyn RemoteCli,
    pub inventory: &'a dyn PluginInventory,
}

/// Outcome of a successful bootstrap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Stages reached, in order
    pub stages: Vec<Stage>,
    /// Probes issued before the server first answered
    pub probe_attempts: u64,
    /// Local path of the CLI artifact
    pub artifact: PathBuf,
    /// Plugins submitted for installation
    pub plugins: usize,
    /// Name of the provisioned seed job
    pub seed_job: String,
}

/// One bootstrap run against a fresh or partially provisioned leader
pub struct Bootstrap<'a> {
    config: &'a Config,
    desired: &'a DesiredState,
    parts: Collaborators<'a>,
}

impl<'a> Bootstrap<'a> {
    pub fn new(config: &'a Config, desired: &'a DesiredState, parts: Collaborators<'a>) -> Self {
        Self {
            config,
            desired,
            parts,
        }
    }

    /// Run every stage in order.
    ///
    /// Blocks without limit while waiting for the server's first start.
    pub fn run(&self) -> Result<BootstrapReport> {
        let mut stages = Vec::new();
        let result = self.drive(&mut stages);
        if let Err(e) = &result {
            let stage = stages.last().copied().unwrap_or(Stage::ServiceStarting);
            error!(%stage, error = %e, "Bootstrap aborted");
        }
        result
    }

    fn drive(&self, stages: &mut Vec<Stage>) -> Result<BootstrapReport> {
        let parts = &self.parts;
        let workspace = self.config.workspace();
        let layout = workspace.layout();

        enter(stages, Stage::ServiceStarting);
        parts.services.start_server()?;
        let probe_attempts =
            Poller::new(parts.probe, parts.sleeper, workspace.poll()).wait_until_available();
        enter(stages, Stage::ServiceReady);

        parts.services.start_sidecar()?;
        enter(stages, Stage::SidecarReady);

        let artifact = parts.artifacts.ensure_cli_artifact()?;
        enter(stages, Stage::ArtifactFetched);

        enter(stages, Stage::Installing);
        Installer::new(parts.cli).install(self.desired.plugins());

        enter(stages, Stage::Verifying);
        let missing = Reconciler::new(parts.inventory).verify(self.desired.plugins())?;
        if !missing.is_empty() {
            return Err(Error::ConvergenceFailed { missing });
        }
        enter(stages, Stage::Converged);

        let definition = workspace.resolve(&layout.seed_job_file);
        parts.cli.create_job(&layout.seed_job_name, &definition)?;
        enter(stages, Stage::SeedJobCreated);

        enter(stages, Stage::Done);
        Ok(BootstrapReport {
            stages: stages.clone(),
            probe_attempts,
            artifact,
            plugins: self.desired.len(),
            seed_job: layout.seed_job_name.clone(),
        })
    }
}

fn enter(stages: &mut Vec<Stage>, stage: Stage) {
    info!(%stage, "Bootstrap stage");
    stages.push(stage);
}

/// Restart Jenkins and wait until it is fully back.
///
/// Issues `safe-restart`, polls with the bounded policy, then sleeps the
/// settle period. Returns the attempt on which the server answered.
pub fn safe_restart(
    cli: &dyn RemoteCli,
    probe: &dyn AvailabilityProbe,
    sleeper: &dyn Sleeper,
    policy: &PollPolicy,
) -> Result<u32> {
    cli.safe_restart()?;

    let poller = Poller::new(probe, sleeper, policy);
    let attempt = poller.wait_bounded()?;
    poller.settle();

    info!(attempt, "Jenkins restarted");
    Ok(attempt)
}
