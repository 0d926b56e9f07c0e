//! Test doubles for the `leader-core` seams.
//!
//! All doubles use interior mutability so they can be shared by `&` the way
//! the real collaborators are.

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::time::Duration;

use leader_core::{
    ArtifactFetcher, AvailabilityProbe, CommandOutput, CommandRunner, Error, Invocation,
    PluginInventory, RemoteCli, Result, Services, Sleeper,
};

/// Probe that reports "down" for the first `failures` calls, then "up".
pub struct ScriptedProbe {
    failures: u64,
    calls: Cell<u64>,
}

impl ScriptedProbe {
    /// Up from the very first probe
    pub fn up() -> Self {
        Self::failing_for(0)
    }

    /// Down for `failures` probes, up afterwards
    pub fn failing_for(failures: u64) -> Self {
        Self {
            failures,
            calls: Cell::new(0),
        }
    }

    /// Never comes up
    pub fn never() -> Self {
        Self::failing_for(u64::MAX)
    }

    /// Number of probes issued so far
    pub fn calls(&self) -> u64 {
        self.calls.get()
    }
}

impl AvailabilityProbe for ScriptedProbe {
    fn is_available(&self) -> bool {
        let n = self.calls.get();
        self.calls.set(n + 1);
        n >= self.failures
    }
}

/// Sleeper that records requested durations instead of sleeping.
#[derive(Default)]
pub struct RecordingSleeper {
    naps: RefCell<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn naps(&self) -> Vec<Duration> {
        self.naps.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.naps.borrow().len()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.naps.borrow_mut().push(duration);
    }
}

/// Inventory returning a fixed installed set, or a fixed HTTP failure.
pub struct StaticInventory {
    installed: HashSet<String>,
    status: Option<u16>,
    calls: Cell<u32>,
}

impl StaticInventory {
    pub fn installed<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            installed: ids.into_iter().map(Into::into).collect(),
            status: None,
            calls: Cell::new(0),
        }
    }

    /// Every query fails with `status`
    pub fn failing(status: u16) -> Self {
        Self {
            installed: HashSet::new(),
            status: Some(status),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.get()
    }
}

impl PluginInventory for StaticInventory {
    fn installed_plugins(&self) -> Result<HashSet<String>> {
        self.calls.set(self.calls.get() + 1);
        match self.status {
            Some(status) => Err(Error::UpstreamStatus {
                endpoint: "stub://pluginManager/api/json?depth=1".to_string(),
                status,
            }),
            None => Ok(self.installed.clone()),
        }
    }
}

/// A call received by [`RecordingCli`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCall {
    Install(String),
    SafeRestart,
    CreateJob { name: String, definition: PathBuf },
}

/// Remote CLI that records calls and fails on request.
#[derive(Default)]
pub struct RecordingCli {
    calls: RefCell<Vec<CliCall>>,
    failing_installs: HashSet<String>,
    fail_restart: bool,
    fail_create_job: bool,
}

impl RecordingCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `install-plugin` fail for the given identifiers
    pub fn failing_installs<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failing_installs = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn failing_restart(mut self) -> Self {
        self.fail_restart = true;
        self
    }

    pub fn failing_create_job(mut self) -> Self {
        self.fail_create_job = true;
        self
    }

    pub fn calls(&self) -> Vec<CliCall> {
        self.calls.borrow().clone()
    }

    /// Identifiers passed to `install-plugin`, in call order
    pub fn installs(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                CliCall::Install(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn created_jobs(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                CliCall::CreateJob { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    fn failure(command: &str) -> Error {
        Error::CommandFailed {
            command: command.to_string(),
            code: Some(1),
            stderr: "scripted failure".to_string(),
        }
    }
}

impl RemoteCli for RecordingCli {
    fn install_plugin(&self, id: &str) -> Result<()> {
        self.calls.borrow_mut().push(CliCall::Install(id.to_string()));
        if self.failing_installs.contains(id) {
            return Err(Self::failure("install-plugin"));
        }
        Ok(())
    }

    fn safe_restart(&self) -> Result<()> {
        self.calls.borrow_mut().push(CliCall::SafeRestart);
        if self.fail_restart {
            return Err(Self::failure("safe-restart"));
        }
        Ok(())
    }

    fn create_job(&self, name: &str, definition: &Path) -> Result<()> {
        self.calls.borrow_mut().push(CliCall::CreateJob {
            name: name.to_string(),
            definition: definition.to_path_buf(),
        });
        if self.fail_create_job {
            return Err(Self::failure("create-job"));
        }
        Ok(())
    }
}

/// A call received by [`RecordingServices`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceCall {
    StartServer,
    StartSidecar,
    StopAll,
}

/// Container lifecycle that only records calls.
#[derive(Default)]
pub struct RecordingServices {
    calls: RefCell<Vec<ServiceCall>>,
    fail_server: bool,
}

impl RecordingServices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_server(mut self) -> Self {
        self.fail_server = true;
        self
    }

    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.borrow().clone()
    }
}

impl Services for RecordingServices {
    fn start_server(&self) -> Result<()> {
        self.calls.borrow_mut().push(ServiceCall::StartServer);
        if self.fail_server {
            return Err(Error::CommandFailed {
                command: "up -d jenkins".to_string(),
                code: Some(1),
                stderr: "scripted failure".to_string(),
            });
        }
        Ok(())
    }

    fn start_sidecar(&self) -> Result<()> {
        self.calls.borrow_mut().push(ServiceCall::StartSidecar);
        Ok(())
    }

    fn stop_all(&self) -> Result<()> {
        self.calls.borrow_mut().push(ServiceCall::StopAll);
        Ok(())
    }
}

/// Artifact fetcher that always reports the same path.
pub struct FixedArtifact {
    path: PathBuf,
    calls: Cell<u32>,
}

impl FixedArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.get()
    }
}

impl ArtifactFetcher for FixedArtifact {
    fn ensure_cli_artifact(&self) -> Result<PathBuf> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.path.clone())
    }
}

/// Command runner that records invocations and replays scripted outputs.
///
/// Once the script is exhausted every command succeeds with empty output.
#[derive(Default)]
pub struct RecordingRunner {
    invocations: RefCell<Vec<Invocation>>,
    outputs: RefCell<VecDeque<CommandOutput>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an output for the next unscripted command
    pub fn then(self, output: CommandOutput) -> Self {
        self.outputs.borrow_mut().push_back(output);
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    /// Arguments of every recorded invocation
    pub fn arg_lists(&self) -> Vec<Vec<String>> {
        self.invocations
            .borrow()
            .iter()
            .map(|inv| inv.get_args().to_vec())
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        self.invocations.borrow_mut().push(invocation.clone());
        Ok(self
            .outputs
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(CommandOutput::ok))
    }
}
