//! Bootstrap engine for a Jenkins leader
//!
//! This crate brings a Jenkins server from "container not running" to
//! "required plugins installed and seed job provisioned":
//!
//! - **Probe**: authenticated health check that reports reachable/unreachable
//! - **Poll**: unbounded first-boot wait and bounded post-restart wait
//! - **Reconcile**: set difference between the desired plugins and what the
//!   server reports as installed
//! - **Install**: one `install-plugin` command per desired plugin
//! - **Orchestrator**: the linear bootstrap sequence and the safe-restart
//!   maintenance operation
//!
//! # Architecture
//!
//! Every external effect sits behind a narrow trait so the sequencing logic
//! can be exercised with stubs:
//!
//! ```text
//!                       Bootstrap
//!                           |
//!   +---------+--------+----+-----+-----------+-----------+
//!   |         |        |          |           |           |
//! Services  Probe   Sleeper  ArtifactFetcher RemoteCli PluginInventory
//!   |         |                   |           |           |
//! compose  JenkinsClient      CliJarFetcher ComposeCli  JenkinsClient
//! ```
//!
//! No component terminates the process. Failures propagate as [`Error`] and
//! the binary maps them through [`Error::exit_code`].

pub mod artifact;
pub mod client;
pub mod config;
pub mod desired;
pub mod error;
pub mod home;
pub mod install;
pub mod orchestrator;
pub mod poll;
pub mod probe;
pub mod process;
pub mod reconcile;
pub mod remote;
pub mod services;
pub mod teardown;

pub use artifact::{ArtifactFetcher, CLI_JAR_ENDPOINT, CliJarFetcher};
pub use client::{JenkinsClient, PLUGIN_MANAGER_ENDPOINT};
pub use config::{
    Config, Credentials, DEFAULT_SETTINGS_FILE, InitScript, Layout, PollPolicy, Settings,
    Workspace,
};
pub use desired::DesiredState;
pub use error::{Error, Result, exit_code};
pub use home::{INIT_SCRIPTS_DIR, prepare_home};
pub use install::Installer;
pub use orchestrator::{Bootstrap, BootstrapReport, Collaborators, Stage, safe_restart};
pub use poll::{Poller, Sleeper, ThreadSleeper};
pub use probe::AvailabilityProbe;
pub use process::{CommandOutput, CommandRunner, Invocation, ProcessRunner};
pub use reconcile::{PluginInventory, Reconciler, missing_plugins};
pub use remote::{ComposeCli, RemoteCli};
pub use services::{ComposeServices, Services};
pub use teardown::destroy;
