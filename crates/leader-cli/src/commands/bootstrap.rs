//! Create and verify command implementations
//!
//! `create` runs the full bootstrap; `verify` only compares the desired
//! plugins against what the server reports.

use colored::Colorize;

use leader_core::{
    Bootstrap, CliJarFetcher, Collaborators, ComposeCli, ComposeServices, Config, DesiredState,
    JenkinsClient, ProcessRunner, Reconciler, ThreadSleeper, Workspace,
};

use super::Connection;
use crate::error::Result;

fn load_desired(config: &Config) -> Result<DesiredState> {
    let workspace = config.workspace();
    let path = workspace.resolve(&workspace.layout().plugins_file);
    Ok(DesiredState::load(&path)?)
}

/// Run the create command
///
/// Blocks until the server first answers, however long that takes.
pub fn run_create(connection: Connection, workspace: Workspace) -> Result<()> {
    let config = connection.into_config(workspace)?;
    println!(
        "{} Bootstrapping Jenkins at {}",
        "=>".blue().bold(),
        config.base_url().as_str().cyan()
    );

    let desired = load_desired(&config)?;
    let workspace = config.workspace();
    let client = JenkinsClient::new(&config)?;
    let runner = ProcessRunner;
    let services = ComposeServices::new(workspace, &runner);
    let cli = ComposeCli::new(workspace, config.credentials(), &runner);
    let artifacts = CliJarFetcher::new(workspace, &client);

    let report = Bootstrap::new(
        &config,
        &desired,
        Collaborators {
            services: &services,
            probe: &client,
            sleeper: &ThreadSleeper,
            artifacts: &artifacts,
            cli: &cli,
            inventory: &client,
        },
    )
    .run()?;

    println!(
        "{} Jenkins answered after {} probe(s)",
        "OK".green().bold(),
        report.probe_attempts
    );
    println!(
        "{} {} plugin(s) installed and verified",
        "OK".green().bold(),
        report.plugins
    );
    println!(
        "{} Seed job {} created",
        "OK".green().bold(),
        report.seed_job.cyan()
    );
    Ok(())
}

/// Run the verify command
///
/// Reports every desired plugin the server does not have. A non-empty diff
/// is returned as a convergence failure.
pub fn run_verify(connection: Connection, workspace: Workspace) -> Result<()> {
    let config = connection.into_config(workspace)?;
    println!(
        "{} Checking plugins on {}",
        "=>".blue().bold(),
        config.base_url().as_str().cyan()
    );

    let desired = load_desired(&config)?;
    let client = JenkinsClient::new(&config)?;
    let missing = Reconciler::new(&client).verify(desired.plugins())?;

    if missing.is_empty() {
        println!(
            "{} All {} required plugin(s) are installed.",
            "OK".green().bold(),
            desired.len()
        );
        return Ok(());
    }

    println!("{} Some plugins are missing:", "MISSING".yellow().bold());
    for plugin in &missing {
        println!("   {} {}", "-".yellow(), plugin.cyan());
    }
    println!();
    println!("Run {} to install them.", "leader create".cyan());

    Err(leader_core::Error::ConvergenceFailed { missing }.into())
}
