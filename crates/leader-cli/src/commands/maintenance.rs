//! Restart and destroy command implementations

use colored::Colorize;

use leader_core::{
    ComposeCli, ComposeServices, JenkinsClient, ProcessRunner, ThreadSleeper, Workspace,
};

use super::Connection;
use crate::error::Result;

/// Run the restart command
///
/// Issues a safe restart and waits, with the bounded policy, for the server
/// to come back.
pub fn run_restart(connection: Connection, workspace: Workspace) -> Result<()> {
    let config = connection.into_config(workspace)?;
    println!(
        "{} Safely restarting Jenkins at {}",
        "=>".blue().bold(),
        config.base_url().as_str().cyan()
    );

    let workspace = config.workspace();
    let client = JenkinsClient::new(&config)?;
    let runner = ProcessRunner;
    let cli = ComposeCli::new(workspace, config.credentials(), &runner);

    let attempt = leader_core::safe_restart(&cli, &client, &ThreadSleeper, workspace.poll())?;

    println!(
        "{} Jenkins is back (attempt {} of {})",
        "OK".green().bold(),
        attempt,
        workspace.poll().max_attempts
    );
    Ok(())
}

/// Run the destroy command
pub fn run_destroy(workspace: Workspace) -> Result<()> {
    println!(
        "{} Destroying Jenkins environment in {}",
        "=>".blue().bold(),
        workspace.project_dir().display()
    );

    let runner = ProcessRunner;
    let services = ComposeServices::new(&workspace, &runner);
    leader_core::destroy(&workspace, &services)?;

    println!("{} Environment destroyed.", "OK".green().bold());
    Ok(())
}
