//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Jenkins leader bootstrap - start Jenkins, install plugins, provision the seed job
#[derive(Parser, Debug)]
#[command(name = "leader")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Jenkins base URL
    #[arg(long, env = "JENKINS_URL", global = true)]
    pub url: Option<String>,

    /// Jenkins admin user
    #[arg(long, env = "JENKINS_LEADER_ADMIN_USER", global = true)]
    pub user: Option<String>,

    /// Jenkins admin password
    #[arg(long, env = "JENKINS_LEADER_ADMIN_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Project directory holding the plugins file, init scripts and seed job
    #[arg(long, default_value = ".", global = true)]
    pub project_dir: PathBuf,

    /// Settings file, relative to the project directory
    #[arg(long, default_value = leader_core::DEFAULT_SETTINGS_FILE, global = true)]
    pub settings: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create the Jenkins environment
    ///
    /// Starts the server and CLI containers, installs the required plugins,
    /// verifies they were installed and creates the seed job.
    Create,

    /// Destroy the Jenkins environment
    ///
    /// Stops all containers and removes the directories created by `create`.
    Destroy,

    /// Safely restart Jenkins and wait until it is back
    Restart,

    /// Check that every required plugin is installed
    Verify,
}
