//! Jenkins leader CLI
//!
//! Brings up a Jenkins leader with its plugins and seed job, restarts it
//! safely, verifies its plugins and tears it down again.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use commands::Connection;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let workspace = commands::load_workspace(&cli.project_dir, &cli.settings)?;
    let connection = Connection {
        url: cli.url,
        user: cli.user,
        password: cli.password,
    };

    match cli.command {
        Commands::Create => commands::run_create(connection, workspace),
        Commands::Destroy => commands::run_destroy(workspace),
        Commands::Restart => commands::run_restart(connection, workspace),
        Commands::Verify => commands::run_verify(connection, workspace),
    }
}
