//! Jenkins home preparation
//!
//! Groovy scripts in `init.groovy.d` run when Jenkins starts; they create the
//! admin user and harden the instance before anything else can reach it.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::config::Workspace;
use crate::{Error, Result};

/// Directory Jenkins scans for startup scripts
pub const INIT_SCRIPTS_DIR: &str = "init.groovy.d";

/// Create the home directory and copy the init scripts into it.
///
/// Existing scripts are overwritten. Returns the home directory.
pub fn prepare_home(workspace: &Workspace) -> Result<PathBuf> {
    let layout = workspace.layout();
    let home = workspace.resolve(&layout.home_dir);
    let init_dir = home.join(INIT_SCRIPTS_DIR);
    fs::create_dir_all(&init_dir).map_err(|e| Error::io(&init_dir, e))?;

    for script in &layout.init_scripts {
        let source = workspace.resolve(&script.source);
        let target = init_dir.join(&script.target);
        fs::copy(&source, &target).map_err(|e| Error::io(&source, e))?;
        debug!(
            source = %source.display(),
            target = %target.display(),
            "Installed init script"
        );
    }

    Ok(home)
}
