//! Plugin installation driver
//!
//! The install command does not reliably report per-plugin success, so
//! outcomes are not inspected here. [`crate::Reconciler`] decides afterwards
//! whether installation converged.

use tracing::{info, warn};

use crate::remote::RemoteCli;

/// Issues one install command per plugin, sequentially and in order
pub struct Installer<'a> {
    cli: &'a dyn RemoteCli,
}

impl<'a> Installer<'a> {
    pub fn new(cli: &'a dyn RemoteCli) -> Self {
        Self { cli }
    }

    /// Submit every plugin in `ids`. Failures are logged and skipped.
    pub fn install(&self, ids: &[String]) {
        info!(count = ids.len(), "Installing plugins");
        for id in ids {
            if let Err(e) = self.cli.install_plugin(id) {
                warn!(plugin = %id, error = %e, "Install command failed");
            }
        }
    }
}
