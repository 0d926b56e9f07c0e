//! Convergence verification
//!
//! Installation is fire-and-forget; this module decides afterwards whether
//! the server actually has every desired plugin. Verification is a pure
//! function of the desired list and a freshly fetched installed set, so it
//! can be repeated safely.

use std::collections::{BTreeSet, HashSet};

use tracing::info;

use crate::Result;

/// Source of the currently installed plugin set
pub trait PluginInventory {
    /// Fetch the installed plugin identifiers. Never cached.
    fn installed_plugins(&self) -> Result<HashSet<String>>;
}

/// Desired plugins absent from `installed`, sorted and without duplicates
pub fn missing_plugins(desired: &[String], installed: &HashSet<String>) -> Vec<String> {
    desired
        .iter()
        .filter(|id| !installed.contains(id.as_str()))
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Computes the convergence diff against a [`PluginInventory`]
pub struct Reconciler<'a> {
    inventory: &'a dyn PluginInventory,
}

impl<'a> Reconciler<'a> {
    pub fn new(inventory: &'a dyn PluginInventory) -> Self {
        Self { inventory }
    }

    /// Return the desired plugins the server does not report, sorted.
    ///
    /// An empty result means converged. A failed inventory query is returned
    /// as-is; there is no degraded mode.
    pub fn verify(&self, desired: &[String]) -> Result<Vec<String>> {
        let installed = self.inventory.installed_plugins()?;
        let missing = missing_plugins(desired, &installed);
        info!(
            desired = desired.len(),
            installed = installed.len(),
            missing = missing.len(),
            "Verified plugin installation"
        );
        Ok(missing)
    }
}
