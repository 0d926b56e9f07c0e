//! Desired plugin set
//!
//! Loaded once from the plugins file and never mutated afterwards.

use std::path::Path;

use crate::{Error, Result};

/// Ordered list of plugin identifiers the leader must end up with.
///
/// Duplicates are kept as written; blank lines are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredState {
    plugins: Vec<String>,
}

impl DesiredState {
    /// Build from identifiers already in memory
    pub fn from_plugins<I, S>(plugins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            plugins: plugins.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a line-oriented plugin list
    pub fn parse(content: &str) -> Self {
        Self::from_plugins(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty()),
        )
    }

    /// Read and parse the plugins file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let desired = Self::parse(&content);
        tracing::debug!(
            path = %path.display(),
            count = desired.len(),
            "Loaded desired plugins"
        );
        Ok(desired)
    }

    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
