//! [`TestProject`] builder for bootstrap scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use leader_core::{Config, Credentials, Layout, Settings, Workspace};
use tempfile::TempDir;

/// A temporary project directory laid out like a real leader checkout.
///
/// # Example
///
/// ```rust,no_run
/// use leader_test_utils::TestProject;
///
/// let project = TestProject::new().with_plugins(&["git", "credentials"]);
/// let config = project.config("http://127.0.0.1:8080");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
    settings: Settings,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create a project with the default layout, its init scripts and a seed job
    pub fn new() -> Self {
        let project = Self {
            temp_dir: TempDir::new().expect("TestProject::new: failed to create temp dir"),
            settings: Settings::default(),
        };
        for script in &project.settings.layout.init_scripts {
            project.write(&script.source, "// init script\n");
        }
        project.write(Path::new("seed-job.xml"), "<project/>\n");
        project
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write the plugins file, one identifier per line
    pub fn with_plugins(self, ids: &[&str]) -> Self {
        let mut content = ids.join("\n");
        content.push('\n');
        self.write(&self.settings.layout.plugins_file, &content);
        self
    }

    /// Replace the layout used by [`TestProject::workspace`]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.settings.layout = layout;
        self
    }

    /// Write `content` to a path relative to the project root
    pub fn write(&self, relative: &Path, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("TestProject::write: failed to create parent");
        }
        fs::write(&path, content).expect("TestProject::write: failed to write file");
        path
    }

    pub fn workspace(&self) -> Workspace {
        Workspace::new(self.root(), self.settings.clone())
    }

    /// Configuration pointing at `url` with fixed test credentials
    pub fn config(&self, url: &str) -> Config {
        Config::new(url, Credentials::new("admin", "s3cret"), self.workspace())
            .expect("TestProject::config: invalid test configuration")
    }
}
