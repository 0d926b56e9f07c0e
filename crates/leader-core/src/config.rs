//! Bootstrap configuration
//!
//! A single immutable [`Config`] is built once at process entry and passed by
//! reference into every component. Nothing below the entry point reads the
//! process environment.
//!
//! Project layout and poll tuning come from an optional `leader.toml` in the
//! project directory:
//!
//! ```toml
//! [layout]
//! plugins_file = "jenkins_plugins.txt"
//! compose_command = ["docker", "compose"]
//!
//! [poll]
//! interval_secs = 5
//! max_attempts = 10
//! settle_secs = 10
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::{Error, Result};

/// Settings file looked up in the project directory when none is given
pub const DEFAULT_SETTINGS_FILE: &str = "leader.toml";

/// Username and secret for every authenticated call.
///
/// The secret is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    secret: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            secret: secret.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// `user:secret`, as the Jenkins CLI `-auth` option expects it
    pub fn cli_auth(&self) -> String {
        format!("{}:{}", self.user, self.secret)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("secret", &"***")
            .finish()
    }
}

/// Timing for the availability poll loops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PollPolicy {
    /// Sleep between two probes
    pub interval_secs: u64,
    /// Probe cap for the bounded (post-restart) loop
    pub max_attempts: u32,
    /// Grace sleep after the bounded loop succeeds
    pub settle_secs: u64,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            max_attempts: 10,
            settle_secs: 10,
        }
    }
}

impl PollPolicy {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }
}

/// A script copied into `init.groovy.d` before the server starts
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InitScript {
    /// Source file, relative to the project directory
    pub source: PathBuf,
    /// File name inside `init.groovy.d`
    pub target: String,
}

impl InitScript {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Where things live in the project directory and how the containers are named
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Layout {
    /// Desired plugins, one identifier per line
    pub plugins_file: PathBuf,
    /// Jenkins home mounted into the server container
    pub home_dir: PathBuf,
    /// Directory receiving the CLI jar, mounted into the sidecar
    pub cli_dir: PathBuf,
    /// CLI jar file name, both on disk and inside the sidecar
    pub cli_jar: String,
    /// Job definition piped into `create-job`
    pub seed_job_file: PathBuf,
    /// Name of the seed job
    pub seed_job_name: String,
    /// Scripts copied into `init.groovy.d`
    pub init_scripts: Vec<InitScript>,
    /// Container tool invocation, e.g. `["docker", "compose"]`
    pub compose_command: Vec<String>,
    /// Compose service running the Jenkins server
    pub server_service: String,
    /// Compose service running the CLI sidecar
    pub cli_service: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            plugins_file: PathBuf::from("jenkins_plugins.txt"),
            home_dir: PathBuf::from("jenkins_home"),
            cli_dir: PathBuf::from("cli"),
            cli_jar: "jenkins-cli.jar".to_string(),
            seed_job_file: PathBuf::from("seed-job.xml"),
            seed_job_name: "seed".to_string(),
            init_scripts: vec![
                InitScript::new("jenkins_admin_user.groovy", "admin_user.groovy"),
                InitScript::new("jenkins_csrf.groovy", "csrf.groovy"),
                InitScript::new("jenkins_harden.groovy", "harden.groovy"),
            ],
            compose_command: vec!["docker-compose".to_string()],
            server_service: "jenkins".to_string(),
            cli_service: "cli".to_string(),
        }
    }
}

/// Contents of `leader.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub layout: Layout,
    pub poll: PollPolicy,
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let settings: Settings = toml::from_str(&content).map_err(|e| Error::SettingsParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        settings.validate()?;

        tracing::debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Reject values the loops and command builders cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.poll.max_attempts == 0 {
            return Err(Error::config("poll.max_attempts must be at least 1"));
        }
        if self.layout.compose_command.is_empty() {
            return Err(Error::config("layout.compose_command must not be empty"));
        }
        if self.layout.seed_job_name.trim().is_empty() {
            return Err(Error::config("layout.seed_job_name must not be empty"));
        }
        Ok(())
    }
}

/// The project directory together with its settings.
///
/// Everything that only touches local files and containers needs this and
/// nothing more, which is why teardown works without server credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    project_dir: PathBuf,
    settings: Settings,
}

impl Workspace {
    pub fn new(project_dir: impl Into<PathBuf>, settings: Settings) -> Self {
        Self {
            project_dir: project_dir.into(),
            settings,
        }
    }

    /// Load settings from `settings_file` (relative paths resolve against `project_dir`)
    pub fn load(project_dir: impl Into<PathBuf>, settings_file: &Path) -> Result<Self> {
        let project_dir = project_dir.into();
        let settings = Settings::load(&project_dir.join(settings_file))?;
        Ok(Self::new(project_dir, settings))
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn layout(&self) -> &Layout {
        &self.settings.layout
    }

    pub fn poll(&self) -> &PollPolicy {
        &self.settings.poll
    }

    /// Resolve a layout path against the project directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.project_dir.join(path)
    }
}

/// Everything a bootstrap run needs, built once at process entry
#[derive(Debug, Clone)]
pub struct Config {
    base_url: Url,
    credentials: Credentials,
    workspace: Workspace,
}

impl Config {
    /// Build a configuration for the server at `base_url`.
    ///
    /// The URL is normalized to end with `/` so that endpoint paths join
    /// below it rather than replacing its last segment.
    pub fn new(base_url: &str, credentials: Credentials, workspace: Workspace) -> Result<Self> {
        let mut url = Url::parse(base_url.trim())
            .map_err(|e| Error::config(format!("invalid Jenkins URL '{}': {}", base_url, e)))?;

        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "Jenkins URL must be an http(s) URL, got '{}'",
                base_url
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        if credentials.user().is_empty() {
            return Err(Error::config("Jenkins user must not be empty"));
        }

        Ok(Self {
            base_url: url,
            credentials,
            workspace,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Absolute URL for an endpoint path relative to the server root
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::config(format!("invalid endpoint '{}': {}", path, e)))
    }
}
