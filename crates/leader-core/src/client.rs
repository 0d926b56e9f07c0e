//! Jenkins REST client
//!
//! Blocking, authenticated access to the three endpoints the bootstrap
//! consumes: the root page (readiness), the plugin manager listing and the
//! CLI jar download.

use std::collections::HashSet;
use std::fs::{self, File};
use std::path::Path;

use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::probe::AvailabilityProbe;
use crate::reconcile::PluginInventory;
use crate::{Error, Result};

/// Installed plugins, one level deep to keep the payload small
pub const PLUGIN_MANAGER_ENDPOINT: &str = "pluginManager/api/json?depth=1";

#[derive(Debug, Deserialize)]
struct PluginManagerPayload {
    plugins: Vec<InstalledPlugin>,
}

#[derive(Debug, Deserialize)]
struct InstalledPlugin {
    #[serde(rename = "shortName")]
    short_name: String,
    #[serde(default)]
    version: Option<String>,
}

/// Authenticated HTTP access to the Jenkins server
pub struct JenkinsClient<'a> {
    config: &'a Config,
    http: Client,
}

impl<'a> JenkinsClient<'a> {
    /// Build a client with the transport's default timeouts
    pub fn new(config: &'a Config) -> Result<Self> {
        let http = Client::builder().build().map_err(Error::HttpClient)?;
        Ok(Self { config, http })
    }

    fn get(&self, url: Url) -> reqwest::Result<Response> {
        let credentials = self.config.credentials();
        self.http
            .get(url)
            .basic_auth(credentials.user(), Some(credentials.secret()))
            .send()
    }

    /// GET an endpoint and require a success status
    fn get_ok(&self, path: &str) -> Result<(String, Response)> {
        let url = self.config.endpoint(path)?;
        let endpoint = url.to_string();
        let response = self
            .get(url)
            .map_err(|source| Error::UpstreamUnreachable {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus {
                endpoint,
                status: status.as_u16(),
            });
        }
        Ok((endpoint, response))
    }

    /// Stream an endpoint's body into `dest`.
    ///
    /// The body lands in a `.part` sibling first and is renamed into place
    /// once complete. Returns the number of bytes written.
    pub fn download(&self, path: &str, dest: &Path) -> Result<u64> {
        let (endpoint, mut response) = self.get_ok(path)?;

        let mut part_name = dest.file_name().unwrap_or_default().to_os_string();
        part_name.push(".part");
        let partial = dest.with_file_name(part_name);

        let mut file = File::create(&partial).map_err(|e| Error::io(&partial, e))?;
        let bytes = response
            .copy_to(&mut file)
            .map_err(|source| Error::UpstreamUnreachable { endpoint, source })?;
        file.sync_all().map_err(|e| Error::io(&partial, e))?;
        drop(file);

        fs::rename(&partial, dest).map_err(|e| Error::io(dest, e))?;
        debug!(dest = %dest.display(), bytes, "Download complete");
        Ok(bytes)
    }
}

impl AvailabilityProbe for JenkinsClient<'_> {
    fn is_available(&self) -> bool {
        match self.get(self.config.base_url().clone()) {
            Ok(response) => {
                let status = response.status();
                debug!(status = status.as_u16(), "Probe answered");
                status == StatusCode::OK
            }
            Err(e) => {
                debug!(error = %e, "Probe could not connect");
                false
            }
        }
    }
}

impl PluginInventory for JenkinsClient<'_> {
    fn installed_plugins(&self) -> Result<HashSet<String>> {
        let (endpoint, response) = self.get_ok(PLUGIN_MANAGER_ENDPOINT)?;

        let body = response.text().map_err(|e| Error::UpstreamPayload {
            endpoint: endpoint.clone(),
            message: e.to_string(),
        })?;
        let payload: PluginManagerPayload =
            serde_json::from_str(&body).map_err(|e| Error::UpstreamPayload {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        for plugin in &payload.plugins {
            debug!(
                plugin = %plugin.short_name,
                version = plugin.version.as_deref().unwrap_or("unknown"),
                "Installed plugin"
            );
        }

        Ok(payload
            .plugins
            .into_iter()
            .map(|plugin| plugin.short_name)
            .collect())
    }
}
