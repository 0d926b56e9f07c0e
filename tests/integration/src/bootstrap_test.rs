//! End-to-end bootstrap against a mock Jenkins
//!
//! The HTTP side (probe, CLI jar, plugin manager) talks to a real server via
//! httpmock. Container commands go to a recording runner and sleeps are
//! recorded instead of taken.

use std::path::Path;

use httpmock::prelude::*;
use leader_core::{
    Bootstrap, CliJarFetcher, Collaborators, ComposeCli, ComposeServices, Config, DesiredState,
    Error, JenkinsClient, Stage, exit_code,
};
use leader_test_utils::{RecordingRunner, RecordingSleeper, TestProject};
use pretty_assertions::assert_eq;
use serde_json::json;

struct Jenkins {
    server: MockServer,
}

impl Jenkins {
    fn start() -> Self {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/").header_exists("authorization");
            then.status(200).body("<html/>");
        });
        Self { server }
    }

    fn serve_jar(&self) -> httpmock::Mock<'_> {
        self.server.mock(|when, then| {
            when.method(GET).path("/jnlpJars/jenkins-cli.jar");
            then.status(200).body("JAR");
        })
    }

    fn serve_plugins(&self, installed: &[&str]) -> httpmock::Mock<'_> {
        let plugins: Vec<_> = installed
            .iter()
            .map(|id| json!({"shortName": id, "version": "1.0", "active": true}))
            .collect();
        self.server.mock(|when, then| {
            when.method(GET)
                .path("/pluginManager/api/json")
                .query_param("depth", "1");
            then.status(200).json_body(json!({ "plugins": plugins }));
        })
    }

    fn url(&self) -> String {
        self.server.base_url()
    }
}

/// Run a full bootstrap with real HTTP and recorded container commands
fn bootstrap(config: &Config, runner: &RecordingRunner) -> leader_core::Result<Vec<Stage>> {
    let workspace = config.workspace();
    let desired =
        DesiredState::load(&workspace.resolve(&workspace.layout().plugins_file)).unwrap();
    let client = JenkinsClient::new(config).unwrap();
    let services = ComposeServices::new(workspace, runner);
    let cli = ComposeCli::new(workspace, config.credentials(), runner);
    let artifacts = CliJarFetcher::new(workspace, &client);
    let sleeper = RecordingSleeper::new();

    let report = Bootstrap::new(
        config,
        &desired,
        Collaborators {
            services: &services,
            probe: &client,
            sleeper: &sleeper,
            artifacts: &artifacts,
            cli: &cli,
            inventory: &client,
        },
    )
    .run()?;

    assert_eq!(report.probe_attempts, 1);
    assert_eq!(sleeper.count(), 0);
    Ok(report.stages)
}

/// The trailing CLI command of each invocation that went through the sidecar
fn cli_commands(runner: &RecordingRunner) -> Vec<Vec<String>> {
    runner
        .arg_lists()
        .into_iter()
        .filter_map(|args| {
            let auth = args.iter().position(|a| a == "-auth")?;
            Some(args[auth + 2..].to_vec())
        })
        .collect()
}

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_fresh_bootstrap_converges_and_creates_seed_job() {
    let jenkins = Jenkins::start();
    let jar = jenkins.serve_jar();
    let plugins = jenkins.serve_plugins(&["git", "credentials", "structs"]);
    let project = TestProject::new().with_plugins(&["git", "credentials"]);
    let config = project.config(&jenkins.url());
    let runner = RecordingRunner::new();

    let stages = bootstrap(&config, &runner).unwrap();

    assert_eq!(stages.last(), Some(&Stage::Done));
    jar.assert();
    plugins.assert();
    assert_eq!(
        std::fs::read_to_string(project.root().join("cli/jenkins-cli.jar")).unwrap(),
        "JAR"
    );
    assert!(!project.root().join("cli/jenkins-cli.jar.part").exists());
    assert!(
        project
            .root()
            .join("jenkins_home/init.groovy.d/admin_user.groovy")
            .is_file()
    );

    let args = runner.arg_lists();
    assert_eq!(args[0], strings(&["up", "-d", "jenkins"]));
    assert_eq!(args[1], strings(&["up", "-d", "cli"]));
    assert_eq!(
        cli_commands(&runner),
        vec![
            strings(&["install-plugin", "git", "-deploy"]),
            strings(&["install-plugin", "credentials", "-deploy"]),
            strings(&["create-job", "seed"]),
        ]
    );
    let create = runner.invocations().pop().unwrap();
    assert_eq!(
        create.get_stdin(),
        Some(project.root().join("seed-job.xml").as_path())
    );
}

#[test]
fn test_missing_plugin_fails_with_convergence_code() {
    let jenkins = Jenkins::start();
    jenkins.serve_jar();
    jenkins.serve_plugins(&["git", "credentials"]);
    let project =
        TestProject::new().with_plugins(&["git", "credentials", "workflow-aggregator"]);
    let config = project.config(&jenkins.url());
    let runner = RecordingRunner::new();

    let err = bootstrap(&config, &runner).unwrap_err();

    assert_eq!(err.exit_code(), exit_code::CONVERGENCE);
    assert!(
        matches!(&err, Error::ConvergenceFailed { missing } if missing == &strings(&["workflow-aggregator"]))
    );
    assert!(
        err.to_string()
            .contains("All required plugins were not installed")
    );
    let commands = cli_commands(&runner);
    assert_eq!(commands.len(), 3);
    assert!(commands.iter().all(|c| c[0] == "install-plugin"));
}

#[test]
fn test_plugin_manager_outage_fails_with_upstream_code() {
    let jenkins = Jenkins::start();
    jenkins.serve_jar();
    jenkins.server.mock(|when, then| {
        when.method(GET).path("/pluginManager/api/json");
        then.status(503);
    });
    let project = TestProject::new().with_plugins(&["git"]);
    let config = project.config(&jenkins.url());
    let runner = RecordingRunner::new();

    let err = bootstrap(&config, &runner).unwrap_err();

    assert_eq!(err.exit_code(), exit_code::UPSTREAM_API);
    assert!(matches!(err, Error::UpstreamStatus { status: 503, .. }));
    assert!(
        !cli_commands(&runner)
            .iter()
            .any(|c| c[0] == "create-job")
    );
}

#[test]
fn test_existing_cli_jar_is_reused() {
    let jenkins = Jenkins::start();
    let jar = jenkins.serve_jar();
    jenkins.serve_plugins(&["git"]);
    let project = TestProject::new().with_plugins(&["git"]);
    project.write(Path::new("cli/jenkins-cli.jar"), "cached");
    let config = project.config(&jenkins.url());
    let runner = RecordingRunner::new();

    bootstrap(&config, &runner).unwrap();

    jar.assert_hits(0);
    assert_eq!(
        std::fs::read_to_string(project.root().join("cli/jenkins-cli.jar")).unwrap(),
        "cached"
    );
}

#[test]
fn test_second_run_is_idempotent_up_to_seed_job() {
    let jenkins = Jenkins::start();
    jenkins.serve_jar();
    let plugins = jenkins.serve_plugins(&["git"]);
    let project = TestProject::new().with_plugins(&["git"]);
    let config = project.config(&jenkins.url());

    let first = RecordingRunner::new();
    let second = RecordingRunner::new();
    bootstrap(&config, &first).unwrap();
    bootstrap(&config, &second).unwrap();

    plugins.assert_hits(2);
    assert_eq!(first.arg_lists(), second.arg_lists());
}
