//! Safe restart against a mock Jenkins
//!
//! The availability probe is a real HTTP client; only the sidecar command and
//! the sleeps are recorded.

use std::time::Duration;

use httpmock::prelude::*;
use leader_core::{ComposeCli, Error, JenkinsClient, exit_code, safe_restart};
use leader_test_utils::{RecordingRunner, RecordingSleeper, TestProject};
use pretty_assertions::assert_eq;

#[test]
fn test_restart_waits_for_settle_period() {
    let server = MockServer::start();
    let probe = server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200);
    });
    let project = TestProject::new();
    let config = project.config(&server.base_url());
    let client = JenkinsClient::new(&config).unwrap();
    let runner = RecordingRunner::new();
    let cli = ComposeCli::new(config.workspace(), config.credentials(), &runner);
    let sleeper = RecordingSleeper::new();

    let attempt = safe_restart(&cli, &client, &sleeper, config.workspace().poll()).unwrap();

    assert_eq!(attempt, 1);
    probe.assert_hits(1);
    assert_eq!(sleeper.naps(), vec![Duration::from_secs(10)]);
    assert_eq!(
        runner.arg_lists()[0].last().map(String::as_str),
        Some("safe-restart")
    );
}

#[test]
fn test_restart_gives_up_after_ten_probes() {
    let server = MockServer::start();
    let probe = server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(503);
    });
    let project = TestProject::new();
    let config = project.config(&server.base_url());
    let client = JenkinsClient::new(&config).unwrap();
    let runner = RecordingRunner::new();
    let cli = ComposeCli::new(config.workspace(), config.credentials(), &runner);
    let sleeper = RecordingSleeper::new();

    let err = safe_restart(&cli, &client, &sleeper, config.workspace().poll()).unwrap_err();

    assert!(matches!(err, Error::RestartTimedOut { attempts: 10 }));
    assert_eq!(err.exit_code(), exit_code::RESTART_TIMEOUT);
    probe.assert_hits(10);
    assert_eq!(sleeper.naps(), vec![Duration::from_secs(5); 9]);
}

#[test]
fn test_restart_treats_forbidden_as_not_ready() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(403);
    });
    let project = TestProject::new();
    let config = project.config(&server.base_url());
    let client = JenkinsClient::new(&config).unwrap();
    let runner = RecordingRunner::new();
    let cli = ComposeCli::new(config.workspace(), config.credentials(), &runner);
    let sleeper = RecordingSleeper::new();

    let err = safe_restart(&cli, &client, &sleeper, config.workspace().poll()).unwrap_err();

    assert_eq!(err.exit_code(), exit_code::RESTART_TIMEOUT);
}
