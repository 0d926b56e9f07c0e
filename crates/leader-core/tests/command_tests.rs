//! Command lines built for the container tool and the sidecar CLI.

use std::path::Path;

use leader_core::{
    CommandOutput, ComposeCli, ComposeServices, Error, Layout, RemoteCli, Services, destroy,
    exit_code,
};
use leader_test_utils::{RecordingRunner, TestProject};
use pretty_assertions::assert_eq;

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn start_server_prepares_home_then_runs_compose_up() {
    let project = TestProject::new();
    let workspace = project.workspace();
    let runner = RecordingRunner::new();

    ComposeServices::new(&workspace, &runner).start_server().unwrap();

    let invocations = runner.invocations();
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].program(), "docker-compose");
    assert_eq!(invocations[0].get_args(), strings(&["up", "-d", "jenkins"]));
    assert_eq!(invocations[0].get_current_dir(), Some(project.root()));
    for target in ["admin_user.groovy", "csrf.groovy", "harden.groovy"] {
        assert!(
            project
                .root()
                .join("jenkins_home/init.groovy.d")
                .join(target)
                .is_file(),
            "{target} not installed"
        );
    }
}

#[test]
fn compose_command_can_be_multi_word() {
    let project = TestProject::new().with_layout(Layout {
        compose_command: strings(&["docker", "compose"]),
        ..Layout::default()
    });
    let workspace = project.workspace();
    let runner = RecordingRunner::new();
    let services = ComposeServices::new(&workspace, &runner);

    services.start_sidecar().unwrap();
    services.stop_all().unwrap();

    let invocations = runner.invocations();
    assert_eq!(invocations[0].program(), "docker");
    assert_eq!(runner.arg_lists(), vec![
        strings(&["compose", "up", "-d", "cli"]),
        strings(&["compose", "down"]),
    ]);
}

#[test]
fn compose_failure_is_command_error() {
    let project = TestProject::new();
    let workspace = project.workspace();
    let runner = RecordingRunner::new().then(CommandOutput::failed(1, "no such service\n"));

    let err = ComposeServices::new(&workspace, &runner)
        .start_sidecar()
        .unwrap_err();

    match &err {
        Error::CommandFailed { command, code, stderr } => {
            assert_eq!(command, "docker-compose up -d cli");
            assert_eq!(*code, Some(1));
            assert_eq!(stderr, "no such service");
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
    assert_eq!(err.exit_code(), exit_code::COMMAND);
}

#[test]
fn install_plugin_runs_cli_in_sidecar() {
    let project = TestProject::new();
    let config = project.config("http://127.0.0.1:8080");
    let runner = RecordingRunner::new();
    let cli = ComposeCli::new(config.workspace(), config.credentials(), &runner);

    cli.install_plugin("git").unwrap();

    assert_eq!(
        runner.arg_lists(),
        vec![strings(&[
            "exec",
            "-T",
            "cli",
            "java",
            "-jar",
            "jenkins-cli.jar",
            "-auth",
            "admin:s3cret",
            "install-plugin",
            "git",
            "-deploy",
        ])]
    );
    let described = runner.invocations()[0].describe();
    assert!(!described.contains("s3cret"), "secret leaked: {described}");
}

#[test]
fn safe_restart_and_create_job_commands() {
    let project = TestProject::new();
    let config = project.config("http://127.0.0.1:8080");
    let runner = RecordingRunner::new();
    let cli = ComposeCli::new(config.workspace(), config.credentials(), &runner);
    let definition = project.root().join("seed-job.xml");

    cli.safe_restart().unwrap();
    cli.create_job("seed", &definition).unwrap();

    let invocations = runner.invocations();
    assert_eq!(invocations[0].get_args().last().unwrap(), "safe-restart");
    assert_eq!(invocations[0].get_stdin(), None);

    let args = invocations[1].get_args();
    assert_eq!(&args[args.len() - 2..], strings(&["create-job", "seed"]));
    assert_eq!(invocations[1].get_stdin(), Some(definition.as_path()));
}

#[test]
fn destroy_runs_down_and_removes_directories() {
    let project = TestProject::new();
    project.write(Path::new("cli/jenkins-cli.jar"), "jar");
    project.write(Path::new("jenkins_home/config.xml"), "<hudson/>");
    let workspace = project.workspace();
    let runner = RecordingRunner::new();

    destroy(&workspace, &ComposeServices::new(&workspace, &runner)).unwrap();

    assert_eq!(runner.arg_lists(), vec![strings(&["down"])]);
    assert!(!project.root().join("cli").exists());
    assert!(!project.root().join("jenkins_home").exists());
    assert!(project.root().join("seed-job.xml").exists());
}
