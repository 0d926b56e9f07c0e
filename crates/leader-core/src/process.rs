//! External command execution
//!
//! The container tool and the sidecar CLI are reached through
//! [`CommandRunner`], so command construction can be tested without Docker.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::{Error, Result};

const MASK: &str = "***";

/// A command line to execute.
///
/// Arguments added with [`Invocation::secret_arg`] are masked in
/// [`Invocation::describe`] and in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    masked: Vec<usize>,
    stdin: Option<PathBuf>,
    current_dir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            masked: Vec::new(),
            stdin: None,
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append an argument that must never be printed
    pub fn secret_arg(mut self, arg: impl Into<String>) -> Self {
        self.masked.push(self.args.len());
        self.args.push(arg.into());
        self
    }

    /// Feed the contents of `path` to the command's stdin
    pub fn stdin_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdin = Some(path.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_stdin(&self) -> Option<&Path> {
        self.stdin.as_deref()
    }

    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Printable command line with secret arguments masked
    pub fn describe(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.as_str());
        for (i, arg) in self.args.iter().enumerate() {
            if self.masked.contains(&i) {
                parts.push(MASK);
            } else {
                parts.push(arg.as_str());
            }
        }
        let mut line = parts.join(" ");
        if let Some(stdin) = &self.stdin {
            line.push_str(&format!(" < {}", stdin.display()));
        }
        line
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Invocation").field(&self.describe()).finish()
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Output of a command that exited with status 0
    pub fn ok() -> Self {
        Self {
            code: Some(0),
            ..Self::default()
        }
    }

    /// Output of a command that exited with `code` and wrote `stderr`
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external commands to completion
pub trait CommandRunner {
    /// Run the command and capture its output, whatever its exit status
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;

    /// Run the command and fail with [`Error::CommandFailed`] on a non-zero exit
    fn run_checked(&self, invocation: &Invocation) -> Result<CommandOutput> {
        let output = self.run(invocation)?;
        if output.success() {
            Ok(output)
        } else {
            Err(Error::CommandFailed {
                command: invocation.describe(),
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            })
        }
    }
}

/// [`CommandRunner`] that spawns real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = &invocation.current_dir {
            cmd.current_dir(dir);
        }

        match &invocation.stdin {
            Some(path) => {
                let file = File::open(path).map_err(|e| Error::io(path, e))?;
                cmd.stdin(Stdio::from(file));
            }
            None => {
                cmd.stdin(Stdio::null());
            }
        }

        tracing::debug!(command = %invocation.describe(), "Running command");
        let output = cmd.output().map_err(|source| Error::CommandSpawn {
            command: invocation.describe(),
            source,
        })?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!(
            command = %invocation.describe(),
            code = ?result.code,
            "Command finished"
        );
        Ok(result)
    }
}
