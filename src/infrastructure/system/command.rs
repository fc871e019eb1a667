use std::fmt;
use std::process::Command;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
}

/// A program plus its arguments, exactly as they reach the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Outcome of one external invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// -1 when the process was terminated without an exit code.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

pub trait CommandRunner {
    /// Run the command to completion and capture its output.
    fn run(&self, command: &CommandLine) -> Result<CommandResult, CommandError>;
}

/// Runs commands as child processes of this one.
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, command: &CommandLine) -> Result<CommandResult, CommandError> {
        let mut process = Command::new(&command.program);
        append_args(&mut process, &command.args);

        tracing::debug!(command = %command, "Running command");

        let output = process.output().map_err(|e| CommandError::Spawn {
            program: command.program.clone(),
            source: e,
        })?;

        let result = CommandResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        tracing::debug!(command = %command, exit_code = result.exit_code, "Command finished");
        Ok(result)
    }
}

// netsh parses its own command line, so `name="Ethernet 2"` must arrive
// verbatim rather than re-quoted by the standard library.
#[cfg(windows)]
fn append_args(process: &mut Command, args: &[String]) {
    use std::os::windows::process::CommandExt;

    for arg in args {
        process.raw_arg(arg);
    }
}

#[cfg(not(windows))]
fn append_args(process: &mut Command, args: &[String]) {
    process.args(args);
}
