// ABOUTME: Runs preference commands through a shell and captures their output.
// ABOUTME: The CommandRunner trait is the seam tests replace with an in-memory store.

use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Shell used to interpret command strings.
pub const DEFAULT_SHELL: &str = "/bin/zsh";

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Executes a command line and blocks until it exits.
pub trait CommandRunner {
    fn run(&self, command_line: &str) -> io::Result<CommandOutput>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, command_line: &str) -> io::Result<CommandOutput> {
        (**self).run(command_line)
    }
}

/// Runs commands as `<shell> -c <command_line>`.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: PathBuf,
}

impl ShellRunner {
    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    pub fn shell(&self) -> &std::path::Path {
        &self.shell
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command_line: &str) -> io::Result<CommandOutput> {
        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(command_line)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_shell_is_a_launch_error() {
        let runner = ShellRunner::new("/nonexistent/shell-for-hudtoggle-tests");
        assert!(runner.run("true").is_err());
    }

    #[test]
    fn shell_runner_captures_stdout_and_status() {
        let runner = ShellRunner::new("/bin/sh");
        let out = runner.run("echo 1; echo oops >&2; exit 3").unwrap();
        assert!(!out.success);
        assert_eq!(out.code, Some(3));
        assert_eq!(out.stdout.trim(), "1");
        assert_eq!(out.stderr.trim(), "oops");
    }
}
