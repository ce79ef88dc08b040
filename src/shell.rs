//! # Shell Module
//!
//! Runs shell command lines and reports their result as a [`ShellOutput`].

use std::process::{Command, Output};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::error::BuildError;
use crate::output::print_progress;

/// Options for [`run_shell_command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellOptions {
  /// Do not announce the command before running it.
  pub silent: bool,

  /// Return the output of a failed command instead of an error.
  pub ignore_failure: bool,
}

/// Result of a finished shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
  pub command: String,
  /// Exit code, `None` when the process was killed by a signal.
  pub exit_code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl ShellOutput {
  fn from_output(command: &str, output: Output) -> Self {
    Self {
      command: command.to_string(),
      exit_code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
  }

  pub fn success(&self) -> bool {
    self.exit_code == Some(0)
  }

  fn failure_message(&self) -> String {
    let status = self
      .exit_code
      .map_or_else(|| "terminated by signal".to_string(), |code| format!("exit code {}", code));

    let mut message = format!("Command failed ({}): {}", status, self.command);
    for stream in [self.stdout.trim_end(), self.stderr.trim_end()] {
      if !stream.is_empty() {
        message.push('\n');
        message.push_str(stream);
      }
    }
    message
  }
}

/// Runs `command` through `sh -c` and captures its output.
///
/// # Errors
///
/// Fails if the shell cannot be started, or with a [`BuildError`] holding
/// the command and its output if it exits unsuccessfully and
/// `options.ignore_failure` is not set.
pub fn run_shell_command(command: &str, options: ShellOptions) -> Result<ShellOutput> {
  if !options.silent {
    print_progress(&format!("Running command: {}", command));
  }
  debug!(command, "Running shell command");

  let output = Command::new("sh")
    .arg("-c")
    .arg(command)
    .output()
    .with_context(|| format!("Failed to start shell for: {}", command))?;
  let result = ShellOutput::from_output(command, output);

  if !result.success() {
    if options.ignore_failure {
      warn!(command, exit_code = ?result.exit_code, "Ignoring failed shell command");
    } else {
      return Err(BuildError::new(result.failure_message()).into());
    }
  }

  Ok(result)
}

#[cfg(all(test, unix))]
mod tests {
  use super::*;

  #[test]
  fn test_captures_stdout() -> Result<()> {
    let output = run_shell_command("echo hello", ShellOptions::default())?;
    assert!(output.success());
    assert_eq!(output.stdout, "hello\n");
    assert_eq!(output.exit_code, Some(0));
    Ok(())
  }

  #[test]
  fn test_failure_is_build_error() {
    let err = run_shell_command("echo oops >&2; exit 3", ShellOptions::default()).expect_err("exit 3");
    let build_err = err.downcast_ref::<BuildError>().expect("build error");
    assert!(build_err.message().contains("exit code 3"));
    assert!(build_err.message().contains("oops"));
  }

  #[test]
  fn test_ignore_failure_returns_output() -> Result<()> {
    let options = ShellOptions {
      silent: true,
      ignore_failure: true,
    };
    let output = run_shell_command("echo partial; exit 1", options)?;
    assert!(!output.success());
    assert_eq!(output.exit_code, Some(1));
    assert_eq!(output.stdout, "partial\n");
    Ok(())
  }
}
