//! # Error Module
//!
//! Every build rule that shipwright enforces fails the same way: with a
//! [`BuildError`] carrying a human-readable message. There are no error codes;
//! the message is the diagnostic, and the caller is expected to fix the input
//! and run again.
//!
//! The `fail_*` helpers mirror the checks scripts tend to sprinkle around
//! ("fail unless this file exists", "fail if the count is wrong") but return
//! values instead of unwinding, so they compose with `?`.

use std::path::Path;

/// A violated build rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Build failed! {message}")]
pub struct BuildError {
  message: String,
}

impl BuildError {
  /// Creates a new error with the given message.
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }

  /// The message without the `Build failed!` prefix.
  pub fn message(&self) -> &str {
    &self.message
  }

  /// Error reported when a required file or directory is missing.
  pub fn missing_path(path: &Path) -> Self {
    Self::new(format!("File doesn't exist: '{}'", path.display()))
  }
}

/// Result alias for operations that can only fail with a [`BuildError`].
pub type BuildResult<T> = std::result::Result<T, BuildError>;

/// Returns a [`BuildError`] with the given message.
pub fn fail_script(message: impl Into<String>) -> BuildError {
  BuildError::new(message)
}

/// Fails when `condition` holds.
pub fn fail_script_if(condition: bool, message: impl Into<String>) -> BuildResult<()> {
  if condition { Err(fail_script(message)) } else { Ok(()) }
}

/// Fails unless `condition` holds.
pub fn fail_script_unless(condition: bool, message: impl Into<String>) -> BuildResult<()> {
  fail_script_if(!condition, message)
}

/// Unwraps a required value, failing with "Value is nil" when it is absent.
pub fn require_some<T>(value: Option<T>) -> BuildResult<T> {
  value.ok_or_else(|| fail_script("Value is nil"))
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use super::*;

  #[test]
  fn test_display_has_prefix() {
    let err = fail_script("Unexpected apps count: 2");
    assert_eq!(err.to_string(), "Build failed! Unexpected apps count: 2");
    assert_eq!(err.message(), "Unexpected apps count: 2");
  }

  #[test]
  fn test_fail_script_if() {
    assert!(fail_script_if(false, "never").is_ok());

    let err = fail_script_if(true, "boom").expect_err("condition holds");
    assert_eq!(err.message(), "boom");
  }

  #[test]
  fn test_fail_script_unless() {
    assert!(fail_script_unless(true, "never").is_ok());
    assert!(fail_script_unless(false, "boom").is_err());
  }

  #[test]
  fn test_require_some() {
    assert_eq!(require_some(Some(3)).expect("present"), 3);

    let err = require_some::<u8>(None).expect_err("absent");
    assert_eq!(err.message(), "Value is nil");
  }

  #[test]
  fn test_missing_path_message() {
    let err = BuildError::missing_path(&PathBuf::from("headers/copyright.txt"));
    assert_eq!(err.message(), "File doesn't exist: 'headers/copyright.txt'");
  }

  #[test]
  fn test_converts_into_anyhow() {
    let result: anyhow::Result<()> = Err(fail_script("boom").into());
    let err = result.expect_err("error");
    assert!(err.downcast_ref::<BuildError>().is_some());
  }
}
