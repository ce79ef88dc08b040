//! # Filesystem Utilities
//!
//! Small filesystem helpers shared by the commands: recursive file listing
//! with name filters, path validation and deletion.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::Pattern;
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use crate::error::{BuildError, BuildResult};

/// Options for [`list_files`].
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
  /// Base names or glob patterns; matching entries are skipped with their
  /// whole subtree.
  pub ignored: Vec<String>,

  /// Extensions with their leading dot (e.g. `.swift`). Empty means every
  /// file. Only applied to files.
  pub extensions: Vec<String>,

  /// Also list directories, each before its contents.
  pub include_dirs: bool,
}

impl ListOptions {
  pub fn with_ignored<I, S>(mut self, ignored: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.ignored.extend(ignored.into_iter().map(Into::into));
    self
  }

  pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.extensions.extend(extensions.into_iter().map(Into::into));
    self
  }

  pub const fn with_dirs(mut self, include_dirs: bool) -> Self {
    self.include_dirs = include_dirs;
    self
  }
}

/// Compiled form of an ignored entry.
enum NameMatcher {
  Exact(String),
  Glob(Pattern),
}

impl NameMatcher {
  fn parse(entry: &str) -> Result<Self> {
    if entry.contains(['*', '?', '[']) {
      let pattern = Pattern::new(entry).with_context(|| format!("Invalid ignore pattern: {}", entry))?;
      Ok(Self::Glob(pattern))
    } else {
      Ok(Self::Exact(entry.to_string()))
    }
  }

  fn matches(&self, name: &str) -> bool {
    match self {
      Self::Exact(exact) => exact == name,
      Self::Glob(pattern) => pattern.matches(name),
    }
  }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
  if extensions.is_empty() {
    return true;
  }

  let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
    return false;
  };
  extensions
    .iter()
    .any(|wanted| wanted.strip_prefix('.').unwrap_or(wanted) == ext)
}

/// Dotfiles and dot-directories below the root (`.git`, `.build`, ...).
/// The root itself may be `.` and is never hidden.
fn is_hidden(entry: &DirEntry) -> bool {
  let hidden = entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.');
  if hidden {
    trace!("Skipping hidden entry: {}", entry.path().display());
  }
  hidden
}

/// Lists the entries below `root` in a deterministic order.
///
/// Entries of each directory are visited sorted by file name. `root` itself
/// is never part of the result. Hidden entries are skipped with their
/// subtree.
///
/// # Errors
///
/// Fails if `root` does not exist, an ignored pattern is not a valid glob, or
/// a directory cannot be read.
pub fn list_files(root: &Path, options: &ListOptions) -> Result<Vec<PathBuf>> {
  let root = resolve_path(root)?;
  let matchers = options
    .ignored
    .iter()
    .map(|entry| NameMatcher::parse(entry))
    .collect::<Result<Vec<_>>>()?;

  let is_ignored = |entry: &DirEntry| {
    let name = entry.file_name().to_string_lossy();
    let ignored = matchers.iter().any(|matcher| matcher.matches(&name));
    if ignored {
      trace!("Skipping ignored entry: {}", entry.path().display());
    }
    ignored
  };

  let mut files = Vec::new();
  let walker = WalkDir::new(&root)
    .min_depth(1)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|entry| !is_hidden(entry) && !is_ignored(entry));

  for entry in walker {
    let entry = entry.with_context(|| format!("Failed to list directory: {}", root.display()))?;
    let file_type = entry.file_type();

    if file_type.is_dir() {
      if options.include_dirs {
        files.push(entry.into_path());
      }
    } else if has_extension(entry.path(), &options.extensions) {
      files.push(entry.into_path());
    }
  }

  debug!("Listed {} entries under {}", files.len(), root.display());
  Ok(files)
}

/// Whether a file or directory exists at `path`.
pub fn path_exists(path: &Path) -> bool {
  path.exists()
}

/// Returns `path` unchanged if it exists.
pub fn resolve_path(path: &Path) -> BuildResult<PathBuf> {
  if path_exists(path) {
    Ok(path.to_path_buf())
  } else {
    Err(BuildError::missing_path(path))
  }
}

/// Deletes a file, or a directory with everything in it. Missing paths are
/// ignored.
pub fn delete_path(path: &Path) -> Result<()> {
  let metadata = match fs::symlink_metadata(path) {
    Ok(metadata) => metadata,
    Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
    Err(err) => return Err(err).with_context(|| format!("Failed to inspect path: {}", path.display())),
  };

  debug!("Deleting {}", path.display());
  if metadata.is_dir() {
    fs::remove_dir_all(path).with_context(|| format!("Failed to delete directory: {}", path.display()))
  } else {
    fs::remove_file(path).with_context(|| format!("Failed to delete file: {}", path.display()))
  }
}

#[cfg(test)]
mod tests {
  use tempfile::tempdir;

  use super::*;

  fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, "").expect("write file");
  }

  fn relative(root: &Path, paths: &[PathBuf]) -> Vec<String> {
    paths
      .iter()
      .map(|path| path.strip_prefix(root).expect("under root").to_string_lossy().replace('\\', "/"))
      .collect()
  }

  #[test]
  fn test_list_files_sorted() -> Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    touch(root, "b.swift");
    touch(root, "a.swift");
    touch(root, "Sources/c.m");

    let files = list_files(root, &ListOptions::default())?;
    assert_eq!(relative(root, &files), vec!["Sources/c.m", "a.swift", "b.swift"]);
    Ok(())
  }

  #[test]
  fn test_list_files_extensions() -> Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    touch(root, "a.swift");
    touch(root, "b.h");
    touch(root, "c.txt");
    touch(root, "Makefile");

    let options = ListOptions::default().with_extensions([".swift", ".h"]);
    let files = list_files(root, &options)?;
    assert_eq!(relative(root, &files), vec!["a.swift", "b.h"]);
    Ok(())
  }

  #[test]
  fn test_list_files_ignored_subtree() -> Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    touch(root, "Pods/Vendor/v.swift");
    touch(root, "App/main.swift");
    touch(root, "App/Generated.g.swift");

    let options = ListOptions::default().with_ignored(["Pods", "*.g.swift"]);
    let files = list_files(root, &options)?;
    assert_eq!(relative(root, &files), vec!["App/main.swift"]);
    Ok(())
  }

  #[test]
  fn test_list_files_skips_hidden_entries() -> Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    touch(root, ".git/HEAD");
    touch(root, ".git/hooks/pre-commit");
    touch(root, ".hidden.swift");
    touch(root, "App/.build/cache.swift");
    touch(root, "App/main.swift");

    let files = list_files(root, &ListOptions::default().with_dirs(true))?;
    assert_eq!(relative(root, &files), vec!["App", "App/main.swift"]);
    Ok(())
  }

  #[test]
  fn test_list_files_from_dot_root() -> Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    touch(root, ".git/HEAD");
    touch(root, "main.swift");

    let files = list_files(&root.join("."), &ListOptions::default())?;
    let names: Vec<_> = files
      .iter()
      .map(|path| path.file_name().expect("file name").to_string_lossy().into_owned())
      .collect();
    assert_eq!(names, vec!["main.swift"]);
    Ok(())
  }

  #[test]
  fn test_list_files_include_dirs() -> Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    touch(root, "App/main.swift");
    touch(root, "z.swift");

    let options = ListOptions::default().with_dirs(true).with_extensions([".swift"]);
    let files = list_files(root, &options)?;
    assert_eq!(relative(root, &files), vec!["App", "App/main.swift", "z.swift"]);
    Ok(())
  }

  #[test]
  fn test_list_files_missing_root() {
    let temp_dir = tempdir().expect("temp dir");
    let err = list_files(&temp_dir.path().join("absent"), &ListOptions::default()).expect_err("missing root");
    assert!(err.downcast_ref::<BuildError>().is_some());
  }

  #[test]
  fn test_invalid_glob_is_rejected() {
    let temp_dir = tempdir().expect("temp dir");
    let options = ListOptions::default().with_ignored(["[unclosed"]);
    assert!(list_files(temp_dir.path(), &options).is_err());
  }

  #[test]
  fn test_resolve_path() -> Result<()> {
    let temp_dir = tempdir()?;
    let present = temp_dir.path().join("copyright.txt");
    fs::write(&present, "// header")?;

    assert_eq!(resolve_path(&present)?, present);

    let absent = temp_dir.path().join("absent.txt");
    let err = resolve_path(&absent).expect_err("absent");
    assert_eq!(err.message(), format!("File doesn't exist: '{}'", absent.display()));
    Ok(())
  }

  #[test]
  fn test_delete_path() -> Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    touch(root, "build/out/a.o");
    touch(root, "log.txt");

    delete_path(&root.join("build"))?;
    delete_path(&root.join("log.txt"))?;
    delete_path(&root.join("never-existed"))?;

    assert!(!path_exists(&root.join("build")));
    assert!(!path_exists(&root.join("log.txt")));
    Ok(())
  }
}
