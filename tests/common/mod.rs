#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use assert_cmd::prelude::*;

/// Header template used by most fixtures.
pub const TEMPLATE: &str = "//\n//  {{file.name.ext}}\n//  Copyright {{date.year}} {{company}}\n//";

/// Changelog with three releases, newest first.
pub const CHANGELOG: &str = "# Changelog\n\n## v.1.2.0\n- Added \"dark mode\"\n- Run ``pod install``\n\n## v.1.1.0\n- Fixed crash on launch\n\n## v.1.0.0\n- Initial release\n";

/// Writes `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> Result<PathBuf> {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(path)
}

pub fn read_file(root: &Path, relative: &str) -> Result<String> {
  let path = root.join(relative);
  fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Creates a small iOS-style project: a headers directory with the template,
/// sources with and without headers, and a Pods directory to ignore.
pub fn setup_project(root: &Path) -> Result<()> {
  write_file(root, "dir_headers/copyright.txt", TEMPLATE)?;
  write_file(root, "App/AppDelegate.swift", "import UIKit\n\nclass AppDelegate {}\n")?;
  write_file(
    root,
    "App/ViewController.swift",
    "//\n//  ViewController.swift\n//  Copyright 2019 Old Owner\n//\n\nimport UIKit\n",
  )?;
  write_file(root, "App/Bridge.h", "#import <Foundation/Foundation.h>\n")?;
  write_file(root, "App/Info.plist", "<plist></plist>\n")?;
  write_file(root, "Pods/Vendor/Vendor.swift", "public struct Vendor {}\n")?;
  Ok(())
}

/// The shipwright binary, run from `dir` without picking up a user config.
pub fn shipwright(dir: &Path) -> Result<Command> {
  let mut cmd = Command::cargo_bin("shipwright")?;
  cmd.current_dir(dir).env_remove("SHIPWRIGHT_CONFIG").env_remove("RUST_LOG");
  Ok(cmd)
}
