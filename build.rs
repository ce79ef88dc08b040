use std::process::Command;

fn main() {
  embed_git_hash();
  set_rerun_conditions();
}

fn embed_git_hash() {
  // Shown by `shipwright --version`; left unset outside a git checkout.
  if let Ok(output) = Command::new("git").args(["rev-parse", "--short", "HEAD"]).output()
    && output.status.success()
  {
    let git_hash = String::from_utf8(output.stdout).unwrap_or_default().trim().to_string();
    println!("cargo:rustc-env=GIT_HASH={git_hash}");
  }
}

fn set_rerun_conditions() {
  println!("cargo:rerun-if-changed=build.rs");
  println!("cargo:rerun-if-changed=.git/HEAD");
}
