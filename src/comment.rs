//! # Comment Module
//!
//! Comment delimiter conventions used to recognize (and optionally produce)
//! header blocks.
//!
//! A [`CommentStyle`] has an optional line prefix (`//`, `#`, ...) and an
//! optional block pair (`/*` ... `*/`). Header detection accepts either form;
//! header wrapping prefers the block pair when one is defined.
//!
//! A run uses exactly one style, picked through [`StyleSelection`].

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::BuildError;

/// Comment delimiters for one family of languages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommentStyle {
  /// Prefix of a single-line comment (e.g. "//")
  #[serde(default)]
  pub line: Option<String>,

  /// Opening delimiter of a block comment (e.g. "/*")
  #[serde(default)]
  pub block_start: Option<String>,

  /// Closing delimiter of a block comment (e.g. "*/")
  #[serde(default)]
  pub block_end: Option<String>,
}

impl CommentStyle {
  /// A style with only line comments.
  pub fn line(prefix: &str) -> Self {
    Self {
      line: Some(prefix.to_string()),
      block_start: None,
      block_end: None,
    }
  }

  /// A style with only block comments.
  pub fn block(start: &str, end: &str) -> Self {
    Self {
      line: None,
      block_start: Some(start.to_string()),
      block_end: Some(end.to_string()),
    }
  }

  /// A style with both line and block comments.
  pub fn line_and_block(prefix: &str, start: &str, end: &str) -> Self {
    Self {
      line: Some(prefix.to_string()),
      block_start: Some(start.to_string()),
      block_end: Some(end.to_string()),
    }
  }

  /// C family: `//` and `/* */`.
  pub fn c() -> Self {
    Self::line_and_block("//", "/*", "*/")
  }

  /// Shell, Ruby, Python, YAML: `#`.
  pub fn hash() -> Self {
    Self::line("#")
  }

  /// SQL, Haskell, Lua: `--`.
  pub fn dash() -> Self {
    Self::line("--")
  }

  /// HTML and XML: `<!-- -->`.
  pub fn xml() -> Self {
    Self::block("<!--", "-->")
  }

  /// Lisp family: `;;`.
  pub fn semicolon() -> Self {
    Self::line(";;")
  }

  /// Returns the block delimiters when both are configured and non-empty.
  pub fn block_pair(&self) -> Option<(&str, &str)> {
    match (self.block_start.as_deref(), self.block_end.as_deref()) {
      (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => Some((start, end)),
      _ => None,
    }
  }

  /// Returns the line prefix when configured and non-empty.
  pub fn line_prefix(&self) -> Option<&str> {
    self.line.as_deref().filter(|prefix| !prefix.is_empty())
  }

  /// Checks that the style can recognize at least one kind of comment.
  pub fn validate(&self) -> Result<(), BuildError> {
    if self.line_prefix().is_none() && self.block_pair().is_none() {
      return Err(BuildError::new(
        "Comment style needs a line prefix or both block delimiters",
      ));
    }
    Ok(())
  }

  /// Formats plain text as a comment block in this style.
  ///
  /// Block comments get the delimiters on their own lines with the text in
  /// between; line comments prefix every line. Blank lines keep the bare
  /// prefix without trailing whitespace. The result has no trailing newline.
  pub fn wrap(&self, text: &str) -> String {
    let mut lines = Vec::new();

    if let Some((start, end)) = self.block_pair() {
      lines.push(start.to_string());
      for line in text.lines() {
        if line.is_empty() {
          lines.push(String::new());
        } else {
          lines.push(format!("  {}", line));
        }
      }
      lines.push(end.to_string());
    } else if let Some(prefix) = self.line_prefix() {
      for line in text.lines() {
        if line.is_empty() {
          lines.push(prefix.to_string());
        } else {
          lines.push(format!("{} {}", prefix, line));
        }
      }
    }

    lines.join("\n")
  }
}

impl Default for CommentStyle {
  fn default() -> Self {
    Self::c()
  }
}

/// Named comment style presets selectable from the CLI and config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StylePreset {
  C,
  Hash,
  Dash,
  Xml,
  Semicolon,
}

impl StylePreset {
  pub fn style(self) -> CommentStyle {
    match self {
      StylePreset::C => CommentStyle::c(),
      StylePreset::Hash => CommentStyle::hash(),
      StylePreset::Dash => CommentStyle::dash(),
      StylePreset::Xml => CommentStyle::xml(),
      StylePreset::Semicolon => CommentStyle::semicolon(),
    }
  }
}

impl FromStr for StylePreset {
  type Err = BuildError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "c" | "slash" => Ok(StylePreset::C),
      "hash" | "shell" => Ok(StylePreset::Hash),
      "dash" | "sql" => Ok(StylePreset::Dash),
      "xml" | "html" => Ok(StylePreset::Xml),
      "semicolon" | "lisp" => Ok(StylePreset::Semicolon),
      other => Err(BuildError::new(format!("Unknown comment style: {}", other))),
    }
  }
}

impl fmt::Display for StylePreset {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      StylePreset::C => "c",
      StylePreset::Hash => "hash",
      StylePreset::Dash => "dash",
      StylePreset::Xml => "xml",
      StylePreset::Semicolon => "semicolon",
    };
    f.write_str(name)
  }
}

/// The comment style chosen for a run: a named preset or a user-defined
/// style. Every file in the run uses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleSelection {
  Preset(StylePreset),
  Custom(CommentStyle),
}

impl StyleSelection {
  pub fn style(&self) -> CommentStyle {
    match self {
      StyleSelection::Preset(preset) => preset.style(),
      StyleSelection::Custom(style) => style.clone(),
    }
  }
}

impl Default for StyleSelection {
  fn default() -> Self {
    StyleSelection::Preset(StylePreset::C)
  }
}

impl FromStr for StyleSelection {
  type Err = BuildError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    s.parse().map(StyleSelection::Preset)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_presets() {
    let c = CommentStyle::c();
    assert_eq!(c.line_prefix(), Some("//"));
    assert_eq!(c.block_pair(), Some(("/*", "*/")));

    let hash = CommentStyle::hash();
    assert_eq!(hash.line_prefix(), Some("#"));
    assert_eq!(hash.block_pair(), None);

    let xml = CommentStyle::xml();
    assert_eq!(xml.line_prefix(), None);
    assert_eq!(xml.block_pair(), Some(("<!--", "-->")));
  }

  #[test]
  fn test_preset_from_str() {
    assert_eq!("c".parse::<StylePreset>().expect("c"), StylePreset::C);
    assert_eq!("Shell".parse::<StylePreset>().expect("shell"), StylePreset::Hash);
    assert_eq!("sql".parse::<StylePreset>().expect("sql"), StylePreset::Dash);
    assert!("cobol".parse::<StylePreset>().is_err());
  }

  #[test]
  fn test_preset_display_round_trips() {
    for preset in [StylePreset::C, StylePreset::Hash, StylePreset::Xml] {
      assert_eq!(preset.to_string().parse::<StylePreset>().expect("parse"), preset);
    }
  }

  #[test]
  fn test_validate_rejects_empty_style() {
    let style = CommentStyle {
      line: Some(String::new()),
      block_start: Some("/*".to_string()),
      block_end: None,
    };
    assert!(style.validate().is_err());
    assert!(CommentStyle::c().validate().is_ok());
  }

  #[test]
  fn test_wrap_line_style() {
    let wrapped = CommentStyle::line("//").wrap("Copyright 2025\n\nAll rights reserved.");
    assert_eq!(wrapped, "// Copyright 2025\n//\n// All rights reserved.");
  }

  #[test]
  fn test_wrap_block_style() {
    let wrapped = CommentStyle::c().wrap("Copyright 2025");
    assert_eq!(wrapped, "/*\n  Copyright 2025\n*/");
  }

  #[test]
  fn test_style_selection_from_str() {
    assert_eq!(
      "hash".parse::<StyleSelection>().expect("hash"),
      StyleSelection::Preset(StylePreset::Hash)
    );
    assert!("fortran".parse::<StyleSelection>().is_err());
  }

  #[test]
  fn test_per_extension_selection_is_rejected() {
    assert!("auto".parse::<StyleSelection>().is_err());
  }

  #[test]
  fn test_style_selection_style() {
    assert_eq!(StyleSelection::default().style(), CommentStyle::c());
    assert_eq!(StyleSelection::Preset(StylePreset::Dash).style(), CommentStyle::dash());
    assert_eq!(StyleSelection::Custom(CommentStyle::line("%")).style(), CommentStyle::line("%"));
  }
}
