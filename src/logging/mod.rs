//! # Logging Module
//!
//! This module provides logging utilities for shipwright, including:
//! - Verbose logging that can be enabled/disabled
//! - Standard info logging with color support
//! - `tracing` subscriber setup for structured diagnostics
//!
//! Verbose logs go to stderr and info logs go to stdout for better pipeline
//! integration. Release notes are printed on stdout as well, so anything that
//! is not part of a command's result must stay on stderr.
//!
//! ## Example
//!
//! ```rust
//! use shipwright::logging::{ColorMode, set_verbose};
//! use shipwright::{info_log, verbose_log};
//!
//! set_verbose();
//! ColorMode::Auto.apply();
//!
//! // Goes to stderr
//! verbose_log!("Processing file: {}", "AppDelegate.swift");
//!
//! // Goes to stdout
//! info_log!("Header updated in: {}", "AppDelegate.swift");
//! ```

mod modes;

pub use modes::{ColorMode, init_tracing, is_quiet, is_verbose, set_quiet, set_verbose};
use owo_colors::{OwoColorize, Stream};

/// Logs a message to stderr if verbose mode is enabled.
///
/// Uses the same format string syntax as the standard [`eprintln!`] macro.
#[macro_export]
macro_rules! verbose_log {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Logs a message to stdout unless quiet mode is enabled.
///
/// Uses the same format string syntax as the standard [`println!`] macro.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        if !$crate::logging::is_quiet() {
            $crate::logging::print_info_log(&format!($($arg)*));
        }
    };
}

/// Prints an info message in yellow when the stream supports colors.
pub fn print_info_log(message: &str) {
  println!("{}", message.if_supports_color(Stream::Stdout, |m| m.yellow()));
}
