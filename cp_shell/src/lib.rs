//! Internal modules for the casino shell.
//!
//! Command parsing and execution live here so the `cp_shell` binary only
//! reads lines and prints results.

pub mod commands;
pub mod shell;
