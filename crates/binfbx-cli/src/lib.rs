//! binfbx command-line tools library.
//!
//! Command implementations behind the `binfbx-tools` binary, plus the
//! logging setup shared by every tool.

pub mod commands;
pub mod logging;
