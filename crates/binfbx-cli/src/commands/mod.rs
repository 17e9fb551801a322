//! CLI command implementations

pub mod binfbx;
