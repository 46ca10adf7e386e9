//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`cells`] - Print the (split) sub-cells of a manifest
//! - [`config`] - Configuration management (path, show, init)
//! - [`partition`] - Build and write the disjoint partition

pub mod cells;
pub mod common;
pub mod config;
pub mod partition;
