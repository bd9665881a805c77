//! # shelf-cli
//!
//! Command-line interface for the shelf snippet manager.
//!
//! ## Commands
//!
//! - `shelf serve` — Run the HTTP server
//! - `shelf copy` — Build the fetch command for a stored artifact
//! - `shelf list` / `shelf show` — Inspect stored artifacts
//! - `shelf init` / `shelf config` / `shelf set` — Manage configuration
//! - `shelf doctor` — Audit configuration for issues

pub mod commands;

pub use commands::Cli;
