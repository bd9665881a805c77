//! # shelf-config
//!
//! Configuration system for shelf. Reads from `shelf.toml`, environment
//! variables, and CLI overrides — in that precedence order.
//!
//! Supports hot-reload via filesystem watcher.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::ShelfConfig;
pub use schema::{ConfigWarning, WarningSeverity};
