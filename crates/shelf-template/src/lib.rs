//! # shelf-template
//!
//! The variable-templating core of shelf: detecting `{{NAME}}` placeholders in
//! stored artifacts, substituting values into them, and synthesizing the
//! copy-pasteable fetch command that drives the download-and-run workflow.
//!
//! Everything in this crate is a pure function over its inputs — no I/O, no
//! shared state. The server runs [`substitute`] per raw-content request; the
//! CLI runs [`scan`] and [`fetch_command`] when building a command to copy.

use regex::Regex;
use std::sync::LazyLock;

pub mod command;
pub mod scanner;
pub mod substitute;

pub use command::{fetch_command, parse_query};
pub use scanner::scan;
pub use substitute::substitute;

/// The placeholder wire syntax, bit-exact: `{{`, one or more non-`}`
/// characters, `}}`. There is no escaping mechanism for literal braces;
/// an unterminated `{{` is ordinary text.
pub(crate) static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").unwrap());
