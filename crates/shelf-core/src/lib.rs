//! # shelf-core
//!
//! Core types and the error type for the shelf snippet manager. This crate
//! defines the shared vocabulary used by every other crate in the workspace.

pub mod error;
pub mod types;

pub use error::{Result, ShelfError};
pub use types::{
    Artifact, ArtifactKind, ArtifactMeta, CommandDraft, CommandEntry, CommandPatch, Instruction,
    InstructionDraft, InstructionPatch, validate_filename,
};
