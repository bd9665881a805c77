//! # shelf-store
//!
//! File-backed persistence for shelf. The data directory holds four
//! whole-collection JSON documents (`commands.json`, `instructions.json`,
//! `scripts.json`, `compose.json`) plus two body directories (`scripts/`,
//! `compose/`) with one file per artifact.
//!
//! Collection writes are read-modify-write over the whole document, guarded
//! by a per-collection mutex. That gives plain mutual exclusion against file
//! corruption — there is deliberately no conflict resolution beyond it.

mod artifacts;
mod collections;

use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

use shelf_core::{ArtifactKind, Result, ShelfError};

/// Handle to the on-disk data directory.
pub struct Store {
    data_dir: PathBuf,
    commands_lock: Mutex<()>,
    instructions_lock: Mutex<()>,
    scripts_lock: Mutex<()>,
    compose_lock: Mutex<()>,
}

impl Store {
    /// Open (and if necessary initialize) the data directory: create the body
    /// dirs and seed every collection document that is missing with `[]`.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        for kind in [ArtifactKind::Script, ArtifactKind::Compose] {
            std::fs::create_dir_all(data_dir.join(kind.body_dir()))?;
        }
        for doc in [
            "commands.json",
            "instructions.json",
            "scripts.json",
            "compose.json",
        ] {
            let path = data_dir.join(doc);
            if !path.exists() {
                std::fs::write(&path, "[]")?;
            }
        }
        info!(data_dir = %data_dir.display(), "store opened");
        Ok(Self {
            data_dir,
            commands_lock: Mutex::new(()),
            instructions_lock: Mutex::new(()),
            scripts_lock: Mutex::new(()),
            compose_lock: Mutex::new(()),
        })
    }

    /// Root of all persistence.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub(crate) fn lock_for(&self, kind: ArtifactKind) -> &Mutex<()> {
        match kind {
            ArtifactKind::Script => &self.scripts_lock,
            ArtifactKind::Compose => &self.compose_lock,
        }
    }

    pub(crate) fn commands_lock(&self) -> &Mutex<()> {
        &self.commands_lock
    }

    pub(crate) fn instructions_lock(&self) -> &Mutex<()> {
        &self.instructions_lock
    }

    /// Read a whole-collection document. A missing document reads as empty.
    pub(crate) fn read_doc<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let path = self.data_dir.join(name);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&path)?;
        serde_json::from_str(&raw).map_err(|e| {
            ShelfError::Store(format!("corrupt collection document {name}: {e}"))
        })
    }

    /// Write a whole-collection document, pretty-printed as the original
    /// system did so the files stay hand-editable.
    pub(crate) fn write_doc<T: Serialize>(&self, name: &str, items: &[T]) -> Result<()> {
        let path = self.data_dir.join(name);
        let json = serde_json::to_string_pretty(items)?;
        std::fs::write(&path, json)?;
        Ok(())
    }
}
