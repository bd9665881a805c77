use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShelfError};

/// The two artifact collections. They share identical shape and identical
/// substitution semantics; only storage location, raw-URL path, and the
/// content type of the raw response differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Script,
    Compose,
}

impl ArtifactKind {
    /// Singular label used in error messages ("script not found: …").
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::Script => "script",
            ArtifactKind::Compose => "compose file",
        }
    }

    /// Directory under the data dir that holds the artifact bodies.
    pub fn body_dir(&self) -> &'static str {
        match self {
            ArtifactKind::Script => "scripts",
            ArtifactKind::Compose => "compose",
        }
    }

    /// Whole-collection metadata document under the data dir.
    pub fn metadata_file(&self) -> &'static str {
        match self {
            ArtifactKind::Script => "scripts.json",
            ArtifactKind::Compose => "compose.json",
        }
    }

    /// Content type of the raw-content response.
    pub fn content_type(&self) -> &'static str {
        match self {
            ArtifactKind::Script => "text/plain; charset=utf-8",
            ArtifactKind::Compose => "text/yaml",
        }
    }

    /// Path of the raw-content endpoint relative to the API base.
    /// Scripts came first historically, so they sit directly under `raw/`.
    pub fn raw_path(&self, filename: &str) -> String {
        match self {
            ArtifactKind::Script => format!("raw/{filename}"),
            ArtifactKind::Compose => format!("raw/compose/{filename}"),
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ArtifactKind::Script => "script",
            ArtifactKind::Compose => "compose",
        })
    }
}

impl std::str::FromStr for ArtifactKind {
    type Err = ShelfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "script" | "scripts" => Ok(ArtifactKind::Script),
            "compose" => Ok(ArtifactKind::Compose),
            other => Err(ShelfError::Store(format!(
                "unknown artifact kind '{other}' (expected 'script' or 'compose')"
            ))),
        }
    }
}

/// A stored script or compose file, body included.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub filename: String,
    pub content: String,
    pub tags: Vec<String>,
    pub last_modified: DateTime<Utc>,
}

/// Metadata entry for an artifact — what the collection documents
/// (`scripts.json`, `compose.json`) and the listing endpoints carry.
/// The body lives in its own file under the kind's body dir.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactMeta {
    pub filename: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub last_modified: DateTime<Utc>,
}

/// A saved shell command with searchable metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandEntry {
    pub id: uuid::Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub command: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub last_modified: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_instruction_id: Option<uuid::Uuid>,
}

/// Create request for a command — the server assigns `id` and `lastModified`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub command: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub linked_instruction_id: Option<uuid::Uuid>,
}

/// Partial update for a command — absent fields keep their current values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub command: Option<String>,
    pub tags: Option<Vec<String>>,
    pub linked_instruction_id: Option<uuid::Uuid>,
}

/// A free-text instruction document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    pub id: uuid::Uuid,
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Create request for an instruction — the server assigns `id`.
#[derive(Debug, Clone, Deserialize)]
pub struct InstructionDraft {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Partial update for an instruction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstructionPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Validate an artifact filename before it touches the filesystem.
/// Rejects empty names and anything that could escape the body directory.
pub fn validate_filename(filename: &str) -> Result<()> {
    if filename.is_empty() {
        return Err(ShelfError::InvalidFilename("filename is empty".into()));
    }
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(ShelfError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}
