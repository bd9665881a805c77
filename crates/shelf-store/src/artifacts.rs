//! Artifact persistence: bodies as individual files under the kind's body
//! dir, metadata (tags, lastModified) in the kind's collection document.

use chrono::{DateTime, Utc};
use std::path::PathBuf;

use shelf_core::{Artifact, ArtifactKind, ArtifactMeta, Result, ShelfError, validate_filename};

use crate::Store;

impl Store {
    fn body_path(&self, kind: ArtifactKind, filename: &str) -> PathBuf {
        self.data_dir().join(kind.body_dir()).join(filename)
    }

    /// List all artifacts of a kind: a directory listing of the body dir
    /// merged with the metadata document. Bodies on disk but missing from the
    /// metadata fall back to file mtime, then to now.
    pub fn list_artifacts(&self, kind: ArtifactKind) -> Result<Vec<ArtifactMeta>> {
        let _guard = self.lock_for(kind).lock();
        let metadata: Vec<ArtifactMeta> = self.read_doc(kind.metadata_file())?;
        let body_dir = self.data_dir().join(kind.body_dir());

        let mut result = Vec::new();
        let mut entries: Vec<_> = std::fs::read_dir(&body_dir)?
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            if !entry.file_type()?.is_file() {
                continue;
            }
            let filename = entry.file_name().to_string_lossy().into_owned();
            match metadata.iter().find(|m| m.filename == filename) {
                Some(meta) => result.push(meta.clone()),
                None => result.push(ArtifactMeta {
                    filename,
                    tags: Vec::new(),
                    last_modified: file_mtime(&entry.path()).unwrap_or_else(Utc::now),
                }),
            }
        }
        Ok(result)
    }

    /// Read an artifact with its body.
    pub fn read_artifact(&self, kind: ArtifactKind, filename: &str) -> Result<Artifact> {
        validate_filename(filename)?;
        let _guard = self.lock_for(kind).lock();
        let path = self.body_path(kind, filename);
        if !path.exists() {
            return Err(ShelfError::not_found(kind.label(), filename));
        }
        let content = std::fs::read_to_string(&path)?;
        let metadata: Vec<ArtifactMeta> = self.read_doc(kind.metadata_file())?;
        let meta = metadata.iter().find(|m| m.filename == filename);
        Ok(Artifact {
            filename: filename.to_string(),
            content,
            tags: meta.map(|m| m.tags.clone()).unwrap_or_default(),
            last_modified: meta
                .map(|m| m.last_modified)
                .or_else(|| file_mtime(&path))
                .unwrap_or_else(Utc::now),
        })
    }

    /// Read just the body, as the raw-content endpoint does.
    pub fn read_content(&self, kind: ArtifactKind, filename: &str) -> Result<String> {
        validate_filename(filename)?;
        let path = self.body_path(kind, filename);
        if !path.exists() {
            return Err(ShelfError::not_found(kind.label(), filename));
        }
        Ok(std::fs::read_to_string(&path)?)
    }

    /// Write the body file and upsert the metadata entry. `tags: None` keeps
    /// existing tags on an update; a new artifact starts with no tags.
    pub fn save_artifact(
        &self,
        kind: ArtifactKind,
        filename: &str,
        content: &str,
        tags: Option<Vec<String>>,
    ) -> Result<ArtifactMeta> {
        validate_filename(filename)?;
        let _guard = self.lock_for(kind).lock();
        std::fs::write(self.body_path(kind, filename), content)?;

        let mut metadata: Vec<ArtifactMeta> = self.read_doc(kind.metadata_file())?;
        let last_modified = Utc::now();
        let meta = match metadata.iter_mut().find(|m| m.filename == filename) {
            Some(existing) => {
                if let Some(tags) = tags {
                    existing.tags = tags;
                }
                existing.last_modified = last_modified;
                existing.clone()
            }
            None => {
                let meta = ArtifactMeta {
                    filename: filename.to_string(),
                    tags: tags.unwrap_or_default(),
                    last_modified,
                };
                metadata.push(meta.clone());
                meta
            }
        };
        self.write_doc(kind.metadata_file(), &metadata)?;
        Ok(meta)
    }

    /// Remove body and metadata. Idempotent — deleting an unknown filename is
    /// not an error.
    pub fn delete_artifact(&self, kind: ArtifactKind, filename: &str) -> Result<()> {
        validate_filename(filename)?;
        let _guard = self.lock_for(kind).lock();
        let path = self.body_path(kind, filename);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        let mut metadata: Vec<ArtifactMeta> = self.read_doc(kind.metadata_file())?;
        let before = metadata.len();
        metadata.retain(|m| m.filename != filename);
        if metadata.len() != before {
            self.write_doc(kind.metadata_file(), &metadata)?;
        }
        Ok(())
    }

    /// Rename an artifact. Fails when the source is missing or the target
    /// already exists.
    pub fn rename_artifact(
        &self,
        kind: ArtifactKind,
        filename: &str,
        new_filename: &str,
    ) -> Result<ArtifactMeta> {
        validate_filename(filename)?;
        validate_filename(new_filename)?;
        let _guard = self.lock_for(kind).lock();

        let from = self.body_path(kind, filename);
        let to = self.body_path(kind, new_filename);
        if !from.exists() {
            return Err(ShelfError::not_found(kind.label(), filename));
        }
        if to.exists() {
            return Err(ShelfError::already_exists(kind.label(), new_filename));
        }
        std::fs::rename(&from, &to)?;

        let mut metadata: Vec<ArtifactMeta> = self.read_doc(kind.metadata_file())?;
        let last_modified = Utc::now();
        let meta = match metadata.iter_mut().find(|m| m.filename == filename) {
            Some(existing) => {
                existing.filename = new_filename.to_string();
                existing.last_modified = last_modified;
                existing.clone()
            }
            None => {
                // Body existed without a metadata entry; create one under the
                // new name.
                let meta = ArtifactMeta {
                    filename: new_filename.to_string(),
                    tags: Vec::new(),
                    last_modified,
                };
                metadata.push(meta.clone());
                meta
            }
        };
        self.write_doc(kind.metadata_file(), &metadata)?;
        Ok(meta)
    }
}

fn file_mtime(path: &std::path::Path) -> Option<DateTime<Utc>> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from)
}
