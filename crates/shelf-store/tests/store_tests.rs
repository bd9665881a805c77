use shelf_core::{ArtifactKind, CommandDraft, CommandPatch, InstructionDraft, InstructionPatch, ShelfError};
use shelf_store::Store;

fn open_store(dir: &tempfile::TempDir) -> Store {
    Store::open(dir.path()).unwrap()
}

fn draft(name: &str, command: &str) -> CommandDraft {
    serde_json::from_value(serde_json::json!({
        "name": name,
        "command": command,
        "tags": ["test"],
    }))
    .unwrap()
}

// ── Initialization ─────────────────────────────────────────────

#[test]
fn open_seeds_empty_collections_and_body_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let _store = open_store(&dir);

    for doc in ["commands.json", "instructions.json", "scripts.json", "compose.json"] {
        let raw = std::fs::read_to_string(dir.path().join(doc)).unwrap();
        assert_eq!(raw, "[]");
    }
    assert!(dir.path().join("scripts").is_dir());
    assert!(dir.path().join("compose").is_dir());
}

#[test]
fn reopen_keeps_existing_data() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = open_store(&dir);
        store.create_command(draft("ls", "ls -la")).unwrap();
    }
    let store = open_store(&dir);
    assert_eq!(store.list_commands().unwrap().len(), 1);
}

// ── Commands ───────────────────────────────────────────────────

#[test]
fn command_crud_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);

    let created = store.create_command(draft("restart", "systemctl restart nginx")).unwrap();
    assert_eq!(created.name, "restart");
    assert_eq!(created.tags, vec!["test"]);

    let listed = store.list_commands().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);

    let patch = CommandPatch {
        command: Some("systemctl restart caddy".into()),
        ..Default::default()
    };
    let updated = store.update_command(created.id, patch).unwrap();
    assert_eq!(updated.command, "systemctl restart caddy");
    // Untouched fields survive a partial update.
    assert_eq!(updated.name, "restart");
    assert_eq!(updated.tags, vec!["test"]);
    assert!(updated.last_modified >= created.last_modified);

    assert!(store.delete_command(created.id).unwrap());
    assert!(store.list_commands().unwrap().is_empty());
    // Idempotent delete.
    assert!(!store.delete_command(created.id).unwrap());
}

#[test]
fn update_unknown_command_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    let err = store
        .update_command(uuid::Uuid::new_v4(), CommandPatch::default())
        .unwrap_err();
    assert!(matches!(err, ShelfError::NotFound { .. }));
}

#[test]
fn commands_document_uses_camel_case_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    store.create_command(draft("x", "echo x")).unwrap();

    let raw = std::fs::read_to_string(dir.path().join("commands.json")).unwrap();
    assert!(raw.contains("\"lastModified\""));
    assert!(!raw.contains("last_modified"));
}

// ── Instructions ───────────────────────────────────────────────

#[test]
fn instruction_crud_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);

    let created = store
        .create_instruction(InstructionDraft {
            title: "Setup".into(),
            content: "Step 1: install.".into(),
        })
        .unwrap();

    let updated = store
        .update_instruction(
            created.id,
            InstructionPatch {
                content: Some("Step 1: install.\nStep 2: run.".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.title, "Setup");
    assert!(updated.content.contains("Step 2"));

    assert!(store.delete_instruction(created.id).unwrap());
    assert!(store.list_instructions().unwrap().is_empty());
}

// ── Artifacts ──────────────────────────────────────────────────

#[test]
fn artifact_save_read_delete_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);

    store
        .save_artifact(
            ArtifactKind::Script,
            "deploy.sh",
            "#!/bin/bash\necho {{HOST}}\n",
            Some(vec!["deploy".into()]),
        )
        .unwrap();

    let artifact = store.read_artifact(ArtifactKind::Script, "deploy.sh").unwrap();
    assert_eq!(artifact.content, "#!/bin/bash\necho {{HOST}}\n");
    assert_eq!(artifact.tags, vec!["deploy"]);

    // The body is a plain file in the scripts dir.
    assert!(dir.path().join("scripts/deploy.sh").is_file());

    store.delete_artifact(ArtifactKind::Script, "deploy.sh").unwrap();
    assert!(store.read_artifact(ArtifactKind::Script, "deploy.sh").is_err());
    assert!(!dir.path().join("scripts/deploy.sh").exists());
    // Idempotent.
    store.delete_artifact(ArtifactKind::Script, "deploy.sh").unwrap();
}

#[test]
fn artifact_collections_are_disjoint() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);

    store
        .save_artifact(ArtifactKind::Script, "a.sh", "echo a", None)
        .unwrap();
    store
        .save_artifact(ArtifactKind::Compose, "stack.yml", "services: {}", None)
        .unwrap();

    assert_eq!(store.list_artifacts(ArtifactKind::Script).unwrap().len(), 1);
    assert_eq!(store.list_artifacts(ArtifactKind::Compose).unwrap().len(), 1);
    assert!(store.read_artifact(ArtifactKind::Compose, "a.sh").is_err());
}

#[test]
fn save_without_tags_keeps_existing_tags() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);

    store
        .save_artifact(ArtifactKind::Script, "a.sh", "v1", Some(vec!["keep".into()]))
        .unwrap();
    let meta = store
        .save_artifact(ArtifactKind::Script, "a.sh", "v2", None)
        .unwrap();
    assert_eq!(meta.tags, vec!["keep"]);
    assert_eq!(
        store.read_content(ArtifactKind::Script, "a.sh").unwrap(),
        "v2"
    );
}

#[test]
fn listing_falls_back_to_mtime_for_untracked_bodies() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);

    // A body dropped into the dir outside the API still shows up.
    std::fs::write(dir.path().join("scripts/manual.sh"), "echo hi").unwrap();

    let listed = store.list_artifacts(ArtifactKind::Script).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].filename, "manual.sh");
    assert!(listed[0].tags.is_empty());
}

#[test]
fn rename_moves_body_and_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);

    store
        .save_artifact(ArtifactKind::Compose, "old.yml", "services: {}", Some(vec!["web".into()]))
        .unwrap();
    let meta = store
        .rename_artifact(ArtifactKind::Compose, "old.yml", "new.yml")
        .unwrap();
    assert_eq!(meta.filename, "new.yml");
    assert_eq!(meta.tags, vec!["web"]);

    assert!(dir.path().join("compose/new.yml").is_file());
    assert!(!dir.path().join("compose/old.yml").exists());
    assert!(store.read_artifact(ArtifactKind::Compose, "new.yml").is_ok());
}

#[test]
fn rename_missing_source_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    let err = store
        .rename_artifact(ArtifactKind::Compose, "nope.yml", "new.yml")
        .unwrap_err();
    assert!(matches!(err, ShelfError::NotFound { .. }));
}

#[test]
fn rename_onto_existing_target_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    store.save_artifact(ArtifactKind::Script, "a.sh", "a", None).unwrap();
    store.save_artifact(ArtifactKind::Script, "b.sh", "b", None).unwrap();

    let err = store
        .rename_artifact(ArtifactKind::Script, "a.sh", "b.sh")
        .unwrap_err();
    assert!(matches!(err, ShelfError::AlreadyExists { .. }));
    // Nothing moved.
    assert_eq!(store.read_content(ArtifactKind::Script, "a.sh").unwrap(), "a");
    assert_eq!(store.read_content(ArtifactKind::Script, "b.sh").unwrap(), "b");
}

#[test]
fn traversal_filenames_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);

    for bad in ["../escape.sh", "a/b.sh", "a\\b.sh", ""] {
        let err = store.read_content(ArtifactKind::Script, bad).unwrap_err();
        assert!(matches!(err, ShelfError::InvalidFilename(_)), "{bad:?}");
        let err = store
            .save_artifact(ArtifactKind::Script, bad, "x", None)
            .unwrap_err();
        assert!(matches!(err, ShelfError::InvalidFilename(_)), "{bad:?}");
    }
}
