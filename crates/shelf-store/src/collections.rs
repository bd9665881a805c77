//! CRUD over the keyed-record collections: commands and instructions.

use chrono::Utc;

use shelf_core::{
    CommandDraft, CommandEntry, CommandPatch, Instruction, InstructionDraft, InstructionPatch,
    Result, ShelfError,
};

use crate::Store;

const COMMANDS_DOC: &str = "commands.json";
const INSTRUCTIONS_DOC: &str = "instructions.json";

impl Store {
    // ── Commands ───────────────────────────────────────────────

    pub fn list_commands(&self) -> Result<Vec<CommandEntry>> {
        let _guard = self.commands_lock().lock();
        self.read_doc(COMMANDS_DOC)
    }

    pub fn create_command(&self, draft: CommandDraft) -> Result<CommandEntry> {
        let _guard = self.commands_lock().lock();
        let mut entries: Vec<CommandEntry> = self.read_doc(COMMANDS_DOC)?;
        let entry = CommandEntry {
            id: uuid::Uuid::new_v4(),
            name: draft.name,
            description: draft.description,
            command: draft.command,
            tags: draft.tags,
            last_modified: Utc::now(),
            linked_instruction_id: draft.linked_instruction_id,
        };
        entries.push(entry.clone());
        self.write_doc(COMMANDS_DOC, &entries)?;
        Ok(entry)
    }

    /// Apply a partial update; absent patch fields keep their current values.
    pub fn update_command(&self, id: uuid::Uuid, patch: CommandPatch) -> Result<CommandEntry> {
        let _guard = self.commands_lock().lock();
        let mut entries: Vec<CommandEntry> = self.read_doc(COMMANDS_DOC)?;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| ShelfError::not_found("command", id.to_string()))?;

        if let Some(name) = patch.name {
            entry.name = name;
        }
        if let Some(description) = patch.description {
            entry.description = description;
        }
        if let Some(command) = patch.command {
            entry.command = command;
        }
        if let Some(tags) = patch.tags {
            entry.tags = tags;
        }
        if let Some(linked) = patch.linked_instruction_id {
            entry.linked_instruction_id = Some(linked);
        }
        entry.last_modified = Utc::now();

        let updated = entry.clone();
        self.write_doc(COMMANDS_DOC, &entries)?;
        Ok(updated)
    }

    /// Remove a command. Idempotent — deleting an unknown id is not an error.
    pub fn delete_command(&self, id: uuid::Uuid) -> Result<bool> {
        let _guard = self.commands_lock().lock();
        let mut entries: Vec<CommandEntry> = self.read_doc(COMMANDS_DOC)?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = entries.len() != before;
        if removed {
            self.write_doc(COMMANDS_DOC, &entries)?;
        }
        Ok(removed)
    }

    // ── Instructions ───────────────────────────────────────────

    pub fn list_instructions(&self) -> Result<Vec<Instruction>> {
        let _guard = self.instructions_lock().lock();
        self.read_doc(INSTRUCTIONS_DOC)
    }

    pub fn create_instruction(&self, draft: InstructionDraft) -> Result<Instruction> {
        let _guard = self.instructions_lock().lock();
        let mut entries: Vec<Instruction> = self.read_doc(INSTRUCTIONS_DOC)?;
        let entry = Instruction {
            id: uuid::Uuid::new_v4(),
            title: draft.title,
            content: draft.content,
        };
        entries.push(entry.clone());
        self.write_doc(INSTRUCTIONS_DOC, &entries)?;
        Ok(entry)
    }

    pub fn update_instruction(
        &self,
        id: uuid::Uuid,
        patch: InstructionPatch,
    ) -> Result<Instruction> {
        let _guard = self.instructions_lock().lock();
        let mut entries: Vec<Instruction> = self.read_doc(INSTRUCTIONS_DOC)?;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| ShelfError::not_found("instruction", id.to_string()))?;

        if let Some(title) = patch.title {
            entry.title = title;
        }
        if let Some(content) = patch.content {
            entry.content = content;
        }

        let updated = entry.clone();
        self.write_doc(INSTRUCTIONS_DOC, &entries)?;
        Ok(updated)
    }

    pub fn delete_instruction(&self, id: uuid::Uuid) -> Result<bool> {
        let _guard = self.instructions_lock().lock();
        let mut entries: Vec<Instruction> = self.read_doc(INSTRUCTIONS_DOC)?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = entries.len() != before;
        if removed {
            self.write_doc(INSTRUCTIONS_DOC, &entries)?;
        }
        Ok(removed)
    }
}
