//! Undo/redo history of plate mutations

use crate::commands::Command;
use crate::object_store::ObjectStore;
use std::collections::VecDeque;

/// Default maximum undo depth
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Manages the undo and redo stacks.
///
/// A command lives in exactly one of the two stacks. Commands are recorded
/// after they were applied to the store.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    undo_stack: VecDeque<Command>,
    redo_stack: Vec<Command>,
    limit: usize,
}

impl CommandHistory {
    /// Create a history keeping at most `limit` undo steps
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record an applied command. Clears the redo stack.
    pub fn record(&mut self, command: Command) {
        tracing::debug!("Recording '{}'", command.name());
        self.redo_stack.clear();
        self.undo_stack.push_back(command);
        self.trim();
    }

    /// Change the maximum undo depth, dropping the oldest steps beyond it
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        self.trim();
    }

    fn trim(&mut self) {
        while self.undo_stack.len() > self.limit {
            if let Some(dropped) = self.undo_stack.pop_front() {
                tracing::debug!("History limit reached, dropping '{}'", dropped.name());
            }
        }
    }

    /// Revert the most recent command. Returns false when there is nothing
    /// to undo or the command no longer matches the store.
    pub fn undo(&mut self, store: &mut ObjectStore) -> bool {
        let Some(command) = self.undo_stack.pop_back() else {
            return false;
        };
        match command.revert(store) {
            Ok(()) => {
                tracing::debug!("Undo '{}'", command.name());
                self.redo_stack.push(command);
                true
            }
            Err(err) => {
                tracing::error!("Undo of '{}' failed: {}", command.name(), err);
                self.undo_stack.push_back(command);
                false
            }
        }
    }

    /// Re-apply the most recently undone command.
    pub fn redo(&mut self, store: &mut ObjectStore) -> bool {
        let Some(command) = self.redo_stack.pop() else {
            return false;
        };
        match command.apply(store) {
            Ok(()) => {
                tracing::debug!("Redo '{}'", command.name());
                self.undo_stack.push_back(command);
                true
            }
            Err(err) => {
                tracing::error!("Redo of '{}' failed: {}", command.name(), err);
                self.redo_stack.push(command);
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Name of the command `undo` would revert
    pub fn undo_name(&self) -> Option<&str> {
        self.undo_stack.back().map(Command::name)
    }

    /// Name of the command `redo` would re-apply
    pub fn redo_name(&self) -> Option<&str> {
        self.redo_stack.last().map(Command::name)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Clear both stacks
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
