//! Reversible plate mutations.
//!
//! Every command carries the complete data needed to apply it again and to
//! revert it, so the history never has to consult anything but the store.
//! `apply` and `revert` check their preconditions before touching the store;
//! a command that does not match the store fails without mutating it.

use crate::model::{Instance, PlacedObject};
use crate::object_store::ObjectStore;
use platekit_core::{ObjectId, PlaterError, Result};

/// Instances of one object before and after a transform.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceChange {
    pub id: ObjectId,
    pub before: Vec<Instance>,
    pub after: Vec<Instance>,
}

#[derive(Debug, Clone)]
#[allow(clippy::large_enum_variant)]
pub enum Command {
    /// Objects inserted at the given indices (ascending).
    Add { entries: Vec<(usize, PlacedObject)> },
    /// Objects removed from the given original indices (ascending).
    Remove { entries: Vec<(usize, PlacedObject)> },
    /// The whole plate cleared.
    Reset { objects: Vec<PlacedObject> },
    /// Instance lists replaced on one or more objects.
    Transform {
        name: String,
        changes: Vec<InstanceChange>,
    },
    /// Several commands applied as one step.
    Composite { name: String, commands: Vec<Command> },
}

impl Command {
    /// Display name for menus and logs.
    pub fn name(&self) -> &str {
        match self {
            Command::Add { entries } if entries.len() == 1 => "Add Object",
            Command::Add { .. } => "Add Objects",
            Command::Remove { entries } if entries.len() == 1 => "Remove Object",
            Command::Remove { .. } => "Remove Objects",
            Command::Reset { .. } => "Reset Plate",
            Command::Transform { name, .. } => name,
            Command::Composite { name, .. } => name,
        }
    }

    /// Performs the mutation on the store.
    pub fn apply(&self, store: &mut ObjectStore) -> Result<()> {
        match self {
            Command::Add { entries } => insert_entries(store, entries),
            Command::Remove { entries } => remove_entries(store, entries),
            Command::Reset { objects } => {
                let expected: Vec<ObjectId> = objects.iter().map(|o| o.id).collect();
                if store.ids() != expected {
                    return Err(PlaterError::invalid_parameter(
                        "history",
                        "plate contents do not match the recorded reset",
                    ));
                }
                store.clear();
                Ok(())
            }
            Command::Transform { changes, .. } => {
                set_instances(store, changes.iter().map(|c| (c.id, &c.after)))
            }
            Command::Composite { commands, .. } => {
                for (done, command) in commands.iter().enumerate() {
                    if let Err(err) = command.apply(store) {
                        rollback(store, commands[..done].iter().rev(), Command::revert);
                        return Err(err);
                    }
                }
                Ok(())
            }
        }
    }

    /// Restores the store to its state before `apply`.
    pub fn revert(&self, store: &mut ObjectStore) -> Result<()> {
        match self {
            Command::Add { entries } => remove_entries(store, entries),
            Command::Remove { entries } => insert_entries(store, entries),
            Command::Reset { objects } => {
                if !store.is_empty() {
                    return Err(PlaterError::invalid_parameter(
                        "history",
                        "plate must be empty to undo a reset",
                    ));
                }
                for (index, object) in objects.iter().enumerate() {
                    store.insert_at(index, object.clone())?;
                }
                Ok(())
            }
            Command::Transform { changes, .. } => {
                set_instances(store, changes.iter().map(|c| (c.id, &c.before)))
            }
            Command::Composite { commands, .. } => {
                for (done, command) in commands.iter().rev().enumerate() {
                    if let Err(err) = command.revert(store) {
                        let applied = commands.len() - done;
                        rollback(store, commands[applied..].iter(), Command::apply);
                        return Err(err);
                    }
                }
                Ok(())
            }
        }
    }

    /// Objects touched by the command.
    pub fn object_ids(&self) -> Vec<ObjectId> {
        match self {
            Command::Add { entries } | Command::Remove { entries } => {
                entries.iter().map(|(_, o)| o.id).collect()
            }
            Command::Reset { objects } => objects.iter().map(|o| o.id).collect(),
            Command::Transform { changes, .. } => changes.iter().map(|c| c.id).collect(),
            Command::Composite { commands, .. } => {
                commands.iter().flat_map(Command::object_ids).collect()
            }
        }
    }
}

fn insert_entries(store: &mut ObjectStore, entries: &[(usize, PlacedObject)]) -> Result<()> {
    for (k, (index, object)) in entries.iter().enumerate() {
        if store.contains(object.id) {
            return Err(PlaterError::invalid_parameter(
                "history",
                format!("object {} is already on the plate", object.id),
            ));
        }
        if *index > store.len() + k {
            return Err(PlaterError::invalid_parameter(
                "history",
                format!("cannot restore object {} at index {}", object.id, index),
            ));
        }
    }
    for (index, object) in entries {
        store.insert_at(*index, object.clone())?;
    }
    Ok(())
}

fn remove_entries(store: &mut ObjectStore, entries: &[(usize, PlacedObject)]) -> Result<()> {
    if let Some((_, missing)) = entries.iter().find(|(_, o)| !store.contains(o.id)) {
        return Err(PlaterError::not_found(missing.id));
    }
    for (_, object) in entries.iter().rev() {
        store.remove(object.id)?;
    }
    Ok(())
}

fn set_instances<'a>(
    store: &mut ObjectStore,
    changes: impl Iterator<Item = (ObjectId, &'a Vec<Instance>)> + Clone,
) -> Result<()> {
    if let Some((missing, _)) = changes.clone().find(|(id, _)| !store.contains(*id)) {
        return Err(PlaterError::not_found(missing));
    }
    for (id, instances) in changes {
        store.set_instances(id, instances.clone())?;
    }
    Ok(())
}

fn rollback<'a>(
    store: &mut ObjectStore,
    commands: impl Iterator<Item = &'a Command>,
    undo: fn(&Command, &mut ObjectStore) -> Result<()>,
) {
    for command in commands {
        if let Err(err) = undo(command, store) {
            tracing::error!("Failed to roll back '{}': {}", command.name(), err);
        }
    }
}
