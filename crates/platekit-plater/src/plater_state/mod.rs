//! Plate state manager facade.
//! Owns the object store and routes every request through it.
//!
//! This module is split into submodules for better organization:
//! - `objects`: Add, remove, reset and split
//! - `transforms`: Duplicate, decrease, rotate and scale
//! - `arrange`: Automatic arrangement
//! - `history`: Undo/redo
//! - `selection`: Single-object selection
//! - `thumbnails`: Background thumbnail requests and completions

mod arrange;
mod history;
mod objects;
mod selection;
mod thumbnails;
mod transforms;

pub use arrange::ArrangeReport;

use crate::commands::Command;
use crate::history::CommandHistory;
use crate::model::PlacedObject;
use crate::object_store::ObjectStore;
use crate::selection_manager::SelectionManager;
use crate::thumbnail::{ThumbnailRenderer, ThumbnailScheduler};
use platekit_core::{
    ConfigResult, ObjectId, PlaterConfig, PlaterError, PlaterEvent, Result, ViewSync,
};
use std::sync::Arc;

/// The plate: objects, their history, the selection and the thumbnails.
///
/// Every mutating call validates its input, applies one command to the
/// store, records it in the history and notifies views through
/// [`ViewSync`]. A call that returns an error has changed nothing.
#[derive(Debug)]
pub struct Plater {
    store: ObjectStore,
    history: CommandHistory,
    selection: SelectionManager,
    thumbnails: ThumbnailScheduler,
    view_sync: Arc<ViewSync>,
    config: PlaterConfig,
}

impl Plater {
    /// Creates an empty plate using the silhouette thumbnail renderer.
    pub fn new(config: PlaterConfig) -> ConfigResult<Self> {
        config.validate()?;
        let thumbnails = ThumbnailScheduler::with_silhouette(config.thumbnail_size);
        Ok(Self::build(config, thumbnails))
    }

    /// Creates an empty plate rendering thumbnails with `renderer`.
    pub fn with_renderer(
        config: PlaterConfig,
        renderer: Arc<dyn ThumbnailRenderer>,
    ) -> ConfigResult<Self> {
        config.validate()?;
        let thumbnails = ThumbnailScheduler::new(renderer, config.thumbnail_size);
        Ok(Self::build(config, thumbnails))
    }

    fn build(config: PlaterConfig, thumbnails: ThumbnailScheduler) -> Self {
        Self {
            store: ObjectStore::new(),
            history: CommandHistory::new(config.history_limit),
            selection: SelectionManager::new(),
            thumbnails,
            view_sync: Arc::new(ViewSync::new()),
            config,
        }
    }

    /// The notification bus views subscribe to.
    pub fn view_sync(&self) -> &Arc<ViewSync> {
        &self.view_sync
    }

    pub fn config(&self) -> &PlaterConfig {
        &self.config
    }

    /// Replaces the configuration. Takes effect on the next operation that
    /// reads it; objects already on the plate are not moved. A smaller
    /// history limit drops the oldest undo steps right away.
    pub fn set_config(&mut self, config: PlaterConfig) -> ConfigResult<()> {
        config.validate()?;
        self.history.set_limit(config.history_limit);
        self.thumbnails.set_size(config.thumbnail_size);
        tracing::debug!("Plater configuration updated");
        self.config = config;
        Ok(())
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn objects(&self) -> impl DoubleEndedIterator<Item = &PlacedObject> {
        self.store.iter()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> Option<&PlacedObject> {
        self.store.get(id)
    }

    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.store.index_of(id)
    }

    pub fn ids(&self) -> Vec<ObjectId> {
        self.store.ids()
    }

    /// True when any instance on the plate is flagged outside the bed.
    pub fn outside_bounds(&self) -> bool {
        self.store.iter().any(PlacedObject::is_outside_bounds)
    }

    /// Applies `command`, records it and notifies views.
    fn execute(&mut self, command: Command) -> Result<()> {
        command.apply(&mut self.store)?;
        tracing::debug!("Executed '{}'", command.name());
        self.history.record(command);
        self.after_mutation();
        Ok(())
    }

    /// Re-validates the selection and announces the new collection state.
    fn after_mutation(&mut self) {
        if self.selection.validate(&mut self.store) {
            self.view_sync
                .publish(PlaterEvent::SelectionChanged { selected: None });
        }
        self.view_sync.publish(PlaterEvent::CollectionChanged {
            generation: self.store.generation(),
        });
    }

    fn require(&self, id: ObjectId) -> Result<&PlacedObject> {
        self.store.get(id).ok_or(PlaterError::not_found(id))
    }

    fn require_selection(&self) -> Result<ObjectId> {
        self.selection.selected().ok_or(PlaterError::EmptySelection)
    }

    /// Snapshot of objects with their current indices, ascending.
    fn snapshot(&self, ids: &[ObjectId]) -> Result<Vec<(usize, PlacedObject)>> {
        let mut entries = ids
            .iter()
            .map(|&id| {
                let index = self.store.index_of(id).ok_or(PlaterError::not_found(id))?;
                Ok((index, self.require(id)?.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        entries.sort_by_key(|(index, _)| *index);
        Ok(entries)
    }
}

impl Default for Plater {
    fn default() -> Self {
        let config = PlaterConfig::default();
        let thumbnails = ThumbnailScheduler::with_silhouette(config.thumbnail_size);
        Self::build(config, thumbnails)
    }
}
