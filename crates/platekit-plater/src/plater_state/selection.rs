use super::Plater;
use crate::model::PlacedObject;
use platekit_core::{ObjectId, PlaterEvent, Result};

impl Plater {
    /// Selects a single object. Fails with `NotFound` and keeps the current
    /// selection if `id` is not on the plate.
    pub fn select(&mut self, id: ObjectId) -> Result<()> {
        if self.selection.select(&mut self.store, id)? {
            self.view_sync
                .publish(PlaterEvent::SelectionChanged { selected: Some(id) });
        }
        Ok(())
    }

    /// Clears the selection. Returns true if something was selected.
    pub fn clear_selection(&mut self) -> bool {
        let cleared = self.selection.clear(&mut self.store);
        if cleared {
            self.view_sync
                .publish(PlaterEvent::SelectionChanged { selected: None });
        }
        cleared
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selection.selected()
    }

    pub fn selected_object(&self) -> Option<&PlacedObject> {
        self.selection.selected().and_then(|id| self.store.get(id))
    }
}
