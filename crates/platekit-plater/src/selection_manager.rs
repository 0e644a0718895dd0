use crate::object_store::ObjectStore;
use platekit_core::{ObjectId, PlaterError, Result};

/// Tracks which object on the plate is selected.
///
/// `SelectionManager` is responsible for:
/// - Holding the single selected object identifier
/// - Mirroring the selection into the `selected` flag of each object
/// - Dropping the selection when its object leaves the plate
///
/// # Selection Model
///
/// At most one object is selected at a time. Selecting an object that is not
/// on the plate fails with `NotFound` and leaves the selection as it was.
/// The selection is not part of the undo history; after every structural
/// change the plater calls [`SelectionManager::validate`], which clears a
/// selection whose object disappeared.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    /// The selected object, if any
    selected_id: Option<ObjectId>,
}

impl SelectionManager {
    /// Creates a new `SelectionManager` with no selection.
    ///
    /// # Examples
    ///
    /// ```
    /// use platekit_plater::selection_manager::SelectionManager;
    ///
    /// let manager = SelectionManager::new();
    /// assert_eq!(manager.selected(), None);
    /// ```
    pub fn new() -> Self {
        Self { selected_id: None }
    }

    /// Returns the selected object.
    pub fn selected(&self) -> Option<ObjectId> {
        self.selected_id
    }

    /// Selects `id`, deselecting any previous object.
    ///
    /// # Returns
    ///
    /// `Ok(true)` when the selection changed, `Ok(false)` when `id` was
    /// already selected.
    ///
    /// # Errors
    ///
    /// `NotFound` if `id` is not on the plate. The selection is unchanged.
    pub fn select(&mut self, store: &mut ObjectStore, id: ObjectId) -> Result<bool> {
        if !store.contains(id) {
            return Err(PlaterError::not_found(id));
        }
        if self.selected_id == Some(id) {
            return Ok(false);
        }
        self.selected_id = Some(id);
        self.sync_flags(store);
        tracing::debug!("Selected object {}", id);
        Ok(true)
    }

    /// Clears the selection. Returns true if something was selected.
    pub fn clear(&mut self, store: &mut ObjectStore) -> bool {
        let changed = self.selected_id.take().is_some();
        self.sync_flags(store);
        changed
    }

    /// Drops the selection if its object is gone and re-applies the
    /// `selected` flags. Returns true when the selection was cleared.
    pub fn validate(&mut self, store: &mut ObjectStore) -> bool {
        let cleared = match self.selected_id {
            Some(id) if !store.contains(id) => {
                tracing::debug!("Selected object {} left the plate", id);
                self.selected_id = None;
                true
            }
            _ => false,
        };
        self.sync_flags(store);
        cleared
    }

    fn sync_flags(&self, store: &mut ObjectStore) {
        for object in store.iter_mut() {
            object.selected = Some(object.id) == self.selected_id;
        }
    }
}
