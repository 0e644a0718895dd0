//! Ordered storage of the objects on the plate.
//!
//! `ObjectStore` keeps objects in display order and maintains an
//! identifier-to-index map alongside the sequence, so lookups by either key
//! are O(1). Every mutation bumps the store generation.

use crate::model::{Instance, ObjectGeometry, PlacedObject, ThumbnailState};
use platekit_core::{ObjectId, PlaterError, Result};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ObjectStore {
    objects: Vec<PlacedObject>,
    index: HashMap<ObjectId, usize>,
    next_id: u64,
    generation: u64,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Counter bumped by every mutation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Reserves the next identifier. Identifiers are never handed out twice.
    pub fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Validates the geometry, assigns the next identifier and appends the
    /// object with a stale thumbnail.
    pub fn add(&mut self, geometry: ObjectGeometry, instances: Vec<Instance>) -> Result<ObjectId> {
        geometry.validate()?;
        if instances.is_empty() {
            return Err(PlaterError::invalid_parameter(
                "instances",
                "an object needs at least one instance",
            ));
        }
        let id = self.allocate_id();
        self.insert_at(self.objects.len(), PlacedObject::new(id, geometry, instances))?;
        Ok(id)
    }

    /// Inserts an object at `index`. Used to append new objects and to put
    /// removed objects back where they were.
    ///
    /// The object must carry an identifier previously handed out by this
    /// store and not currently present.
    pub fn insert_at(&mut self, index: usize, mut object: PlacedObject) -> Result<()> {
        if self.index.contains_key(&object.id) {
            return Err(PlaterError::invalid_parameter(
                "id",
                format!("object {} is already on the plate", object.id),
            ));
        }
        if index > self.objects.len() {
            return Err(PlaterError::invalid_parameter(
                "index",
                format!("{} is past the end of {} objects", index, self.objects.len()),
            ));
        }

        // A restored object has no render job in flight and no selection.
        if object.thumbnail_state == ThumbnailState::Generating {
            object.thumbnail_state = ThumbnailState::Stale;
        }
        object.selected = false;

        self.bump();
        object.revision = self.generation;
        self.next_id = self.next_id.max(object.id.value() + 1);

        let id = object.id;
        self.objects.insert(index, object);
        self.reindex_from(index);
        tracing::debug!("Inserted object {} at index {}", id, index);
        Ok(())
    }

    /// Removes an object, returning its former index and full state.
    /// Identifiers of the remaining objects are untouched.
    pub fn remove(&mut self, id: ObjectId) -> Result<(usize, PlacedObject)> {
        let index = self.index_of(id).ok_or(PlaterError::not_found(id))?;
        let object = self.objects.remove(index);
        self.index.remove(&id);
        self.reindex_from(index);
        self.bump();
        tracing::debug!("Removed object {} from index {}", id, index);
        Ok((index, object))
    }

    /// Removes every object, returning them in display order.
    pub fn clear(&mut self) -> Vec<PlacedObject> {
        self.index.clear();
        self.bump();
        tracing::debug!("Cleared {} objects", self.objects.len());
        std::mem::take(&mut self.objects)
    }

    /// Replaces the instances of an object and returns the previous ones.
    /// Marks the thumbnail stale.
    pub fn set_instances(&mut self, id: ObjectId, instances: Vec<Instance>) -> Result<Vec<Instance>> {
        if instances.is_empty() {
            return Err(PlaterError::invalid_parameter(
                "instances",
                "an object needs at least one instance",
            ));
        }
        let index = self.index_of(id).ok_or(PlaterError::not_found(id))?;
        self.bump();
        let generation = self.generation;
        let object = &mut self.objects[index];
        object.revision = generation;
        object.thumbnail_state = ThumbnailState::Stale;
        Ok(std::mem::replace(&mut object.instances, instances))
    }

    pub fn get(&self, id: ObjectId) -> Option<&PlacedObject> {
        self.index_of(id).map(|i| &self.objects[i])
    }

    pub fn get_by_index(&self, index: usize) -> Option<&PlacedObject> {
        self.objects.get(index)
    }

    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &PlacedObject> {
        self.objects.iter()
    }

    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|o| o.id).collect()
    }

    /// Identifiers with their instances, in display order. Two stores with
    /// equal layouts are structurally identical.
    pub fn layout(&self) -> Vec<(ObjectId, Vec<Instance>)> {
        self.objects
            .iter()
            .map(|o| (o.id, o.instances.clone()))
            .collect()
    }

    /// Mutable access for state that is not part of the collection layout
    /// (selection flags, thumbnails). Does not bump the generation.
    pub(crate) fn object_mut(&mut self, id: ObjectId) -> Option<&mut PlacedObject> {
        let index = self.index_of(id)?;
        self.objects.get_mut(index)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut PlacedObject> {
        self.objects.iter_mut()
    }

    fn bump(&mut self) {
        self.generation += 1;
    }

    fn reindex_from(&mut self, start: usize) {
        for (i, object) in self.objects.iter().enumerate().skip(start) {
            self.index.insert(object.id, i);
        }
    }

    #[cfg(test)]
    fn assert_consistent(&self) {
        assert_eq!(self.index.len(), self.objects.len());
        for (i, object) in self.objects.iter().enumerate() {
            assert_eq!(self.index.get(&object.id), Some(&i));
        }
    }
}
