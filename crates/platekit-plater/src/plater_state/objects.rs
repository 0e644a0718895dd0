//! Adding, removing and splitting objects.

use super::Plater;
use crate::commands::Command;
use crate::model::{Instance, ObjectGeometry, PlacedObject};
use crate::transform_ops::{fit_scale, part_instances, split_geometry};
use platekit_core::{ObjectId, PlaterError, PlaterEvent, Result, Scale3};

impl Plater {
    /// Adds one object at the bed centre.
    pub fn add(&mut self, geometry: ObjectGeometry) -> Result<ObjectId> {
        let ids = self.add_many(vec![geometry])?;
        ids.into_iter()
            .next()
            .ok_or_else(|| PlaterError::invalid_geometry("no object was added"))
    }

    /// Adds several objects as one undo step (one loaded file).
    ///
    /// Geometry is centred around its origin and dropped at the bed centre.
    /// Objects larger than the bed are scaled down uniformly to fit, which
    /// is reported with a `ScaledDown` event. Nothing is added if any
    /// geometry is invalid.
    pub fn add_many(&mut self, geometries: Vec<ObjectGeometry>) -> Result<Vec<ObjectId>> {
        if geometries.is_empty() {
            return Ok(Vec::new());
        }
        geometries.iter().try_for_each(ObjectGeometry::validate)?;

        let bed = self.config.bed();
        let center = bed.center();
        let first_index = self.store.len();
        let mut entries = Vec::with_capacity(geometries.len());
        let mut scaled = Vec::new();

        for (k, mut geometry) in geometries.into_iter().enumerate() {
            geometry.center_around_origin();
            let id = self.store.allocate_id();
            let mut instance = Instance::at(center);
            if let Some(factor) = fit_scale(&instance.footprint(&geometry), &bed) {
                tracing::info!(
                    "Object '{}' scaled to {:.1}% to fit the bed",
                    geometry.name,
                    factor * 100.0
                );
                instance.scale = Scale3::uniform(factor);
                scaled.push((id, factor));
            }
            entries.push((first_index + k, PlacedObject::new(id, geometry, vec![instance])));
        }

        let ids: Vec<ObjectId> = entries.iter().map(|(_, o)| o.id).collect();
        self.execute(Command::Add { entries })?;
        for (id, factor) in scaled {
            self.view_sync.publish(PlaterEvent::ScaledDown { id, factor });
        }
        tracing::info!("Added {} object(s) to the plate", ids.len());
        Ok(ids)
    }

    /// Removes an object. Its identifier is retired.
    pub fn remove(&mut self, id: ObjectId) -> Result<()> {
        let entries = self.snapshot(&[id])?;
        self.execute(Command::Remove { entries })
    }

    pub fn remove_selected(&mut self) -> Result<()> {
        let id = self.require_selection()?;
        self.remove(id)
    }

    /// Removes every object as one undo step. Does nothing on an empty plate.
    pub fn reset(&mut self) -> Result<()> {
        if self.store.is_empty() {
            return Ok(());
        }
        let objects = self.store.iter().cloned().collect();
        self.execute(Command::Reset { objects })
    }

    /// Replaces an object by its parts, at the object's position in the list.
    /// Parts keep their place on the bed and get fresh identifiers.
    pub fn split(&mut self, id: ObjectId) -> Result<Vec<ObjectId>> {
        let object = self.require(id)?;
        let parts = split_geometry(&object.geometry)?;
        let instances = object.instances.clone();
        let removed = self.snapshot(&[id])?;
        let index = removed.first().map_or(0, |(index, _)| *index);

        let mut added = Vec::with_capacity(parts.len());
        for (k, mut part) in parts.into_iter().enumerate() {
            let shift = part.center_around_origin();
            let part_id = self.store.allocate_id();
            let placed = PlacedObject::new(part_id, part, part_instances(&instances, &shift));
            added.push((index + k, placed));
        }
        let ids: Vec<ObjectId> = added.iter().map(|(_, o)| o.id).collect();

        self.execute(Command::Composite {
            name: "Split Object".to_string(),
            commands: vec![
                Command::Remove { entries: removed },
                Command::Add { entries: added },
            ],
        })?;
        tracing::info!("Split object {} into {} parts", id, ids.len());
        Ok(ids)
    }

    pub fn split_selected(&mut self) -> Result<Vec<ObjectId>> {
        let id = self.require_selection()?;
        self.split(id)
    }
}
