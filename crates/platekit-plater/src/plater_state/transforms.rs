use super::Plater;
use crate::commands::{Command, InstanceChange};
use crate::model::Instance;
use crate::transform_ops;
use platekit_core::{ObjectId, Result, Scale3};

impl Plater {
    /// Adds `count` copies of the object next to its last instance.
    pub fn duplicate(&mut self, id: ObjectId, count: usize) -> Result<()> {
        let object = self.require(id)?;
        let after =
            transform_ops::duplicate_instances(object, count, self.config.min_object_distance())?;
        self.replace_instances("Increase Copies", id, after)
    }

    /// Removes the last `count` instances. Removing every instance removes
    /// the object.
    pub fn decrease(&mut self, id: ObjectId, count: usize) -> Result<()> {
        let object = self.require(id)?;
        let after = transform_ops::remove_instances(&object.instances, count)?;
        if after.is_empty() {
            return self.remove(id);
        }
        self.replace_instances("Decrease Copies", id, after)
    }

    /// Rotates every instance by `angle` degrees about Z.
    pub fn rotate(&mut self, id: ObjectId, angle: f64) -> Result<()> {
        let object = self.require(id)?;
        let after = transform_ops::rotate_instances(&object.instances, angle)?;
        self.replace_instances("Rotate", id, after)
    }

    /// Multiplies the scale of every instance by `factor`.
    pub fn scale(&mut self, id: ObjectId, factor: f64) -> Result<()> {
        self.scale_axes(id, Scale3::uniform(factor))
    }

    /// Multiplies the scale of every instance per axis.
    pub fn scale_axes(&mut self, id: ObjectId, factor: Scale3) -> Result<()> {
        let object = self.require(id)?;
        let after = transform_ops::scale_instances(&object.instances, factor)?;
        self.replace_instances("Scale", id, after)
    }

    /// Sets the scale of every instance to `factor`, regardless of the
    /// current scale.
    pub fn set_scale(&mut self, id: ObjectId, factor: f64) -> Result<()> {
        let object = self.require(id)?;
        let after = transform_ops::set_instance_scale(&object.instances, Scale3::uniform(factor))?;
        self.replace_instances("Change Scale", id, after)
    }

    pub fn duplicate_selected(&mut self, count: usize) -> Result<()> {
        let id = self.require_selection()?;
        self.duplicate(id, count)
    }

    pub fn decrease_selected(&mut self, count: usize) -> Result<()> {
        let id = self.require_selection()?;
        self.decrease(id, count)
    }

    pub fn rotate_selected(&mut self, angle: f64) -> Result<()> {
        let id = self.require_selection()?;
        self.rotate(id, angle)
    }

    pub fn scale_selected(&mut self, factor: f64) -> Result<()> {
        let id = self.require_selection()?;
        self.scale(id, factor)
    }

    pub fn set_scale_selected(&mut self, factor: f64) -> Result<()> {
        let id = self.require_selection()?;
        self.set_scale(id, factor)
    }

    fn replace_instances(&mut self, name: &str, id: ObjectId, after: Vec<Instance>) -> Result<()> {
        let before = self.require(id)?.instances.clone();
        self.execute(Command::Transform {
            name: name.to_string(),
            changes: vec![InstanceChange { id, before, after }],
        })
    }
}
