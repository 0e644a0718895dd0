use super::Plater;
use crate::arrange::{items_for, Arranger};
use crate::commands::{Command, InstanceChange};
use platekit_core::{ObjectId, PlaterEvent, Result};

/// Summary of an arrangement run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrangeReport {
    /// Objects whose instances changed.
    pub moved: usize,
    /// Objects with an instance that could not be placed on the bed.
    pub outside: Vec<ObjectId>,
}

impl Plater {
    /// Repositions every instance so nothing overlaps, as one undo step.
    ///
    /// Never fails because of the layout: instances that fit nowhere are
    /// flagged `outside_bounds` and reported with an `ArrangeWarning`.
    pub fn arrange(&mut self) -> Result<ArrangeReport> {
        let items = items_for(&self.store);
        if items.is_empty() {
            return Ok(ArrangeReport::default());
        }

        let result = Arranger::new(self.config.arrange_settings()).arrange(&items);

        let mut changes: Vec<InstanceChange> = self
            .store
            .iter()
            .map(|object| InstanceChange {
                id: object.id,
                before: object.instances.clone(),
                after: object.instances.clone(),
            })
            .collect();
        for placement in &result.placements {
            let Some(change) = changes.iter_mut().find(|c| c.id == placement.id) else {
                continue;
            };
            if let Some(instance) = change.after.get_mut(placement.instance) {
                *instance = instance.translated(placement.dx, placement.dy);
                instance.outside_bounds = placement.outside_bounds;
            }
        }
        changes.retain(|c| c.before != c.after);

        let report = ArrangeReport {
            moved: changes.len(),
            outside: result.outside(),
        };
        if !changes.is_empty() {
            self.execute(Command::Transform {
                name: "Arrange".to_string(),
                changes,
            })?;
        }
        if !report.outside.is_empty() {
            tracing::warn!(
                "{} object(s) could not be placed on the bed",
                report.outside.len()
            );
            self.view_sync.publish(PlaterEvent::ArrangeWarning {
                outside: report.outside.clone(),
            });
        }
        Ok(report)
    }
}
