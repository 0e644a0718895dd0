//! Event type definitions for view synchronisation.
//!
//! Events are cloneable and keyed by object identifier; they never carry
//! references into the object collection.

use image::RgbaImage;
use std::sync::Arc;

use crate::types::ObjectId;

/// Root event enum for all plater notifications
#[derive(Debug, Clone, PartialEq)]
pub enum PlaterEvent {
    /// The object collection mutated.
    CollectionChanged {
        /// Store generation after the mutation.
        generation: u64,
    },
    /// The active selection changed.
    SelectionChanged {
        /// The selected object, or `None` when the selection was cleared.
        selected: Option<ObjectId>,
    },
    /// A thumbnail finished rendering and was published.
    ThumbnailReady {
        /// Object the thumbnail belongs to.
        id: ObjectId,
        /// The rendered image.
        image: Arc<RgbaImage>,
    },
    /// Arrangement could not place some instances on the bed.
    ArrangeWarning {
        /// Objects with at least one instance flagged outside the bed.
        outside: Vec<ObjectId>,
    },
    /// An object was scaled down on load to fit the bed.
    ScaledDown {
        /// The scaled object.
        id: ObjectId,
        /// Uniform factor that was applied.
        factor: f64,
    },
}

impl PlaterEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            PlaterEvent::CollectionChanged { .. } => EventCategory::Collection,
            PlaterEvent::SelectionChanged { .. } => EventCategory::Selection,
            PlaterEvent::ThumbnailReady { .. } => EventCategory::Thumbnail,
            PlaterEvent::ArrangeWarning { .. } | PlaterEvent::ScaledDown { .. } => {
                EventCategory::Warning
            }
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            PlaterEvent::CollectionChanged { generation } => {
                format!("Collection changed (generation {})", generation)
            }
            PlaterEvent::SelectionChanged { selected: Some(id) } => {
                format!("Selected object {}", id)
            }
            PlaterEvent::SelectionChanged { selected: None } => "Selection cleared".to_string(),
            PlaterEvent::ThumbnailReady { id, image } => format!(
                "Thumbnail ready for object {} ({}x{})",
                id,
                image.width(),
                image.height()
            ),
            PlaterEvent::ArrangeWarning { outside } => {
                format!("{} object(s) could not be placed on the bed", outside.len())
            }
            PlaterEvent::ScaledDown { id, factor } => {
                format!("Object {} scaled down to {:.1}% to fit the bed", id, factor * 100.0)
            }
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// Object collection mutations.
    Collection,
    /// Selection changes.
    Selection,
    /// Thumbnail completions.
    Thumbnail,
    /// Non-fatal warnings (outside bounds, scaled down).
    Warning,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Collection => write!(f, "Collection"),
            EventCategory::Selection => write!(f, "Selection"),
            EventCategory::Thumbnail => write!(f, "Thumbnail"),
            EventCategory::Warning => write!(f, "Warning"),
        }
    }
}
