//! # PlateKit Plater
//!
//! The plate state manager: owns the objects placed on a virtual print bed,
//! keeps their identities stable across edits, records every edit for
//! undo/redo and arranges instances so they neither overlap nor violate
//! clearance.
//!
//! ## Core Components
//!
//! - **ObjectStore**: Ordered objects with an identifier-to-index map
//! - **TransformOps**: Duplicate, remove, rotate, scale and split as pure
//!   functions on instances and geometry
//! - **CommandHistory**: Bounded undo/redo stacks of reversible commands
//! - **Arranger**: Grid-scan bounding-box packing onto the bed polygon
//! - **SelectionManager**: Single-object selection
//! - **ThumbnailScheduler**: Background thumbnail rendering with staleness
//!   tokens
//! - **Plater**: The facade tying these together and notifying views
//!
//! ## Architecture
//!
//! ```text
//! Plater (inbound requests)
//!   ├── ObjectStore (single source of truth)
//!   ├── CommandHistory (undo/redo)
//!   ├── SelectionManager
//!   ├── ThumbnailScheduler ── worker threads
//!   └── ViewSync (outbound events)
//!
//! TransformOps, Arranger (stateless computations)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use platekit_core::PlaterConfig;
//! use platekit_plater::{ObjectGeometry, Plater};
//!
//! let mut plater = Plater::new(PlaterConfig::default()).unwrap();
//! let id = plater.add(ObjectGeometry::cuboid("cube", 20.0, 20.0, 20.0)).unwrap();
//! plater.duplicate(id, 3).unwrap();
//! plater.arrange().unwrap();
//!
//! assert_eq!(plater.get(id).unwrap().instance_count(), 4);
//! assert!(!plater.outside_bounds());
//! assert!(plater.undo());
//! ```

pub mod arrange;
pub mod commands;
pub mod history;
pub mod model;
pub mod object_store;
pub mod plater_state;
pub mod selection_manager;
pub mod thumbnail;
pub mod transform_ops;

pub use arrange::{ArrangeItem, ArrangeResult, Arranger, Placement};
pub use commands::{Command, InstanceChange};
pub use history::CommandHistory;
pub use model::{Instance, ObjectGeometry, PlacedObject, ThumbnailState, Volume};
pub use object_store::ObjectStore;
pub use plater_state::{ArrangeReport, Plater};
pub use selection_manager::SelectionManager;
pub use thumbnail::{
    SilhouetteRenderer, ThumbnailJob, ThumbnailOutcome, ThumbnailRenderer, ThumbnailScheduler,
};
