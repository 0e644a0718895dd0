//! # PlateKit Core
//!
//! Core types, geometry and configuration shared by the PlateKit crates.
//! Provides the fundamental abstractions the plate state manager is built
//! on: object identifiers, bed geometry, arrangement settings, error types
//! and the view notification bus.

pub mod config;
pub mod error;
pub mod geometry;
pub mod types;
pub mod view_sync;

pub use config::{ArrangeSettings, PlaterConfig};
pub use error::{ConfigError, ConfigResult, PlaterError, Result};
pub use geometry::{BedShape, BoundingBox, Point2, Point3, Scale3};
pub use types::ObjectId;

// Re-export the notification bus for convenience
pub use view_sync::{
    EventCategory, EventFilter, PlaterEvent, SubscriptionId, ViewSync, ViewSyncConfig,
};
