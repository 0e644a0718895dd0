//! # View Sync Module
//!
//! Notification fan-out from the plate state manager to its views (2D plate,
//! 3D plate, previews, menus).
//!
//! ## Overview
//!
//! Views never hold references into the object collection. They subscribe to
//! identifier-keyed events and query the plater on demand:
//! - `CollectionChanged` carries the store generation after a mutation
//! - `SelectionChanged` carries the newly selected identifier, if any
//! - `ThumbnailReady` carries the rendered image for one identifier
//!
//! ## Usage
//!
//! ```rust,ignore
//! use platekit_core::view_sync::{EventCategory, EventFilter, PlaterEvent, ViewSync};
//!
//! let sync = ViewSync::new();
//! let subscription = sync.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Collection]),
//!     |event| {
//!         if let PlaterEvent::CollectionChanged { generation } = event {
//!             println!("plate changed, generation {generation}");
//!         }
//!     },
//! );
//!
//! sync.publish(PlaterEvent::CollectionChanged { generation: 1 });
//! sync.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
