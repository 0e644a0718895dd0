//! # PlateKit
//!
//! Plate state manager for 3D printing. Keeps the set of objects placed on a
//! virtual print bed, their instances and transforms, and offers:
//! - Stable object identities across edits
//! - Reversible edits with bounded undo/redo
//! - Overlap-free arrangement honouring spacing and clearance
//! - Background thumbnail rendering that never publishes stale images
//!
//! ## Architecture
//!
//! PlateKit is organized as a workspace with multiple crates:
//!
//! 1. **platekit-core** - Core types, geometry, configuration, view events
//! 2. **platekit-plater** - Object store, commands, history, arranger,
//!    selection and thumbnails behind the `Plater` facade
//! 3. **platekit** - Headless driver binary that integrates both crates

pub use platekit_core::{
    ArrangeSettings, BedShape, BoundingBox, ConfigError, EventCategory, EventFilter, ObjectId,
    PlaterConfig, PlaterError, PlaterEvent, Point2, Point3, Result, Scale3, ViewSync,
};

pub use platekit_plater::{
    ArrangeReport, Arranger, Command, CommandHistory, Instance, ObjectGeometry, ObjectStore,
    PlacedObject, Plater, SelectionManager, SilhouetteRenderer, ThumbnailOutcome,
    ThumbnailRenderer, ThumbnailState, Volume,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
