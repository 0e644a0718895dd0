use platekit::{
    init_logging, EventCategory, EventFilter, ObjectGeometry, Plater, PlaterConfig,
    ThumbnailOutcome, BUILD_DATE, VERSION,
};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logging()?;
    tracing::info!("PlateKit {} (built {})", VERSION, BUILD_DATE);

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => PlaterConfig::load(&path)?,
        None => PlaterConfig::default(),
    };
    let mut plater = Plater::new(config)?;

    plater.view_sync().subscribe(
        EventFilter::Categories(vec![EventCategory::Warning, EventCategory::Thumbnail]),
        |event| tracing::info!("{}", event.description()),
    );

    let cube = plater.add(ObjectGeometry::cuboid("cube", 20.0, 20.0, 20.0))?;
    let bar = plater.add(ObjectGeometry::cuboid("bar", 60.0, 10.0, 8.0))?;
    plater.add(ObjectGeometry::cuboid("slab", 400.0, 300.0, 2.0))?;

    plater.duplicate(cube, 3)?;
    plater.rotate(bar, 45.0)?;
    let report = plater.arrange()?;
    tracing::info!(
        "Arranged {} object(s), {} outside the bed",
        report.moved,
        report.outside.len()
    );

    plater.request_stale_thumbnails();
    while let Some(outcome) = plater.wait_thumbnail() {
        if let ThumbnailOutcome::Failed { id, reason } = outcome {
            tracing::warn!("Thumbnail for object {} failed: {}", id, reason);
        }
    }

    for object in plater.objects() {
        tracing::info!(
            "Object {} '{}': {} instance(s), thumbnail {:?}",
            object.id,
            object.name,
            object.instance_count(),
            object.thumbnail_state
        );
    }

    while plater.undo() {}
    tracing::info!("Undid every step, {} object(s) left", plater.len());

    Ok(())
}
