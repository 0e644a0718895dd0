use image::RgbaImage;
use platekit_core::{PlaterConfig, PlaterEvent};
use platekit_plater::{
    ObjectGeometry, Plater, ThumbnailJob, ThumbnailOutcome, ThumbnailRenderer, ThumbnailState,
};
use std::sync::Arc;

fn cube() -> ObjectGeometry {
    ObjectGeometry::cuboid("cube", 10.0, 10.0, 10.0)
}

/// Encodes the job token in the first pixel.
struct TokenRenderer;

impl ThumbnailRenderer for TokenRenderer {
    fn render(&self, job: &ThumbnailJob) -> anyhow::Result<RgbaImage> {
        let mut image = RgbaImage::new(job.size, job.size);
        image.put_pixel(0, 0, image::Rgba([job.token as u8, 0, 0, 255]));
        Ok(image)
    }
}

#[tokio::test]
async fn test_thumbnail_is_published() {
    let mut plater = Plater::default();
    let mut events = plater.view_sync().receiver();
    let id = plater.add(cube()).unwrap();
    assert_eq!(plater.get(id).unwrap().thumbnail_state, ThumbnailState::Stale);

    assert_eq!(plater.request_stale_thumbnails(), 1);
    assert_eq!(plater.get(id).unwrap().thumbnail_state, ThumbnailState::Generating);

    let outcome = plater.next_thumbnail().await;
    assert!(matches!(outcome, Some(ThumbnailOutcome::Published { id: done, .. }) if done == id));
    let object = plater.get(id).unwrap();
    assert_eq!(object.thumbnail_state, ThumbnailState::Ready);
    assert_eq!(object.thumbnail.as_ref().map(|i| i.dimensions()), Some((128, 128)));

    let mut ready = false;
    while let Ok(event) = events.try_recv() {
        if let PlaterEvent::ThumbnailReady { id: done, image } = event {
            assert_eq!(done, id);
            assert_eq!(image.width(), 128);
            ready = true;
        }
    }
    assert!(ready);
    assert!(plater.next_thumbnail().await.is_none());
}

#[tokio::test]
async fn test_result_for_removed_object_is_dropped() {
    let mut plater = Plater::default();
    let id = plater.add(cube()).unwrap();
    plater.request_thumbnail(id).unwrap();
    plater.remove(id).unwrap();

    let outcome = plater.next_thumbnail().await;
    assert_eq!(outcome, Some(ThumbnailOutcome::Discarded { id }));
    assert_eq!(plater.pending_thumbnails(), 0);

    // Undo brings the object back with a stale thumbnail, never a
    // half-finished one.
    assert!(plater.undo());
    assert_eq!(plater.get(id).unwrap().thumbnail_state, ThumbnailState::Stale);
}

#[tokio::test]
async fn test_mutation_during_render_discards_result() {
    let config = PlaterConfig {
        thumbnail_size: 8,
        ..Default::default()
    };
    let mut plater = Plater::with_renderer(config, Arc::new(TokenRenderer)).unwrap();
    let id = plater.add(cube()).unwrap();
    plater.request_thumbnail(id).unwrap();
    plater.rotate(id, 90.0).unwrap();

    let outcome = plater.next_thumbnail().await;
    assert_eq!(outcome, Some(ThumbnailOutcome::Discarded { id }));
    assert_eq!(plater.get(id).unwrap().thumbnail_state, ThumbnailState::Stale);

    // A fresh request renders the current revision.
    let revision = plater.get(id).unwrap().revision;
    plater.request_thumbnail(id).unwrap();
    match plater.next_thumbnail().await {
        Some(ThumbnailOutcome::Published { image, .. }) => {
            assert_eq!(image.get_pixel(0, 0).0[0], revision as u8);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn test_blocking_wait_without_runtime() {
    let mut plater = Plater::default();
    let ids = plater.add_many(vec![cube(), cube()]).unwrap();
    assert_eq!(plater.request_stale_thumbnails(), 2);

    let mut published = 0;
    while let Some(outcome) = plater.wait_thumbnail() {
        if matches!(outcome, ThumbnailOutcome::Published { .. }) {
            published += 1;
        }
    }
    assert_eq!(published, 2);
    for id in ids {
        assert_eq!(plater.get(id).unwrap().thumbnail_state, ThumbnailState::Ready);
    }
    assert!(plater.poll_thumbnails().is_empty());
}

struct PanickingRenderer;

impl ThumbnailRenderer for PanickingRenderer {
    fn render(&self, _job: &ThumbnailJob) -> anyhow::Result<RgbaImage> {
        panic!("renderer crashed")
    }
}

#[test]
fn test_renderer_panic_does_not_block_waiting() {
    let mut plater =
        Plater::with_renderer(PlaterConfig::default(), Arc::new(PanickingRenderer)).unwrap();
    let id = plater.add(cube()).unwrap();
    plater.request_thumbnail(id).unwrap();

    let outcome = plater.wait_thumbnail();
    assert!(matches!(outcome, Some(ThumbnailOutcome::Failed { id: failed, .. }) if failed == id));
    assert_eq!(plater.pending_thumbnails(), 0);
    assert_eq!(plater.get(id).unwrap().thumbnail_state, ThumbnailState::Stale);
    assert!(plater.wait_thumbnail().is_none());
}
