use super::Plater;
use crate::thumbnail::ThumbnailOutcome;
use platekit_core::{ObjectId, PlaterEvent, Result};

impl Plater {
    /// Starts rendering the thumbnail of one object.
    pub fn request_thumbnail(&mut self, id: ObjectId) -> Result<()> {
        self.thumbnails.request_generation(&mut self.store, id)
    }

    /// Starts rendering every stale thumbnail. Returns the number of jobs.
    pub fn request_stale_thumbnails(&mut self) -> usize {
        self.thumbnails.request_stale(&mut self.store)
    }

    pub fn invalidate_thumbnail(&mut self, id: ObjectId) -> Result<()> {
        self.thumbnails.invalidate(&mut self.store, id)
    }

    /// Number of thumbnail jobs still running.
    pub fn pending_thumbnails(&self) -> usize {
        self.thumbnails.pending()
    }

    /// Applies finished thumbnails without blocking.
    pub fn poll_thumbnails(&mut self) -> Vec<ThumbnailOutcome> {
        let outcomes = self.thumbnails.poll(&mut self.store);
        outcomes.iter().for_each(|o| self.publish_thumbnail(o));
        outcomes
    }

    /// Blocks for the next finished thumbnail. Not for use inside an async
    /// runtime.
    pub fn wait_thumbnail(&mut self) -> Option<ThumbnailOutcome> {
        let outcome = self.thumbnails.wait(&mut self.store)?;
        self.publish_thumbnail(&outcome);
        Some(outcome)
    }

    /// Waits for the next finished thumbnail.
    pub async fn next_thumbnail(&mut self) -> Option<ThumbnailOutcome> {
        let outcome = self.thumbnails.next_completion(&mut self.store).await?;
        self.publish_thumbnail(&outcome);
        Some(outcome)
    }

    fn publish_thumbnail(&self, outcome: &ThumbnailOutcome) {
        if let ThumbnailOutcome::Published { id, image } = outcome {
            self.view_sync.publish(PlaterEvent::ThumbnailReady {
                id: *id,
                image: image.clone(),
            });
        }
    }
}
