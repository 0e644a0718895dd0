//! Thumbnail generation off the controlling thread.
//!
//! A render job captures a snapshot of the object's geometry and first
//! instance together with a token, the object's `revision` at request time.
//! Jobs run on the tokio blocking pool when a runtime is available and on a
//! named OS thread otherwise. Results come back over a channel and are
//! applied on the controlling thread by [`ThumbnailScheduler::poll`],
//! [`ThumbnailScheduler::wait`] or [`ThumbnailScheduler::next_completion`].
//! A result is published only if the object still exists (looked up by id)
//! and its revision still equals the token.

use crate::model::{Instance, ObjectGeometry, ThumbnailState};
use crate::object_store::ObjectStore;
use anyhow::Context;
use image::RgbaImage;
use platekit_core::{BoundingBox, ObjectId, PlaterError, Point2, Result};
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Transform};
use tokio::sync::mpsc;

/// Renders a thumbnail image for a job. Called from a worker thread.
pub trait ThumbnailRenderer: Send + Sync {
    fn render(&self, job: &ThumbnailJob) -> anyhow::Result<RgbaImage>;
}

/// Everything a renderer needs, detached from the store.
#[derive(Debug, Clone)]
pub struct ThumbnailJob {
    pub id: ObjectId,
    /// Object revision when the job was requested.
    pub token: u64,
    pub geometry: Arc<ObjectGeometry>,
    pub instance: Instance,
    /// Edge length of the square image in pixels.
    pub size: u32,
}

#[derive(Debug)]
struct ThumbnailCompletion {
    id: ObjectId,
    token: u64,
    result: anyhow::Result<RgbaImage>,
}

/// What happened to a finished job.
#[derive(Debug, Clone, PartialEq)]
pub enum ThumbnailOutcome {
    /// The image was stored on the object.
    Published { id: ObjectId, image: Arc<RgbaImage> },
    /// The object changed or left the plate while the job ran.
    Discarded { id: ObjectId },
    /// The renderer returned an error; the thumbnail stays stale.
    Failed { id: ObjectId, reason: String },
}

pub struct ThumbnailScheduler {
    renderer: Arc<dyn ThumbnailRenderer>,
    size: u32,
    sender: mpsc::UnboundedSender<ThumbnailCompletion>,
    receiver: mpsc::UnboundedReceiver<ThumbnailCompletion>,
    /// Latest requested token per object.
    in_flight: HashMap<ObjectId, u64>,
    /// Jobs spawned whose completion has not been received yet.
    outstanding: usize,
}

impl ThumbnailScheduler {
    pub fn new(renderer: Arc<dyn ThumbnailRenderer>, size: u32) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            renderer,
            size: size.max(1),
            sender,
            receiver,
            in_flight: HashMap::new(),
            outstanding: 0,
        }
    }

    /// Scheduler using the built-in [`SilhouetteRenderer`].
    pub fn with_silhouette(size: u32) -> Self {
        Self::new(Arc::new(SilhouetteRenderer::default()), size)
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Edge length used by jobs requested from now on.
    pub fn set_size(&mut self, size: u32) {
        self.size = size.max(1);
    }

    /// Number of jobs whose result has not been received.
    pub fn pending(&self) -> usize {
        self.outstanding
    }

    /// Marks the thumbnail stale. A job already running for the object will
    /// be discarded when it finishes.
    pub fn invalidate(&mut self, store: &mut ObjectStore, id: ObjectId) -> Result<()> {
        let object = store.object_mut(id).ok_or(PlaterError::not_found(id))?;
        object.thumbnail_state = ThumbnailState::Stale;
        self.in_flight.remove(&id);
        Ok(())
    }

    /// Starts rendering the thumbnail of `id` in the background.
    pub fn request_generation(&mut self, store: &mut ObjectStore, id: ObjectId) -> Result<()> {
        let object = store.object_mut(id).ok_or(PlaterError::not_found(id))?;
        let Some(instance) = object.instances.first().copied() else {
            return Err(PlaterError::invalid_parameter(
                "instances",
                format!("object {} has no instances", id),
            ));
        };
        let job = ThumbnailJob {
            id,
            token: object.revision,
            geometry: Arc::clone(&object.geometry),
            instance,
            size: self.size,
        };
        let token = job.token;

        if self.spawn(job) {
            object.thumbnail_state = ThumbnailState::Generating;
            self.in_flight.insert(id, token);
            self.outstanding += 1;
            tracing::debug!("Thumbnail requested for object {} (token {})", id, token);
        }
        Ok(())
    }

    /// Requests a thumbnail for every object whose thumbnail is stale.
    /// Returns the number of jobs started.
    pub fn request_stale(&mut self, store: &mut ObjectStore) -> usize {
        let stale: Vec<ObjectId> = store
            .iter()
            .filter(|o| o.thumbnail_state == ThumbnailState::Stale)
            .map(|o| o.id)
            .collect();
        stale
            .into_iter()
            .filter(|id| self.request_generation(store, *id).is_ok())
            .count()
    }

    /// Applies every completion that has arrived, without blocking.
    pub fn poll(&mut self, store: &mut ObjectStore) -> Vec<ThumbnailOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(completion) = self.receiver.try_recv() {
            outcomes.push(self.complete(store, completion));
        }
        outcomes
    }

    /// Blocks until the next completion arrives and applies it. Returns
    /// `None` when no job is outstanding.
    ///
    /// Must not be called from inside an async runtime; use
    /// [`next_completion`](Self::next_completion) there.
    pub fn wait(&mut self, store: &mut ObjectStore) -> Option<ThumbnailOutcome> {
        if self.outstanding == 0 {
            return None;
        }
        let completion = self.receiver.blocking_recv()?;
        Some(self.complete(store, completion))
    }

    /// Waits for the next completion and applies it. Returns `None` when no
    /// job is outstanding.
    pub async fn next_completion(&mut self, store: &mut ObjectStore) -> Option<ThumbnailOutcome> {
        if self.outstanding == 0 {
            return None;
        }
        let completion = self.receiver.recv().await?;
        Some(self.complete(store, completion))
    }

    fn spawn(&self, job: ThumbnailJob) -> bool {
        let renderer = Arc::clone(&self.renderer);
        let sender = self.sender.clone();
        let id = job.id;
        let work = move || {
            let result = std::panic::catch_unwind(AssertUnwindSafe(|| renderer.render(&job)))
                .unwrap_or_else(|panic| {
                    Err(anyhow::anyhow!("renderer panicked: {}", panic_message(&*panic)))
                });
            let completion = ThumbnailCompletion {
                id: job.id,
                token: job.token,
                result,
            };
            if sender.send(completion).is_err() {
                tracing::trace!("Thumbnail scheduler dropped before object {} finished", job.id);
            }
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(work);
                true
            }
            Err(_) => match std::thread::Builder::new()
                .name(format!("thumbnail-{}", id))
                .spawn(work)
            {
                Ok(_) => true,
                Err(err) => {
                    tracing::error!("Failed to start thumbnail worker for object {}: {}", id, err);
                    false
                }
            },
        }
    }

    fn complete(&mut self, store: &mut ObjectStore, completion: ThumbnailCompletion) -> ThumbnailOutcome {
        self.outstanding = self.outstanding.saturating_sub(1);
        let ThumbnailCompletion { id, token, result } = completion;

        if self.in_flight.get(&id) != Some(&token) {
            tracing::debug!("Dropping superseded thumbnail for object {}", id);
            return ThumbnailOutcome::Discarded { id };
        }
        self.in_flight.remove(&id);

        let Some(object) = store.object_mut(id) else {
            tracing::warn!("Dropping thumbnail for object {}: no longer on the plate", id);
            return ThumbnailOutcome::Discarded { id };
        };
        if object.revision != token {
            tracing::warn!(
                "Dropping thumbnail for object {}: revision {} is newer than {}",
                id,
                object.revision,
                token
            );
            return ThumbnailOutcome::Discarded { id };
        }

        match result {
            Ok(image) => {
                let image = Arc::new(image);
                object.thumbnail = Some(Arc::clone(&image));
                object.thumbnail_state = ThumbnailState::Ready;
                ThumbnailOutcome::Published { id, image }
            }
            Err(err) => {
                tracing::warn!("Thumbnail for object {} failed: {:#}", id, err);
                object.thumbnail_state = ThumbnailState::Stale;
                ThumbnailOutcome::Failed {
                    id,
                    reason: format!("{:#}", err),
                }
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

impl std::fmt::Debug for ThumbnailScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumbnailScheduler")
            .field("size", &self.size)
            .field("outstanding", &self.outstanding)
            .finish()
    }
}

/// Fills the top-down silhouette of the first instance.
#[derive(Debug, Clone, Copy)]
pub struct SilhouetteRenderer {
    pub fill: [u8; 4],
    pub background: [u8; 4],
}

impl Default for SilhouetteRenderer {
    fn default() -> Self {
        Self {
            fill: [96, 96, 96, 255],
            background: [255, 255, 255, 255],
        }
    }
}

/// Fraction of the image left blank on each side.
const PADDING: f64 = 0.05;

impl ThumbnailRenderer for SilhouetteRenderer {
    fn render(&self, job: &ThumbnailJob) -> anyhow::Result<RgbaImage> {
        let size = job.size;
        let mut pixmap = Pixmap::new(size, size).context("thumbnail size must be non-zero")?;
        let [r, g, b, a] = self.background;
        pixmap.fill(Color::from_rgba8(r, g, b, a));

        // Rotation and scale only; the bed position does not matter here.
        let placement = Instance {
            offset: Point2::default(),
            ..job.instance
        };
        let projected: Vec<Vec<Point2>> = job
            .geometry
            .volumes
            .iter()
            .map(|v| v.vertices.iter().map(|p| placement.transform_point(p)).collect())
            .collect();
        let bbox = BoundingBox::from_points(projected.iter().flatten().copied())
            .context("geometry has no vertices")?;

        let pixels = f64::from(size);
        let padding = pixels * PADDING;
        let extent = bbox.width().max(bbox.height()).max(platekit_core::geometry::EPSILON);
        let scale = (pixels - 2.0 * padding) / extent;
        let off_x = padding + (pixels - 2.0 * padding - bbox.width() * scale) / 2.0;
        let off_y = padding + (pixels - 2.0 * padding - bbox.height() * scale) / 2.0;
        let to_pixel = |p: &Point2| -> (f64, f64) {
            let x = off_x + (p.x - bbox.min.x) * scale;
            let y = pixels - (off_y + (p.y - bbox.min.y) * scale);
            (x, y)
        };

        let mut builder = PathBuilder::new();
        for (volume, points) in job.geometry.volumes.iter().zip(&projected) {
            for tri in &volume.triangles {
                let [a, mut b, mut c] = tri.map(|i| to_pixel(&points[i as usize]));
                let cross = (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0);
                if cross.abs() < 1e-9 {
                    continue;
                }
                // Uniform winding so overlapping triangles never cancel out.
                if cross < 0.0 {
                    std::mem::swap(&mut b, &mut c);
                }
                builder.move_to(a.0 as f32, a.1 as f32);
                builder.line_to(b.0 as f32, b.1 as f32);
                builder.line_to(c.0 as f32, c.1 as f32);
                builder.close();
            }
        }

        if let Some(path) = builder.finish() {
            let mut paint = Paint::default();
            let [r, g, b, a] = self.fill;
            paint.set_color_rgba8(r, g, b, a);
            paint.anti_alias = true;
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }

        RgbaImage::from_raw(size, size, pixmap.take()).context("pixel buffer has the wrong size")
    }
}
