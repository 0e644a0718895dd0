//! Bounding-box arrangement of instances on the bed.
//!
//! Footprints are inflated by half the required spacing and dropped one by
//! one onto a grid scanned bottom-left first. The first cell whose inflated
//! box fits inside the bed without touching anything already placed wins.
//! Arrangement never fails: an instance that fits nowhere is parked at the
//! least-overlapping cell (or the bed centre) and flagged.

use crate::object_store::ObjectStore;
use platekit_core::{ArrangeSettings, BoundingBox, ObjectId, Point2};

/// Grid step as a fraction of the smallest inflated footprint dimension.
pub const GRID_FRACTION: f64 = 0.25;

/// Upper bound on the number of grid cells scanned per instance.
pub const MAX_GRID_CELLS: f64 = 10_000.0;

/// Edge length given to zero-area footprints (mm).
pub const MIN_EXTENT: f64 = 1.0;

/// One instance to place.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrangeItem {
    pub id: ObjectId,
    pub instance: usize,
    /// Current XY footprint on the bed.
    pub footprint: BoundingBox,
}

/// Where an instance goes, as a translation of its current position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub id: ObjectId,
    pub instance: usize,
    pub dx: f64,
    pub dy: f64,
    pub outside_bounds: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrangeResult {
    /// One placement per input item, in input order.
    pub placements: Vec<Placement>,
}

impl ArrangeResult {
    /// Objects with at least one instance that could not be placed legally.
    pub fn outside(&self) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self
            .placements
            .iter()
            .filter(|p| p.outside_bounds)
            .map(|p| p.id)
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    pub fn all_placed(&self) -> bool {
        self.placements.iter().all(|p| !p.outside_bounds)
    }
}

/// Collects the footprint of every instance on the plate, in display order.
pub fn items_for(store: &ObjectStore) -> Vec<ArrangeItem> {
    store
        .iter()
        .flat_map(|object| {
            object
                .footprints()
                .into_iter()
                .enumerate()
                .map(move |(instance, footprint)| ArrangeItem {
                    id: object.id,
                    instance,
                    footprint,
                })
        })
        .collect()
}

struct Slot {
    item: usize,
    degenerate: bool,
    inflated: BoundingBox,
}

pub struct Arranger {
    settings: ArrangeSettings,
}

impl Arranger {
    pub fn new(settings: ArrangeSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ArrangeSettings {
        &self.settings
    }

    /// Computes a placement for every item.
    pub fn arrange(&self, items: &[ArrangeItem]) -> ArrangeResult {
        if items.is_empty() {
            return ArrangeResult::default();
        }

        let half = self.settings.spacing() / 2.0;
        let mut slots: Vec<Slot> = items
            .iter()
            .enumerate()
            .map(|(item, it)| {
                let fp = it.footprint;
                let degenerate = fp.is_degenerate();
                let body = if degenerate {
                    let c = fp.center();
                    let w = fp.width().max(MIN_EXTENT);
                    let h = fp.height().max(MIN_EXTENT);
                    BoundingBox::from_origin(Point2::new(c.x - w / 2.0, c.y - h / 2.0), w, h)
                } else {
                    fp
                };
                Slot {
                    item,
                    degenerate,
                    inflated: body.inflate(half),
                }
            })
            .collect();

        // Degenerate footprints first, then largest first. The sort is stable.
        slots.sort_by(|a, b| {
            b.degenerate
                .cmp(&a.degenerate)
                .then_with(|| b.inflated.area().total_cmp(&a.inflated.area()))
        });

        let step = self.grid_step(&slots);
        tracing::debug!(
            "Arranging {} instances, spacing {:.2} mm, grid step {:.3} mm",
            items.len(),
            2.0 * half,
            step
        );

        let mut placed: Vec<BoundingBox> = Vec::with_capacity(slots.len());
        let unplaced = BoundingBox::new(Point2::default(), Point2::default());
        let mut targets: Vec<(BoundingBox, bool)> = vec![(unplaced, false); items.len()];
        for slot in &slots {
            let (target, outside) = self.place(&slot.inflated, &placed, step);
            if outside {
                tracing::warn!(
                    "Object {} instance {} does not fit on the bed",
                    items[slot.item].id,
                    items[slot.item].instance
                );
            }
            placed.push(target);
            targets[slot.item] = (target, outside);
        }

        let shift = if targets.iter().all(|(_, outside)| !outside) {
            self.centering_shift(&placed)
        } else {
            None
        };
        let (sx, sy) = shift.unwrap_or((0.0, 0.0));

        let placements: Vec<Placement> = items
            .iter()
            .zip(&slots_in_input_order(&slots, items.len()))
            .zip(&targets)
            .map(|((it, slot), (target, outside))| {
                let from = slot.inflated.center();
                let to = target.center();
                Placement {
                    id: it.id,
                    instance: it.instance,
                    dx: to.x - from.x + sx,
                    dy: to.y - from.y + sy,
                    outside_bounds: *outside,
                }
            })
            .collect();

        let result = ArrangeResult { placements };
        tracing::info!(
            "Arranged {} instances, {} outside the bed",
            items.len(),
            result.placements.iter().filter(|p| p.outside_bounds).count()
        );
        result
    }

    fn grid_step(&self, slots: &[Slot]) -> f64 {
        let smallest = slots
            .iter()
            .map(|s| s.inflated.width().min(s.inflated.height()))
            .fold(f64::INFINITY, f64::min);
        let floor = (self.settings.bed.bounding_box().area() / MAX_GRID_CELLS).sqrt();
        let step = (GRID_FRACTION * smallest).max(floor);
        if step.is_finite() && step > 0.0 {
            step
        } else {
            MIN_EXTENT
        }
    }

    /// Lower-left corners scanned for a box of the given size, rows
    /// bottom-up and left to right within a row.
    fn candidates(&self, width: f64, height: f64, step: f64) -> Vec<Point2> {
        let bed = self.settings.bed.bounding_box();
        let xs = axis_positions(bed.min.x, bed.max.x - width, step);
        let ys = axis_positions(bed.min.y, bed.max.y - height, step);
        ys.iter()
            .flat_map(|&y| xs.iter().map(move |&x| Point2::new(x, y)))
            .collect()
    }

    fn place(&self, inflated: &BoundingBox, placed: &[BoundingBox], step: f64) -> (BoundingBox, bool) {
        let (w, h) = (inflated.width(), inflated.height());
        let bed = &self.settings.bed;

        let mut best: Option<(f64, BoundingBox)> = None;
        for corner in self.candidates(w, h, step) {
            let candidate = BoundingBox::from_origin(corner, w, h);
            if !bed.contains_box(&candidate) {
                continue;
            }
            if !placed.iter().any(|p| p.intersects(&candidate)) {
                return (candidate, false);
            }
            let overlap: f64 = placed.iter().map(|p| p.overlap_area(&candidate)).sum();
            if best.is_none_or(|(o, _)| overlap < o) {
                best = Some((overlap, candidate));
            }
        }

        let fallback = best.map(|(_, b)| b).unwrap_or_else(|| {
            let c = bed.center();
            BoundingBox::from_origin(Point2::new(c.x - w / 2.0, c.y - h / 2.0), w, h)
        });
        (fallback, true)
    }

    /// Translation that centres the packed boxes on the bed, when every
    /// shifted box still lies inside it.
    fn centering_shift(&self, placed: &[BoundingBox]) -> Option<(f64, f64)> {
        if !self.settings.center {
            return None;
        }
        let cluster = placed.iter().copied().reduce(|a, b| a.union(&b))?;
        let target = self.settings.bed.center();
        let (dx, dy) = (target.x - cluster.center().x, target.y - cluster.center().y);
        placed
            .iter()
            .all(|b| self.settings.bed.contains_box(&b.translate(dx, dy)))
            .then_some((dx, dy))
    }
}

fn slots_in_input_order(slots: &[Slot], len: usize) -> Vec<&Slot> {
    let mut ordered: Vec<Option<&Slot>> = vec![None; len];
    for slot in slots {
        ordered[slot.item] = Some(slot);
    }
    ordered.into_iter().flatten().collect()
}

/// Positions from `start` to `end` in steps of `step`, always including
/// `end`. Empty when the range is inverted.
fn axis_positions(start: f64, end: f64, step: f64) -> Vec<f64> {
    if end < start - platekit_core::geometry::EPSILON {
        return Vec::new();
    }
    let count = ((end - start) / step).floor() as usize;
    let mut positions: Vec<f64> = (0..=count).map(|i| start + i as f64 * step).collect();
    if positions
        .last()
        .is_some_and(|&last| end - last > platekit_core::geometry::EPSILON)
    {
        positions.push(end);
    }
    positions
}
