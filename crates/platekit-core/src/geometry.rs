//! Planar geometry used by the plater: points, axis-aligned boxes and the bed
//! polygon.

use serde::{Deserialize, Serialize};

/// Tolerance for comparisons between box edges, in millimetres.
pub const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Per-axis scale factors of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Scale3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn uniform(factor: f64) -> Self {
        Self::new(factor, factor, factor)
    }

    pub fn is_uniform(&self) -> bool {
        (self.x - self.y).abs() < EPSILON && (self.y - self.z).abs() < EPSILON
    }

    /// Component-wise product.
    pub fn combine(&self, other: &Scale3) -> Scale3 {
        Scale3::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    /// True when every factor is finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.z]
            .iter()
            .all(|f| f.is_finite() && *f > 0.0)
    }
}

impl Default for Scale3 {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

/// Axis-aligned bounding box in bed coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point2,
    pub max: Point2,
}

impl BoundingBox {
    /// Creates a box from two corners; the corners are normalised.
    pub fn new(a: Point2, b: Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Creates a box of the given size with its lower-left corner at `origin`.
    pub fn from_origin(origin: Point2, width: f64, height: f64) -> Self {
        Self::new(origin, Point2::new(origin.x + width, origin.y + height))
    }

    /// Smallest box containing all points, `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point2>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self {
            min: first,
            max: first,
        };
        for p in iter {
            bbox.min.x = bbox.min.x.min(p.x);
            bbox.min.y = bbox.min.y.min(p.y);
            bbox.max.x = bbox.max.x.max(p.x);
            bbox.max.y = bbox.max.y.max(p.y);
        }
        Some(bbox)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point2 {
        Point2::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// True when the box has no area.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= EPSILON || self.height() <= EPSILON
    }

    /// Grows the box by `amount` on every side.
    pub fn inflate(&self, amount: f64) -> Self {
        Self {
            min: Point2::new(self.min.x - amount, self.min.y - amount),
            max: Point2::new(self.max.x + amount, self.max.y + amount),
        }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            min: Point2::new(self.min.x + dx, self.min.y + dy),
            max: Point2::new(self.max.x + dx, self.max.y + dy),
        }
    }

    /// Interiors overlap. Boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.x < other.max.x - EPSILON
            && other.min.x < self.max.x - EPSILON
            && self.min.y < other.max.y - EPSILON
            && other.min.y < self.max.y - EPSILON
    }

    pub fn overlap_area(&self, other: &BoundingBox) -> f64 {
        let w = self.max.x.min(other.max.x) - self.min.x.max(other.min.x);
        let h = self.max.y.min(other.max.y) - self.min.y.max(other.min.y);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }

    pub fn contains_point(&self, p: &Point2) -> bool {
        p.x >= self.min.x - EPSILON
            && p.x <= self.max.x + EPSILON
            && p.y >= self.min.y - EPSILON
            && p.y <= self.max.y + EPSILON
    }

    pub fn union(&self, other: &BoundingBox) -> Self {
        Self {
            min: Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// The four sides, counter-clockwise from the lower-left corner.
    pub fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> {
        let corners = self.corners();
        (0..4).map(move |i| (corners[i], corners[(i + 1) % 4]))
    }

    pub fn corners(&self) -> [Point2; 4] {
        [
            self.min,
            Point2::new(self.max.x, self.min.y),
            self.max,
            Point2::new(self.min.x, self.max.y),
        ]
    }
}

/// The printable area, a closed polygon in bed coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BedShape {
    points: Vec<Point2>,
}

impl BedShape {
    /// Rectangular bed with its lower-left corner at the origin.
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self {
            points: vec![
                Point2::new(0.0, 0.0),
                Point2::new(width, 0.0),
                Point2::new(width, height),
                Point2::new(0.0, height),
            ],
        }
    }

    pub fn from_points(points: Vec<Point2>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(self.points.iter().copied())
            .unwrap_or_else(|| BoundingBox::new(Point2::default(), Point2::default()))
    }

    /// Centre of the bed's bounding box; new objects are dropped here.
    pub fn center(&self) -> Point2 {
        self.bounding_box().center()
    }

    /// Unsigned polygon area (shoelace formula).
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice: f64 = (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice.abs() / 2.0
    }

    /// Point-in-polygon test; points on the boundary count as inside.
    pub fn contains_point(&self, p: &Point2) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[j];
            if on_segment(p, &a, &b) {
                return true;
            }
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
                if p.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// True when the whole box lies inside the polygon.
    ///
    /// Checks the four corners and the centre, rejects boxes that have a
    /// polygon vertex strictly inside them (a concave notch) and boxes whose
    /// edges are crossed by a polygon edge (a slit running through the box).
    pub fn contains_box(&self, bbox: &BoundingBox) -> bool {
        if !bbox.corners().iter().all(|c| self.contains_point(c)) {
            return false;
        }
        if !self.contains_point(&bbox.center()) {
            return false;
        }
        let vertex_inside = self.points.iter().any(|v| {
            v.x > bbox.min.x + EPSILON
                && v.x < bbox.max.x - EPSILON
                && v.y > bbox.min.y + EPSILON
                && v.y < bbox.max.y - EPSILON
        });
        if vertex_inside {
            return false;
        }
        !self
            .edges()
            .any(|(a, b)| bbox.edges().any(|(c, d)| segments_cross(&a, &b, &c, &d)))
    }

    fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

impl Default for BedShape {
    fn default() -> Self {
        Self::rectangle(200.0, 200.0)
    }
}

/// Proper crossing: each segment has the endpoints of the other strictly on
/// opposite sides. Touching and collinear overlap do not count.
fn segments_cross(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> bool {
    let orient = |p: &Point2, q: &Point2, r: &Point2| {
        (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x)
    };
    let opposite =
        |s: f64, t: f64| (s > EPSILON && t < -EPSILON) || (s < -EPSILON && t > EPSILON);
    opposite(orient(c, d, a), orient(c, d, b)) && opposite(orient(a, b, c), orient(a, b, d))
}

fn on_segment(p: &Point2, a: &Point2, b: &Point2) -> bool {
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    if cross.abs() > 1e-7 * (1.0 + a.distance_to(b)) {
        return false;
    }
    p.x >= a.x.min(b.x) - EPSILON
        && p.x <= a.x.max(b.x) + EPSILON
        && p.y >= a.y.min(b.y) - EPSILON
        && p.y <= a.y.max(b.y) + EPSILON
}
