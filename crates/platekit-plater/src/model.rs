//! Plate object model: source geometry, placement instances and the placed
//! object record kept by the object store.

use image::RgbaImage;
use nalgebra::{Rotation2, Vector2};
use platekit_core::{BoundingBox, ObjectId, PlaterError, Point2, Point3, Result, Scale3};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One mesh part of an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    pub name: String,
    pub vertices: Vec<Point3>,
    pub triangles: Vec<[u32; 3]>,
}

impl Volume {
    pub fn new(name: impl Into<String>, vertices: Vec<Point3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            name: name.into(),
            vertices,
            triangles,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.vertices.is_empty() {
            return Err(PlaterError::invalid_geometry(format!(
                "volume '{}' has no vertices",
                self.name
            )));
        }
        if self.triangles.is_empty() {
            return Err(PlaterError::invalid_geometry(format!(
                "volume '{}' has no triangles",
                self.name
            )));
        }
        if let Some(bad) = self.vertices.iter().find(|v| !v.is_finite()) {
            return Err(PlaterError::invalid_geometry(format!(
                "volume '{}' has a non-finite vertex {:?}",
                self.name, bad
            )));
        }
        let count = self.vertices.len();
        if let Some(tri) = self
            .triangles
            .iter()
            .find(|t| t.iter().any(|&i| i as usize >= count))
        {
            return Err(PlaterError::invalid_geometry(format!(
                "volume '{}' references a vertex out of range in triangle {:?}",
                self.name, tri
            )));
        }
        Ok(())
    }
}

/// Source geometry of a placed object, as handed over by a file loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectGeometry {
    pub name: String,
    pub volumes: Vec<Volume>,
}

impl ObjectGeometry {
    pub fn new(name: impl Into<String>, volumes: Vec<Volume>) -> Self {
        Self {
            name: name.into(),
            volumes,
        }
    }

    /// Geometry made of a single volume.
    pub fn single(
        name: impl Into<String>,
        vertices: Vec<Point3>,
        triangles: Vec<[u32; 3]>,
    ) -> Self {
        let name = name.into();
        Self {
            volumes: vec![Volume::new(name.clone(), vertices, triangles)],
            name,
        }
    }

    /// Axis-aligned box with one corner at the origin.
    pub fn cuboid(name: impl Into<String>, width: f64, depth: f64, height: f64) -> Self {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(width, 0.0, 0.0),
            Point3::new(width, depth, 0.0),
            Point3::new(0.0, depth, 0.0),
            Point3::new(0.0, 0.0, height),
            Point3::new(width, 0.0, height),
            Point3::new(width, depth, height),
            Point3::new(0.0, depth, height),
        ];
        let triangles = vec![
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [1, 2, 6],
            [1, 6, 5],
            [2, 3, 7],
            [2, 7, 6],
            [3, 0, 4],
            [3, 4, 7],
        ];
        Self::single(name, vertices, triangles)
    }

    /// Rejects geometry the plater cannot place.
    pub fn validate(&self) -> Result<()> {
        if self.volumes.is_empty() {
            return Err(PlaterError::invalid_geometry(format!(
                "object '{}' has no volumes",
                self.name
            )));
        }
        self.volumes.iter().try_for_each(Volume::validate)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Point3> {
        self.volumes.iter().flat_map(|v| v.vertices.iter())
    }

    pub fn vertex_count(&self) -> usize {
        self.volumes.iter().map(|v| v.vertices.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.volumes.iter().map(|v| v.triangles.len()).sum()
    }

    /// XY bounding box in object coordinates.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.vertices().map(|v| Point2::new(v.x, v.y)))
    }

    /// Moves the geometry so its XY bounding-box centre is at the origin and
    /// its lowest point rests on Z=0. Returns the centre it was moved from.
    pub fn center_around_origin(&mut self) -> Point3 {
        let Some(bbox) = self.bounding_box() else {
            return Point3::default();
        };
        let min_z = self
            .vertices()
            .map(|v| v.z)
            .fold(f64::INFINITY, f64::min);
        let center = bbox.center();
        let shift = Point3::new(center.x, center.y, min_z);

        for volume in &mut self.volumes {
            for v in &mut volume.vertices {
                v.x -= shift.x;
                v.y -= shift.y;
                v.z -= shift.z;
            }
        }
        shift
    }
}

/// One placed copy of an object's geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// Position of the object origin on the bed.
    pub offset: Point2,
    /// Rotation about Z in degrees, kept in `[0, 360)`.
    pub rotation: f64,
    pub scale: Scale3,
    /// Set by the arranger when no legal position was found.
    pub outside_bounds: bool,
}

impl Instance {
    pub fn at(offset: Point2) -> Self {
        Self {
            offset,
            rotation: 0.0,
            scale: Scale3::default(),
            outside_bounds: false,
        }
    }

    /// Maps a point from object coordinates to bed XY: scale, rotate, translate.
    pub fn transform_point(&self, p: &Point3) -> Point2 {
        let rotation = Rotation2::new(self.rotation.to_radians());
        let v = rotation * Vector2::new(p.x * self.scale.x, p.y * self.scale.y);
        Point2::new(v.x + self.offset.x, v.y + self.offset.y)
    }

    /// XY bounding box of the geometry placed by this instance.
    pub fn footprint(&self, geometry: &ObjectGeometry) -> BoundingBox {
        BoundingBox::from_points(geometry.vertices().map(|v| self.transform_point(v)))
            .unwrap_or_else(|| BoundingBox::new(self.offset, self.offset))
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            offset: Point2::new(self.offset.x + dx, self.offset.y + dy),
            ..*self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThumbnailState {
    #[default]
    Stale,
    Generating,
    Ready,
}

/// An object on the plate.
#[derive(Debug, Clone)]
pub struct PlacedObject {
    pub id: ObjectId,
    pub name: String,
    pub geometry: Arc<ObjectGeometry>,
    pub instances: Vec<Instance>,
    pub selected: bool,
    pub thumbnail_state: ThumbnailState,
    pub thumbnail: Option<Arc<RgbaImage>>,
    /// Store generation of this object's last mutation.
    pub revision: u64,
}

impl PlacedObject {
    pub fn new(id: ObjectId, geometry: ObjectGeometry, instances: Vec<Instance>) -> Self {
        Self {
            id,
            name: geometry.name.clone(),
            geometry: Arc::new(geometry),
            instances,
            selected: false,
            thumbnail_state: ThumbnailState::Stale,
            thumbnail: None,
            revision: 0,
        }
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Footprint of every instance, in instance order.
    pub fn footprints(&self) -> Vec<BoundingBox> {
        self.instances
            .iter()
            .map(|i| i.footprint(&self.geometry))
            .collect()
    }

    /// Union of all instance footprints.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.footprints().into_iter().reduce(|a, b| a.union(&b))
    }

    pub fn is_outside_bounds(&self) -> bool {
        self.instances.iter().any(|i| i.outside_bounds)
    }
}
