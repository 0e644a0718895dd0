//! Stateless instance and geometry operations.
//!
//! Each function computes a new instance list (or new geometry) from its
//! input and never touches the store. The plater applies the result and
//! records the before/after pair in the history.

use crate::model::{Instance, ObjectGeometry, PlacedObject, Volume};
use platekit_core::{BedShape, BoundingBox, PlaterError, Point3, Result, Scale3};
use std::collections::HashMap;

fn check_count(count: usize) -> Result<()> {
    if count == 0 {
        return Err(PlaterError::invalid_parameter("count", "must be at least 1"));
    }
    Ok(())
}

/// Appends `count` copies of the last instance. Each copy is shifted along X
/// by its footprint width plus `distance` from the one before it.
pub fn duplicate_instances(
    object: &PlacedObject,
    count: usize,
    distance: f64,
) -> Result<Vec<Instance>> {
    check_count(count)?;
    if !distance.is_finite() || distance < 0.0 {
        return Err(PlaterError::invalid_parameter(
            "distance",
            format!("must be >= 0, got {distance}"),
        ));
    }
    let Some(last) = object.instances.last().copied() else {
        return Err(PlaterError::invalid_parameter(
            "instances",
            format!("object {} has no instances", object.id),
        ));
    };

    let step = last.footprint(&object.geometry).width() + distance;
    let mut instances = object.instances.clone();
    instances.extend((1..=count).map(|n| Instance {
        outside_bounds: false,
        ..last.translated(step * n as f64, 0.0)
    }));
    Ok(instances)
}

/// Drops the last `count` instances. The result is empty when `count`
/// covers every instance.
pub fn remove_instances(instances: &[Instance], count: usize) -> Result<Vec<Instance>> {
    check_count(count)?;
    let keep = instances.len().saturating_sub(count);
    Ok(instances[..keep].to_vec())
}

/// Adds `angle` degrees of rotation about Z to every instance.
pub fn rotate_instances(instances: &[Instance], angle: f64) -> Result<Vec<Instance>> {
    if !angle.is_finite() {
        return Err(PlaterError::invalid_parameter(
            "angle",
            format!("must be finite, got {angle}"),
        ));
    }
    Ok(instances
        .iter()
        .map(|i| Instance {
            rotation: (i.rotation + angle).rem_euclid(360.0),
            ..*i
        })
        .collect())
}

/// Multiplies the scale of every instance by `factor`.
pub fn scale_instances(instances: &[Instance], factor: Scale3) -> Result<Vec<Instance>> {
    check_scale(&factor)?;
    instances
        .iter()
        .map(|i| {
            let scale = i.scale.combine(&factor);
            check_scale(&scale)?;
            Ok(Instance { scale, ..*i })
        })
        .collect()
}

/// Sets the scale of every instance to `scale`.
pub fn set_instance_scale(instances: &[Instance], scale: Scale3) -> Result<Vec<Instance>> {
    check_scale(&scale)?;
    Ok(instances.iter().map(|i| Instance { scale, ..*i }).collect())
}

fn check_scale(scale: &Scale3) -> Result<()> {
    if !scale.is_valid() {
        return Err(PlaterError::invalid_parameter(
            "scale",
            format!(
                "factors must be finite and > 0, got ({}, {}, {})",
                scale.x, scale.y, scale.z
            ),
        ));
    }
    Ok(())
}

/// Uniform factor that shrinks `footprint` to fit the bed's bounding box, or
/// `None` when it already fits.
pub fn fit_scale(footprint: &BoundingBox, bed: &BedShape) -> Option<f64> {
    let bed_box = bed.bounding_box();
    let fx = if footprint.width() > bed_box.width() {
        bed_box.width() / footprint.width()
    } else {
        1.0
    };
    let fy = if footprint.height() > bed_box.height() {
        bed_box.height() / footprint.height()
    } else {
        1.0
    };
    let factor = fx.min(fy);
    (factor < 1.0 && factor > 0.0).then_some(factor)
}

/// Splits geometry into independent parts.
///
/// Geometry with several volumes splits into one part per volume. A single
/// volume splits into its connected components (triangles sharing a vertex).
/// Fails with `InvalidGeometry` when there is only one part.
pub fn split_geometry(geometry: &ObjectGeometry) -> Result<Vec<ObjectGeometry>> {
    geometry.validate()?;

    let parts: Vec<ObjectGeometry> = if geometry.volumes.len() > 1 {
        geometry
            .volumes
            .iter()
            .map(|v| ObjectGeometry::new(v.name.clone(), vec![v.clone()]))
            .collect()
    } else {
        let volume = &geometry.volumes[0];
        connected_components(volume)
            .into_iter()
            .enumerate()
            .map(|(n, part)| {
                let name = format!("{}_{}", geometry.name, n + 1);
                ObjectGeometry::new(name.clone(), vec![Volume { name, ..part }])
            })
            .collect()
    };

    if parts.len() < 2 {
        return Err(PlaterError::invalid_geometry(format!(
            "object '{}' has a single part and cannot be split",
            geometry.name
        )));
    }
    tracing::debug!("Split '{}' into {} parts", geometry.name, parts.len());
    Ok(parts)
}

/// Groups the triangles of a volume into vertex-connected components, in
/// order of first appearance. Unreferenced vertices are dropped.
fn connected_components(volume: &Volume) -> Vec<Volume> {
    let mut parent: Vec<usize> = (0..volume.vertices.len()).collect();

    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for tri in &volume.triangles {
        let a = find(&mut parent, tri[0] as usize);
        for &v in &tri[1..] {
            let b = find(&mut parent, v as usize);
            if a != b {
                parent[b] = a;
            }
        }
    }

    let mut component_of_root: HashMap<usize, usize> = HashMap::new();
    let mut parts: Vec<(HashMap<u32, u32>, Volume)> = Vec::new();
    for tri in &volume.triangles {
        let root = find(&mut parent, tri[0] as usize);
        let slot = *component_of_root.entry(root).or_insert_with(|| {
            parts.push((
                HashMap::new(),
                Volume::new(volume.name.clone(), Vec::new(), Vec::new()),
            ));
            parts.len() - 1
        });
        let (remap, part) = &mut parts[slot];
        let mapped = tri.map(|v| {
            *remap.entry(v).or_insert_with(|| {
                part.vertices.push(volume.vertices[v as usize]);
                (part.vertices.len() - 1) as u32
            })
        });
        part.triangles.push(mapped);
    }

    parts.into_iter().map(|(_, part)| part).collect()
}

/// Offset on the bed of a part that was re-centred by `shift` in object
/// coordinates, for each instance of the original object.
pub fn part_instances(instances: &[Instance], shift: &Point3) -> Vec<Instance> {
    instances
        .iter()
        .map(|i| Instance {
            offset: i.transform_point(shift),
            outside_bounds: false,
            ..*i
        })
        .collect()
}
