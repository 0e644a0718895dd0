use platekit_core::{ObjectId, PlaterConfig, PlaterError, PlaterEvent, Point2, Point3, Scale3};
use platekit_plater::{ObjectGeometry, Plater, Volume};

fn cube(size: f64) -> ObjectGeometry {
    ObjectGeometry::cuboid("cube", size, size, size)
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn test_add_places_at_bed_center() {
    let mut plater = Plater::default();
    let id = plater.add(cube(10.0)).unwrap();
    let object = plater.get(id).unwrap();

    assert_eq!(object.instances.len(), 1);
    assert_eq!(object.instances[0].offset, Point2::new(100.0, 100.0));
    let bbox = object.bounding_box().unwrap();
    assert_eq!(bbox.center(), Point2::new(100.0, 100.0));
    let min_z = object.geometry.vertices().map(|v| v.z).fold(f64::INFINITY, f64::min);
    assert_eq!(min_z, 0.0);
}

#[test]
fn test_oversized_object_is_scaled_down() {
    let mut plater = Plater::default();
    let mut events = plater.view_sync().receiver();
    let id = plater
        .add(ObjectGeometry::cuboid("wide", 400.0, 100.0, 10.0))
        .unwrap();

    let object = plater.get(id).unwrap();
    assert_eq!(object.instances[0].scale, Scale3::uniform(0.5));
    assert_close(object.bounding_box().unwrap().width(), 200.0);

    let mut factor = None;
    while let Ok(event) = events.try_recv() {
        if let PlaterEvent::ScaledDown { id: scaled, factor: f } = event {
            assert_eq!(scaled, id);
            factor = Some(f);
        }
    }
    assert_eq!(factor, Some(0.5));
}

#[test]
fn test_invalid_geometry_adds_nothing() {
    let mut plater = Plater::default();
    plater.add(cube(10.0)).unwrap();
    let layout = plater.store().layout();

    let broken = ObjectGeometry::single(
        "broken",
        vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
        vec![[0, 1, 5]],
    );
    let err = plater.add_many(vec![cube(5.0), broken]).unwrap_err();
    assert!(matches!(err, PlaterError::InvalidGeometry { .. }));
    assert_eq!(plater.store().layout(), layout);
    assert_eq!(plater.history().undo_depth(), 1);

    let empty = ObjectGeometry::new("empty", Vec::<Volume>::new());
    assert!(plater.add(empty).is_err());
    assert_eq!(plater.add(cube(5.0)).unwrap(), ObjectId::new(1));
}

#[test]
fn test_duplicate_and_decrease() {
    let mut plater = Plater::default();
    let id = plater.add(cube(10.0)).unwrap();

    plater.duplicate(id, 2).unwrap();
    let offsets: Vec<Point2> = plater
        .get(id)
        .unwrap()
        .instances
        .iter()
        .map(|i| i.offset)
        .collect();
    // Width 10 plus the default duplicate distance of 6.
    assert_eq!(
        offsets,
        vec![
            Point2::new(100.0, 100.0),
            Point2::new(116.0, 100.0),
            Point2::new(132.0, 100.0)
        ]
    );

    plater.decrease(id, 1).unwrap();
    assert_eq!(plater.get(id).unwrap().instance_count(), 2);

    plater.decrease(id, 5).unwrap();
    assert!(plater.get(id).is_none());
    assert_eq!(plater.history().undo_name(), Some("Remove Object"));

    assert!(plater.undo());
    assert_eq!(plater.get(id).unwrap().instance_count(), 2);
}

#[test]
fn test_rotate_and_scale() {
    let mut plater = Plater::default();
    let id = plater
        .add(ObjectGeometry::cuboid("bar", 40.0, 10.0, 10.0))
        .unwrap();

    plater.rotate(id, 90.0).unwrap();
    let bbox = plater.get(id).unwrap().bounding_box().unwrap();
    assert_close(bbox.width(), 10.0);
    assert_close(bbox.height(), 40.0);

    plater.rotate(id, 300.0).unwrap();
    assert_close(plater.get(id).unwrap().instances[0].rotation, 30.0);

    plater.scale(id, 2.0).unwrap();
    plater.scale(id, 1.5).unwrap();
    assert_eq!(plater.get(id).unwrap().instances[0].scale, Scale3::uniform(3.0));

    plater.set_scale(id, 0.5).unwrap();
    assert_eq!(plater.get(id).unwrap().instances[0].scale, Scale3::uniform(0.5));

    plater
        .scale_axes(id, Scale3::new(2.0, 1.0, 1.0))
        .unwrap();
    assert_eq!(
        plater.get(id).unwrap().instances[0].scale,
        Scale3::new(1.0, 0.5, 0.5)
    );
}

#[test]
fn test_split_keeps_parts_in_place() {
    let a = ObjectGeometry::cuboid("a", 10.0, 10.0, 10.0);
    let b = ObjectGeometry::cuboid("b", 10.0, 10.0, 20.0);
    let mut right = b.volumes[0].clone();
    for v in &mut right.vertices {
        v.x += 30.0;
    }
    let combined = ObjectGeometry::new("combined", vec![a.volumes[0].clone(), right]);

    let mut plater = Plater::default();
    let first = plater.add(cube(5.0)).unwrap();
    let id = plater.add(combined).unwrap();
    let last = plater.add(cube(5.0)).unwrap();
    let before = plater.get(id).unwrap().bounding_box().unwrap();

    let parts = plater.split(id).unwrap();
    assert_eq!(parts, vec![ObjectId::new(3), ObjectId::new(4)]);
    assert_eq!(plater.ids(), vec![first, parts[0], parts[1], last]);
    assert!(plater.get(id).is_none());

    let left = plater.get(parts[0]).unwrap().bounding_box().unwrap();
    let right = plater.get(parts[1]).unwrap().bounding_box().unwrap();
    assert_close(left.min.x, before.min.x);
    assert_close(right.max.x, before.max.x);
    assert_close(right.width(), 10.0);

    assert!(plater.undo());
    assert_eq!(plater.ids(), vec![first, id, last]);
}

#[test]
fn test_split_single_part_fails() {
    let mut plater = Plater::default();
    let id = plater.add(cube(10.0)).unwrap();
    assert!(matches!(
        plater.split(id),
        Err(PlaterError::InvalidGeometry { .. })
    ));
    assert_eq!(plater.history().undo_depth(), 1);
}

#[test]
fn test_reset() {
    let mut plater = Plater::default();
    plater.reset().unwrap();
    assert!(!plater.can_undo());

    let ids = plater.add_many(vec![cube(5.0), cube(6.0)]).unwrap();
    plater.select(ids[1]).unwrap();
    plater.reset().unwrap();
    assert!(plater.is_empty());
    assert_eq!(plater.selected(), None);

    assert!(plater.undo());
    assert_eq!(plater.ids(), ids);
    assert_eq!(plater.add(cube(1.0)).unwrap(), ObjectId::new(2));
}

#[test]
fn test_selected_variants_require_selection() {
    let mut plater = Plater::default();
    let id = plater.add(cube(10.0)).unwrap();

    assert_eq!(plater.remove_selected(), Err(PlaterError::EmptySelection));
    assert_eq!(plater.rotate_selected(10.0), Err(PlaterError::EmptySelection));
    assert_eq!(plater.scale_selected(2.0), Err(PlaterError::EmptySelection));
    assert_eq!(plater.set_scale_selected(2.0), Err(PlaterError::EmptySelection));
    assert_eq!(plater.duplicate_selected(1), Err(PlaterError::EmptySelection));
    assert_eq!(plater.decrease_selected(1), Err(PlaterError::EmptySelection));
    assert_eq!(plater.split_selected(), Err(PlaterError::EmptySelection));

    plater.select(id).unwrap();
    plater.duplicate_selected(1).unwrap();
    plater.rotate_selected(45.0).unwrap();
    assert_eq!(plater.get(id).unwrap().instance_count(), 2);
    plater.remove_selected().unwrap();
    assert!(plater.is_empty());
    assert_eq!(plater.selected(), None);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = PlaterConfig {
        bed_shape: vec![[0.0, 0.0], [1.0, 1.0]],
        ..Default::default()
    };
    assert!(Plater::new(config).is_err());

    let mut plater = Plater::default();
    let bad = PlaterConfig {
        history_limit: 0,
        ..Default::default()
    };
    assert!(plater.set_config(bad).is_err());
    assert_eq!(plater.config().history_limit, 100);
}
