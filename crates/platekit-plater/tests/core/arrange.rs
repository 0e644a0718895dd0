use platekit_core::{BoundingBox, PlaterConfig, PlaterEvent};
use platekit_plater::{ObjectGeometry, Plater};

fn config(width: f64, depth: f64, clearance: f64) -> PlaterConfig {
    PlaterConfig {
        bed_shape: vec![[0.0, 0.0], [width, 0.0], [width, depth], [0.0, depth]],
        complete_objects: true,
        extruder_clearance_radius: clearance,
        duplicate_distance: 0.0,
        skirts: 0,
        brim_width: 0.0,
        ..Default::default()
    }
}

fn gap(a: &BoundingBox, b: &BoundingBox) -> f64 {
    let dx = (b.min.x - a.max.x).max(a.min.x - b.max.x);
    let dy = (b.min.y - a.max.y).max(a.min.y - b.max.y);
    dx.max(dy)
}

#[test]
fn test_two_boxes_keep_clearance() {
    let mut plater = Plater::new(config(100.0, 100.0, 2.0)).unwrap();
    let small = plater
        .add(ObjectGeometry::cuboid("small", 10.0, 10.0, 10.0))
        .unwrap();
    let large = plater
        .add(ObjectGeometry::cuboid("large", 20.0, 20.0, 10.0))
        .unwrap();

    let report = plater.arrange().unwrap();
    assert!(report.outside.is_empty());
    assert!(!plater.outside_bounds());

    let a = plater.get(small).unwrap().bounding_box().unwrap();
    let b = plater.get(large).unwrap().bounding_box().unwrap();
    assert!(gap(&a, &b) >= 2.0 - 1e-9, "gap {}", gap(&a, &b));

    let bed = plater.config().bed();
    assert!(bed.contains_box(&a));
    assert!(bed.contains_box(&b));
}

#[test]
fn test_arrange_is_one_undo_step() {
    let mut plater = Plater::new(config(200.0, 200.0, 5.0)).unwrap();
    let ids = plater
        .add_many(vec![
            ObjectGeometry::cuboid("a", 30.0, 30.0, 10.0),
            ObjectGeometry::cuboid("b", 30.0, 30.0, 10.0),
            ObjectGeometry::cuboid("c", 30.0, 30.0, 10.0),
        ])
        .unwrap();
    plater.duplicate(ids[0], 2).unwrap();
    let before = plater.store().layout();
    let depth = plater.history().undo_depth();

    let report = plater.arrange().unwrap();
    assert_eq!(report.moved, 3);
    assert_eq!(plater.history().undo_depth(), depth + 1);
    assert_eq!(plater.history().undo_name(), Some("Arrange"));

    assert!(plater.undo());
    assert_eq!(plater.store().layout(), before);
}

#[test]
fn test_arrange_empty_plate() {
    let mut plater = Plater::default();
    let report = plater.arrange().unwrap();
    assert_eq!(report.moved, 0);
    assert!(report.outside.is_empty());
    assert!(!plater.can_undo());
}

#[test]
fn test_oversized_object_is_flagged() {
    let mut plater = Plater::new(config(100.0, 100.0, 4.0)).unwrap();
    let mut events = plater.view_sync().receiver();
    // Fits the bed exactly, but not with clearance around it.
    let id = plater
        .add(ObjectGeometry::cuboid("slab", 100.0, 50.0, 5.0))
        .unwrap();

    let report = plater.arrange().unwrap();
    assert_eq!(report.outside, vec![id]);
    assert!(plater.outside_bounds());
    assert!(plater.get(id).unwrap().instances[0].outside_bounds);

    let mut warned = false;
    while let Ok(event) = events.try_recv() {
        if event == (PlaterEvent::ArrangeWarning { outside: vec![id] }) {
            warned = true;
        }
    }
    assert!(warned);

    assert!(plater.undo());
    assert!(!plater.outside_bounds());
}

#[test]
fn test_concave_bed_avoids_notch() {
    let config = PlaterConfig {
        bed_shape: vec![
            [0.0, 0.0],
            [100.0, 0.0],
            [100.0, 50.0],
            [50.0, 50.0],
            [50.0, 100.0],
            [0.0, 100.0],
        ],
        duplicate_distance: 2.0,
        ..Default::default()
    };
    let mut plater = Plater::new(config).unwrap();
    let ids = plater
        .add_many(
            (0..4)
                .map(|i| ObjectGeometry::cuboid(format!("o{i}"), 20.0, 20.0, 5.0))
                .collect(),
        )
        .unwrap();

    let report = plater.arrange().unwrap();
    assert!(report.outside.is_empty());
    let bed = plater.config().bed();
    for id in ids {
        let bbox = plater.get(id).unwrap().bounding_box().unwrap();
        assert!(bed.contains_box(&bbox), "{id} at {bbox:?}");
    }
}
