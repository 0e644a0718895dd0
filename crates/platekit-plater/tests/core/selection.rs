use platekit_core::{ObjectId, PlaterError, PlaterEvent};
use platekit_plater::{ObjectGeometry, Plater};

fn cube() -> ObjectGeometry {
    ObjectGeometry::cuboid("cube", 10.0, 10.0, 10.0)
}

#[test]
fn test_select_on_empty_plate() {
    let mut plater = Plater::default();
    assert_eq!(
        plater.select(ObjectId::new(5)),
        Err(PlaterError::not_found(ObjectId::new(5)))
    );
    assert_eq!(plater.selected(), None);
    assert!(plater.selected_object().is_none());
}

#[test]
fn test_single_select_updates_flags() {
    let mut plater = Plater::default();
    let ids = plater.add_many(vec![cube(), cube(), cube()]).unwrap();

    plater.select(ids[0]).unwrap();
    plater.select(ids[2]).unwrap();
    assert_eq!(plater.selected(), Some(ids[2]));
    assert_eq!(plater.selected_object().map(|o| o.id), Some(ids[2]));

    let flagged: Vec<ObjectId> = plater.objects().filter(|o| o.selected).map(|o| o.id).collect();
    assert_eq!(flagged, vec![ids[2]]);

    assert!(plater.clear_selection());
    assert!(!plater.clear_selection());
    assert!(plater.objects().all(|o| !o.selected));
}

#[test]
fn test_selection_is_not_undone() {
    let mut plater = Plater::default();
    let id = plater.add(cube()).unwrap();
    plater.select(id).unwrap();
    plater.rotate(id, 30.0).unwrap();

    assert!(plater.undo());
    assert_eq!(plater.selected(), Some(id));
}

#[test]
fn test_selection_cleared_when_object_disappears() {
    let mut plater = Plater::default();
    let id = plater.add(cube()).unwrap();
    plater.select(id).unwrap();
    let mut events = plater.view_sync().receiver();

    // Undoing the add removes the selected object.
    assert!(plater.undo());
    assert_eq!(plater.selected(), None);
    assert_eq!(
        events.try_recv().ok(),
        Some(PlaterEvent::SelectionChanged { selected: None })
    );

    // Bringing it back does not restore the selection.
    assert!(plater.redo());
    assert_eq!(plater.selected(), None);
    assert!(!plater.get(id).unwrap().selected);
}

#[test]
fn test_reselecting_publishes_once() {
    let mut plater = Plater::default();
    let id = plater.add(cube()).unwrap();
    let mut events = plater.view_sync().receiver();

    plater.select(id).unwrap();
    plater.select(id).unwrap();

    assert_eq!(
        events.try_recv().ok(),
        Some(PlaterEvent::SelectionChanged { selected: Some(id) })
    );
    assert!(events.try_recv().is_err());
}
