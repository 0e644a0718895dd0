use platekit_core::{EventCategory, EventFilter, PlaterEvent};
use platekit_plater::{ObjectGeometry, Plater};
use std::sync::{Arc, Mutex};

fn cube() -> ObjectGeometry {
    ObjectGeometry::cuboid("cube", 10.0, 10.0, 10.0)
}

#[test]
fn test_mutations_publish_collection_changes() {
    let mut plater = Plater::default();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    plater.view_sync().subscribe(
        EventFilter::Categories(vec![EventCategory::Collection]),
        move |event| sink.lock().unwrap().push(event),
    );

    let id = plater.add(cube()).unwrap();
    plater.rotate(id, 15.0).unwrap();
    assert!(plater.undo());
    // Failed operations publish nothing.
    assert!(plater.scale(id, -1.0).is_err());

    let events = seen.lock().unwrap().clone();
    assert_eq!(events.len(), 3);
    let generations: Vec<u64> = events
        .iter()
        .map(|e| match e {
            PlaterEvent::CollectionChanged { generation } => *generation,
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert!(generations.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(generations.last().copied(), Some(plater.store().generation()));
}

#[test]
fn test_remove_selected_publishes_selection_then_collection() {
    let mut plater = Plater::default();
    let id = plater.add(cube()).unwrap();
    plater.select(id).unwrap();
    let mut events = plater.view_sync().receiver();

    plater.remove_selected().unwrap();

    assert_eq!(
        events.try_recv().ok(),
        Some(PlaterEvent::SelectionChanged { selected: None })
    );
    assert!(matches!(
        events.try_recv(),
        Ok(PlaterEvent::CollectionChanged { .. })
    ));
}

#[test]
fn test_unsubscribed_view_receives_nothing() {
    let mut plater = Plater::default();
    let count = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&count);
    let subscription = plater.view_sync().subscribe(EventFilter::All, move |_| {
        *counter.lock().unwrap() += 1;
    });

    plater.add(cube()).unwrap();
    assert!(plater.view_sync().unsubscribe(subscription));
    plater.add(cube()).unwrap();

    assert_eq!(*count.lock().unwrap(), 1);
}
