use platekit_core::{ArrangeSettings, BedShape, BoundingBox, ObjectId, Point2};
use platekit_plater::{ArrangeItem, Arranger, ObjectGeometry, Plater};
use proptest::prelude::*;

fn cube() -> ObjectGeometry {
    ObjectGeometry::cuboid("cube", 10.0, 10.0, 10.0)
}

proptest! {
    #[test]
    fn ids_are_never_reused(ops in prop::collection::vec((0u8..4, 0usize..8), 1..40)) {
        let mut plater = Plater::default();
        let mut highest: Option<ObjectId> = None;

        for (op, pick) in ops {
            match op {
                0 => {
                    let id = plater.add(cube()).unwrap();
                    if let Some(previous) = highest {
                        prop_assert!(id > previous);
                    }
                    highest = Some(id);
                }
                1 => {
                    let ids = plater.ids();
                    if !ids.is_empty() {
                        plater.remove(ids[pick % ids.len()]).unwrap();
                    }
                }
                2 => {
                    plater.undo();
                }
                _ => {
                    plater.redo();
                }
            }

            let ids = plater.ids();
            let mut unique = ids.clone();
            unique.sort();
            unique.dedup();
            prop_assert_eq!(unique.len(), ids.len());
            for (index, id) in ids.iter().enumerate() {
                prop_assert_eq!(plater.index_of(*id), Some(index));
            }
        }
    }

    #[test]
    fn arrangement_never_overlaps(sizes in prop::collection::vec((1.0f64..20.0, 1.0f64..20.0), 1..8)) {
        let settings = ArrangeSettings::new(BedShape::rectangle(200.0, 200.0), 6.0);
        let items: Vec<ArrangeItem> = sizes
            .iter()
            .enumerate()
            .map(|(i, (w, h))| ArrangeItem {
                id: ObjectId::new(i as u64),
                instance: 0,
                footprint: BoundingBox::from_origin(Point2::new(90.0, 90.0), *w, *h),
            })
            .collect();

        let result = Arranger::new(settings).arrange(&items);
        prop_assert!(result.all_placed());

        let boxes: Vec<BoundingBox> = items
            .iter()
            .zip(&result.placements)
            .map(|(item, p)| item.footprint.translate(p.dx, p.dy).inflate(3.0))
            .collect();
        for (i, a) in boxes.iter().enumerate() {
            prop_assert!(BedShape::rectangle(200.0, 200.0).contains_box(a));
            for b in &boxes[i + 1..] {
                prop_assert!(!a.intersects(b));
            }
        }
    }
}
