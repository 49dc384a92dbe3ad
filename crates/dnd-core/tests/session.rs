use gpui_dnd_core::{
    DragSession, DropResult, ItemOffset, MeasureTicket, PointerId, PointerInput, PointerSample,
    TouchPoint,
};

fn started(
    items: &[&'static str],
    item: &'static str,
    sample: PointerSample,
) -> (DragSession, MeasureTicket) {
    let mut session = DragSession::new();
    let ticket = session
        .start(items, &item, sample)
        .expect("item is in the list")
        .expect("no gesture was active");
    (session, ticket)
}

#[test]
fn mouse_drag_moves_item_down_one_row() {
    let items = ["A", "B", "C", "D"];
    let (mut session, ticket) = started(&items, "B", PointerSample::mouse(100.));
    session
        .resolve_heights(ticket, Ok(vec![100.; 4]))
        .unwrap();

    assert!(session.update(PointerSample::mouse(240.)));
    assert_eq!(session.target_index(), Some(2));

    let drop = session.end(&items, PointerSample::mouse(240.)).unwrap();
    assert_eq!(
        drop,
        DropResult {
            original_index: 1,
            new_index: 2,
            items: vec!["A", "C", "B", "D"],
        }
    );
    assert_eq!(drop.index_delta(), -1);
}

#[test]
fn mouse_drag_past_the_end_clamps_to_last_row() {
    let items = ["A", "B", "C", "D"];
    let (mut session, ticket) = started(&items, "B", PointerSample::mouse(100.));
    session.resolve_heights(ticket, Ok(vec![100.; 4])).unwrap();

    let drop = session.end(&items, PointerSample::mouse(340.)).unwrap();
    assert_eq!(drop.new_index, 3);
    assert_eq!(drop.items, ["A", "C", "D", "B"]);
}

#[test]
fn end_resets_every_field() {
    let items = ["A", "B", "C"];
    let (mut session, ticket) = started(&items, "C", PointerSample::mouse(50.));
    session.resolve_heights(ticket, Ok(vec![20.; 3])).unwrap();

    let drop = session.end(&items, PointerSample::mouse(10.)).unwrap();
    assert_eq!((drop.original_index, drop.new_index), (2, 0));

    assert!(!session.is_active());
    assert_eq!(session.original_index(), None);
    assert_eq!(session.pointer(), None);
    assert_eq!(session.start_offset(), 0.);
    assert_eq!(session.current_offset(), 0.);
    assert!(session.heights().is_empty());
    assert_eq!(session.item_offset(2), ItemOffset::default());
}

#[test]
fn observer_panic_cannot_leave_gesture_dangling() {
    let items = ["A", "B"];
    let (mut session, _) = started(&items, "A", PointerSample::mouse(0.));

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        if let Some(drop) = session.end(&items, PointerSample::mouse(0.)) {
            panic!("observer failed on {drop:?}");
        }
    }));
    assert!(result.is_err());
    assert!(!session.is_active());
}

#[test]
fn touch_gesture_follows_only_its_own_finger() {
    let items = ["Foo", "Bar", "Baz"];
    let press = PointerInput::touches([TouchPoint::new(1, 100.), TouchPoint::new(2, 200.)]);
    let (mut session, ticket) = started(&items, "Bar", press.first_sample().unwrap());
    session.resolve_heights(ticket, Ok(vec![25., 35., 45.])).unwrap();
    assert_eq!(session.pointer(), Some(PointerId::Touch(1)));

    assert!(!session.update_input(&PointerInput::touches([TouchPoint::new(2, 900.)])));
    assert!(!session.update_input(&PointerInput::mouse(900.)));
    assert_eq!(session.current_offset(), 100.);

    assert!(session.update_input(&PointerInput::touches([
        TouchPoint::new(2, 0.),
        TouchPoint::new(1, 150.),
    ])));
    assert_eq!(session.current_offset(), 150.);

    assert_eq!(
        session.end_input(&items, &PointerInput::touches([TouchPoint::new(3, 0.)])),
        None
    );
    assert!(session.is_active());

    let drop = session
        .end_input(&items, &PointerInput::touches([TouchPoint::new(1, 130.)]))
        .unwrap();
    assert_eq!((drop.original_index, drop.new_index), (1, 2));
}

#[test]
fn foreign_pointer_leaves_state_untouched() {
    let items = ["A", "B", "C"];
    let (mut session, ticket) = started(&items, "A", PointerSample::mouse(10.));
    session.resolve_heights(ticket, Ok(vec![10.; 3])).unwrap();
    session.update(PointerSample::mouse(20.));
    let before = session.gesture().cloned();

    assert!(!session.update(PointerSample::touch(4, 500.)));
    assert_eq!(session.end(&items, PointerSample::touch(4, 500.)), None);
    assert_eq!(session.gesture().cloned(), before);
}

#[test]
fn updates_without_gesture_are_ignored() {
    let mut session = DragSession::new();
    assert!(!session.update(PointerSample::mouse(234.)));
    assert_eq!(session.current_offset(), 0.);
    assert_eq!(session.target_index(), None);
    assert_eq!(session.end(&["A"], PointerSample::mouse(234.)), None);
}

#[test]
fn failed_query_drops_in_place() {
    let items = ["A", "B", "C"];
    let (mut session, ticket) = started(&items, "A", PointerSample::mouse(0.));
    assert!(
        session
            .resolve_heights(ticket, Err(gpui_dnd_core::DndError::NotMounted))
            .is_err()
    );

    session.update(PointerSample::mouse(1_000.));
    assert_eq!(session.item_offset(0).offset, 1_000.);
    assert_eq!(session.item_offset(1), ItemOffset::default());

    let drop = session.end(&items, PointerSample::mouse(1_000.)).unwrap();
    assert!(drop.is_noop());
    assert_eq!(drop.items, items);
}

#[test]
fn offsets_describe_every_row() {
    let items = ["A", "B", "C", "D"];
    let (mut session, ticket) = started(&items, "D", PointerSample::mouse(300.));
    session.resolve_heights(ticket, Ok(vec![40., 40., 40., 60.])).unwrap();
    session.update(PointerSample::mouse(230.));

    assert_eq!(session.target_index(), Some(1));
    let offsets: Vec<f32> = session.offsets(4).iter().map(|o| o.offset).collect();
    assert_eq!(offsets, [0., 60., 60., -70.]);
    assert!(session.offsets(4)[3].active);
}

#[test]
fn drop_result_serializes_for_hosts() {
    let items = ["A", "B", "C"];
    let (mut session, ticket) = started(&items, "A", PointerSample::mouse(0.));
    session.resolve_heights(ticket, Ok(vec![10.; 3])).unwrap();

    let drop = session.end(&items, PointerSample::mouse(12.)).unwrap();
    let json = serde_json::to_value(&drop).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "original_index": 0,
            "new_index": 1,
            "items": ["B", "A", "C"],
        })
    );
}
