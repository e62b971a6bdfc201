use floorkit_canvas::store::ZoneStore;
use floorkit_canvas::viewport::Viewport;
use floorkit_canvas::zone_editor::{rectangle_polygon, validate_polygon, DrawState, ZoneEditor};
use floorkit_core::{Point, ScreenPoint, Zone, ZoneError};

fn triangle_store() -> ZoneStore {
    let mut zones = ZoneStore::new();
    zones.upsert(Zone::new(
        "tri",
        "Storage",
        "#e67e22",
        vec![Point::new(0.1, 0.1), Point::new(0.6, 0.1), Point::new(0.3, 0.5)],
    ));
    zones
}

fn square_store() -> ZoneStore {
    let mut zones = ZoneStore::new();
    zones.upsert(Zone::new(
        "sq",
        "Office",
        "",
        vec![
            Point::new(0.2, 0.2),
            Point::new(0.6, 0.2),
            Point::new(0.6, 0.6),
            Point::new(0.2, 0.6),
        ],
    ));
    zones
}

#[test]
fn test_rectangle_zone_polygon() {
    let mut editor = ZoneEditor::default();
    editor.start_rectangle(Point::new(0.1, 0.1));
    editor.update_preview(Point::new(0.3, 0.2));
    assert!(matches!(editor.draw_state(), DrawState::Rectangle { .. }));

    let polygon = editor.complete_rectangle(Point::new(0.4, 0.4)).unwrap();
    assert_eq!(
        polygon,
        vec![
            Point::new(0.1, 0.1),
            Point::new(0.4, 0.1),
            Point::new(0.4, 0.4),
            Point::new(0.1, 0.4),
            Point::new(0.1, 0.1),
        ]
    );
    assert!(!editor.is_drawing());
}

#[test]
fn test_rectangle_preview_tracks_pointer() {
    let mut editor = ZoneEditor::default();
    editor.start_rectangle(Point::new(0.1, 0.1));
    editor.update_preview(Point::new(0.3, 0.2));
    assert_eq!(
        editor.preview(),
        Some(rectangle_polygon(Point::new(0.1, 0.1), Point::new(0.3, 0.2)))
    );
}

#[test]
fn test_polygon_draw_and_close() {
    let mut editor = ZoneEditor::default();
    editor.start_polygon(Point::new(0.1, 0.1));
    editor.add_vertex(Point::new(0.5, 0.1)).unwrap();
    editor.add_vertex(Point::new(0.5, 0.5)).unwrap();
    editor.update_preview(Point::new(0.2, 0.5));

    let preview = editor.preview().unwrap();
    assert_eq!(preview.len(), 4);
    assert_eq!(preview[3], Point::new(0.2, 0.5));

    let polygon = editor.close_polygon().unwrap();
    assert_eq!(
        polygon,
        vec![
            Point::new(0.1, 0.1),
            Point::new(0.5, 0.1),
            Point::new(0.5, 0.5),
            Point::new(0.1, 0.1),
        ]
    );
    assert_eq!(*editor.draw_state(), DrawState::Idle);
}

#[test]
fn test_collinear_polygon_is_degenerate() {
    let mut editor = ZoneEditor::default();
    editor.start_polygon(Point::new(0.1, 0.1));
    editor.add_vertex(Point::new(0.2, 0.2)).unwrap();
    editor.add_vertex(Point::new(0.3, 0.3)).unwrap();
    assert!(matches!(
        editor.close_polygon(),
        Err(ZoneError::Degenerate { .. })
    ));
    assert!(!editor.is_drawing());
}

#[test]
fn test_add_vertex_requires_polygon_draw() {
    let mut editor = ZoneEditor::default();
    assert_eq!(
        editor.add_vertex(Point::new(0.1, 0.1)),
        Err(ZoneError::NoActiveDraw)
    );
    editor.start_rectangle(Point::new(0.1, 0.1));
    assert_eq!(
        editor.add_vertex(Point::new(0.1, 0.1)),
        Err(ZoneError::NoActiveDraw)
    );
}

#[test]
fn test_cancel_discards_draw() {
    let mut editor = ZoneEditor::default();
    editor.start_polygon(Point::new(0.1, 0.1));
    assert!(editor.cancel());
    assert!(!editor.cancel());
    assert_eq!(editor.preview(), None);
}

#[test]
fn test_draw_points_are_clamped() {
    let mut editor = ZoneEditor::default();
    editor.start_rectangle(Point::new(-0.5, 0.2));
    let polygon = editor.complete_rectangle(Point::new(0.5, 1.7)).unwrap();
    assert_eq!(polygon[0], Point::new(0.0, 0.2));
    assert_eq!(polygon[2], Point::new(0.5, 1.0));
}

#[test]
fn test_validate_polygon() {
    let tiny = rectangle_polygon(Point::new(0.5, 0.5), Point::new(0.505, 0.505));
    assert!(matches!(
        validate_polygon(&tiny, 1e-4),
        Err(ZoneError::Degenerate { .. })
    ));
    let ok = rectangle_polygon(Point::new(0.5, 0.5), Point::new(0.6, 0.6));
    assert!(validate_polygon(&ok, 1e-4).is_ok());
}

#[test]
fn test_vertex_floor_rejects_delete() {
    let mut zones = triangle_store();
    let before = zones.get("tri").unwrap().polygon.clone();
    let mut editor = ZoneEditor::default();
    editor.begin_vertex_edit("tri", &zones).unwrap();

    let result = editor.delete_vertex(1, &mut zones);
    assert_eq!(result, Err(ZoneError::VertexFloor { required: 3 }));
    assert_eq!(zones.get("tri").unwrap().polygon, before);
    assert_eq!(editor.working_polygon().unwrap(), before.as_slice());
}

#[test]
fn test_delete_vertex_commits_immediately() {
    let mut zones = square_store();
    let mut editor = ZoneEditor::default();
    editor.begin_vertex_edit("sq", &zones).unwrap();

    let (id, polygon) = editor.delete_vertex(0, &mut zones).unwrap();
    assert_eq!(id, "sq");
    assert_eq!(
        polygon,
        vec![
            Point::new(0.6, 0.2),
            Point::new(0.6, 0.6),
            Point::new(0.2, 0.6),
            Point::new(0.6, 0.2),
        ]
    );
    assert_eq!(zones.get("sq").unwrap().polygon, polygon);
}

#[test]
fn test_delete_vertex_out_of_range() {
    let mut zones = square_store();
    let mut editor = ZoneEditor::default();
    editor.begin_vertex_edit("sq", &zones).unwrap();
    assert_eq!(
        editor.delete_vertex(4, &mut zones),
        Err(ZoneError::VertexOutOfRange { index: 4, len: 4 })
    );
}

#[test]
fn test_drag_is_working_copy_until_commit() {
    let mut zones = square_store();
    let viewport = Viewport::new(1000.0, 1000.0);
    let mut editor = ZoneEditor::default();
    editor.begin_vertex_edit("sq", &zones).unwrap();

    editor
        .drag_vertex(2, ScreenPoint::new(700.0, 800.0), &viewport)
        .unwrap();
    assert_eq!(zones.get("sq").unwrap().polygon[2], Point::new(0.6, 0.6));

    let (id, polygon) = editor.commit_vertex_drag(&mut zones).unwrap().unwrap();
    assert_eq!(id, "sq");
    assert_eq!(polygon[2], Point::new(0.7, 0.8));
    assert_eq!(zones.get("sq").unwrap().polygon[2], Point::new(0.7, 0.8));

    // Nothing left to commit.
    assert_eq!(editor.commit_vertex_drag(&mut zones).unwrap(), None);
}

#[test]
fn test_discard_restores_committed_polygon() {
    let zones = square_store();
    let viewport = Viewport::new(1000.0, 1000.0);
    let mut editor = ZoneEditor::default();
    editor.begin_vertex_edit("sq", &zones).unwrap();
    editor
        .drag_vertex(1, ScreenPoint::new(900.0, 100.0), &viewport)
        .unwrap();
    assert!(editor.is_dirty());

    assert!(editor.discard_changes());
    assert_eq!(
        editor.working_polygon().unwrap(),
        zones.get("sq").unwrap().polygon.as_slice()
    );
}

#[test]
fn test_switching_zone_discards_uncommitted_changes() {
    let mut zones = square_store();
    zones.upsert(Zone::new(
        "other",
        "Hall",
        "",
        vec![Point::new(0.7, 0.7), Point::new(0.9, 0.7), Point::new(0.9, 0.9)],
    ));
    let viewport = Viewport::new(1000.0, 1000.0);
    let mut editor = ZoneEditor::default();
    editor.begin_vertex_edit("sq", &zones).unwrap();
    editor
        .drag_vertex(0, ScreenPoint::new(0.0, 0.0), &viewport)
        .unwrap();

    editor.begin_vertex_edit("other", &zones).unwrap();
    assert_eq!(editor.editing_zone_id(), Some("other"));
    assert_eq!(zones.get("sq").unwrap().polygon[0], Point::new(0.2, 0.2));
}

#[test]
fn test_vertex_ops_need_edit_session() {
    let mut zones = square_store();
    let viewport = Viewport::new(1000.0, 1000.0);
    let mut editor = ZoneEditor::default();
    assert_eq!(
        editor.drag_vertex(0, ScreenPoint::new(1.0, 1.0), &viewport),
        Err(ZoneError::NotEditing)
    );
    assert_eq!(
        editor.delete_vertex(0, &mut zones),
        Err(ZoneError::NotEditing)
    );
    assert!(matches!(
        editor.begin_vertex_edit("missing", &zones),
        Err(ZoneError::UnknownZone { .. })
    ));
}

#[test]
fn test_hit_vertex_picks_nearest_handle() {
    let zones = square_store();
    let viewport = Viewport::new(1000.0, 1000.0);
    let mut editor = ZoneEditor::default();
    assert_eq!(editor.hit_vertex(ScreenPoint::new(200.0, 200.0), 8.0, &viewport), None);

    editor.begin_vertex_edit("sq", &zones).unwrap();
    assert_eq!(
        editor.hit_vertex(ScreenPoint::new(603.0, 598.0), 8.0, &viewport),
        Some(2)
    );
    assert_eq!(editor.hit_vertex(ScreenPoint::new(400.0, 400.0), 8.0, &viewport), None);
}
