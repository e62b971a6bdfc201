use floorkit_canvas::selection_manager::{NavDirection, SelectionManager};
use floorkit_canvas::store::DeviceStore;
use floorkit_canvas::viewport::Viewport;
use floorkit_core::{Device, DeviceCategory, Point, ScreenPoint, SelectionError};

/// A, B and C land on (100,100), (500,500) and (120,130) in a 1000x1000
/// viewport at scale 1.
fn lasso_fixture() -> (Viewport, DeviceStore) {
    let mut devices = DeviceStore::new();
    devices.replace_all([
        Device::new("a", Point::new(0.1, 0.1), DeviceCategory::Camera),
        Device::new("b", Point::new(0.5, 0.5), DeviceCategory::Camera),
        Device::new("c", Point::new(0.12, 0.13), DeviceCategory::Sensor),
    ]);
    (Viewport::new(1000.0, 1000.0), devices)
}

fn nav_fixture() -> DeviceStore {
    let mut devices = DeviceStore::new();
    devices.replace_all(["d3", "d1", "d4", "d2"].iter().enumerate().map(|(i, id)| {
        Device::new(*id, Point::new(0.1 + 0.2 * i as f64, 0.5), DeviceCategory::Sensor)
    }));
    devices
}

#[test]
fn test_lasso_selects_devices_inside_tolerance_rect() {
    let (viewport, devices) = lasso_fixture();
    let mut manager = SelectionManager::default();

    manager.begin_lasso(ScreenPoint::new(90.0, 90.0));
    manager.update_lasso(ScreenPoint::new(150.0, 150.0));
    let changed = manager
        .finish_lasso(ScreenPoint::new(200.0, 200.0), false, &viewport, &devices)
        .unwrap();

    assert!(changed);
    assert_eq!(manager.selected_device_ids(), vec!["a", "c"]);
    assert!(!manager.is_lasso_active());
}

#[test]
fn test_lasso_tolerance_reaches_just_outside() {
    let (viewport, devices) = lasso_fixture();
    let mut manager = SelectionManager::default();

    // A sits 4px left of the rectangle; the 5px tolerance still catches it.
    manager.begin_lasso(ScreenPoint::new(104.0, 90.0));
    let changed = manager
        .finish_lasso(ScreenPoint::new(200.0, 200.0), false, &viewport, &devices)
        .unwrap();
    assert!(changed);
    assert_eq!(manager.selected_device_ids(), vec!["a", "c"]);
}

#[test]
fn test_lasso_union_adds_to_selection() {
    let (viewport, devices) = lasso_fixture();
    let mut manager = SelectionManager::default();
    manager.click_device("b", false);

    manager.begin_lasso(ScreenPoint::new(90.0, 90.0));
    let changed = manager
        .finish_lasso(ScreenPoint::new(200.0, 200.0), true, &viewport, &devices)
        .unwrap();
    assert!(changed);
    assert_eq!(manager.selected_device_ids(), vec!["a", "b", "c"]);
}

#[test]
fn test_lasso_without_union_replaces_and_empty_clears() {
    let (viewport, devices) = lasso_fixture();
    let mut manager = SelectionManager::default();
    manager.click_device("b", false);

    manager.begin_lasso(ScreenPoint::new(700.0, 700.0));
    let changed = manager
        .finish_lasso(ScreenPoint::new(900.0, 900.0), false, &viewport, &devices)
        .unwrap();
    assert!(changed);
    assert!(manager.selection().is_empty());
}

#[test]
fn test_small_lasso_is_not_a_drag() {
    let (viewport, devices) = lasso_fixture();
    let mut manager = SelectionManager::default();
    manager.click_device("b", false);

    manager.begin_lasso(ScreenPoint::new(98.0, 98.0));
    let result = manager.finish_lasso(ScreenPoint::new(101.0, 102.0), false, &viewport, &devices);
    assert!(matches!(result, Err(SelectionError::DragTooSmall { .. })));
    assert_eq!(manager.selected_device_ids(), vec!["b"]);
}

#[test]
fn test_lasso_follows_zoom() {
    let (mut viewport, devices) = lasso_fixture();
    viewport.zoom_at(ScreenPoint::new(0.0, 0.0), 2.0);
    let mut manager = SelectionManager::default();

    // At 2x, A is drawn at (200,200) and C at (240,260).
    manager.begin_lasso(ScreenPoint::new(190.0, 190.0));
    manager
        .finish_lasso(ScreenPoint::new(230.0, 230.0), false, &viewport, &devices)
        .unwrap();
    assert_eq!(manager.selected_device_ids(), vec!["a"]);
}

#[test]
fn test_keyboard_navigation_moves_down_by_id() {
    let devices = nav_fixture();
    let mut manager = SelectionManager::default();
    manager.click_device("d2", false);

    assert!(manager.navigate(NavDirection::Next, &devices));
    assert!(manager.navigate(NavDirection::Next, &devices));
    assert_eq!(manager.selected_device_ids(), vec!["d4"]);

    assert!(!manager.navigate(NavDirection::Next, &devices));
    assert_eq!(manager.selected_device_ids(), vec!["d4"]);
}

#[test]
fn test_keyboard_navigation_stops_at_first() {
    let devices = nav_fixture();
    let mut manager = SelectionManager::default();
    manager.click_device("d1", false);

    assert!(!manager.navigate(NavDirection::Previous, &devices));
    assert_eq!(manager.selected_device_ids(), vec!["d1"]);
}

#[test]
fn test_keyboard_navigation_from_multi_selection_uses_primary() {
    let devices = nav_fixture();
    let mut manager = SelectionManager::default();
    manager.click_device("d1", false);
    manager.click_device("d3", true);

    assert!(manager.navigate(NavDirection::Previous, &devices));
    assert_eq!(manager.selected_device_ids(), vec!["d2"]);
}

#[test]
fn test_select_zone_resets_active_vertex() {
    let mut manager = SelectionManager::default();
    assert!(manager.select_zone(Some("z1")));
    manager.set_active_vertex(Some(2));
    assert!(!manager.select_zone(Some("z1")));
    assert_eq!(manager.selection().active_vertex_index, None);

    assert!(manager.select_zone(None));
    assert_eq!(manager.selected_zone_id(), None);
}

#[test]
fn test_clear_reports_change_only_once() {
    let mut manager = SelectionManager::default();
    manager.click_device("a", false);
    assert!(manager.clear());
    assert!(!manager.clear());
}
