use floorkit_canvas::culling::ViewportCuller;
use floorkit_canvas::store::{DeviceStore, PeopleStore, ZoneStore};
use floorkit_canvas::viewport::Viewport;
use floorkit_core::{Device, DeviceCategory, DisplayBounds, PersonMarker, Point, ScreenPoint, Zone};

fn stores() -> (DeviceStore, ZoneStore, PeopleStore) {
    let mut devices = DeviceStore::new();
    devices.replace_all([
        Device::new("near", Point::new(0.2, 0.2), DeviceCategory::Camera),
        Device::new("far", Point::new(0.9, 0.9), DeviceCategory::Camera),
    ]);
    let mut zones = ZoneStore::new();
    zones.replace_all([
        Zone::new(
            "z-near",
            "Desk",
            "",
            vec![Point::new(0.1, 0.1), Point::new(0.2, 0.1), Point::new(0.2, 0.2)],
        ),
        Zone::new(
            "z-far",
            "Dock",
            "",
            vec![Point::new(0.8, 0.8), Point::new(0.95, 0.8), Point::new(0.95, 0.95)],
        ),
    ]);
    let mut people = PeopleStore::new();
    people.replace_all([
        PersonMarker::new("p-near", Point::new(0.25, 0.1)),
        PersonMarker::new("p-far", Point::new(0.7, 0.95)),
    ]);
    (devices, zones, people)
}

#[test]
fn test_everything_visible_at_default_zoom() {
    let (devices, zones, people) = stores();
    let viewport = Viewport::new(800.0, 600.0);
    let mut culler = ViewportCuller::new(200.0);
    culler.update(&viewport, &devices, &zones, &people);

    assert_eq!(culler.visible_devices(), ["far", "near"]);
    assert_eq!(culler.visible_zones().len(), 2);
    assert_eq!(culler.visible_people().len(), 2);
    let stats = culler.stats();
    assert_eq!(stats.total, 6);
    assert_eq!(stats.visible, 6);
}

#[test]
fn test_zoomed_in_culls_far_entities() {
    let (devices, zones, people) = stores();
    let mut viewport = Viewport::new(800.0, 600.0);
    // 4x around the top-left corner: the padded view spans roughly
    // x in [-0.06, 0.31] and y in [-0.08, 0.33].
    viewport.zoom_at(ScreenPoint::new(0.0, 0.0), 4.0);

    let mut culler = ViewportCuller::new(200.0);
    assert!(culler.update(&viewport, &devices, &zones, &people));
    assert_eq!(culler.visible_devices(), ["near"]);
    assert_eq!(culler.visible_zones(), ["z-near"]);
    assert_eq!(culler.visible_people(), ["p-near"]);
    assert_eq!(culler.stats().visible, 3);
}

#[test]
fn test_padding_keeps_entities_just_outside() {
    let (devices, zones, people) = stores();
    let mut viewport = Viewport::new(800.0, 600.0);
    viewport.zoom_at(ScreenPoint::new(0.0, 0.0), 4.0);

    let mut tight = ViewportCuller::new(0.0);
    tight.update(&viewport, &devices, &zones, &people);
    // Without padding the view ends at x = 0.25, so the person at 0.25 is
    // on the edge and the device at 0.2 still inside.
    assert_eq!(tight.visible_devices(), ["near"]);

    viewport.pan_by(10.0, 0.0);
    tight.update(&viewport, &devices, &zones, &people);
    assert!(tight.visible_people().is_empty());

    let mut padded = ViewportCuller::new(200.0);
    padded.update(&viewport, &devices, &zones, &people);
    assert_eq!(padded.visible_people(), ["p-near"]);
}

#[test]
fn test_recompute_only_on_change() {
    let (devices, zones, people) = stores();
    let mut viewport = Viewport::new(800.0, 600.0);
    let mut culler = ViewportCuller::default();

    assert!(culler.update(&viewport, &devices, &zones, &people));
    assert!(!culler.update(&viewport, &devices, &zones, &people));

    viewport.pan_by(5.0, 0.0);
    assert!(culler.update(&viewport, &devices, &zones, &people));

    viewport.set_viewport_size(1024.0, 768.0);
    assert!(culler.update(&viewport, &devices, &zones, &people));

    viewport.set_display_bounds(Some(DisplayBounds::new(10.0, 10.0, 500.0, 400.0)));
    assert!(culler.update(&viewport, &devices, &zones, &people));

    culler.invalidate();
    assert!(culler.update(&viewport, &devices, &zones, &people));
    assert_eq!(culler.stats().recomputations, 5);
}
