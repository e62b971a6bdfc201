use floorkit_canvas::tooltip::{TooltipContent, TooltipLayoutEngine};
use floorkit_core::{Device, DeviceCategory, Point, ScreenPoint, Zone};
use floorkit_settings::{TooltipDetailLevel, TooltipSettings};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn camera_content() -> TooltipContent {
    TooltipContent::new("Cam")
        .with_line("Type: Camera")
        .with_line("Status: movable")
}

#[test]
fn test_layout_sizes_from_line_count() {
    let engine = TooltipLayoutEngine::default();
    let layout = engine.layout(&camera_content(), ScreenPoint::new(100.0, 100.0), 800.0, 600.0);

    // padding + header + divider, then two 16.8px rows, then padding.
    assert!(approx(layout.height, 82.6), "height {}", layout.height);
    assert!(approx(layout.lines[0].y_offset, 41.0));
    assert!(approx(layout.lines[1].y_offset, 57.8));
    // "Status: movable" is the longest text at 15 glyphs of 7.2px.
    assert!(approx(layout.width, 124.0), "width {}", layout.width);
    assert_eq!((layout.x, layout.y), (112.0, 112.0));
    assert!(!layout.flipped_x && !layout.flipped_y);
}

#[test]
fn test_title_only_has_no_divider() {
    let engine = TooltipLayoutEngine::default();
    let layout = engine.layout(&TooltipContent::new("Cam"), ScreenPoint::new(0.0, 0.0), 800.0, 600.0);
    assert!(layout.lines.is_empty());
    assert!(approx(layout.height, 40.0));
}

#[test]
fn test_long_line_wraps_and_caps_width() {
    let engine = TooltipLayoutEngine::default();
    let content = TooltipContent::new("Cam").with_line("x".repeat(70));
    let layout = engine.layout(&content, ScreenPoint::new(10.0, 10.0), 800.0, 600.0);

    assert_eq!(layout.lines[0].rows, 3);
    assert!(approx(layout.width, 240.0));
    assert!(approx(layout.height, 41.0 + 3.0 * 16.8 + 8.0));
}

#[test]
fn test_flips_near_bottom_right_corner() {
    let engine = TooltipLayoutEngine::default();
    let layout = engine.layout(&camera_content(), ScreenPoint::new(790.0, 590.0), 800.0, 600.0);

    assert!(layout.flipped_x && layout.flipped_y);
    assert!(approx(layout.x, 654.0));
    assert!(approx(layout.y, 495.4));
    let rect = layout.rect();
    assert!(rect.max_x <= 800.0 && rect.max_y <= 600.0);
}

#[test]
fn test_clamps_when_neither_side_fits() {
    let engine = TooltipLayoutEngine::default();
    let layout = engine.layout(&camera_content(), ScreenPoint::new(70.0, 40.0), 140.0, 90.0);

    assert!(!layout.flipped_x && !layout.flipped_y);
    assert!(approx(layout.x, 16.0));
    assert!(approx(layout.y, 90.0 - 82.6));
}

#[test]
fn test_sub_list_is_capped_with_more_line() {
    let engine = TooltipLayoutEngine::default();
    let content = TooltipContent::new("Lobby")
        .with_line("Devices: 5")
        .with_sub_list(["a", "b", "c", "d", "e"]);

    let lines = engine.visible_lines(&content);
    assert_eq!(lines, vec!["Devices: 5", "a", "b", "c", "+2 more"]);

    let wide = TooltipLayoutEngine::new(TooltipSettings {
        sub_list_cap: 10,
        ..TooltipSettings::default()
    });
    assert_eq!(wide.visible_lines(&content).len(), 6);
}

#[test]
fn test_device_content_by_detail_level() {
    let device = Device::new("cam-1", Point::new(0.25, 0.5), DeviceCategory::Camera)
        .with_name("Lobby camera");
    let lobby = Zone::new(
        "z1",
        "Lobby",
        "",
        vec![Point::new(0.0, 0.0), Point::new(0.5, 0.0), Point::new(0.5, 1.0)],
    );

    let minimal = TooltipContent::for_device(&device, TooltipDetailLevel::Minimal, [&lobby]);
    assert_eq!(minimal.title, "Lobby camera");
    assert!(minimal.lines.is_empty());

    let standard = TooltipContent::for_device(&device, TooltipDetailLevel::Standard, [&lobby]);
    assert_eq!(standard.lines, vec!["Type: Camera", "Status: movable"]);
    assert!(standard.sub_list.is_empty());

    let detailed = TooltipContent::for_device(
        &device.clone().locked(true),
        TooltipDetailLevel::Detailed,
        [&lobby],
    );
    assert_eq!(detailed.lines.len(), 4);
    assert_eq!(detailed.lines[1], "Status: locked");
    assert_eq!(detailed.lines[2], "Position: (0.250, 0.500)");
    assert_eq!(detailed.sub_list, vec!["Lobby"]);
}

#[test]
fn test_zone_content_lists_devices() {
    let zone = Zone::new(
        "z1",
        "",
        "",
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ],
    );
    let a = Device::new("a", Point::new(0.1, 0.1), DeviceCategory::Sensor);
    let b = Device::new("b", Point::new(0.2, 0.2), DeviceCategory::Sensor).with_name("Door");

    let standard = TooltipContent::for_zone(&zone, TooltipDetailLevel::Standard, [&a, &b]);
    assert_eq!(standard.title, "z1");
    assert_eq!(standard.lines, vec!["Devices: 2"]);

    let detailed = TooltipContent::for_zone(&zone, TooltipDetailLevel::Detailed, [&a, &b]);
    assert_eq!(detailed.lines, vec!["Devices: 2", "Corners: 4"]);
    assert_eq!(detailed.sub_list, vec!["a", "Door"]);
}
