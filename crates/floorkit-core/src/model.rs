//! Floor-plan data model.
//!
//! Devices, zones and people are owned by the host's stores; the canvas keeps
//! snapshots of them and proposes changes through events.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::geometry::{NormalizedRect, Point, ScreenPoint};

/// A zone polygon needs at least this many distinct vertices.
pub const MIN_ZONE_VERTICES: usize = 3;

const RING_EPSILON: f64 = 1e-9;

/// A named polygonal area on the floor plan.
///
/// `polygon` is stored closed: the last point repeats the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(deserialize_with = "deserialize_ring")]
    pub polygon: Vec<Point>,
}

fn deserialize_ring<'de, D>(deserializer: D) -> Result<Vec<Point>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Vec::<Point>::deserialize(deserializer).map(Zone::close_ring)
}

impl Zone {
    /// Creates a zone, closing the ring if the caller passed an open one.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
        polygon: Vec<Point>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            polygon: Self::close_ring(polygon),
        }
    }

    /// Appends a copy of the first point unless the ring is already closed.
    pub fn close_ring(mut points: Vec<Point>) -> Vec<Point> {
        if let (Some(first), Some(last)) = (points.first().copied(), points.last()) {
            if points.len() == 1 || !first.approx_eq(last, RING_EPSILON) {
                points.push(first);
            }
        }
        points
    }

    /// Drops the closing duplicate, yielding the open vertex list.
    pub fn open_ring(points: &[Point]) -> &[Point] {
        match (points.first(), points.last()) {
            (Some(first), Some(last)) if points.len() > 1 && first.approx_eq(last, RING_EPSILON) => {
                &points[..points.len() - 1]
            }
            _ => points,
        }
    }

    /// The editable vertices (without the closing duplicate).
    pub fn vertices(&self) -> &[Point] {
        Self::open_ring(&self.polygon)
    }

    /// Number of vertices once consecutive duplicates are collapsed.
    pub fn distinct_vertex_count(points: &[Point]) -> usize {
        let open = Self::open_ring(points);
        let mut count = 0;
        let mut prev: Option<&Point> = None;
        for p in open {
            if prev.map_or(true, |q| !q.approx_eq(p, RING_EPSILON)) {
                count += 1;
            }
            prev = Some(p);
        }
        count
    }

    /// Whether the polygon satisfies the vertex floor.
    pub fn is_valid(&self) -> bool {
        Self::distinct_vertex_count(&self.polygon) >= MIN_ZONE_VERTICES
    }

    /// Unsigned shoelace area of a ring (open or closed).
    pub fn ring_area(points: &[Point]) -> f64 {
        let open = Self::open_ring(points);
        if open.len() < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for (i, a) in open.iter().enumerate() {
            let b = &open[(i + 1) % open.len()];
            sum += a.x * b.y - b.x * a.y;
        }
        (sum / 2.0).abs()
    }

    pub fn area(&self) -> f64 {
        Self::ring_area(&self.polygon)
    }

    pub fn bounds(&self) -> Option<NormalizedRect> {
        NormalizedRect::enclosing(self.vertices())
    }

    /// Even-odd point-in-polygon test.
    pub fn contains(&self, point: &Point) -> bool {
        let verts = self.vertices();
        if verts.len() < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = verts.len() - 1;
        for i in 0..verts.len() {
            let (pi, pj) = (verts[i], verts[j]);
            if (pi.y > point.y) != (pj.y > point.y)
                && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Vertex average, used to anchor labels and tooltips.
    pub fn centroid(&self) -> Option<Point> {
        let verts = self.vertices();
        if verts.is_empty() {
            return None;
        }
        let n = verts.len() as f64;
        let (sx, sy) = verts
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Point::new(sx / n, sy / n))
    }
}

/// Device categories shown in tooltips and used for marker styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceCategory {
    Camera,
    Sensor,
    AccessPoint,
    Controller,
    #[default]
    Other,
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Camera => write!(f, "Camera"),
            Self::Sensor => write!(f, "Sensor"),
            Self::AccessPoint => write!(f, "Access point"),
            Self::Controller => write!(f, "Controller"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// A device placed on the floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub position: Point,
    #[serde(default)]
    pub category: DeviceCategory,
    #[serde(default)]
    pub orientation_degrees: f64,
    #[serde(default)]
    pub locked: bool,
}

impl Device {
    /// Creates an unlocked device facing 0°.
    pub fn new(id: impl Into<String>, position: Point, category: DeviceCategory) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            position: position.clamped(),
            category,
            orientation_degrees: 0.0,
            locked: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Label for tooltips, falling back to the id when unnamed.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// A person marker (occupancy overlay). Rendered but never selectable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonMarker {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub position: Point,
}

impl PersonMarker {
    pub fn new(id: impl Into<String>, position: Point) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            position: position.clamped(),
        }
    }
}

/// Interaction modes of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionMode {
    #[default]
    Select,
    Move,
    Rotate,
    DrawRectangle,
    DrawPolygon,
    Edit,
    Delete,
}

impl InteractionMode {
    /// True for the two zone-drawing modes.
    pub fn is_draw(&self) -> bool {
        matches!(self, Self::DrawRectangle | Self::DrawPolygon)
    }

    /// Modes that only make sense when zones are shown.
    pub fn needs_zones(&self) -> bool {
        matches!(self, Self::DrawRectangle | Self::DrawPolygon | Self::Edit)
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select => write!(f, "select"),
            Self::Move => write!(f, "move"),
            Self::Rotate => write!(f, "rotate"),
            Self::DrawRectangle => write!(f, "draw-rectangle"),
            Self::DrawPolygon => write!(f, "draw-polygon"),
            Self::Edit => write!(f, "edit"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Observable selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionState {
    pub selected_device_ids: BTreeSet<String>,
    pub selected_zone_id: Option<String>,
    pub active_vertex_index: Option<usize>,
}

impl SelectionState {
    pub fn is_empty(&self) -> bool {
        self.selected_device_ids.is_empty() && self.selected_zone_id.is_none()
    }

    /// The selected device when exactly one is selected.
    pub fn single_device(&self) -> Option<&str> {
        if self.selected_device_ids.len() == 1 {
            self.selected_device_ids.iter().next().map(String::as_str)
        } else {
            None
        }
    }

    pub fn contains_device(&self, id: &str) -> bool {
        self.selected_device_ids.contains(id)
    }
}

/// Pan and zoom of the stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub pan_offset: ScreenPoint,
    pub scale: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            pan_offset: ScreenPoint::default(),
            scale: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_zone_new_closes_ring() {
        let zone = Zone::new("z1", "Lobby", "#ff0000", square());
        assert_eq!(zone.polygon.len(), 5);
        assert_eq!(zone.polygon.first(), zone.polygon.last());
        assert_eq!(zone.vertices().len(), 4);
    }

    #[test]
    fn test_zone_already_closed_is_kept() {
        let mut ring = square();
        ring.push(ring[0]);
        let zone = Zone::new("z1", "Lobby", "#ff0000", ring);
        assert_eq!(zone.polygon.len(), 5);
    }

    #[test]
    fn test_zone_area_and_contains() {
        let zone = Zone::new("z1", "Lobby", "#ff0000", square());
        assert!((zone.area() - 1.0).abs() < 1e-12);
        assert!(zone.contains(&Point::new(0.5, 0.5)));
        assert!(!zone.contains(&Point::new(1.5, 0.5)));
    }

    #[test]
    fn test_distinct_vertex_count_collapses_duplicates() {
        let ring = vec![
            Point::new(0.1, 0.1),
            Point::new(0.1, 0.1),
            Point::new(0.4, 0.1),
            Point::new(0.4, 0.4),
            Point::new(0.1, 0.1),
        ];
        assert_eq!(Zone::distinct_vertex_count(&ring), 3);
    }

    #[test]
    fn test_deserialized_zone_ring_is_closed() {
        let zone: Zone = serde_json::from_str(
            r#"{ "id": "z", "name": "Z", "color": "",
                 "polygon": [ {"x":0.2,"y":0.2}, {"x":0.6,"y":0.2}, {"x":0.6,"y":0.6} ] }"#,
        )
        .unwrap();
        assert_eq!(zone.polygon.len(), 4);
        assert_eq!(zone.polygon.first(), zone.polygon.last());
        assert_eq!(zone.vertices().len(), 3);
    }

    #[test]
    fn test_interaction_mode_serde_names() {
        let json = serde_json::to_string(&InteractionMode::DrawRectangle).unwrap();
        assert_eq!(json, "\"draw-rectangle\"");
        assert_eq!(InteractionMode::DrawPolygon.to_string(), "draw-polygon");
    }

    #[test]
    fn test_device_position_clamped_on_creation() {
        let device = Device::new("d1", Point::new(1.2, -0.1), DeviceCategory::Camera);
        assert_eq!(device.position, Point::new(1.0, 0.0));
        assert_eq!(device.display_name(), "d1");
    }
}
