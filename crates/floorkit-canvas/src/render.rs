//! Render-layer description for the host's drawing surface.
//!
//! The canvas does not draw. [`build_layers`] turns the current engine state
//! into an ordered list of layers (back to front) in screen coordinates, with
//! colours resolved from the injected theme. Hosts walk the list and paint
//! each layer with whatever 2D API they have.
//!
//! Layer order:
//! 1. Background (display bounds)
//! 2. Zones
//! 3. Zone preview (in-progress draw)
//! 4. Vertex handles (edit mode)
//! 5. Devices
//! 6. People
//! 7. Lasso
//! 8. Tooltip

use serde::Serialize;

use floorkit_core::{
    Device, DisplayBounds, PersonMarker, Point, ScreenPoint, ScreenRect, SelectionState, Zone,
};
use floorkit_settings::{Capabilities, Color, Theme};

use crate::tooltip::TooltipLayout;
use crate::viewport::Viewport;

/// A zone outline in screen space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneShape {
    pub id: String,
    pub name: String,
    /// Closed ring.
    pub points: Vec<ScreenPoint>,
    pub stroke: Color,
    pub fill_alpha: f64,
    pub selected: bool,
    pub editing: bool,
}

/// A draggable vertex handle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VertexHandle {
    pub index: usize,
    pub position: ScreenPoint,
    pub active: bool,
}

/// A device glyph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceGlyph {
    pub id: String,
    pub position: ScreenPoint,
    pub orientation_degrees: f64,
    pub selected: bool,
    pub locked: bool,
    pub color: Color,
}

/// A person marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonGlyph {
    pub id: String,
    pub name: String,
    pub position: ScreenPoint,
    pub color: Color,
}

/// One drawable layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layer", rename_all = "camelCase")]
pub enum RenderLayer {
    Background {
        /// `None` while the background is still loading.
        bounds: Option<DisplayBounds>,
        /// Bounds after pan/zoom.
        rect: ScreenRect,
    },
    Zones { shapes: Vec<ZoneShape> },
    ZonePreview {
        points: Vec<ScreenPoint>,
        color: Color,
    },
    VertexHandles {
        zone_id: String,
        handles: Vec<VertexHandle>,
        color: Color,
    },
    Devices { glyphs: Vec<DeviceGlyph> },
    People { glyphs: Vec<PersonGlyph> },
    Lasso { rect: ScreenRect, color: Color },
    Tooltip {
        layout: TooltipLayout,
        background: Color,
        text: Color,
    },
}

impl RenderLayer {
    pub fn name(&self) -> &'static str {
        match self {
            RenderLayer::Background { .. } => "background",
            RenderLayer::Zones { .. } => "zones",
            RenderLayer::ZonePreview { .. } => "zone-preview",
            RenderLayer::VertexHandles { .. } => "vertex-handles",
            RenderLayer::Devices { .. } => "devices",
            RenderLayer::People { .. } => "people",
            RenderLayer::Lasso { .. } => "lasso",
            RenderLayer::Tooltip { .. } => "tooltip",
        }
    }
}

/// Borrowed view of everything a frame needs.
pub struct RenderContext<'a> {
    pub viewport: &'a Viewport,
    pub capabilities: &'a Capabilities,
    pub theme: &'a Theme,
    pub selection: &'a SelectionState,
    /// Culled entities, ascending id order.
    pub zones: Vec<&'a Zone>,
    pub devices: Vec<&'a Device>,
    pub people: Vec<&'a PersonMarker>,
    /// Zone being edited and its working polygon.
    pub editing: Option<(&'a str, &'a [Point])>,
    pub preview: Option<Vec<Point>>,
    pub lasso: Option<ScreenRect>,
    pub tooltip: Option<TooltipLayout>,
}

/// Builds the ordered layer list for one frame.
pub fn build_layers(ctx: &RenderContext<'_>) -> Vec<RenderLayer> {
    let vp = ctx.viewport;
    let theme = ctx.theme;
    let mut layers = Vec::with_capacity(8);

    let top_left = vp.to_screen(&Point::new(0.0, 0.0));
    let bottom_right = vp.to_screen(&Point::new(1.0, 1.0));
    layers.push(RenderLayer::Background {
        bounds: vp.display_bounds().copied(),
        rect: ScreenRect::from_corners(top_left, bottom_right),
    });

    if ctx.capabilities.show_zones {
        let editing_id = ctx.editing.map(|(id, _)| id);
        let shapes = ctx
            .zones
            .iter()
            .map(|zone| {
                let editing = editing_id == Some(zone.id.as_str());
                // The edited zone shows its working copy.
                let ring: &[Point] = match ctx.editing {
                    Some((id, working)) if id == zone.id => working,
                    _ => &zone.polygon,
                };
                ZoneShape {
                    id: zone.id.clone(),
                    name: zone.name.clone(),
                    points: ring.iter().map(|p| vp.to_screen(p)).collect(),
                    stroke: if editing {
                        theme.zone_editing
                    } else {
                        theme.zone_color(&zone.color)
                    },
                    fill_alpha: theme.zone_fill_alpha,
                    selected: ctx.selection.selected_zone_id.as_deref() == Some(zone.id.as_str()),
                    editing,
                }
            })
            .collect();
        layers.push(RenderLayer::Zones { shapes });

        if let Some(preview) = &ctx.preview {
            layers.push(RenderLayer::ZonePreview {
                points: preview.iter().map(|p| vp.to_screen(p)).collect(),
                color: theme.zone_editing,
            });
        }

        if let Some((zone_id, working)) = ctx.editing {
            let handles = Zone::open_ring(working)
                .iter()
                .enumerate()
                .map(|(index, p)| VertexHandle {
                    index,
                    position: vp.to_screen(p),
                    active: ctx.selection.active_vertex_index == Some(index),
                })
                .collect();
            layers.push(RenderLayer::VertexHandles {
                zone_id: zone_id.to_string(),
                handles,
                color: theme.handle,
            });
        }
    }

    let glyphs = ctx
        .devices
        .iter()
        .map(|device| {
            let selected = ctx.selection.contains_device(&device.id);
            let color = if selected {
                theme.device_selected
            } else if device.locked {
                theme.device_locked
            } else {
                theme.device
            };
            DeviceGlyph {
                id: device.id.clone(),
                position: vp.to_screen(&device.position),
                orientation_degrees: device.orientation_degrees,
                selected,
                locked: device.locked,
                color,
            }
        })
        .collect();
    layers.push(RenderLayer::Devices { glyphs });

    if ctx.capabilities.show_people {
        let glyphs = ctx
            .people
            .iter()
            .map(|person| PersonGlyph {
                id: person.id.clone(),
                name: person.name.clone(),
                position: vp.to_screen(&person.position),
                color: theme.person,
            })
            .collect();
        layers.push(RenderLayer::People { glyphs });
    }

    if let Some(rect) = ctx.lasso {
        layers.push(RenderLayer::Lasso {
            rect,
            color: theme.lasso,
        });
    }

    if let Some(layout) = &ctx.tooltip {
        layers.push(RenderLayer::Tooltip {
            layout: layout.clone(),
            background: theme.tooltip_background,
            text: theme.tooltip_text,
        });
    }

    layers
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorkit_core::DeviceCategory;

    #[test]
    fn test_zones_hidden_by_capability() {
        let viewport = Viewport::new(800.0, 600.0);
        let capabilities = Capabilities {
            show_zones: false,
            ..Capabilities::default()
        };
        let theme = Theme::default();
        let selection = SelectionState::default();
        let zone = Zone::new(
            "z1",
            "Lobby",
            "",
            vec![Point::new(0.1, 0.1), Point::new(0.4, 0.1), Point::new(0.4, 0.4)],
        );
        let device = Device::new("d1", Point::new(0.5, 0.5), DeviceCategory::Camera);

        let ctx = RenderContext {
            viewport: &viewport,
            capabilities: &capabilities,
            theme: &theme,
            selection: &selection,
            zones: vec![&zone],
            devices: vec![&device],
            people: Vec::new(),
            editing: None,
            preview: None,
            lasso: None,
            tooltip: None,
        };
        let names: Vec<&str> = build_layers(&ctx).iter().map(RenderLayer::name).collect();
        assert_eq!(names, vec!["background", "devices"]);
    }
}
