//! Geographic layer rendering.
//!
//! Renders the globe disk and geographic features to the egui canvas.

use super::{GeoFeature, GeoLayer, GeoLayerSet, OrthographicProjection};
use eframe::egui::epaint::Mesh;
use eframe::egui::{Color32, Painter, Pos2, Shape, Stroke};
use geo_types::Coord;

/// Colors used for the sphere itself.
#[derive(Debug, Clone, Copy)]
pub struct SphereStyle {
    pub fill: Color32,
    pub outline: Stroke,
}

impl Default for SphereStyle {
    fn default() -> Self {
        Self {
            fill: Color32::from_rgb(0x1c, 0x27, 0x33),
            outline: Stroke::new(1.0, Color32::from_rgb(0x4a, 0x5a, 0x6a)),
        }
    }
}

/// Renders the sphere and all visible geographic layers.
pub fn render_geo_layers(
    painter: &Painter,
    layers: &GeoLayerSet,
    projection: &OrthographicProjection,
    sphere: SphereStyle,
) {
    let center = projection.sphere_center();
    let radius = projection.sphere_radius();
    painter.circle_filled(center, radius, sphere.fill);

    // Render layers in order (back to front)
    for layer in layers.iter() {
        if layer.visible {
            render_layer(painter, layer, projection);
        }
    }

    painter.circle_stroke(center, radius, sphere.outline);
}

/// Renders a single geographic layer.
fn render_layer(painter: &Painter, layer: &GeoLayer, projection: &OrthographicProjection) {
    let color = layer.effective_color();
    let stroke = Stroke::new(layer.effective_line_width(), color);
    let fill = layer.layer_type.is_filled().then_some(color);

    for feature in &layer.features {
        render_feature(painter, feature, projection, stroke, fill);
    }
}

fn render_feature(
    painter: &Painter,
    feature: &GeoFeature,
    projection: &OrthographicProjection,
    stroke: Stroke,
    fill: Option<Color32>,
) {
    match feature {
        GeoFeature::Point(coord) => {
            if let Some(pos) = projection.project(*coord) {
                painter.circle_filled(pos, 2.5, stroke.color);
            }
        }
        GeoFeature::LineString(coords) => {
            render_line_string(painter, coords, projection, stroke);
        }
        GeoFeature::MultiLineString(lines) => {
            for coords in lines {
                render_line_string(painter, coords, projection, stroke);
            }
        }
        GeoFeature::Polygon { exterior, holes } => {
            render_polygon(painter, exterior, holes, projection, stroke, fill);
        }
        GeoFeature::MultiPolygon(polygons) => {
            for (exterior, holes) in polygons {
                render_polygon(painter, exterior, holes, projection, stroke, fill);
            }
        }
    }
}

fn render_polygon(
    painter: &Painter,
    exterior: &[Coord<f64>],
    holes: &[Vec<Coord<f64>>],
    projection: &OrthographicProjection,
    stroke: Stroke,
    fill: Option<Color32>,
) {
    if let Some(color) = fill {
        let mesh = polygon_mesh(projection, exterior, holes, color);
        if !mesh.is_empty() {
            painter.add(Shape::mesh(mesh));
        }
    }

    render_line_string(painter, exterior, projection, stroke);
    for hole in holes {
        render_line_string(painter, hole, projection, stroke);
    }
}

/// Triangulates the visible part of a polygon into a filled mesh.
///
/// The exterior is clipped to the globe disk. Holes are cut out only while
/// entirely in view; a hole crossing the horizon is filled over.
pub fn polygon_mesh(
    projection: &OrthographicProjection,
    exterior: &[Coord<f64>],
    holes: &[Vec<Coord<f64>>],
    color: Color32,
) -> Mesh {
    let mut mesh = Mesh::default();
    let Some(outer) = projection.project_ring(exterior) else {
        return mesh;
    };

    let mut vertices: Vec<Pos2> = outer;
    let mut hole_indices = Vec::new();
    for hole in holes {
        if !hole.iter().all(|c| projection.project(*c).is_some()) {
            continue;
        }
        if let Some(ring) = projection.project_ring(hole) {
            hole_indices.push(vertices.len());
            vertices.extend(ring);
        }
    }

    let flat: Vec<f64> = vertices
        .iter()
        .flat_map(|p| [p.x as f64, p.y as f64])
        .collect();
    let indices = match earcutr::earcut(&flat, &hole_indices, 2) {
        Ok(ix) => ix,
        Err(_) => {
            log::debug!("Skipping fill of a polygon that could not be triangulated");
            return mesh;
        }
    };

    for pos in &vertices {
        mesh.colored_vertex(*pos, color);
    }
    for triangle in indices.chunks_exact(3) {
        mesh.add_triangle(triangle[0] as u32, triangle[1] as u32, triangle[2] as u32);
    }
    mesh
}

/// Renders a line string as its visible runs.
fn render_line_string(
    painter: &Painter,
    coords: &[Coord<f64>],
    projection: &OrthographicProjection,
    stroke: Stroke,
) {
    if coords.len() < 2 {
        return;
    }

    for run in projection.project_line(coords) {
        painter.add(Shape::line(run, stroke));
    }
}
