//! Central canvas UI: the globe.

use crate::geo::{render_geo_layers, SphereStyle};
use crate::globe::{Globe, LABEL_COLOR, PULSE_COLOR, PULSE_STROKE_WIDTH};
use crate::state::{AppState, UserRequest};
use eframe::egui::{self, Color32, Painter, Rect, RichText, Sense, Stroke, Vec2};
use web_time::Instant;

/// Render the globe canvas and handle clicks on it.
pub fn render_canvas(ctx: &egui::Context, state: &mut AppState, globe: &mut Globe, now: Instant) {
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE.fill(Color32::from_rgb(0x12, 0x17, 0x1d)))
        .show(ctx, |ui| {
            let available_size = ui.available_size();
            let (response, painter) = ui.allocate_painter(available_size, Sense::click());
            let rect = response.rect;

            globe.layout(rect);
            if let Some(borders) = globe.layers_mut().borders.as_mut() {
                borders.visible = state.show_borders;
            }

            render_geo_layers(
                &painter,
                globe.layers(),
                globe.projection(),
                SphereStyle::default(),
            );
            render_markers(&painter, globe, now);

            draw_overlay_info(ui, &rect, globe);

            handle_canvas_interaction(&response, state, globe);
        });
}

/// Draws each marker's expanding ring and its label.
fn render_markers(painter: &Painter, globe: &Globe, now: Instant) {
    let projection = globe.projection();
    for marker in globe.markers().iter() {
        let Some(pos) = projection.project(marker.position) else {
            continue;
        };

        let pulse = marker.pulse_at(now);
        if pulse.opacity > 0.0 && pulse.radius > 0.0 {
            painter.circle_stroke(
                pos,
                pulse.radius,
                Stroke::new(PULSE_STROKE_WIDTH, PULSE_COLOR.gamma_multiply(pulse.opacity)),
            );
        }

        if let Some(label) = &marker.label {
            // Top of the text sits on the point, so the baseline is one line below it.
            painter.text(
                pos,
                egui::Align2::LEFT_TOP,
                label,
                egui::FontId::proportional(14.0),
                LABEL_COLOR,
            );
        }
    }
}

fn draw_overlay_info(ui: &mut egui::Ui, rect: &Rect, globe: &Globe) {
    let overlay_pos = rect.left_bottom() + Vec2::new(10.0, -46.0);
    let overlay_rect = Rect::from_min_size(overlay_pos, Vec2::new(220.0, 40.0));

    let center = globe.projection().center();
    let zoom = match globe.zoom().current_level() {
        Some(level) => format!("{:.0}", level),
        None => "full".to_string(),
    };

    ui.scope_builder(egui::UiBuilder::new().max_rect(overlay_rect), |ui| {
        ui.vertical(|ui| {
            ui.label(
                RichText::new(format!("Center: {:.2}, {:.2}", center.y, center.x))
                    .monospace()
                    .size(11.0)
                    .color(Color32::from_rgb(150, 160, 175)),
            );
            ui.label(
                RichText::new(format!("Zoom: {}", zoom))
                    .monospace()
                    .size(11.0)
                    .color(Color32::from_rgb(150, 160, 175)),
            );
        });
    });
}

fn handle_canvas_interaction(response: &egui::Response, state: &mut AppState, globe: &Globe) {
    if !response.clicked() {
        return;
    }
    let Some(pos) = response.interact_pointer_pos() else {
        return;
    };
    if let Some(coord) = globe.coord_at(pos) {
        log::debug!("Globe clicked at ({:.4}, {:.4})", coord.x, coord.y);
        state.request = Some(UserRequest::Explore(coord));
    }
}
