//! Top bar UI: app title, photo controls, and status.

use crate::state::{AppState, UserRequest};
use eframe::egui::{self, Color32, RichText};
use egui_phosphor::regular as icons;

pub fn render_top_bar(ctx: &egui::Context, state: &mut AppState, feed_ready: bool) {
    egui::TopBottomPanel::top("top_bar")
        .exact_height(36.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.label(
                    RichText::new(format!("{} Photo Globe", icons::GLOBE_HEMISPHERE_WEST))
                        .strong()
                        .size(16.0)
                        .color(Color32::WHITE),
                );

                ui.separator();

                let next = ui.add_enabled(
                    feed_ready,
                    egui::Button::new(format!("{} Next photo", icons::ARROW_RIGHT)),
                );
                if next.clicked() {
                    state.request = Some(UserRequest::NextPhoto);
                }

                ui.checkbox(&mut state.autoplay, "Autoplay");
                ui.checkbox(&mut state.show_borders, "Borders");

                if let Some(ref position) = state.feed_position {
                    ui.label(RichText::new(position).monospace().size(12.0));
                }

                ui.separator();

                ui.label(
                    RichText::new(&state.status_message)
                        .size(13.0)
                        .color(Color32::GRAY),
                );
            });
        });
}
