//! Right panel UI: picture, caption, and location of the current post.

use crate::photos::{PictureCache, PictureSlot};
use crate::state::AppState;
use eframe::egui::{self, Color32, RichText};
use egui_phosphor::regular as icons;
use web_time::Instant;

pub fn render_right_panel(
    ctx: &egui::Context,
    state: &AppState,
    pictures: &PictureCache,
    now: Instant,
) {
    egui::SidePanel::right("posts_panel")
        .resizable(true)
        .default_width(320.0)
        .min_width(220.0)
        .show(ctx, |ui| {
            ui.add_space(8.0);
            render_posts_container(ui, state, pictures, now);

            ui.add_space(8.0);

            // Caption
            if !state.caption.is_empty() {
                ui.label(RichText::new(&state.caption).size(14.0));
            }
            if let Some(ref date) = state.posted_on {
                ui.label(RichText::new(date).size(11.0).color(Color32::GRAY));
            }

            // Location display
            if let Some(text) = state.location.visible_text() {
                ui.add_space(6.0);
                ui.label(
                    RichText::new(format!("{} {}", icons::MAP_PIN, text))
                        .size(13.0)
                        .color(Color32::from_rgb(0xd7, 0xd7, 0xd7)),
                );
            }
        });
}

/// Picture of the current post, linking to the post itself.
fn render_posts_container(
    ui: &mut egui::Ui,
    state: &AppState,
    pictures: &PictureCache,
    now: Instant,
) {
    let Some(link) = state.posts.shown() else {
        ui.label(RichText::new("No photo selected").italics().color(Color32::GRAY));
        return;
    };

    ui.scope(|ui| {
        ui.set_opacity(state.posts.opacity(now));

        match pictures.get(&link.picture_url) {
            Some(PictureSlot::Ready(texture)) => {
                let response = ui
                    .add(
                        egui::Image::new(texture)
                            .max_width(ui.available_width())
                            .sense(egui::Sense::click()),
                    )
                    .on_hover_cursor(egui::CursorIcon::PointingHand);
                if response.clicked() {
                    ui.ctx().open_url(egui::OpenUrl::new_tab(&link.post_url));
                }
            }
            Some(PictureSlot::Failed) => {
                ui.label(RichText::new("Picture unavailable").color(Color32::GRAY));
            }
            Some(PictureSlot::Loading) | None => {
                ui.spinner();
            }
        }

        ui.hyperlink_to(format!("{} View post", icons::ARROW_SQUARE_OUT), &link.post_url);
    });
}
