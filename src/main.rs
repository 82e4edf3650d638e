#![warn(clippy::all)]

//! Photo Globe - a rotating globe for browsing geotagged photos.
//!
//! Each photo rotates and zooms the globe to where it was taken, drops a
//! pulsing marker there, shows the picture and caption, and resolves the
//! coordinates to a place name through a reverse geocoder.

mod error;
mod fetch;
mod geo;
mod geocode;
mod globe;
mod photos;
mod state;
mod ui;

use eframe::egui;
use globe::{Globe, StepFinished};
use photos::{PictureCache, PictureSlot, Post, PostFeed};
use state::{AppState, GlobeSettings, UserRequest};
use web_time::Instant;

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "Photo Globe",
        native_options,
        Box::new(|cc| Ok(Box::new(GlobeApp::new(cc)))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let document = web_sys::window()
            .expect("No window")
            .document()
            .expect("No document");

        let canvas = document
            .get_element_by_id("globe_canvas")
            .expect("Failed to find globe_canvas")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("globe_canvas was not a HtmlCanvasElement");

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(GlobeApp::new(cc)))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    panic!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Main application state and logic.
pub struct GlobeApp {
    /// Persisted settings, without URL overrides
    stored_settings: GlobeSettings,

    /// Effective settings for this visit
    settings: GlobeSettings,

    /// State shared with the UI panels
    state: AppState,

    /// The globe: projection, zoom, transitions, markers, land
    globe: Globe,

    /// Channel for the world topology load
    world_channel: geo::WorldChannel,

    /// Channel for the photo feed load
    feed_channel: photos::FeedChannel,

    /// Geotagged posts
    feed: PostFeed,

    /// Channel for async picture downloads
    picture_channel: photos::PictureChannel,

    /// Textures of the shown, incoming and pending pictures
    pictures: PictureCache,

    /// Channel for reverse geocoding
    geocoder: geocode::GeocodeChannel,

    /// Post whose step is in progress; shown when the globe arrives
    pending_post: Option<Post>,

    /// When the last photo was requested (for autoplay pacing)
    last_advance: Option<Instant>,
}

impl GlobeApp {
    /// Creates a new GlobeApp instance and starts loading the world and feed.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let stored_settings = GlobeSettings::load();
        let mut settings = stored_settings.clone();
        settings.apply_url(&state::url_state::parse_from_url());

        let mut globe = Globe::new(settings.globe_config());
        if let Some(position) = settings.initial_position() {
            globe.look_at(position);
        }

        let world_channel = geo::WorldChannel::new();
        world_channel.load(cc.egui_ctx.clone(), settings.topology_url.clone());

        let feed_channel = photos::FeedChannel::new();
        feed_channel.load(cc.egui_ctx.clone(), settings.posts_url.clone());

        if settings.geocoder_key.is_none() {
            log::warn!("No geocoder key configured; locations will not be resolved");
        }

        Self {
            state: AppState::new(&settings),
            geocoder: geocode::GeocodeChannel::new(settings.geocoder_config()),
            stored_settings,
            settings,
            globe,
            world_channel,
            feed_channel,
            feed: PostFeed::default(),
            picture_channel: photos::PictureChannel::new(),
            pictures: PictureCache::default(),
            pending_post: None,
            last_advance: None,
        }
    }

    /// Drains finished async loads.
    fn poll_channels(&mut self, ctx: &egui::Context, now: Instant) {
        if let Some(result) = self.world_channel.try_recv() {
            match result {
                Ok(layers) => {
                    self.globe.set_world(layers);
                    self.state.status_message = "Ready".to_string();
                }
                Err(e) => {
                    log::error!("Failed to load world topology: {}", e);
                    self.state.status_message = "World map unavailable".to_string();
                }
            }
        }

        if let Some(result) = self.feed_channel.try_recv() {
            match result {
                Ok(feed) => {
                    log::info!("Loaded photo feed: {} geotagged posts", feed.len());
                    self.state.status_message = format!("{} photos", feed.len());
                    self.feed = feed;
                }
                Err(e) => {
                    log::error!("Failed to load photo feed: {}", e);
                    self.state.status_message = "Photo feed unavailable".to_string();
                }
            }
        }

        while let Some(loaded) = self.picture_channel.try_recv() {
            if !self.pictures.contains(&loaded.url) {
                log::debug!("Discarding picture no longer shown: {}", loaded.url);
                continue;
            }
            let slot = match loaded.result {
                Ok(picture) => PictureSlot::Ready(ctx.load_texture(
                    loaded.url.clone(),
                    picture.to_color_image(),
                    egui::TextureOptions::LINEAR,
                )),
                Err(e) => {
                    log::warn!("Failed to load picture {}: {}", loaded.url, e);
                    PictureSlot::Failed
                }
            };
            self.pictures.finish(&loaded.url, slot);
        }

        while let Some(located) = self.geocoder.try_recv() {
            // Drop answers for markers already removed by a newer step.
            if self.globe.label_marker(located.position, &located.text) {
                self.state.show_location_text(&located.text);
            } else {
                log::debug!("Discarding stale location {:?}", located.text);
            }
        }

        if let Some(finished) = self.globe.update(now) {
            self.on_step_finished(ctx, finished, now);
        }
    }

    /// Handles the request raised by the UI, or the autoplay timer.
    fn handle_requests(&mut self, ctx: &egui::Context, now: Instant) {
        let request = self.state.request.take().or_else(|| {
            let due = self.state.autoplay
                && !self.feed.is_empty()
                && self.globe.step_target().is_none()
                && self
                    .last_advance
                    .is_none_or(|t| now.duration_since(t) >= self.settings.autoplay_interval());
            due.then_some(UserRequest::NextPhoto)
        });

        match request {
            Some(UserRequest::NextPhoto) => self.show_next_photo(ctx, now),
            Some(UserRequest::Explore(coord)) => {
                self.remove_marker();
                self.pending_post = None;
                self.globe.step(coord, now);
            }
            None => {}
        }
    }

    fn show_next_photo(&mut self, ctx: &egui::Context, now: Instant) {
        let Some(post) = self.feed.next_post().cloned() else {
            return;
        };
        let Some(position) = post.position() else {
            return;
        };

        self.remove_marker();
        self.request_picture(ctx, &post.picture_url);
        self.globe.step(position, now);
        self.state.feed_position = self.feed.position_label();
        self.pending_post = Some(post);
        self.last_advance = Some(now);
    }

    /// Removes markers for a new search.
    fn remove_marker(&mut self) {
        self.globe.remove_markers();
        self.state.hide_location();
    }

    /// Runs once the globe has arrived at a step's position.
    fn on_step_finished(&mut self, ctx: &egui::Context, finished: StepFinished, now: Instant) {
        self.globe.draw_marker(finished.position, now);

        if let Some(post) = self.pending_post.take() {
            self.state
                .posts
                .add_picture(&post.picture_url, &post.post_url, now);
            self.state.replace_caption(&post.caption);
            self.state.posted_on = post.posted_on();
        }

        self.geocoder.lookup(ctx.clone(), finished.position);
    }

    fn request_picture(&mut self, ctx: &egui::Context, url: &str) {
        if self.pictures.start(url) {
            self.picture_channel.load(ctx.clone(), url.to_string());
        }
    }

    /// Releases textures the panel can no longer show.
    fn prune_pictures(&mut self) {
        let posts = &self.state.posts;
        let keep: Vec<&str> = [
            posts.shown().map(|l| l.picture_url.as_str()),
            posts.pending().map(|l| l.picture_url.as_str()),
            self.pending_post.as_ref().map(|p| p.picture_url.as_str()),
        ]
        .into_iter()
        .flatten()
        .collect();
        self.pictures.retain_only(&keep);
    }

    /// Persists toggles changed in the UI.
    fn sync_settings(&mut self) {
        if self.state.autoplay == self.settings.autoplay
            && self.state.show_borders == self.settings.show_borders
        {
            return;
        }
        self.settings.autoplay = self.state.autoplay;
        self.settings.show_borders = self.state.show_borders;
        self.stored_settings.autoplay = self.state.autoplay;
        self.stored_settings.show_borders = self.state.show_borders;
        self.stored_settings.save();
    }

    fn schedule_repaint(&self, ctx: &egui::Context, now: Instant) {
        if self.globe.is_animating(now) || self.state.posts.is_animating() {
            ctx.request_repaint();
        } else if self.state.autoplay && !self.feed.is_empty() {
            let interval = self.settings.autoplay_interval();
            let elapsed = self
                .last_advance
                .map(|t| now.duration_since(t))
                .unwrap_or(interval);
            ctx.request_repaint_after(interval.saturating_sub(elapsed));
        }
    }
}

impl eframe::App for GlobeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.poll_channels(ctx, now);
        self.handle_requests(ctx, now);
        self.state.posts.tick(now);
        self.prune_pictures();

        ui::render_top_bar(ctx, &mut self.state, !self.feed.is_empty());
        ui::render_right_panel(ctx, &self.state, &self.pictures, now);
        ui::render_canvas(ctx, &mut self.state, &mut self.globe, now);

        self.sync_settings();
        self.schedule_repaint(ctx, now);
    }
}
