//! Application state management.
//!
//! State that the UI panels read and write. The globe itself lives in
//! [`crate::globe::Globe`]; this holds everything around it.

mod panels;
mod settings;
pub mod url_state;

pub use panels::{LocationDisplay, PostsContainer};
pub use settings::GlobeSettings;

use geo_types::Coord;

/// A request raised by the UI, handled by the app on the next update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UserRequest {
    /// Show the next photo in the feed.
    NextPhoto,
    /// Rotate to a point the user clicked on the globe.
    Explore(Coord<f64>),
}

/// Root application state.
#[derive(Default)]
pub struct AppState {
    /// Picture of the current post
    pub posts: PostsContainer,

    /// Caption of the current post
    pub caption: String,

    /// Posting date of the current post
    pub posted_on: Option<String>,

    /// Resolved location of the current marker
    pub location: LocationDisplay,

    /// Position in the feed, e.g. "3/12"
    pub feed_position: Option<String>,

    /// Application status message displayed in top bar
    pub status_message: String,

    /// Advance through the feed automatically
    pub autoplay: bool,

    /// Draw country borders
    pub show_borders: bool,

    /// Request raised by the UI this frame
    pub request: Option<UserRequest>,
}

impl AppState {
    pub fn new(settings: &GlobeSettings) -> Self {
        Self {
            status_message: "Loading world...".to_string(),
            autoplay: settings.autoplay,
            show_borders: settings.show_borders,
            ..Default::default()
        }
    }

    /// Adds new photo caption.
    pub fn replace_caption(&mut self, caption: &str) {
        self.caption = caption.to_string();
    }

    /// Shows location data.
    pub fn show_location_text(&mut self, text: &str) {
        self.location.show(text);
    }

    pub fn hide_location(&mut self) {
        self.location.hide();
    }
}
