//! Globe settings.
//!
//! Settings are persisted to localStorage so they survive page reloads;
//! URL parameters override them for a single visit.

use super::url_state::UrlParams;
use crate::geo::checked_coord;
use crate::geocode::{GeocoderConfig, DEFAULT_GEOCODER_ENDPOINT};
use crate::globe::{GlobeConfig, DEFAULT_ZOOMS, STEP_DURATION};
use geo_types::Coord;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the globe and its data sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeSettings {
    /// Fixed globe surface width in pixels (None = fill the canvas).
    pub width: Option<f32>,
    /// Fixed globe surface height in pixels (None = fill the canvas).
    pub height: Option<f32>,
    /// Zoom levels cycled through by successive photos.
    pub zooms: Vec<f64>,
    /// URL of the world topology file.
    pub topology_url: String,
    /// URL of the photo feed.
    pub posts_url: String,
    /// Reverse geocoding endpoint.
    pub geocoder_endpoint: String,
    /// Geocoding API key.
    pub geocoder_key: Option<String>,
    /// Advance to the next photo automatically.
    pub autoplay: bool,
    /// Seconds each photo stays before autoplay moves on.
    pub autoplay_interval_secs: f64,
    /// Draw country borders on top of the land outline.
    pub show_borders: bool,
    /// Initial globe center as (lon, lat).
    pub initial_center: Option<(f64, f64)>,
}

impl Default for GlobeSettings {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            zooms: DEFAULT_ZOOMS.to_vec(),
            topology_url: "/world-50m.json".to_string(),
            posts_url: "/posts.json".to_string(),
            geocoder_endpoint: DEFAULT_GEOCODER_ENDPOINT.to_string(),
            geocoder_key: None,
            autoplay: false,
            autoplay_interval_secs: 8.0,
            show_borders: false,
            initial_center: None,
        }
    }
}

impl GlobeSettings {
    /// localStorage key for persisting settings.
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    const STORAGE_KEY: &'static str = "photo_globe_settings";

    /// Applies URL overrides on top of these settings.
    pub fn apply_url(&mut self, params: &UrlParams) {
        if let Some(width) = params.width {
            self.width = Some(width);
        }
        if let Some(height) = params.height {
            self.height = Some(height);
        }
        if let Some(ref zooms) = params.zooms {
            self.zooms = zooms.clone();
        }
        if let Some(ref url) = params.topology {
            self.topology_url = url.clone();
        }
        if let Some(ref url) = params.posts {
            self.posts_url = url.clone();
        }
        if let Some(ref key) = params.key {
            self.geocoder_key = Some(key.clone());
        }
        if let Some(autoplay) = params.autoplay {
            self.autoplay = autoplay;
        }
        if let (Some(lat), Some(lon)) = (params.lat, params.lon) {
            if checked_coord(lon, lat).is_some() {
                self.initial_center = Some((lon, lat));
            } else {
                log::warn!("Ignoring out-of-range initial center ({}, {})", lat, lon);
            }
        }
    }

    /// Validated initial center, if one is set.
    pub fn initial_position(&self) -> Option<Coord<f64>> {
        let (lon, lat) = self.initial_center?;
        checked_coord(lon, lat)
    }

    /// Options for constructing the globe.
    pub fn globe_config(&self) -> GlobeConfig {
        GlobeConfig {
            width: self.width,
            height: self.height,
            zooms: self.zooms.clone(),
            step_duration: STEP_DURATION,
        }
    }

    pub fn geocoder_config(&self) -> GeocoderConfig {
        GeocoderConfig {
            endpoint: self.geocoder_endpoint.clone(),
            api_key: self.geocoder_key.clone(),
        }
    }

    /// Time between automatic photo advances, floored at one transition.
    pub fn autoplay_interval(&self) -> Duration {
        let secs = if self.autoplay_interval_secs.is_finite() {
            self.autoplay_interval_secs
        } else {
            0.0
        };
        Duration::from_secs_f64(secs.max(0.0)).max(STEP_DURATION)
    }

    /// Load settings from localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let Some(storage) = local_storage() else {
            return Self::default();
        };

        let json = match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(s)) => s,
            _ => return Self::default(),
        };

        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded globe settings from localStorage");
                settings
            }
            Err(e) => {
                log::warn!("Failed to parse globe settings: {}", e);
                Self::default()
            }
        }
    }

    /// Native builds start from defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    /// Save settings to localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = local_storage() else {
            return;
        };

        let json = match serde_json::to_string(self) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Failed to serialize globe settings: {}", e);
                return;
            }
        };

        if let Err(e) = storage.set_item(Self::STORAGE_KEY, &json) {
            log::warn!("Failed to save globe settings: {:?}", e);
        } else {
            log::debug!("Saved globe settings to localStorage");
        }
    }

    /// No-op stub for native builds.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}
