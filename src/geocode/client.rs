//! Reverse-geocoding requests.
//!
//! Uses channel-based communication to bridge the async HTTP request
//! with egui's synchronous update loop.

use super::parse::parse_location;
use super::response::GeocodeResponse;
use crate::error::GeocodeError;
use crate::fetch::fetch_bytes;
use crate::state::url_state::encode_component;
use eframe::egui;
use geo_types::Coord;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Google Geocoding web service endpoint.
pub const DEFAULT_GEOCODER_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Where and how to reach the geocoder.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEOCODER_ENDPOINT.to_string(),
            api_key: None,
        }
    }
}

impl GeocoderConfig {
    /// Builds the reverse-geocoding URL for a `(lon, lat)` position.
    pub fn request_url(&self, position: Coord<f64>) -> Result<String, GeocodeError> {
        let key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(GeocodeError::MissingKey)?;
        Ok(format!(
            "{}?latlng={:.6},{:.6}&key={}",
            self.endpoint,
            position.y,
            position.x,
            encode_component(key)
        ))
    }
}

/// A resolved location for a requested position.
#[derive(Debug, Clone, PartialEq)]
pub struct Located {
    pub position: Coord<f64>,
    pub text: String,
}

/// Channel-based geocoder.
///
/// Only successful lookups come back through the channel; failed requests and
/// non-OK statuses are logged and dropped.
pub struct GeocodeChannel {
    config: GeocoderConfig,
    sender: Sender<Located>,
    receiver: Receiver<Located>,
}

impl GeocodeChannel {
    pub fn new(config: GeocoderConfig) -> Self {
        let (sender, receiver) = channel();
        Self {
            config,
            sender,
            receiver,
        }
    }

    /// Converts coordinates to a location string in the background.
    pub fn lookup(&self, ctx: egui::Context, position: Coord<f64>) {
        let url = match self.config.request_url(position) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("Skipping location lookup: {}", e);
                return;
            }
        };
        let sender = self.sender.clone();

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                if let Some(located) = resolve(&url, position).await {
                    let _ = sender.send(located);
                    ctx.request_repaint();
                }
            });
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            std::thread::spawn(move || {
                if let Some(located) = pollster::block_on(resolve(&url, position)) {
                    let _ = sender.send(located);
                    ctx.request_repaint();
                }
            });
        }
    }

    /// Non-blocking check for a resolved location.
    pub fn try_recv(&self) -> Option<Located> {
        self.receiver.try_recv().ok()
    }
}

async fn resolve(url: &str, position: Coord<f64>) -> Option<Located> {
    let response = match request(url).await {
        Ok(response) => response,
        Err(e) => {
            log::warn!("Geocoding request failed: {}", e);
            return None;
        }
    };

    let text = location_text(&response)?;
    log::info!(
        "Resolved ({:.4}, {:.4}) to {:?}",
        position.x,
        position.y,
        text
    );
    Some(Located { position, text })
}

async fn request(url: &str) -> Result<GeocodeResponse, GeocodeError> {
    let bytes = fetch_bytes(url).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Location text for a response, or `None` unless the geocoder answered OK.
pub fn location_text(response: &GeocodeResponse) -> Option<String> {
    if !response.status.is_ok() {
        log::debug!(
            "Geocoder returned {:?}{}",
            response.status,
            response
                .error_message
                .as_deref()
                .map(|m| format!(": {}", m))
                .unwrap_or_default()
        );
        return None;
    }
    Some(parse_location(&response.results))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_is_lat_then_lng() {
        let config = GeocoderConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        let url = config
            .request_url(Coord {
                x: -73.985656,
                y: 40.748433,
            })
            .unwrap();
        assert_eq!(
            url,
            "https://maps.googleapis.com/maps/api/geocode/json?latlng=40.748433,-73.985656&key=test-key"
        );
    }

    #[test]
    fn test_request_url_encodes_key() {
        let config = GeocoderConfig {
            endpoint: "https://geo.example.com/json".to_string(),
            api_key: Some("k&ey=1#x".to_string()),
        };
        let url = config.request_url(Coord { x: 2.5, y: -1.25 }).unwrap();
        assert_eq!(
            url,
            "https://geo.example.com/json?latlng=-1.250000,2.500000&key=k%26ey%3D1%23x"
        );
    }

    #[test]
    fn test_request_url_requires_key() {
        let config = GeocoderConfig::default();
        assert!(matches!(
            config.request_url(Coord { x: 0.0, y: 0.0 }),
            Err(GeocodeError::MissingKey)
        ));

        let config = GeocoderConfig {
            api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(config.request_url(Coord { x: 0.0, y: 0.0 }).is_err());
    }

    #[test]
    fn test_location_text_only_for_ok_status() {
        let ok: GeocodeResponse = serde_json::from_str(
            r#"{"status": "OK", "results": [
                {"address_components": [{"long_name": "Paris", "types": ["locality"]},
                                        {"long_name": "75001", "types": ["postal_code"]}]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(location_text(&ok).as_deref(), Some("Paris"));

        let limited: GeocodeResponse =
            serde_json::from_str(r#"{"status": "OVER_QUERY_LIMIT", "results": []}"#).unwrap();
        assert_eq!(location_text(&limited), None);
    }
}
