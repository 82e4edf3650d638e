//! Error types for the async loaders and decoders.

use thiserror::Error;

/// Failure while retrieving a resource by URL.
#[derive(Debug, Error)]
pub enum FetchError {
    #[cfg(target_arch = "wasm32")]
    #[error("no browser window available")]
    NoWindow,
    #[cfg(target_arch = "wasm32")]
    #[error("failed to build request for {url}: {message}")]
    Request { url: String, message: String },
    #[cfg(target_arch = "wasm32")]
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },
    #[cfg(target_arch = "wasm32")]
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
    #[cfg(not(target_arch = "wasm32"))]
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[cfg(not(target_arch = "wasm32"))]
    #[error("remote URLs are not supported on this platform: {0}")]
    Unsupported(String),
}

/// Failure while decoding a TopoJSON document.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("invalid topology JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a Topology document, found {0:?}")]
    NotTopology(String),
    #[error("topology has no object named {0:?}")]
    MissingObject(String),
    #[error("arc index {index} out of range ({count} arcs)")]
    ArcOutOfRange { index: i64, count: usize },
}

/// Failure while loading the world layers.
#[derive(Debug, Error)]
pub enum WorldLoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Failure while resolving a coordinate to a place name.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("invalid geocoder response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no geocoder API key configured")]
    MissingKey,
}

/// Failure while loading the photo feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("invalid feed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure while loading a picture for the posts panel.
#[derive(Debug, Error)]
pub enum PictureError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}
