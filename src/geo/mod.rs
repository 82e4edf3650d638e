//! Geographic layer system for the globe.
//!
//! This module provides the orthographic projection, TopoJSON decoding, and
//! loading and rendering of land and border features. Land is filled,
//! borders are stroked.

mod layer;
mod loader;
mod projection;
mod renderer;
mod topology;

pub use layer::{GeoFeature, GeoLayer, GeoLayerSet};
pub use loader::WorldChannel;
pub use projection::{checked_coord, wrap_longitude, OrthographicProjection};
pub use renderer::{render_geo_layers, SphereStyle};
pub use topology::Topology;
