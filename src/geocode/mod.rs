//! Reverse geocoding: coordinates to a human-readable place name.

mod client;
mod parse;
mod response;

pub use client::{GeocodeChannel, GeocoderConfig, DEFAULT_GEOCODER_ENDPOINT};
