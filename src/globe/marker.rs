//! Photo markers drawn on the globe.

use eframe::egui::Color32;
use geo_types::Coord;
use std::time::Duration;
use web_time::Instant;

/// Duration of the expanding ring drawn when a marker is placed.
pub const PULSE_DURATION: Duration = Duration::from_millis(1500);
/// Final radius of the ring in pixels.
pub const PULSE_MAX_RADIUS: f32 = 200.0;
/// Ring stroke width in pixels.
pub const PULSE_STROKE_WIDTH: f32 = 3.0;

pub const PULSE_COLOR: Color32 = Color32::from_rgb(0xf2, 0xf2, 0xf2);
pub const LABEL_COLOR: Color32 = Color32::from_rgb(0xd7, 0xd7, 0xd7);

/// Appearance of a marker's ring at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseFrame {
    pub radius: f32,
    pub opacity: f32,
    pub finished: bool,
}

/// A marker at a geotagged location.
#[derive(Debug, Clone)]
pub struct Marker {
    pub position: Coord<f64>,
    /// Text drawn one line below the marker.
    pub label: Option<String>,
    pulse_start: Instant,
}

impl Marker {
    pub fn new(position: Coord<f64>, now: Instant) -> Self {
        Self {
            position,
            label: None,
            pulse_start: now,
        }
    }

    /// Ring appearance at `now`: linear growth while fading out.
    pub fn pulse_at(&self, now: Instant) -> PulseFrame {
        let elapsed = now.saturating_duration_since(self.pulse_start);
        let t = (elapsed.as_secs_f32() / PULSE_DURATION.as_secs_f32()).min(1.0);
        PulseFrame {
            radius: PULSE_MAX_RADIUS * t,
            opacity: 1.0 - t,
            finished: t >= 1.0,
        }
    }
}

/// All markers currently on the globe.
#[derive(Debug, Clone, Default)]
pub struct MarkerSet {
    markers: Vec<Marker>,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a marker and restarts the pulse of every marker on the globe.
    pub fn add(&mut self, position: Coord<f64>, now: Instant) {
        self.markers.push(Marker::new(position, now));
        for marker in &mut self.markers {
            marker.pulse_start = now;
        }
    }

    /// Removes every marker.
    pub fn clear(&mut self) {
        self.markers.clear();
    }

    /// Sets the label of the markers placed at `position`.
    pub fn set_label_at(&mut self, position: Coord<f64>, label: &str) -> bool {
        let mut found = false;
        for marker in self.markers.iter_mut().filter(|m| m.position == position) {
            marker.label = Some(label.to_string());
            found = true;
        }
        found
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Whether any ring is still expanding.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.markers.iter().any(|m| !m.pulse_at(now).finished)
    }
}
