//! The interactive globe: projection, zoom cycle, transitions, and markers.
//!
//! `Globe` owns everything that changes when the user moves between photos.
//! The projection and the land layers are created once and mutated in place;
//! markers are added per step and removed before the next one.

mod marker;
mod transition;
mod zoom;

pub use marker::{MarkerSet, LABEL_COLOR, PULSE_COLOR, PULSE_STROKE_WIDTH};
pub use transition::{Transition, STEP_DURATION};
pub use zoom::{ZoomCycle, DEFAULT_ZOOMS};

use crate::geo::{checked_coord, GeoLayerSet, OrthographicProjection};
use eframe::egui::{Pos2, Rect, Vec2};
use geo_types::Coord;
use std::time::Duration;
use web_time::Instant;

/// Construction options for the globe.
#[derive(Debug, Clone)]
pub struct GlobeConfig {
    /// Fixed surface width; `None` fills the canvas.
    pub width: Option<f32>,
    /// Fixed surface height; `None` fills the canvas.
    pub height: Option<f32>,
    /// Zoom levels cycled by successive steps.
    pub zooms: Vec<f64>,
    /// Duration of each rotate/zoom step.
    pub step_duration: Duration,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            zooms: DEFAULT_ZOOMS.to_vec(),
            step_duration: STEP_DURATION,
        }
    }
}

/// Emitted by [`Globe::update`] when a step's transition has ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepFinished {
    /// The position the step rotated to.
    pub position: Coord<f64>,
}

/// A running step.
#[derive(Debug, Clone)]
struct ActiveStep {
    transition: Transition,
    position: Coord<f64>,
}

pub struct Globe {
    width: Option<f32>,
    height: Option<f32>,
    step_duration: Duration,
    /// Size the projection was last laid out for.
    surface: Option<Vec2>,
    projection: OrthographicProjection,
    zoom: ZoomCycle,
    step: Option<ActiveStep>,
    markers: MarkerSet,
    layers: GeoLayerSet,
}

impl Globe {
    pub fn new(config: GlobeConfig) -> Self {
        let width = config.width.unwrap_or(960.0);
        let height = config.height.unwrap_or(600.0);
        Self {
            width: config.width,
            height: config.height,
            step_duration: config.step_duration,
            surface: None,
            projection: OrthographicProjection::new(width, height),
            zoom: ZoomCycle::new(config.zooms),
            step: None,
            markers: MarkerSet::new(),
            layers: GeoLayerSet::new(),
        }
    }

    /// Fits the projection to the canvas rectangle.
    ///
    /// The globe stays centered horizontally on the upper third of the
    /// surface. Until the first step, the scale also follows the width so the
    /// whole globe is visible.
    pub fn layout(&mut self, rect: Rect) {
        let size = Vec2::new(
            self.width.unwrap_or(rect.width()),
            self.height.unwrap_or(rect.height()),
        );
        self.projection
            .set_translate(rect.min + Vec2::new(size.x / 2.0, size.y / 3.0));

        if self.surface != Some(size) {
            if self.zoom.index().is_none() && self.step.is_none() {
                self.projection.set_scale(size.x as f64 / 2.0);
            }
            self.surface = Some(size);
        }
    }

    /// Installs the world layers decoded from the topology file.
    pub fn set_world(&mut self, layers: GeoLayerSet) {
        log::info!("Globe world set: {} features", layers.feature_count());
        self.layers = layers;
    }

    /// Turns the globe to face `position` immediately, without zooming.
    pub fn look_at(&mut self, position: Coord<f64>) {
        let Some(position) = checked_coord(position.x, position.y) else {
            log::warn!("Ignoring invalid globe center {:?}", position);
            return;
        };
        self.projection.set_rotate([-position.x, -position.y]);
    }

    /// Rotates the globe to face `position` while moving to the next zoom level.
    ///
    /// A step started while another is running takes over from the current
    /// interpolated rotation and scale; the replaced step never finishes.
    ///
    /// Positions off the globe are ignored so the projection stays finite.
    pub fn step(&mut self, position: Coord<f64>, now: Instant) {
        let Some(position) = checked_coord(position.x, position.y) else {
            log::warn!("Ignoring step to invalid position {:?}", position);
            return;
        };
        self.zoom.advance();
        let target_scale = self
            .zoom
            .target_scale()
            .unwrap_or_else(|| self.projection.scale());

        let transition = Transition::new(
            self.projection.rotate(),
            [-position.x, -position.y],
            self.projection.scale(),
            target_scale,
            now,
            self.step_duration,
        );
        log::debug!(
            "Step to ({:.4}, {:.4}), zoom index {:?}",
            position.x,
            position.y,
            self.zoom.index()
        );
        self.step = Some(ActiveStep {
            transition,
            position,
        });
    }

    /// Advances the running transition to `now`.
    ///
    /// Returns the completion event on the frame the transition ends.
    pub fn update(&mut self, now: Instant) -> Option<StepFinished> {
        let step = self.step.as_ref()?;
        let frame = step.transition.frame_at(now);
        self.projection.set_rotate(frame.rotate);
        self.projection.set_scale(frame.scale);

        if !frame.finished {
            return None;
        }
        let position = step.position;
        self.step = None;
        Some(StepFinished { position })
    }

    /// Places a marker at `position` and restarts every marker's pulse.
    pub fn draw_marker(&mut self, position: Coord<f64>, now: Instant) {
        self.markers.add(position, now);
    }

    /// Removes all markers ahead of a new search.
    pub fn remove_markers(&mut self) {
        self.markers.clear();
    }

    /// Attaches location text to the markers at `position`.
    pub fn label_marker(&mut self, position: Coord<f64>, text: &str) -> bool {
        self.markers.set_label_at(position, text)
    }

    /// Whether the globe needs repainting on the next frame.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.step.is_some() || self.markers.is_animating(now)
    }

    /// Position the running step is heading to.
    pub fn step_target(&self) -> Option<Coord<f64>> {
        self.step.as_ref().map(|s| s.position)
    }

    /// Geographic coordinate under a screen position, if on the globe.
    pub fn coord_at(&self, pos: Pos2) -> Option<Coord<f64>> {
        self.projection.invert(pos)
    }

    pub fn projection(&self) -> &OrthographicProjection {
        &self.projection
    }

    pub fn zoom(&self) -> &ZoomCycle {
        &self.zoom
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn layers(&self) -> &GeoLayerSet {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut GeoLayerSet {
        &mut self.layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARIS: Coord<f64> = Coord { x: 2.35, y: 48.85 };
    const SYDNEY: Coord<f64> = Coord { x: 151.21, y: -33.87 };

    fn canvas() -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(1000.0, 900.0))
    }

    #[test]
    fn test_layout_fills_canvas() {
        let mut globe = Globe::new(GlobeConfig::default());
        globe.layout(canvas());
        assert_eq!(globe.projection().translate(), Pos2::new(500.0, 300.0));
        assert!((globe.projection().scale() - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_size_ignores_canvas() {
        let mut globe = Globe::new(GlobeConfig {
            width: Some(600.0),
            height: Some(300.0),
            ..Default::default()
        });
        globe.layout(canvas());
        assert_eq!(globe.projection().translate(), Pos2::new(300.0, 100.0));
        assert!((globe.projection().scale() - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_step_rotates_and_zooms() {
        let mut globe = Globe::new(GlobeConfig::default());
        globe.layout(canvas());
        let t0 = Instant::now();

        globe.step(PARIS, t0);
        assert_eq!(globe.step_target(), Some(PARIS));
        assert!(globe.update(t0 + Duration::from_millis(1000)).is_none());
        assert!(globe.is_animating(t0 + Duration::from_millis(1000)));

        let finished = globe.update(t0 + STEP_DURATION).unwrap();
        assert_eq!(finished.position, PARIS);
        assert!((globe.projection().scale() - 1000.0).abs() < 1e-9);

        let center = globe.projection().center();
        assert!((center.x - PARIS.x).abs() < 1e-9);
        assert!((center.y - PARIS.y).abs() < 1e-9);

        // Completion is reported once.
        assert!(globe.update(t0 + STEP_DURATION * 2).is_none());
        assert!(globe.step_target().is_none());
    }

    #[test]
    fn test_zoom_wraps_after_last_level() {
        let mut globe = Globe::new(GlobeConfig::default());
        let mut now = Instant::now();
        let mut scales = Vec::new();
        for _ in 0..4 {
            globe.step(PARIS, now);
            now += STEP_DURATION;
            globe.update(now);
            scales.push(globe.projection().scale());
        }
        assert_eq!(scales, vec![1000.0, 2000.0, 3000.0, 1000.0]);
    }

    #[test]
    fn test_new_step_replaces_running_one() {
        let mut globe = Globe::new(GlobeConfig::default());
        let t0 = Instant::now();
        globe.step(PARIS, t0);
        globe.update(t0 + Duration::from_millis(500));

        let t1 = t0 + Duration::from_millis(600);
        globe.step(SYDNEY, t1);
        let finished = globe.update(t1 + STEP_DURATION).unwrap();
        assert_eq!(finished.position, SYDNEY);
    }

    #[test]
    fn test_invalid_positions_leave_globe_usable() {
        let mut globe = Globe::new(GlobeConfig::default());
        globe.layout(canvas());
        let t0 = Instant::now();

        globe.look_at(Coord { x: f64::NAN, y: 0.0 });
        globe.step(Coord { x: 0.0, y: f64::INFINITY }, t0);
        assert!(globe.step_target().is_none());
        assert!(globe.zoom().index().is_none());
        assert!(globe.projection().rotate().iter().all(|r| r.is_finite()));

        globe.step(PARIS, t0);
        let finished = globe.update(t0 + STEP_DURATION).unwrap();
        assert_eq!(finished.position, PARIS);
        assert!(globe.projection().rotate().iter().all(|r| r.is_finite()));
        assert!(globe.projection().project(PARIS).is_some());
    }

    #[test]
    fn test_markers_lifecycle() {
        let mut globe = Globe::new(GlobeConfig::default());
        let now = Instant::now();
        globe.draw_marker(PARIS, now);
        assert!(globe.label_marker(PARIS, "Paris, France"));
        assert_eq!(globe.markers().len(), 1);
        assert!(globe.is_animating(now));

        globe.remove_markers();
        assert!(globe.markers().is_empty());
        assert!(!globe.label_marker(PARIS, "Paris, France"));
    }
}
