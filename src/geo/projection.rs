//! Orthographic globe projection.
//!
//! Converts geographic coordinates (lon/lat, degrees) to screen positions on a
//! rotated sphere viewed from infinitely far away. Points on the far side of
//! the globe are clipped at the configured clip angle.

use eframe::egui::{Pos2, Vec2};
use geo_types::Coord;
use glam::DVec3;

/// Orthographic projection with rotation, scale, translation and clipping.
#[derive(Debug, Clone)]
pub struct OrthographicProjection {
    /// Rotation `[λ, φ]` in degrees. The point `[-λ, -φ]` faces the viewer.
    rotate: [f64; 2],
    /// Pixels per unit of sphere radius
    scale: f64,
    /// Screen position of the sphere center
    translate: Pos2,
    /// Angular radius of the visible cap in degrees
    clip_angle: f64,
    /// Maximum angular step (degrees) when resampling edges
    precision: f64,
}

impl Default for OrthographicProjection {
    fn default() -> Self {
        Self::new(960.0, 600.0)
    }
}

impl OrthographicProjection {
    /// Creates a projection sized for a `width` x `height` surface.
    ///
    /// The globe is centered horizontally and placed on the upper third,
    /// with a radius of half the width.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            rotate: [0.0, 0.0],
            scale: width as f64 / 2.0,
            translate: Pos2::new(width / 2.0, height / 3.0),
            clip_angle: 90.0,
            precision: 1.0,
        }
    }

    pub fn rotate(&self) -> [f64; 2] {
        self.rotate
    }

    pub fn set_rotate(&mut self, rotate: [f64; 2]) {
        self.rotate = rotate;
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    #[cfg(test)]
    pub fn translate(&self) -> Pos2 {
        self.translate
    }

    pub fn set_translate(&mut self, translate: Pos2) {
        self.translate = translate;
    }

    #[cfg(test)]
    pub fn clip_angle(&self) -> f64 {
        self.clip_angle
    }

    /// Screen-space center of the globe disk.
    pub fn sphere_center(&self) -> Pos2 {
        self.translate
    }

    /// Screen-space radius of the globe disk.
    pub fn sphere_radius(&self) -> f32 {
        self.scale as f32
    }

    /// Geographic coordinate currently at the center of the globe.
    pub fn center(&self) -> Coord<f64> {
        Coord {
            x: wrap_longitude(-self.rotate[0]),
            y: -self.rotate[1],
        }
    }

    /// Projects a coordinate, returning `None` when it lies beyond the clip angle.
    pub fn project(&self, coord: Coord<f64>) -> Option<Pos2> {
        let v = self.rotated(coord);
        if v.x < self.clip_angle.to_radians().cos() {
            return None;
        }
        Some(self.to_screen(v))
    }

    /// Converts a screen position back to a geographic coordinate.
    ///
    /// Returns `None` for positions outside the globe disk.
    pub fn invert(&self, pos: Pos2) -> Option<Coord<f64>> {
        if self.scale <= 0.0 {
            return None;
        }
        let u = (pos.x - self.translate.x) as f64 / self.scale;
        let v = (self.translate.y - pos.y) as f64 / self.scale;
        let rho_sq = u * u + v * v;
        if rho_sq > 1.0 {
            return None;
        }

        let rotated = DVec3::new((1.0 - rho_sq).sqrt(), u, v);
        let (sin_phi, cos_phi) = self.rotate[1].to_radians().sin_cos();
        let unrotated = DVec3::new(
            rotated.x * cos_phi + rotated.z * sin_phi,
            rotated.y,
            rotated.z * cos_phi - rotated.x * sin_phi,
        );

        let lon = unrotated.y.atan2(unrotated.x).to_degrees() - self.rotate[0];
        let lat = unrotated.z.clamp(-1.0, 1.0).asin().to_degrees();
        Some(Coord {
            x: wrap_longitude(lon),
            y: lat,
        })
    }

    /// Projects a polyline, resampling along great circles and splitting it
    /// wherever it passes behind the globe.
    ///
    /// Each returned run is a visible, connected piece of the input line.
    pub fn project_line(&self, coords: &[Coord<f64>]) -> Vec<Vec<Pos2>> {
        let mut runs: Vec<Vec<Pos2>> = Vec::new();
        let mut current: Vec<Pos2> = Vec::new();
        let threshold = self.clip_angle.to_radians().cos();
        let step = self.precision.to_radians();

        let mut prev: Option<DVec3> = None;
        for coord in coords {
            let v = self.rotated(*coord);
            let Some(a) = prev else {
                if v.x >= threshold {
                    current.push(self.to_screen(v));
                }
                prev = Some(v);
                continue;
            };

            let angle = a.angle_between(v);
            let segments = if angle.is_finite() && angle > step {
                (angle / step).ceil() as usize
            } else {
                1
            };

            let mut last = a;
            for i in 1..=segments {
                let p = slerp(a, v, angle, i as f64 / segments as f64);
                let last_visible = last.x >= threshold;
                let visible = p.x >= threshold;
                match (last_visible, visible) {
                    (true, true) => current.push(self.to_screen(p)),
                    (true, false) => {
                        current.push(self.to_screen(horizon_crossing(last, p, threshold)));
                        if current.len() >= 2 {
                            runs.push(std::mem::take(&mut current));
                        } else {
                            current.clear();
                        }
                    }
                    (false, true) => {
                        current.push(self.to_screen(horizon_crossing(last, p, threshold)));
                        current.push(self.to_screen(p));
                    }
                    (false, false) => {}
                }
                last = p;
            }
            prev = Some(v);
        }

        if current.len() >= 2 {
            runs.push(current);
        }
        runs
    }

    /// Projects a closed ring as a fillable screen polygon.
    ///
    /// Edges are resampled like [`Self::project_line`]. Where the ring passes
    /// behind the globe, the hidden stretch is replaced by the arc of the
    /// clip circle between the exit and re-entry points, swept in the same
    /// direction the hidden stretch winds around the view axis. Returns
    /// `None` when no part of the ring is visible.
    pub fn project_ring(&self, ring: &[Coord<f64>]) -> Option<Vec<Pos2>> {
        let threshold = self.clip_angle.to_radians().cos();
        let nodes = self.clip_nodes(ring, threshold);

        let visible_count = nodes.iter().filter(|(_, visible)| *visible).count();
        if visible_count == 0 {
            return None;
        }
        if visible_count == nodes.len() {
            return Some(nodes.iter().map(|(p, _)| self.to_screen(*p)).collect());
        }

        // Start on a re-entry so every hidden stretch is walked in one piece.
        let len = nodes.len();
        let start = (0..len).find(|&i| nodes[i].1 && !nodes[(i + len - 1) % len].1)?;

        let mut out = Vec::with_capacity(len);
        let mut last_visible = nodes[start].0;
        let mut hidden: Option<(f64, f64)> = None; // (exit angle, accumulated sweep)
        let mut last_angle = 0.0;

        for k in 0..=len {
            let (p, visible) = nodes[(start + k) % len];
            let angle = axial_angle(p);
            if visible {
                if let Some((exit_angle, sweep)) = hidden.take() {
                    let sweep = sweep + wrap_angle(angle - last_angle);
                    self.push_clip_arc(&mut out, exit_angle, sweep, threshold);
                }
                if k < len {
                    out.push(self.to_screen(p));
                }
                last_visible = p;
            } else {
                let (exit_angle, sweep) = match hidden {
                    Some(h) => h,
                    None => {
                        last_angle = axial_angle(last_visible);
                        (last_angle, 0.0)
                    }
                };
                hidden = Some((exit_angle, sweep + wrap_angle(angle - last_angle)));
            }
            last_angle = angle;
        }

        (out.len() >= 3).then_some(out)
    }

    /// Resampled ring vertices in rotated space, with a clip-boundary point
    /// inserted at every visibility change.
    fn clip_nodes(&self, ring: &[Coord<f64>], threshold: f64) -> Vec<(DVec3, bool)> {
        let mut ring = ring;
        if ring.len() >= 2 && ring.first() == ring.last() {
            ring = &ring[..ring.len() - 1];
        }
        if ring.len() < 3 {
            return Vec::new();
        }

        let step = self.precision.to_radians();
        let mut dense = Vec::with_capacity(ring.len());
        for (i, coord) in ring.iter().enumerate() {
            let a = self.rotated(*coord);
            let b = self.rotated(ring[(i + 1) % ring.len()]);
            let angle = a.angle_between(b);
            let segments = if angle.is_finite() && angle > step {
                (angle / step).ceil() as usize
            } else {
                1
            };
            dense.push(a);
            for j in 1..segments {
                dense.push(slerp(a, b, angle, j as f64 / segments as f64));
            }
        }

        let mut nodes = Vec::with_capacity(dense.len() + 8);
        for (i, &p) in dense.iter().enumerate() {
            let q = dense[(i + 1) % dense.len()];
            let p_visible = p.x >= threshold;
            nodes.push((p, p_visible));
            if p_visible != (q.x >= threshold) {
                nodes.push((horizon_crossing(p, q, threshold), true));
            }
        }
        nodes
    }

    /// Appends points along the clip circle from `from` (radians around the
    /// view axis) through `sweep` radians, endpoints excluded.
    fn push_clip_arc(&self, out: &mut Vec<Pos2>, from: f64, sweep: f64, threshold: f64) {
        let radius = (1.0 - threshold * threshold).max(0.0).sqrt();
        let steps = (sweep.abs() / self.precision.to_radians()).ceil() as usize;
        for j in 1..steps {
            let theta = from + sweep * j as f64 / steps as f64;
            let (sin, cos) = theta.sin_cos();
            out.push(self.to_screen(DVec3::new(threshold, radius * cos, radius * sin)));
        }
    }

    /// Applies the rotation, returning a unit vector whose x axis points at
    /// the viewer.
    fn rotated(&self, coord: Coord<f64>) -> DVec3 {
        let lambda = (coord.x + self.rotate[0]).to_radians();
        let phi = coord.y.to_radians();
        let (sin_dphi, cos_dphi) = self.rotate[1].to_radians().sin_cos();

        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();

        DVec3::new(x * cos_dphi - z * sin_dphi, y, z * cos_dphi + x * sin_dphi)
    }

    fn to_screen(&self, v: DVec3) -> Pos2 {
        self.translate + Vec2::new((self.scale * v.y) as f32, -(self.scale * v.z) as f32)
    }
}

/// Wraps a longitude into `[-180, 180)`.
pub fn wrap_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Returns `(lon, lat)` as a coordinate when both are finite and in range.
pub fn checked_coord(lon: f64, lat: f64) -> Option<Coord<f64>> {
    let valid = lon.is_finite()
        && lat.is_finite()
        && (-180.0..=180.0).contains(&lon)
        && (-90.0..=90.0).contains(&lat);
    valid.then_some(Coord { x: lon, y: lat })
}

/// Angle of a rotated point around the view axis.
fn axial_angle(v: DVec3) -> f64 {
    v.z.atan2(v.y)
}

/// Wraps an angle difference into `[-PI, PI)`.
fn wrap_angle(delta: f64) -> f64 {
    use std::f64::consts::PI;
    (delta + PI).rem_euclid(2.0 * PI) - PI
}

/// Spherical linear interpolation between unit vectors separated by `angle`.
fn slerp(a: DVec3, b: DVec3, angle: f64, t: f64) -> DVec3 {
    if angle < 1e-9 {
        return a.lerp(b, t);
    }
    let sin_angle = angle.sin();
    if sin_angle.abs() < 1e-9 {
        // Antipodal endpoints have no unique great circle.
        return a.lerp(b, t).normalize_or(a);
    }
    (a * ((1.0 - t) * angle).sin() + b * (t * angle).sin()) / sin_angle
}

/// Point where the great-circle segment `a`..`b` meets the clip boundary.
fn horizon_crossing(a: DVec3, b: DVec3, threshold: f64) -> DVec3 {
    let angle = a.angle_between(b);
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    let a_visible = a.x >= threshold;
    for _ in 0..16 {
        let mid = (lo + hi) / 2.0;
        let p = slerp(a, b, angle, mid);
        if (p.x >= threshold) == a_visible {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    let visible_t = if a_visible { lo } else { hi };
    slerp(a, b, angle, visible_t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[test]
    fn test_new_layout() {
        let projection = OrthographicProjection::new(1200.0, 900.0);
        assert_eq!(projection.translate(), Pos2::new(600.0, 300.0));
        assert!((projection.scale() - 600.0).abs() < 1e-9);
        assert!((projection.clip_angle() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_point_projects_to_center() {
        let mut projection = OrthographicProjection::new(800.0, 600.0);
        projection.set_rotate([-2.35, -48.85]);

        let pos = projection.project(coord(2.35, 48.85)).unwrap();
        let center = projection.sphere_center();
        assert!((pos.x - center.x).abs() < 1e-3);
        assert!((pos.y - center.y).abs() < 1e-3);
    }

    #[test]
    fn test_far_side_is_clipped() {
        let projection = OrthographicProjection::new(800.0, 600.0);
        assert!(projection.project(coord(180.0, 0.0)).is_none());
        assert!(projection.project(coord(0.0, 0.0)).is_some());
    }

    #[test]
    fn test_north_is_up_east_is_right() {
        let projection = OrthographicProjection::new(800.0, 600.0);
        let center = projection.sphere_center();
        let north = projection.project(coord(0.0, 30.0)).unwrap();
        let east = projection.project(coord(30.0, 0.0)).unwrap();
        assert!(north.y < center.y);
        assert!(east.x > center.x);
    }

    #[test]
    fn test_invert_returns_projected_coordinate() {
        let mut projection = OrthographicProjection::new(800.0, 600.0);
        projection.set_rotate([100.0, -20.0]);
        projection.set_scale(900.0);

        let original = coord(-95.0, 30.0);
        let pos = projection.project(original).unwrap();
        let back = projection.invert(pos).unwrap();
        assert!((back.x - original.x).abs() < 1e-3);
        assert!((back.y - original.y).abs() < 1e-3);
    }

    #[test]
    fn test_invert_outside_disk() {
        let projection = OrthographicProjection::new(800.0, 600.0);
        assert!(projection.invert(Pos2::new(0.0, 599.0)).is_none());
    }

    #[test]
    fn test_center_follows_rotation() {
        let mut projection = OrthographicProjection::new(800.0, 600.0);
        projection.set_rotate([-139.69, -35.68]);
        let center = projection.center();
        assert!((center.x - 139.69).abs() < 1e-9);
        assert!((center.y - 35.68).abs() < 1e-9);
    }

    #[test]
    fn test_line_split_at_horizon() {
        let projection = OrthographicProjection::new(800.0, 600.0);
        // Runs along the equator from the visible side, behind the globe, and back.
        let line = vec![coord(0.0, 0.0), coord(120.0, 0.0), coord(-120.0, 0.0), coord(-10.0, 0.0)];
        let runs = projection.project_line(&line);
        assert_eq!(runs.len(), 2);

        let radius = projection.sphere_radius();
        let center = projection.sphere_center();
        let edge = runs[0].last().unwrap();
        assert!(((edge.x - center.x).abs() - radius).abs() < 1.0);
    }

    #[test]
    fn test_hidden_line_produces_nothing() {
        let projection = OrthographicProjection::new(800.0, 600.0);
        let line = vec![coord(150.0, 10.0), coord(170.0, 10.0)];
        assert!(projection.project_line(&line).is_empty());
    }

    #[test]
    fn test_visible_ring_is_unchanged() {
        let projection = OrthographicProjection::new(800.0, 600.0);
        let ring = vec![
            coord(-10.0, -10.0),
            coord(10.0, -10.0),
            coord(10.0, 10.0),
            coord(-10.0, 10.0),
            coord(-10.0, -10.0),
        ];
        let polygon = projection.project_ring(&ring).unwrap();

        // Edges are resampled, and nothing reaches the globe's edge.
        assert!(polygon.len() > 70);
        let center = projection.sphere_center();
        assert!(polygon
            .iter()
            .all(|p| p.distance(center) < projection.sphere_radius() / 2.0));
    }

    #[test]
    fn test_hidden_ring_is_dropped() {
        let projection = OrthographicProjection::new(800.0, 600.0);
        let ring = vec![
            coord(170.0, -5.0),
            coord(175.0, -5.0),
            coord(175.0, 5.0),
            coord(170.0, 5.0),
        ];
        assert!(projection.project_ring(&ring).is_none());
    }

    #[test]
    fn test_ring_across_horizon_follows_clip_circle() {
        let projection = OrthographicProjection::new(800.0, 600.0);
        // Band from 60E to 120E: the eastern half lies behind the globe.
        let ring = vec![
            coord(60.0, -20.0),
            coord(120.0, -20.0),
            coord(120.0, 20.0),
            coord(60.0, 20.0),
        ];
        let polygon = projection.project_ring(&ring).unwrap();

        let center = projection.sphere_center();
        let radius = projection.sphere_radius();
        assert!(polygon.iter().all(|p| p.distance(center) <= radius + 0.5));

        // The hidden side is replaced by points on the globe's edge.
        let on_edge = polygon
            .iter()
            .filter(|p| (p.distance(center) - radius).abs() < 0.5)
            .count();
        assert!(on_edge > 10);

        // The arc stays on the eastern limb instead of wrapping round the west.
        assert!(polygon.iter().all(|p| p.x > center.x));
    }

    #[test]
    fn test_checked_coord() {
        assert_eq!(checked_coord(2.35, 48.85), Some(coord(2.35, 48.85)));
        assert_eq!(checked_coord(0.0, f64::NAN), None);
        assert_eq!(checked_coord(f64::INFINITY, 0.0), None);
        assert_eq!(checked_coord(181.0, 0.0), None);
        assert_eq!(checked_coord(0.0, -90.5), None);
    }

    #[test]
    fn test_wrap_longitude() {
        assert!((wrap_longitude(190.0) + 170.0).abs() < 1e-9);
        assert!((wrap_longitude(-190.0) - 170.0).abs() < 1e-9);
        assert!((wrap_longitude(45.0) - 45.0).abs() < 1e-9);
    }
}
