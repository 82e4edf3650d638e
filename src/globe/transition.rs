//! Rotation and zoom tweening.
//!
//! A transition interpolates the projection's rotation and scale from their
//! values at the start of a step to the step's target over a fixed duration,
//! eased with a cubic in-out curve.

use crate::geo::wrap_longitude;
use std::time::Duration;
use web_time::Instant;

/// Default duration of a rotate/zoom step.
pub const STEP_DURATION: Duration = Duration::from_millis(2000);

/// One frame of a running transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionFrame {
    pub rotate: [f64; 2],
    pub scale: f64,
    pub finished: bool,
}

/// Tween from one rotation/scale pair to another.
#[derive(Debug, Clone)]
pub struct Transition {
    from_rotate: [f64; 2],
    to_rotate: [f64; 2],
    from_scale: f64,
    to_scale: f64,
    start: Instant,
    duration: Duration,
}

impl Transition {
    /// Creates a transition. The target longitude rotation is shifted by whole
    /// turns so the globe spins the short way around.
    pub fn new(
        from_rotate: [f64; 2],
        to_rotate: [f64; 2],
        from_scale: f64,
        to_scale: f64,
        start: Instant,
        duration: Duration,
    ) -> Self {
        let delta = wrap_longitude(to_rotate[0] - from_rotate[0]);
        Self {
            from_rotate,
            to_rotate: [from_rotate[0] + delta, to_rotate[1]],
            from_scale,
            to_scale,
            start,
            duration,
        }
    }

    #[cfg(test)]
    pub fn target_rotate(&self) -> [f64; 2] {
        self.to_rotate
    }

    /// Samples the transition at `now`.
    pub fn frame_at(&self, now: Instant) -> TransitionFrame {
        let elapsed = now.saturating_duration_since(self.start);
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        };
        let t = ease_cubic_in_out(progress);

        TransitionFrame {
            rotate: [
                lerp(self.from_rotate[0], self.to_rotate[0], t),
                lerp(self.from_rotate[1], self.to_rotate[1], t),
            ],
            scale: lerp(self.from_scale, self.to_scale, t),
            finished: progress >= 1.0,
        }
    }
}

/// Cubic ease-in-out on `[0, 1]`.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints_and_midpoint() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!((ease_cubic_in_out(0.5) - 0.5).abs() < 1e-12);
        assert!(ease_cubic_in_out(0.25) < 0.25);
        assert!(ease_cubic_in_out(0.75) > 0.75);
    }

    #[test]
    fn test_frame_progression() {
        let start = Instant::now();
        let transition = Transition::new(
            [0.0, 0.0],
            [-40.0, -20.0],
            480.0,
            1000.0,
            start,
            STEP_DURATION,
        );

        let first = transition.frame_at(start);
        assert_eq!(first.rotate, [0.0, 0.0]);
        assert_eq!(first.scale, 480.0);
        assert!(!first.finished);

        let middle = transition.frame_at(start + Duration::from_millis(1000));
        assert!((middle.rotate[0] + 20.0).abs() < 1e-9);
        assert!((middle.scale - 740.0).abs() < 1e-9);

        let last = transition.frame_at(start + Duration::from_millis(2500));
        assert!(last.finished);
        assert_eq!(last.rotate, [-40.0, -20.0]);
        assert_eq!(last.scale, 1000.0);
    }

    #[test]
    fn test_spins_short_way_across_antimeridian() {
        let start = Instant::now();
        let transition = Transition::new(
            [170.0, 0.0],
            [-170.0, 0.0],
            500.0,
            500.0,
            start,
            STEP_DURATION,
        );
        assert!((transition.target_rotate()[0] - 190.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let start = Instant::now();
        let transition =
            Transition::new([0.0, 0.0], [10.0, 5.0], 1.0, 2.0, start, Duration::ZERO);
        let frame = transition.frame_at(start);
        assert!(frame.finished);
        assert_eq!(frame.rotate, [10.0, 5.0]);
    }
}
