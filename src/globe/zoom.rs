//! Zoom level cycling.

/// Zoom levels used when no configuration is given.
pub const DEFAULT_ZOOMS: [f64; 3] = [500.0, 1000.0, 1500.0];

/// Cycles through a fixed list of zoom levels.
///
/// The cycle starts before the first level (full view of the globe); each
/// advance moves to the next level and wraps back to the first one past the
/// end.
#[derive(Debug, Clone)]
pub struct ZoomCycle {
    levels: Vec<f64>,
    index: Option<usize>,
}

impl Default for ZoomCycle {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOMS.to_vec())
    }
}

impl ZoomCycle {
    /// Creates a cycle over `levels`. Non-positive or non-finite levels are
    /// dropped; an empty result falls back to the defaults.
    pub fn new(levels: Vec<f64>) -> Self {
        let mut levels: Vec<f64> = levels
            .into_iter()
            .filter(|z| z.is_finite() && *z > 0.0)
            .collect();
        if levels.is_empty() {
            log::warn!("No usable zoom levels configured, using defaults");
            levels = DEFAULT_ZOOMS.to_vec();
        }
        Self {
            levels,
            index: None,
        }
    }

    #[cfg(test)]
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Current level index, `None` while still at the launch view.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Moves to the next level and returns its index.
    pub fn advance(&mut self) -> usize {
        let next = match self.index {
            Some(i) if i + 1 < self.levels.len() => i + 1,
            _ => 0,
        };
        self.index = Some(next);
        next
    }

    /// Current zoom level, if any level has been reached yet.
    pub fn current_level(&self) -> Option<f64> {
        self.index.map(|i| self.levels[i])
    }

    /// Projection scale for the current level.
    pub fn target_scale(&self) -> Option<f64> {
        self.current_level().map(scale_for_level)
    }
}

/// Projection scale for a zoom level (twice the level).
pub fn scale_for_level(level: f64) -> f64 {
    level / 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_full_view() {
        let zoom = ZoomCycle::default();
        assert_eq!(zoom.index(), None);
        assert_eq!(zoom.target_scale(), None);
    }

    #[test]
    fn test_cycles_modulo_length() {
        let mut zoom = ZoomCycle::default();
        let visited: Vec<usize> = (0..5).map(|_| zoom.advance()).collect();
        assert_eq!(visited, vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn test_target_scale_doubles_level() {
        let mut zoom = ZoomCycle::default();
        zoom.advance();
        assert_eq!(zoom.target_scale(), Some(1000.0));
        zoom.advance();
        zoom.advance();
        assert_eq!(zoom.target_scale(), Some(3000.0));
    }

    #[test]
    fn test_invalid_levels_fall_back() {
        let zoom = ZoomCycle::new(vec![0.0, -5.0, f64::NAN]);
        assert_eq!(zoom.levels(), &DEFAULT_ZOOMS);

        let zoom = ZoomCycle::new(vec![800.0, -1.0]);
        assert_eq!(zoom.levels(), &[800.0]);
    }

    #[test]
    fn test_single_level_stays() {
        let mut zoom = ZoomCycle::new(vec![750.0]);
        assert_eq!(zoom.advance(), 0);
        assert_eq!(zoom.advance(), 0);
    }
}
