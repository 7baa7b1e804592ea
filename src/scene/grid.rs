//! Grid snapping
//!
//! Every position and size in a scene is quantized to a multiple of the grid
//! step. The helpers here are the only place that rounding happens.

/// Snap grid with a fixed step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    step: f64,
}

impl Grid {
    /// Create a grid; `step` must be positive
    pub fn new(step: f64) -> Self {
        Self { step }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Round a value to the nearest grid multiple
    pub fn snap(&self, value: f64) -> f64 {
        // `+ 0.0` folds negative zero so exports stay byte-stable
        (value / self.step).round() * self.step + 0.0
    }

    /// Largest grid multiple not above `value`
    pub fn snap_down(&self, value: f64) -> f64 {
        ((value / self.step) + 1e-9).floor() * self.step + 0.0
    }

    /// Smallest grid multiple not below `value`
    pub fn snap_up(&self, value: f64) -> f64 {
        ((value / self.step) - 1e-9).ceil() * self.step + 0.0
    }

    /// Snap a size, never going below one grid step
    pub fn snap_size(&self, value: f64) -> f64 {
        self.snap(value.max(self.step)).max(self.step)
    }

    /// Tolerance used to decide whether edges already line up
    pub fn tolerance(&self) -> f64 {
        self.step * 0.25
    }

    /// Whether two coordinates are equal within [`Grid::tolerance`]
    pub fn approx_eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.tolerance()
    }

    /// Whether a value already sits on a grid multiple
    pub fn is_aligned(&self, value: f64) -> bool {
        let q = value / self.step;
        (q - q.round()).abs() < 1e-9
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_rounds_to_step() {
        let grid = Grid::new(0.5);
        assert_eq!(grid.snap(1.2), 1.0);
        assert_eq!(grid.snap(1.3), 1.5);
        assert_eq!(grid.snap(-0.1), 0.0);
        assert!(grid.snap(-0.1).is_sign_positive());
    }

    #[test]
    fn test_directed_snaps() {
        let grid = Grid::new(0.5);
        assert_eq!(grid.snap_down(4.25), 4.0);
        assert_eq!(grid.snap_up(4.25), 4.5);
        assert_eq!(grid.snap_down(4.5), 4.5);
        assert_eq!(grid.snap_up(4.5), 4.5);
    }

    #[test]
    fn test_snap_size_clamps_to_step() {
        let grid = Grid::new(0.5);
        assert_eq!(grid.snap_size(0.1), 0.5);
        assert_eq!(grid.snap_size(-3.0), 0.5);
        assert_eq!(grid.snap_size(2.74), 2.5);
    }

    #[test]
    fn test_tolerance() {
        let grid = Grid::new(0.5);
        assert_eq!(grid.tolerance(), 0.125);
        assert!(grid.approx_eq(1.0, 1.1));
        assert!(!grid.approx_eq(1.0, 1.2));
    }

    #[test]
    fn test_is_aligned() {
        let grid = Grid::new(0.5);
        assert!(grid.is_aligned(3.5));
        assert!(!grid.is_aligned(3.25));
    }
}
