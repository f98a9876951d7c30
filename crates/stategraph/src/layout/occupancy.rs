//! Row occupancy tracking for collision avoidance.

use stategraph_core::geometry::Point;

const ROW_EPSILON: f32 = 0.5;

/// Positions already handed out during one layout run.
#[derive(Debug, Default)]
pub(super) struct Occupancy {
    placed: Vec<Point>,
    min_gap: f32,
}

impl Occupancy {
    pub(super) fn new(min_gap: f32) -> Self {
        Self {
            placed: Vec::new(),
            min_gap,
        }
    }

    /// Claims the first free position at or to the right of `anchor`.
    ///
    /// A position is taken when a node on the same row sits closer than the
    /// minimum gap; the anchor then moves right one gap at a time.
    pub(super) fn claim(&mut self, anchor: Point) -> Point {
        let mut position = anchor;
        if self.min_gap > 0.0 {
            while self.is_taken(position) {
                position = position.add_x(self.min_gap);
            }
        }
        self.placed.push(position);
        position
    }

    fn is_taken(&self, position: Point) -> bool {
        self.placed.iter().any(|placed| {
            (placed.y() - position.y()).abs() < ROW_EPSILON
                && (placed.x() - position.x()).abs() < self.min_gap
        })
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_free_anchor_is_kept() {
        let mut occupancy = Occupancy::new(180.0);
        let first = occupancy.claim(Point::new(0.0, 100.0));
        let below = occupancy.claim(Point::new(0.0, 200.0));
        let far = occupancy.claim(Point::new(220.0, 100.0));

        assert_eq!(first, Point::new(0.0, 100.0));
        assert_eq!(below, Point::new(0.0, 200.0));
        assert_eq!(far, Point::new(220.0, 100.0));
    }

    #[test]
    fn test_taken_anchor_shifts_right() {
        let mut occupancy = Occupancy::new(180.0);
        occupancy.claim(Point::new(0.0, 100.0));
        occupancy.claim(Point::new(180.0, 100.0));

        let shifted = occupancy.claim(Point::new(50.0, 100.0));
        assert_approx_eq!(f32, shifted.x(), 410.0);
        assert_approx_eq!(f32, shifted.y(), 100.0);
    }

    #[test]
    fn test_zero_gap_never_shifts() {
        let mut occupancy = Occupancy::new(0.0);
        occupancy.claim(Point::new(0.0, 0.0));
        assert_eq!(occupancy.claim(Point::new(0.0, 0.0)), Point::new(0.0, 0.0));
    }
}
