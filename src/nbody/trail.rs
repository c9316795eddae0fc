//! Orbit trails
//!
//! A trail records one position per tick. Trails are unbounded unless a
//! capacity is configured, in which case the oldest points are dropped.

use std::collections::VecDeque;

use nalgebra::Point2;

/// Past positions of a body, oldest first
#[derive(Debug, Clone, Default)]
pub struct OrbitTrail {
    points: VecDeque<Point2<f64>>,
    capacity: Option<usize>,
}

impl OrbitTrail {
    /// A trail that keeps every point
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// A trail that keeps at most `capacity` points
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    /// Append a point, returning true if an old point was dropped to make room
    pub fn push(&mut self, point: Point2<f64>) -> bool {
        match self.capacity {
            Some(0) => true,
            Some(capacity) if self.points.len() >= capacity => {
                self.points.pop_front();
                self.points.push_back(point);
                true
            }
            _ => {
                self.points.push_back(point);
                false
            }
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent point
    pub fn last(&self) -> Option<Point2<f64>> {
        self.points.back().copied()
    }

    /// Points, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Point2<f64>> {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_keeps_everything() {
        let mut trail = OrbitTrail::unbounded();
        for i in 0..1_000 {
            assert!(!trail.push(Point2::new(i as f64, 0.0)));
        }
        assert_eq!(trail.len(), 1_000);
        assert_eq!(trail.capacity(), None);
        assert_eq!(trail.iter().next(), Some(&Point2::new(0.0, 0.0)));
    }

    #[test]
    fn test_capped_drops_oldest() {
        let mut trail = OrbitTrail::with_capacity(2);
        assert!(!trail.push(Point2::new(1.0, 0.0)));
        assert!(!trail.push(Point2::new(2.0, 0.0)));
        assert!(trail.push(Point2::new(3.0, 0.0)));

        let xs: Vec<f64> = trail.iter().map(|p| p.x).collect();
        assert_eq!(xs, [2.0, 3.0]);
        assert_eq!(trail.last(), Some(Point2::new(3.0, 0.0)));
    }

    #[test]
    fn test_zero_capacity_records_nothing() {
        let mut trail = OrbitTrail::with_capacity(0);
        assert!(trail.push(Point2::new(1.0, 1.0)));
        assert!(trail.is_empty());
        assert_eq!(trail.last(), None);
    }
}
