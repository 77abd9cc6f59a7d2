//! Utilities for the SDF computations

use crate::math::Point2;

/// A signed distance, augmented with the cosine of the angle
/// between the tangent of the edge and the vector from the
/// point of nearest approach to the measured point.
///
/// Two distances are ordered by magnitude first; when they tie, the one
/// with the smaller `dot` is considered closer. That is what picks the right
/// edge at a corner shared by two segments.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SignedDistance {
    /// The actual distance
    pub distance: f32,
    /// The absolute cosine of the angle between the tangent vector of the
    /// path segment at the point of closest approach and the vector from
    /// the point of closest approach to the measured point. Zero whenever
    /// the closest point is interior to the segment.
    pub dot: f32,
}

impl SignedDistance {
    pub fn new(distance: f32, dot: f32) -> Self {
        Self { distance, dot }
    }
}

impl Default for SignedDistance {
    /// An "infinitely far" distance that any real edge beats.
    fn default() -> Self {
        Self {
            distance: -f32::MAX,
            dot: 1.0,
        }
    }
}

impl std::cmp::PartialOrd for SignedDistance {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        use std::cmp::Ordering;

        match self.distance.abs().partial_cmp(&other.distance.abs()) {
            Some(Ordering::Less) => Some(Ordering::Less),
            Some(Ordering::Greater) => Some(Ordering::Greater),
            Some(Ordering::Equal) => self.dot.partial_cmp(&other.dot),
            None => None,
        }
    }
}

/// An axis-aligned bounding box that grows to cover whatever is added to it.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Bound {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

impl Default for Bound {
    /// The inverted box: including any point collapses it onto that point.
    fn default() -> Self {
        Self {
            left: f32::MAX,
            bottom: f32::MAX,
            right: -f32::MAX,
            top: -f32::MAX,
        }
    }
}

impl Bound {
    pub fn new(left: f32, bottom: f32, right: f32, top: f32) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Grows the box to contain `p`.
    #[inline]
    pub fn include(&mut self, p: Point2) {
        if p.x < self.left {
            self.left = p.x;
        }
        if p.y < self.bottom {
            self.bottom = p.y;
        }
        if p.x > self.right {
            self.right = p.x;
        }
        if p.y > self.top {
            self.top = p.y;
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// Whether nothing has been included yet.
    pub fn is_empty(&self) -> bool {
        self.left > self.right || self.bottom > self.top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_by_magnitude_then_dot() {
        let a = SignedDistance::new(-1.0, 0.5);
        let b = SignedDistance::new(2.0, 0.0);
        assert!(a < b);
        let c = SignedDistance::new(1.0, 0.25);
        assert!(c < a);
        assert!(SignedDistance::new(1e10, 0.0) < SignedDistance::default());
    }

    #[test]
    fn bound_starts_inverted() {
        let mut bound = Bound::default();
        assert!(bound.is_empty());
        bound.include(Point2::new(1.0, 2.0));
        assert_eq!(bound, Bound::new(1.0, 2.0, 1.0, 2.0));
        bound.include(Point2::new(-1.0, 5.0));
        assert_eq!(bound.width(), 2.0);
        assert_eq!(bound.height(), 3.0);
        assert!(!bound.is_empty());
    }
}
