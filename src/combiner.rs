//! Contour combiners: merge the per-edge selections into the distance of
//! the whole shape.

use crate::math::Point2;
use crate::selector::{DistanceValue, EdgeSelector};
use crate::shape::Shape;

/// Combines the edge selectors of a shape into one distance.
pub trait ContourCombiner {
    type Selector: EdgeSelector;

    fn new(shape: &Shape) -> Self;
    fn reset(&mut self, p: Point2);
    /// The selector that edges of contour `i` are added to.
    fn edge_selector(&mut self, i: usize) -> &mut Self::Selector;
    fn distance(&mut self) -> <Self::Selector as EdgeSelector>::Distance;
}

/// Treats the shape as a single contour. Correct when contours don't
/// overlap each other.
#[derive(Clone, Debug, Default)]
pub struct SimpleContourCombiner<S> {
    selector: S,
}

impl<S: EdgeSelector> ContourCombiner for SimpleContourCombiner<S> {
    type Selector = S;

    fn new(_shape: &Shape) -> Self {
        Self {
            selector: S::default(),
        }
    }

    fn reset(&mut self, p: Point2) {
        self.selector.reset(p);
    }

    fn edge_selector(&mut self, _i: usize) -> &mut S {
        &mut self.selector
    }

    fn distance(&mut self) -> S::Distance {
        self.selector.distance()
    }
}

/// Resolves each contour separately and picks the distance consistent with
/// contour windings, so overlapping contours don't carve into each other.
#[derive(Clone, Debug)]
pub struct OverlappingContourCombiner<S> {
    p: Point2,
    windings: Vec<i32>,
    selectors: Vec<S>,
}

impl<S: EdgeSelector> OverlappingContourCombiner<S> {
    /// A selector of no contour, positioned at the current point.
    fn blank_selector(&self) -> S {
        let mut selector = S::default();
        selector.reset(self.p);
        selector
    }
}

impl<S: EdgeSelector> ContourCombiner for OverlappingContourCombiner<S> {
    type Selector = S;

    fn new(shape: &Shape) -> Self {
        Self {
            p: Point2::origin(),
            windings: shape.contours.iter().map(|c| c.winding()).collect(),
            selectors: shape.contours.iter().map(|_| S::default()).collect(),
        }
    }

    fn reset(&mut self, p: Point2) {
        self.p = p;
        for selector in &mut self.selectors {
            selector.reset(p);
        }
    }

    fn edge_selector(&mut self, i: usize) -> &mut S {
        &mut self.selectors[i]
    }

    fn distance(&mut self) -> S::Distance {
        let mut shape_selector = self.blank_selector();
        let mut inner_selector = self.blank_selector();
        let mut outer_selector = self.blank_selector();

        for (selector, &winding) in self.selectors.iter().zip(&self.windings) {
            let distance = selector.distance().resolve();
            shape_selector.merge(selector);
            if winding > 0 && distance >= 0.0 {
                inner_selector.merge(selector);
            }
            if winding < 0 && distance <= 0.0 {
                outer_selector.merge(selector);
            }
        }

        let shape_distance = shape_selector.distance();
        let inner_distance = inner_selector.distance().resolve();
        let outer_distance = outer_selector.distance().resolve();

        let mut distance;
        let winding;
        if inner_distance >= 0.0 && inner_distance.abs() <= outer_distance.abs() {
            distance = inner_selector.distance();
            winding = 1;
            for (selector, &w) in self.selectors.iter().zip(&self.windings) {
                if w > 0 {
                    let contour_distance = selector.distance();
                    let resolved = contour_distance.resolve();
                    if resolved.abs() < outer_distance.abs() && resolved > distance.resolve() {
                        distance = contour_distance;
                    }
                }
            }
        } else if outer_distance <= 0.0 && outer_distance.abs() < inner_distance.abs() {
            distance = outer_selector.distance();
            winding = -1;
            for (selector, &w) in self.selectors.iter().zip(&self.windings) {
                if w < 0 {
                    let contour_distance = selector.distance();
                    let resolved = contour_distance.resolve();
                    if resolved.abs() < inner_distance.abs() && resolved < distance.resolve() {
                        distance = contour_distance;
                    }
                }
            }
        } else {
            return shape_distance;
        }

        // Contours of the opposite winding may still be closer on the same side
        for (selector, &w) in self.selectors.iter().zip(&self.windings) {
            if w != winding {
                let contour_distance = selector.distance();
                let resolved = contour_distance.resolve();
                if resolved * distance.resolve() >= 0.0 && resolved.abs() < distance.resolve().abs() {
                    distance = contour_distance;
                }
            }
        }

        if distance.resolve() == shape_distance.resolve() {
            distance = shape_distance;
        }
        distance
    }
}
