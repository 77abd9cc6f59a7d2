//! Distance queries against a whole shape.

use crate::combiner::ContourCombiner;
use crate::math::Point2;
use crate::selector::EdgeSelector;
use crate::shape::Shape;

type Distance<C> = <<C as ContourCombiner>::Selector as EdgeSelector>::Distance;
type Cache<C> = <<C as ContourCombiner>::Selector as EdgeSelector>::Cache;

/// Finds the distance from points to a shape.
///
/// Keeps one cache entry per edge, so successive queries at nearby points
/// (as when walking a raster row) skip the edges that cannot be closest.
pub struct ShapeDistanceFinder<'a, C: ContourCombiner> {
    shape: &'a Shape,
    combiner: C,
    caches: Vec<Cache<C>>,
}

impl<'a, C: ContourCombiner> ShapeDistanceFinder<'a, C> {
    pub fn new(shape: &'a Shape) -> Self {
        Self {
            shape,
            combiner: C::new(shape),
            caches: vec![Cache::<C>::default(); shape.edge_count()],
        }
    }

    pub fn shape(&self) -> &'a Shape {
        self.shape
    }

    pub fn distance(&mut self, origin: Point2) -> Distance<C> {
        self.combiner.reset(origin);
        let mut caches = self.caches.iter_mut();

        for (i, contour) in self.shape.contours.iter().enumerate() {
            let edges = &contour.edges;
            let n = edges.len();
            if n == 0 {
                continue;
            }

            let selector = self.combiner.edge_selector(i);
            let mut prev = if n >= 2 { &edges[n - 2] } else { &edges[0] };
            let mut cur = &edges[n - 1];
            for next in edges {
                // One cache per edge, sized from the same shape
                if let Some(cache) = caches.next() {
                    selector.add_edge(cache, prev, cur, next);
                }
                prev = cur;
                cur = next;
            }
        }

        self.combiner.distance()
    }

    /// Distance at a single point, without keeping caches around.
    pub fn one_shot_distance(shape: &Shape, origin: Point2) -> Distance<C> {
        let mut combiner = C::new(shape);
        combiner.reset(origin);

        for (i, contour) in shape.contours.iter().enumerate() {
            let edges = &contour.edges;
            let n = edges.len();
            if n == 0 {
                continue;
            }

            let selector = combiner.edge_selector(i);
            let mut prev = if n >= 2 { &edges[n - 2] } else { &edges[0] };
            let mut cur = &edges[n - 1];
            for next in edges {
                let mut cache = Cache::<C>::default();
                selector.add_edge(&mut cache, prev, cur, next);
                prev = cur;
                cur = next;
            }
        }

        combiner.distance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::EdgeColor;
    use crate::combiner::{OverlappingContourCombiner, SimpleContourCombiner};
    use crate::contour::Contour;
    use crate::segment::EdgeSegment;
    use crate::selector::{PseudoDistanceSelector, TrueDistanceSelector};

    fn circle(radius: f32) -> Shape {
        // Positive winding, so the inside is positive
        let k = 0.552_284_8 * radius;
        let r = radius;
        let p = Point2::new;
        Shape::from_contours(vec![Contour::from_edges(vec![
            EdgeSegment::cubic(p(r, 0.0), p(r, -k), p(k, -r), p(0.0, -r), EdgeColor::WHITE),
            EdgeSegment::cubic(p(0.0, -r), p(-k, -r), p(-r, -k), p(-r, 0.0), EdgeColor::WHITE),
            EdgeSegment::cubic(p(-r, 0.0), p(-r, k), p(-k, r), p(0.0, r), EdgeColor::WHITE),
            EdgeSegment::cubic(p(0.0, r), p(k, r), p(r, k), p(r, 0.0), EdgeColor::WHITE),
        ])])
    }

    #[test]
    fn circle_distances() {
        let shape = circle(2.0);
        assert_eq!(shape.contours[0].winding(), 1);
        let mut finder = ShapeDistanceFinder::<SimpleContourCombiner<TrueDistanceSelector>>::new(&shape);
        let centre = finder.distance(Point2::new(0.0, 0.0));
        assert!((centre - 2.0).abs() < 1e-2, "{}", centre);
        let outside = finder.distance(Point2::new(3.0, 0.0));
        assert!((outside + 1.0).abs() < 1e-2, "{}", outside);
    }

    #[test]
    fn cached_and_one_shot_agree() {
        let shape = circle(2.0);
        let mut finder =
            ShapeDistanceFinder::<OverlappingContourCombiner<PseudoDistanceSelector>>::new(&shape);
        for i in 0..30 {
            let origin = Point2::new(-3.0 + 0.2 * i as f32, 0.7);
            let cached = finder.distance(origin);
            let one_shot = ShapeDistanceFinder::<OverlappingContourCombiner<PseudoDistanceSelector>>::one_shot_distance(
                &shape, origin,
            );
            assert!((cached - one_shot).abs() < 1e-5, "{:?}: {} vs {}", origin, cached, one_shot);
        }
    }

    #[test]
    fn empty_shape_is_infinitely_far() {
        let shape = Shape::new();
        let d = ShapeDistanceFinder::<SimpleContourCombiner<TrueDistanceSelector>>::one_shot_distance(
            &shape,
            Point2::new(1.0, 1.0),
        );
        assert!(d < -1e30);
    }
}
