//! Closed loops of edges.

use crate::math::{Point2, VectorExt};
use crate::segment::EdgeSegment;
use crate::utils::Bound;

/// A list of edges forming a closed loop
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Contour {
    pub edges: Vec<EdgeSegment>,
}

impl Contour {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_edges(edges: Vec<EdgeSegment>) -> Self {
        Self { edges }
    }

    pub fn add_edge(&mut self, edge: EdgeSegment) {
        self.edges.push(edge);
    }

    /// Grows `bound` to fit every edge.
    pub fn bound(&self, bound: &mut Bound) {
        for edge in &self.edges {
            edge.bound(bound);
        }
    }

    /// Grows `bound` to fit the mitered corners of a border of width `border`
    /// drawn around the contour. Only corners turning towards `polarity` (or
    /// all corners when it is 0) are considered.
    pub fn bound_mitered(&self, bound: &mut Bound, border: f32, miter_limit: f32, polarity: i32) {
        let last = match self.edges.last() {
            Some(last) => last,
            None => return,
        };

        let mut prev_dir = last.direction(1.0).normalize_or(true);
        for edge in &self.edges {
            let dir = -edge.direction(0.0).normalize_or(true);
            if polarity as f32 * prev_dir.cross(dir) >= 0.0 {
                let mut miter_length = miter_limit;
                let q = 0.5 * (1.0 - prev_dir.dot(dir));
                if q > 0.0 {
                    miter_length = (1.0 / q.sqrt()).min(miter_limit);
                }
                let miter =
                    edge.point(0.0) + (prev_dir + dir).normalize_or(true) * (border * miter_length);
                bound.include(miter);
            }
            prev_dir = edge.direction(1.0).normalize_or(true);
        }
    }

    /// Orientation of the contour: 1 when it runs counter-clockwise with the
    /// y axis pointing down (clockwise with y up), -1 for the opposite
    /// direction and 0 for an empty or degenerate contour.
    pub fn winding(&self) -> i32 {
        let shoelace = |a: Point2, b: Point2| (b.x - a.x) * (a.y + b.y);
        let n = self.edges.len();
        let total = match n {
            0 => return 0,
            1 => {
                let a = self.edges[0].point(0.0);
                let b = self.edges[0].point(1.0 / 3.0);
                let c = self.edges[0].point(2.0 / 3.0);

                shoelace(a, b) + shoelace(b, c) + shoelace(c, a)
            }
            2 => {
                let a = self.edges[0].point(0.0);
                let b = self.edges[0].point(0.5);
                let c = self.edges[1].point(0.0);
                let d = self.edges[1].point(0.5);

                shoelace(a, b) + shoelace(b, c) + shoelace(c, d) + shoelace(d, a)
            }
            _ => {
                let mut total = 0.0;
                let mut prev = self.edges[n - 1].point(0.0);

                for e in &self.edges {
                    let curr = e.point(0.0);
                    total += shoelace(prev, curr);
                    prev = curr;
                }

                total
            }
        };

        if total > 0.0 {
            1
        } else if total < 0.0 {
            -1
        } else {
            0
        }
    }

    /// Reverses the order of the edges and the direction of each of them.
    pub fn reverse(&mut self) {
        self.edges.reverse();
        for edge in &mut self.edges {
            edge.reverse();
        }
    }
}
