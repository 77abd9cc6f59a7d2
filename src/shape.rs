//! A shape: the set of contours making up one glyph or icon.

use log::trace;

use crate::contour::Contour;
use crate::math::{mix, VectorExt};
use crate::scanline::{Intersection, Scanline};
use crate::segment::{EdgeSegment, Segment};
use crate::utils::Bound;

/// Threshold of the dot product of adjacent edge directions below which
/// (plus one) a corner is considered convergent.
pub const CORNER_DOT_EPSILON: f32 = 0.000001;
/// Relative amount by which a control point is moved to resolve a
/// convergent corner.
pub const DECONVERGENCE_FACTOR: f32 = 0.000001;

/// A vector shape made of closed contours.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shape {
    pub contours: Vec<Contour>,
    /// Whether the y axis points down. Generated fields are flipped vertically.
    pub inverse_y_axis: bool,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_contours(contours: Vec<Contour>) -> Self {
        Self {
            contours,
            inverse_y_axis: false,
        }
    }

    pub fn add_contour(&mut self, contour: Contour) {
        self.contours.push(contour);
    }

    /// Total number of edges across all contours.
    pub fn edge_count(&self) -> usize {
        self.contours.iter().map(|c| c.edges.len()).sum()
    }

    /// Prepares the geometry for distance computation.
    ///
    /// Contours made of a single edge are split in three, so every contour
    /// has a start and end edge distinct from each other. Corners where
    /// the outline turns back onto itself get their adjacent control points
    /// nudged apart, since pseudo-distances cannot tell such edges apart.
    pub fn normalize(&mut self) {
        for contour in &mut self.contours {
            let n = contour.edges.len();
            if n == 1 {
                contour.edges = contour.edges[0].split_in_thirds().to_vec();
            } else if n > 1 {
                let mut prev = n - 1;
                for i in 0..n {
                    let prev_dir = contour.edges[prev].direction(1.0).normalize_or(false);
                    let cur_dir = contour.edges[i].direction(0.0).normalize_or(false);
                    if prev_dir.dot(cur_dir) < CORNER_DOT_EPSILON - 1.0 {
                        deconverge_edge(&mut contour.edges[prev], true);
                        deconverge_edge(&mut contour.edges[i], false);
                    }
                    prev = i;
                }
            }
        }
    }

    /// Checks that every contour is closed and continuous.
    pub fn validate(&self) -> bool {
        for contour in &self.contours {
            if let Some(last) = contour.edges.last() {
                let mut corner = last.end();
                for edge in &contour.edges {
                    if edge.start() != corner {
                        return false;
                    }
                    corner = edge.end();
                }
            }
        }
        true
    }

    pub fn bound(&self, bound: &mut Bound) {
        for contour in &self.contours {
            contour.bound(bound);
        }
    }

    pub fn bound_miters(&self, bound: &mut Bound, border: f32, miter_limit: f32, polarity: i32) {
        for contour in &self.contours {
            contour.bound_mitered(bound, border, miter_limit, polarity);
        }
    }

    /// Bounding box of the shape, grown by `border` on every side. When
    /// `miter_limit` is positive, mitered corners of the border are covered
    /// too.
    pub fn get_bounds(&self, border: f32, miter_limit: f32, polarity: i32) -> Bound {
        let mut bound = Bound::default();
        self.bound(&mut bound);
        if border > 0.0 {
            bound.left -= border;
            bound.bottom -= border;
            bound.right += border;
            bound.top += border;
            if miter_limit > 0.0 {
                self.bound_miters(&mut bound, border, miter_limit, polarity);
            }
        }
        bound
    }

    /// Fills `line` with the crossings of every edge at height `y`.
    pub fn scanline(&self, line: &mut Scanline, y: f32) {
        let intersections = self
            .contours
            .iter()
            .flat_map(|c| c.edges.iter())
            .flat_map(|e| e.scanline_intersections(y))
            .map(|(x, dy)| Intersection::new(x, dy))
            .collect();
        line.set_intersections(intersections);
    }

    /// Reorients contours so the shape reads correctly under the non-zero
    /// fill rule, for outlines drawn with no consistent orientation.
    ///
    /// For each contour a horizontal line through it is intersected with
    /// the whole shape. Walking the crossings from the left, each one votes
    /// on whether its contour runs the right way given how many crossings
    /// precede it. Contours with a negative tally are reversed.
    pub fn orient_contours(&mut self) {
        #[derive(Clone, Copy)]
        struct Crossing {
            x: f32,
            direction: i32,
            contour: usize,
        }

        // Irrational, to make hitting a corner or other point of interest unlikely
        let ratio = 0.5 * (5.0f32.sqrt() - 1.0);
        let mut orientations = vec![0i32; self.contours.len()];
        let mut crossings: Vec<Crossing> = Vec::new();

        for i in 0..self.contours.len() {
            let edges = &self.contours[i].edges;
            if orientations[i] != 0 || edges.is_empty() {
                continue;
            }

            // Find a y that crosses the contour
            let y0 = edges[0].point(0.0).y;
            let mut y1 = y0;
            for edge in edges {
                if y0 != y1 {
                    break;
                }
                y1 = edge.point(1.0).y;
            }
            // In case all endpoints are on one horizontal line
            for edge in edges {
                if y0 != y1 {
                    break;
                }
                y1 = edge.point(ratio).y;
            }
            let y = mix(y0, y1, ratio);

            for (j, contour) in self.contours.iter().enumerate() {
                for edge in &contour.edges {
                    for (x, direction) in edge.scanline_intersections(y) {
                        crossings.push(Crossing {
                            x,
                            direction,
                            contour: j,
                        });
                    }
                }
            }
            crossings.sort_by(|a, b| a.x.total_cmp(&b.x));

            // Coincident crossings are ambiguous
            for j in 1..crossings.len() {
                if crossings[j].x == crossings[j - 1].x {
                    crossings[j].direction = 0;
                    crossings[j - 1].direction = 0;
                }
            }

            for (j, crossing) in crossings.iter().enumerate() {
                if crossing.direction == 0 {
                    continue;
                }
                let parity = (j & 1) as i32 ^ (crossing.direction > 0) as i32;
                orientations[crossing.contour] += 2 * parity - 1;
            }
            trace!("orientation votes at y = {}: {:?}", y, orientations);

            crossings.clear();
        }

        for (contour, orientation) in self.contours.iter_mut().zip(orientations) {
            if orientation < 0 {
                contour.reverse();
            }
        }
    }
}

/// Pulls apart an edge end that meets its neighbour head-on. Quadratics are
/// elevated to cubics first since they lack a free control point per end.
fn deconverge_edge(edge: &mut EdgeSegment, end: bool) {
    if let Segment::Quadratic(_) = edge.segment {
        *edge = edge.convert_to_cubic();
    }
    edge.deconverge(end, DECONVERGENCE_FACTOR);
}
