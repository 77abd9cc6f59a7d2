//! Assignment of color channels to edges, so that sharp corners survive
//! in the median of the three channels.

use log::debug;
use lyon_path::math::Angle;

use crate::color::EdgeColor;
use crate::math::{Vector2, VectorExt};
use crate::segment::EdgeSegment;
use crate::shape::Shape;

/// Number of chords used by [`estimate_edge_length`].
pub const EDGE_LENGTH_PRECISION: usize = 4;

/// Parameters of [`edge_coloring_simple`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColoringConfig {
    /// Direction changes sharper than this angle count as corners.
    pub angle_threshold: Angle,
    pub seed: u64,
}

impl Default for ColoringConfig {
    fn default() -> Self {
        Self {
            angle_threshold: Angle::radians(3.0),
            seed: 0,
        }
    }
}

impl ColoringConfig {
    /// Colors the edges of `shape`, returning the advanced seed.
    pub fn apply(&self, shape: &mut Shape) -> u64 {
        edge_coloring_simple(shape, self.angle_threshold, self.seed)
    }
}

/// Determine if a point is a corner, assuming `a` and `b` are incoming and
/// outgoing normalized direction vectors
pub fn is_corner(a: Vector2, b: Vector2, cross_threshold: f32) -> bool {
    // if this corner turns more than 90 degrees (detected by dot product/cos)
    // or if it turns more than the threshold angle (detected by cross product/sin)
    a.dot(b) <= 0.0 || a.cross(b).abs() > cross_threshold
}

/// Approximates the length of an edge by a polyline through a few samples.
pub fn estimate_edge_length(edge: &EdgeSegment) -> f32 {
    let mut len = 0.0;
    let mut prev = edge.point(0.0);
    for i in 1..=EDGE_LENGTH_PRECISION {
        let cur = edge.point(i as f32 / EDGE_LENGTH_PRECISION as f32);
        len += (cur - prev).length();
        prev = cur;
    }
    len
}

/// Recolor the contours prior to MSDF computation.
///
/// Smooth contours stay white. A contour with a single corner (a teardrop)
/// is divided into three color spans, splitting its edges first when it
/// has fewer than three. Otherwise the color switches at every corner,
/// never returning to the initial color on the last stretch so the first
/// and last spans differ.
///
/// Returns the seed after all the switches, for coloring further shapes.
pub fn edge_coloring_simple(shape: &mut Shape, angle_threshold: Angle, mut seed: u64) -> u64 {
    let cross_threshold = angle_threshold.radians.sin();
    let mut corners = Vec::new();

    for (contour_index, contour) in shape.contours.iter_mut().enumerate() {
        let edges = &mut contour.edges;

        // Find all the corners
        corners.clear();
        if let Some(last) = edges.last() {
            let mut prev_dir = last.direction(1.0);
            for (i, edge) in edges.iter().enumerate() {
                if is_corner(
                    prev_dir.normalize_or(false),
                    edge.direction(0.0).normalize_or(false),
                    cross_threshold,
                ) {
                    corners.push(i);
                }
                prev_dir = edge.direction(1.0);
            }
        }
        debug!(
            "contour {}: {} edges, {} corners",
            contour_index,
            edges.len(),
            corners.len()
        );

        match corners.len() {
            0 => {
                // The whole contour is smooth
                for edge in edges.iter_mut() {
                    edge.color = EdgeColor::WHITE;
                }
            }
            1 => {
                let mut colors = [EdgeColor::WHITE, EdgeColor::WHITE, EdgeColor::BLACK];
                colors[0] = colors[0].switch(&mut seed);
                colors[2] = colors[0].switch(&mut seed);
                let corner = corners[0];
                let m = edges.len();

                if m >= 3 {
                    for i in 0..m {
                        let span = (3.0 + 2.875 * i as f32 / (m - 1) as f32 - 1.4375 + 0.5) as i32 - 2;
                        edges[(corner + i) % m].color = colors[span as usize];
                    }
                } else {
                    // Too few edges to hold three colors: split them into thirds
                    let paired = [colors[0], colors[0], colors[1], colors[1], colors[2], colors[2]];
                    let mut parts: [Option<EdgeSegment>; 7] = [None; 7];
                    let [a, b, c] = edges[0].split_in_thirds();
                    parts[3 * corner] = Some(a);
                    parts[1 + 3 * corner] = Some(b);
                    parts[2 + 3 * corner] = Some(c);
                    let span_colors: &[EdgeColor] = if m >= 2 {
                        let [a, b, c] = edges[1].split_in_thirds();
                        parts[3 - 3 * corner] = Some(a);
                        parts[4 - 3 * corner] = Some(b);
                        parts[5 - 3 * corner] = Some(c);
                        &paired
                    } else {
                        &colors
                    };

                    edges.clear();
                    for (part, &color) in parts.iter().map_while(|p| *p).zip(span_colors) {
                        edges.push(EdgeSegment { color, ..part });
                    }
                }
            }
            corner_count => {
                // Cycle through colors, switching whenever we hit another corner
                let mut spline = 0;
                let start = corners[0];
                let m = edges.len();
                let mut color = EdgeColor::WHITE.switch(&mut seed);
                let initial_color = color;
                for i in 0..m {
                    let index = (start + i) % m;
                    if spline + 1 < corner_count && corners[spline + 1] == index {
                        spline += 1;
                        let banned = if spline == corner_count - 1 {
                            initial_color
                        } else {
                            EdgeColor::BLACK
                        };
                        color = color.switch_color(&mut seed, banned);
                    }
                    edges[index].color = color;
                }
            }
        }
    }

    seed
}
