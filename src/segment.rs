//! Edge segments: the linear, quadratic and cubic pieces a contour is made of.

use arrayvec::ArrayVec;
use lyon_geom::{CubicBezierSegment, LineSegment, QuadraticBezierSegment};

use crate::color::EdgeColor;
use crate::equation::{solve_cubic, solve_quadratic};
use crate::error::{Error, Result};
use crate::math::{mix, mix_points, mix_vectors, non_zero_sign, Point2, Vector2, VectorExt};
use crate::utils::{Bound, SignedDistance};

/// Number of equally spaced starting parameters (minus one) used by the
/// cubic distance search.
pub const CUBIC_SEARCH_STARTS: usize = 4;
/// Newton iterations per starting parameter in the cubic distance search.
pub const CUBIC_SEARCH_STEPS: usize = 4;

/// At most three crossings of a horizontal line, as `(x, direction)` pairs
/// where direction is +1 for upward and -1 for downward crossings.
pub type ScanlineCrossings = ArrayVec<(f32, i32), 3>;

/// The geometry of an edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment {
    Line(LineSegment<f32>),
    Quadratic(QuadraticBezierSegment<f32>),
    Cubic(CubicBezierSegment<f32>),
}

/// A colored edge of a contour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeSegment {
    pub segment: Segment,
    pub color: EdgeColor,
}

impl EdgeSegment {
    /// Wraps a segment, repairing control points that coincide with the endpoints.
    pub fn new(segment: Segment, color: EdgeColor) -> Self {
        let segment = match segment {
            Segment::Quadratic(mut s) => {
                if s.ctrl == s.from || s.ctrl == s.to {
                    s.ctrl = mix_points(s.from, s.to, 0.5);
                }
                Segment::Quadratic(s)
            }
            Segment::Cubic(mut s) => {
                if (s.ctrl1 == s.from || s.ctrl1 == s.to) && (s.ctrl2 == s.from || s.ctrl2 == s.to) {
                    s.ctrl1 = mix_points(s.from, s.to, 1.0 / 3.0);
                    s.ctrl2 = mix_points(s.from, s.to, 2.0 / 3.0);
                }
                Segment::Cubic(s)
            }
            line => line,
        };
        Self { segment, color }
    }

    pub fn line(from: Point2, to: Point2, color: EdgeColor) -> Self {
        Self::new(Segment::Line(LineSegment { from, to }), color)
    }

    pub fn quadratic(from: Point2, ctrl: Point2, to: Point2, color: EdgeColor) -> Self {
        Self::new(
            Segment::Quadratic(QuadraticBezierSegment { from, ctrl, to }),
            color,
        )
    }

    pub fn cubic(from: Point2, ctrl1: Point2, ctrl2: Point2, to: Point2, color: EdgeColor) -> Self {
        Self::new(
            Segment::Cubic(CubicBezierSegment {
                from,
                ctrl1,
                ctrl2,
                to,
            }),
            color,
        )
    }

    /// The first control point.
    pub fn start(&self) -> Point2 {
        match self.segment {
            Segment::Line(s) => s.from,
            Segment::Quadratic(s) => s.from,
            Segment::Cubic(s) => s.from,
        }
    }

    /// The last control point.
    pub fn end(&self) -> Point2 {
        match self.segment {
            Segment::Line(s) => s.to,
            Segment::Quadratic(s) => s.to,
            Segment::Cubic(s) => s.to,
        }
    }

    /// Point on the edge at parameter `t`.
    pub fn point(&self, t: f32) -> Point2 {
        match self.segment {
            Segment::Line(s) => mix_points(s.from, s.to, t),
            Segment::Quadratic(s) => {
                mix_points(mix_points(s.from, s.ctrl, t), mix_points(s.ctrl, s.to, t), t)
            }
            Segment::Cubic(s) => {
                let p12 = mix_points(s.ctrl1, s.ctrl2, t);
                mix_points(
                    mix_points(mix_points(s.from, s.ctrl1, t), p12, t),
                    mix_points(p12, mix_points(s.ctrl2, s.to, t), t),
                    t,
                )
            }
        }
    }

    /// Tangent (not normalized) at parameter `t`.
    ///
    /// When the derivative vanishes at an endpoint, a chord direction is used
    /// instead so corners stay well defined.
    pub fn direction(&self, t: f32) -> Vector2 {
        match self.segment {
            Segment::Line(s) => s.to - s.from,
            Segment::Quadratic(s) => {
                let tangent = mix_vectors(s.ctrl - s.from, s.to - s.ctrl, t);
                if tangent.is_zero() {
                    return s.to - s.from;
                }
                tangent
            }
            Segment::Cubic(s) => {
                let tangent = mix_vectors(
                    mix_vectors(s.ctrl1 - s.from, s.ctrl2 - s.ctrl1, t),
                    mix_vectors(s.ctrl2 - s.ctrl1, s.to - s.ctrl2, t),
                    t,
                );
                if tangent.is_zero() {
                    if t == 0.0 {
                        return s.ctrl2 - s.from;
                    }
                    if t == 1.0 {
                        return s.to - s.ctrl1;
                    }
                }
                tangent
            }
        }
    }

    /// Change of direction (second derivative, up to a constant) at `t`.
    pub fn direction_change(&self, t: f32) -> Vector2 {
        match self.segment {
            Segment::Line(_) => Vector2::zero(),
            Segment::Quadratic(s) => (s.to - s.ctrl) - (s.ctrl - s.from),
            Segment::Cubic(s) => mix_vectors(
                (s.ctrl2 - s.ctrl1) - (s.ctrl1 - s.from),
                (s.to - s.ctrl2) - (s.ctrl2 - s.ctrl1),
                t,
            ),
        }
    }

    /// Arc length. Cubic segments have no closed form and report
    /// [`Error::UnsupportedOperation`].
    pub fn length(&self) -> Result<f32> {
        match self.segment {
            Segment::Line(s) => Ok((s.to - s.from).length()),
            Segment::Quadratic(s) => {
                let ab = s.ctrl - s.from;
                let br = s.to - s.ctrl - ab;
                let abab = ab.dot(ab);
                let abbr = ab.dot(br);
                let brbr = br.dot(br);
                let ab_len = abab.sqrt();
                if brbr == 0.0 {
                    // Control point sits at the midpoint: a straight line
                    return Ok(2.0 * ab_len);
                }
                let br_len = brbr.sqrt();
                let crs = ab.cross(br);
                let h = (abab + abbr + abbr + brbr).sqrt();
                Ok((br_len * ((abbr + brbr) * h - abbr * ab_len)
                    + crs * crs * ((br_len * h + abbr + brbr) / (br_len * ab_len + abbr)).ln())
                    / (brbr * br_len))
            }
            Segment::Cubic(_) => Err(Error::UnsupportedOperation("length of a cubic segment")),
        }
    }

    /// Signed distance from `origin` to the edge, together with the curve
    /// parameter of the closest point. The parameter falls outside `[0, 1]`
    /// when the origin projects beyond an endpoint.
    pub fn signed_distance(&self, origin: Point2) -> (SignedDistance, f32) {
        match self.segment {
            Segment::Line(LineSegment { from: p0, to: p1 }) => {
                let aq = origin - p0;
                let ab = p1 - p0;
                let param = aq.dot(ab) / ab.dot(ab);
                let eq = (if param > 0.5 { p1 } else { p0 }) - origin;
                let endpoint_distance = eq.length();
                if param > 0.0 && param < 1.0 {
                    let ortho_distance = ab.orthonormal(false, false).dot(aq);
                    if ortho_distance.abs() < endpoint_distance {
                        return (SignedDistance::new(ortho_distance, 0.0), param);
                    }
                }
                (
                    SignedDistance::new(
                        non_zero_sign(aq.cross(ab)) * endpoint_distance,
                        ab.normalize_or(false).dot(eq.normalize_or(false)).abs(),
                    ),
                    param,
                )
            }

            Segment::Quadratic(QuadraticBezierSegment {
                from: p0,
                ctrl: p1,
                to: p2,
            }) => {
                let qa = p0 - origin;
                let ab = p1 - p0;
                let br = p2 - p1 - ab;
                let a = br.dot(br);
                let b = 3.0 * ab.dot(br);
                let c = 2.0 * ab.dot(ab) + qa.dot(br);
                let d = qa.dot(ab);
                let roots = solve_cubic(a, b, c, d);

                let ep_dir = self.direction(0.0);
                let mut min_distance = non_zero_sign(ep_dir.cross(qa)) * qa.length();
                let mut param = -qa.dot(ep_dir) / ep_dir.dot(ep_dir);

                let ep_dir = self.direction(1.0);
                let distance = (p2 - origin).length();
                if distance < min_distance.abs() {
                    min_distance = non_zero_sign(ep_dir.cross(p2 - origin)) * distance;
                    param = (origin - p1).dot(ep_dir) / ep_dir.dot(ep_dir);
                }

                for &t in roots.as_slice() {
                    if t > 0.0 && t < 1.0 {
                        let qe = qa + ab * (2.0 * t) + br * (t * t);
                        let qe_distance = qe.length();
                        // Near-ties go to the later root
                        if qe_distance - min_distance.abs() <= 1e-6 {
                            min_distance = non_zero_sign((ab + br * t).cross(qe)) * qe_distance;
                            param = t;
                        }
                    }
                }

                (self.finish_distance(min_distance, param, qa, p2 - origin), param)
            }

            Segment::Cubic(CubicBezierSegment {
                from: p0,
                ctrl1: p1,
                ctrl2: p2,
                to: p3,
            }) => {
                let qa = p0 - origin;
                let ab = p1 - p0;
                let br = p2 - p1 - ab;
                let as_ = (p3 - p2) - (p2 - p1) - br;

                let ep_dir = self.direction(0.0);
                let mut min_distance = non_zero_sign(ep_dir.cross(qa)) * qa.length();
                let mut param = -qa.dot(ep_dir) / ep_dir.dot(ep_dir);

                let ep_dir = self.direction(1.0);
                let distance = (p3 - origin).length();
                if distance < min_distance.abs() {
                    min_distance = non_zero_sign(ep_dir.cross(p3 - origin)) * distance;
                    param = (ep_dir - (p3 - origin)).dot(ep_dir) / ep_dir.dot(ep_dir);
                }

                let curve = |t: f32| qa + ab * (3.0 * t) + br * (3.0 * t * t) + as_ * (t * t * t);
                for i in 0..=CUBIC_SEARCH_STARTS {
                    let mut t = i as f32 / CUBIC_SEARCH_STARTS as f32;
                    let mut qe = curve(t);
                    for _ in 0..CUBIC_SEARCH_STEPS {
                        let d1 = ab * 3.0 + br * (6.0 * t) + as_ * (3.0 * t * t);
                        let d2 = br * 6.0 + as_ * (6.0 * t);
                        t -= qe.dot(d1) / (d1.dot(d1) + qe.dot(d2));
                        if t <= 0.0 || t >= 1.0 {
                            break;
                        }
                        qe = curve(t);
                        let qe_distance = qe.length();
                        if qe_distance < min_distance.abs() {
                            min_distance = non_zero_sign(d1.cross(qe)) * qe_distance;
                            param = t;
                        }
                    }
                }

                (self.finish_distance(min_distance, param, qa, p3 - origin), param)
            }
        }
    }

    /// Attaches the endpoint alignment to a curve distance: zero inside the
    /// curve, otherwise the cosine against the nearer endpoint's tangent.
    fn finish_distance(&self, distance: f32, param: f32, qa: Vector2, qb: Vector2) -> SignedDistance {
        if (0.0..=1.0).contains(&param) {
            SignedDistance::new(distance, 0.0)
        } else if param < 0.5 {
            SignedDistance::new(
                distance,
                self.direction(0.0)
                    .normalize_or(false)
                    .dot(qa.normalize_or(false))
                    .abs(),
            )
        } else {
            SignedDistance::new(
                distance,
                self.direction(1.0)
                    .normalize_or(false)
                    .dot(qb.normalize_or(false))
                    .abs(),
            )
        }
    }

    /// Replaces `distance` with the distance to the tangent line extended from
    /// the nearer endpoint, when `param` lies beyond that endpoint and the
    /// extension is at least as close.
    pub fn distance_to_pseudo_distance(&self, distance: &mut SignedDistance, origin: Point2, param: f32) {
        if param < 0.0 {
            let dir = self.direction(0.0).normalize_or(false);
            let aq = origin - self.point(0.0);
            let ts = aq.dot(dir);
            if ts < 0.0 {
                let pseudo_distance = aq.cross(dir);
                if pseudo_distance.abs() <= distance.distance.abs() {
                    distance.distance = pseudo_distance;
                    distance.dot = 0.0;
                }
            }
        } else if param > 1.0 {
            let dir = self.direction(1.0).normalize_or(false);
            let bq = origin - self.point(1.0);
            let ts = bq.dot(dir);
            if ts > 0.0 {
                let pseudo_distance = bq.cross(dir);
                if pseudo_distance.abs() <= distance.distance.abs() {
                    distance.distance = pseudo_distance;
                    distance.dot = 0.0;
                }
            }
        }
    }

    /// Crossings of the horizontal line at `y`.
    ///
    /// Tangencies at the endpoints and at local extrema are resolved so that
    /// crossings alternate in direction along the edge and join up with the
    /// neighbouring edges without double counting.
    pub fn scanline_intersections(&self, y: f32) -> ScanlineCrossings {
        let mut crossings = ScanlineCrossings::new();
        match self.segment {
            Segment::Line(LineSegment { from: p0, to: p1 }) => {
                if (y >= p0.y && y < p1.y) || (y >= p1.y && y < p0.y) {
                    let param = (y - p0.y) / (p1.y - p0.y);
                    let dy = if p1.y > p0.y { 1 } else { -1 };
                    crossings.push((mix(p0.x, p1.x, param), dy));
                }
            }

            Segment::Quadratic(QuadraticBezierSegment {
                from: p0,
                ctrl: p1,
                to: p2,
            }) => {
                let mut xs = [0.0f32; 3];
                let mut dys = [0i32; 3];
                let mut total = 0;
                let mut next_dy = if y > p0.y { 1 } else { -1 };
                xs[total] = p0.x;
                if p0.y == y {
                    if p0.y < p1.y || (p0.y == p1.y && p0.y < p2.y) {
                        dys[total] = 1;
                        total += 1;
                    } else {
                        next_dy = 1;
                    }
                }

                let ab = p1 - p0;
                let br = p2 - p1 - ab;
                let mut t: ArrayVec<f32, 3> = solve_quadratic(br.y, 2.0 * ab.y, p0.y - y)
                    .as_slice()
                    .iter()
                    .copied()
                    .collect();
                sort_params(&mut t);

                for &t in &t {
                    if (0.0..=1.0).contains(&t) {
                        xs[total] = p0.x + 2.0 * t * ab.x + t * t * br.x;
                        if next_dy as f32 * (ab.y + t * br.y) >= 0.0 {
                            dys[total] = next_dy;
                            total += 1;
                            next_dy = -next_dy;
                        }
                    }
                    if total >= 2 {
                        break;
                    }
                }

                if p2.y == y {
                    if next_dy > 0 && total > 0 {
                        total -= 1;
                        next_dy = -1;
                    }
                    if (p2.y < p1.y || (p2.y == p1.y && p2.y < p0.y)) && total < 2 {
                        xs[total] = p2.x;
                        if next_dy < 0 {
                            dys[total] = -1;
                            total += 1;
                            next_dy = 1;
                        }
                    }
                }
                let end_dy = if y >= p2.y { 1 } else { -1 };
                if next_dy != end_dy {
                    if total > 0 {
                        total -= 1;
                    } else {
                        if (p2.y - y).abs() < (p0.y - y).abs() {
                            xs[total] = p2.x;
                        }
                        dys[total] = next_dy;
                        total += 1;
                    }
                }

                crossings.extend(xs.iter().copied().zip(dys.iter().copied()).take(total));
            }

            Segment::Cubic(CubicBezierSegment {
                from: p0,
                ctrl1: p1,
                ctrl2: p2,
                to: p3,
            }) => {
                let mut xs = [0.0f32; 3];
                let mut dys = [0i32; 3];
                let mut total = 0;
                let mut next_dy = if y > p0.y { 1 } else { -1 };
                xs[total] = p0.x;
                if p0.y == y {
                    if p0.y < p1.y
                        || (p0.y == p1.y && (p0.y < p2.y || (p0.y == p2.y && p0.y < p3.y)))
                    {
                        dys[total] = 1;
                        total += 1;
                    } else {
                        next_dy = 1;
                    }
                }

                let ab = p1 - p0;
                let br = p2 - p1 - ab;
                let as_ = (p3 - p2) - (p2 - p1) - br;
                let mut t: ArrayVec<f32, 3> =
                    solve_cubic(as_.y, 3.0 * br.y, 3.0 * ab.y, p0.y - y)
                        .as_slice()
                        .iter()
                        .copied()
                        .collect();
                sort_params(&mut t);

                for &t in &t {
                    if (0.0..=1.0).contains(&t) && total < 3 {
                        xs[total] = p0.x + 3.0 * t * ab.x + 3.0 * t * t * br.x + t * t * t * as_.x;
                        if next_dy as f32 * (ab.y + 2.0 * t * br.y + t * t * as_.y) >= 0.0 {
                            dys[total] = next_dy;
                            total += 1;
                            next_dy = -next_dy;
                        }
                    }
                }

                if p3.y == y {
                    if next_dy > 0 && total > 0 {
                        total -= 1;
                        next_dy = -1;
                    }
                    if (p3.y < p2.y
                        || (p3.y == p2.y && (p3.y < p1.y || (p3.y == p1.y && p3.y < p0.y))))
                        && total < 3
                    {
                        xs[total] = p3.x;
                        if next_dy < 0 {
                            dys[total] = -1;
                            total += 1;
                            next_dy = 1;
                        }
                    }
                }
                let end_dy = if y >= p3.y { 1 } else { -1 };
                if next_dy != end_dy {
                    if total > 0 {
                        total -= 1;
                    } else {
                        if (p3.y - y).abs() < (p0.y - y).abs() {
                            xs[total] = p3.x;
                        }
                        dys[total] = next_dy;
                        total += 1;
                    }
                }

                crossings.extend(xs.iter().copied().zip(dys.iter().copied()).take(total));
            }
        }
        crossings
    }

    /// Grows `bound` to cover the edge, including interior extrema.
    pub fn bound(&self, bound: &mut Bound) {
        match self.segment {
            Segment::Line(s) => {
                bound.include(s.from);
                bound.include(s.to);
            }
            Segment::Quadratic(s) => {
                bound.include(s.from);
                bound.include(s.to);
                let bot = (s.ctrl - s.from) - (s.to - s.ctrl);
                if bot.x != 0.0 {
                    let param = (s.ctrl.x - s.from.x) / bot.x;
                    if param > 0.0 && param < 1.0 {
                        bound.include(self.point(param));
                    }
                }
                if bot.y != 0.0 {
                    let param = (s.ctrl.y - s.from.y) / bot.y;
                    if param > 0.0 && param < 1.0 {
                        bound.include(self.point(param));
                    }
                }
            }
            Segment::Cubic(s) => {
                bound.include(s.from);
                bound.include(s.to);
                let a0 = s.ctrl1 - s.from;
                let a1 = (s.ctrl2 - s.ctrl1 - a0) * 2.0;
                let a2 = (s.to - s.from) - (s.ctrl2 - s.ctrl1) * 3.0;
                for roots in [
                    solve_quadratic(a2.x, a1.x, a0.x),
                    solve_quadratic(a2.y, a1.y, a0.y),
                ] {
                    for &param in roots.as_slice() {
                        if param > 0.0 && param < 1.0 {
                            bound.include(self.point(param));
                        }
                    }
                }
            }
        }
    }

    /// Reverses the direction of the edge.
    pub fn reverse(&mut self) {
        match &mut self.segment {
            Segment::Line(s) => std::mem::swap(&mut s.from, &mut s.to),
            Segment::Quadratic(s) => std::mem::swap(&mut s.from, &mut s.to),
            Segment::Cubic(s) => {
                std::mem::swap(&mut s.from, &mut s.to);
                std::mem::swap(&mut s.ctrl1, &mut s.ctrl2);
            }
        }
    }

    /// Moves the start point, keeping the shape near the end point.
    pub fn move_start_point(&mut self, to: Point2) {
        match &mut self.segment {
            Segment::Line(s) => s.from = to,
            Segment::Quadratic(s) => {
                let orig_s_dir = s.from - s.ctrl;
                let orig_ctrl = s.ctrl;
                s.ctrl += (s.to - s.ctrl)
                    * ((s.from - s.ctrl).cross(to - s.from) / (s.from - s.ctrl).cross(s.to - s.ctrl));
                s.from = to;
                if orig_s_dir.dot(s.from - s.ctrl) < 0.0 {
                    s.ctrl = orig_ctrl;
                }
            }
            Segment::Cubic(s) => {
                s.ctrl1 += to - s.from;
                s.from = to;
            }
        }
    }

    /// Moves the end point, keeping the shape near the start point.
    pub fn move_end_point(&mut self, to: Point2) {
        match &mut self.segment {
            Segment::Line(s) => s.to = to,
            Segment::Quadratic(s) => {
                let orig_e_dir = s.to - s.ctrl;
                let orig_ctrl = s.ctrl;
                s.ctrl += (s.from - s.ctrl)
                    * ((s.to - s.ctrl).cross(to - s.to) / (s.to - s.ctrl).cross(s.from - s.ctrl));
                s.to = to;
                if orig_e_dir.dot(s.to - s.ctrl) < 0.0 {
                    s.ctrl = orig_ctrl;
                }
            }
            Segment::Cubic(s) => {
                s.ctrl2 += to - s.to;
                s.to = to;
            }
        }
    }

    /// Splits the edge into the pieces covering `[0, 1/3]`, `[1/3, 2/3]` and `[2/3, 1]`.
    pub fn split_in_thirds(&self) -> [EdgeSegment; 3] {
        let color = self.color;
        let p13 = self.point(1.0 / 3.0);
        let p23 = self.point(2.0 / 3.0);
        match self.segment {
            Segment::Line(s) => [
                Self::line(s.from, p13, color),
                Self::line(p13, p23, color),
                Self::line(p23, s.to, color),
            ],
            Segment::Quadratic(s) => [
                Self::quadratic(s.from, mix_points(s.from, s.ctrl, 1.0 / 3.0), p13, color),
                Self::quadratic(
                    p13,
                    mix_points(
                        mix_points(s.from, s.ctrl, 5.0 / 9.0),
                        mix_points(s.ctrl, s.to, 4.0 / 9.0),
                        0.5,
                    ),
                    p23,
                    color,
                ),
                Self::quadratic(p23, mix_points(s.ctrl, s.to, 2.0 / 3.0), s.to, color),
            ],
            Segment::Cubic(s) => {
                let (p0, p1, p2, p3) = (s.from, s.ctrl1, s.ctrl2, s.to);
                let third = |t: f32| {
                    (
                        mix_points(mix_points(p0, p1, t), mix_points(p1, p2, t), t),
                        mix_points(mix_points(p1, p2, t), mix_points(p2, p3, t), t),
                    )
                };
                let (a13, b13) = third(1.0 / 3.0);
                let (a23, b23) = third(2.0 / 3.0);
                [
                    Self::cubic(
                        p0,
                        if p0 == p1 { p0 } else { mix_points(p0, p1, 1.0 / 3.0) },
                        a13,
                        p13,
                        color,
                    ),
                    Self::cubic(
                        p13,
                        mix_points(a13, b13, 2.0 / 3.0),
                        mix_points(a23, b23, 1.0 / 3.0),
                        p23,
                        color,
                    ),
                    Self::cubic(
                        p23,
                        b23,
                        if p2 == p3 { p3 } else { mix_points(p2, p3, 2.0 / 3.0) },
                        p3,
                        color,
                    ),
                ]
            }
        }
    }

    /// Degree-elevates a quadratic edge into the equivalent cubic. Other
    /// edges are returned unchanged.
    pub fn convert_to_cubic(&self) -> EdgeSegment {
        match self.segment {
            Segment::Quadratic(s) => Self::cubic(
                s.from,
                mix_points(s.from, s.ctrl, 2.0 / 3.0),
                mix_points(s.ctrl, s.to, 1.0 / 3.0),
                s.to,
                self.color,
            ),
            _ => *self,
        }
    }

    /// Nudges the control point next to the start (`end == false`) or end of
    /// a cubic edge so its tangent there is no longer parallel to its
    /// neighbour's. Only cubic edges are affected.
    pub fn deconverge(&mut self, end: bool, amount: f32) {
        let t = if end { 1.0 } else { 0.0 };
        let dir = self.direction(t);
        let normal = dir.orthonormal(true, false);
        let h = (self.direction_change(t) - dir).dot(normal);
        let sign = if h > 0.0 {
            1.0
        } else if h < 0.0 {
            -1.0
        } else {
            0.0
        };
        let offset = normal * (sign * h.abs().sqrt());
        if let Segment::Cubic(s) = &mut self.segment {
            if end {
                s.ctrl2 -= (dir - offset) * amount;
            } else {
                s.ctrl1 += (dir + offset) * amount;
            }
        }
    }
}

/// Sorts at most three curve parameters in ascending order.
fn sort_params(t: &mut ArrayVec<f32, 3>) {
    if t.len() >= 2 {
        if t[0] > t[1] {
            t.swap(0, 1);
        }
        if t.len() >= 3 && t[1] > t[2] {
            t.swap(1, 2);
            if t[0] > t[1] {
                t.swap(0, 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPSILON: f32 = 5e-3;

    fn p(x: f32, y: f32) -> Point2 {
        Point2::new(x, y)
    }

    fn line_element(p0: Point2, p1: Point2) -> EdgeSegment {
        EdgeSegment::line(p0, p1, EdgeColor::WHITE)
    }

    fn check_distance(seg: &EdgeSegment, x: f32, y: f32, distance: f32, dot: f32, param: f32) {
        let (dst, f) = seg.signed_distance(p(x, y));
        assert!(
            (dst.distance - distance).abs() < EPSILON,
            "distance at ({}, {}): {} != {}",
            x,
            y,
            dst.distance,
            distance
        );
        assert!((dst.dot - dot).abs() < EPSILON, "dot at ({}, {}): {} != {}", x, y, dst.dot, dot);
        assert!((f - param).abs() < EPSILON, "param at ({}, {}): {} != {}", x, y, f, param);
    }

    #[test]
    fn test_line_dist_x() {
        let seg = line_element(p(0.0, 0.0), p(2.0, 0.0));
        let (dst, f) = seg.signed_distance(p(1.0, 1.0));
        assert!((dst.distance + 1.0).abs() < 0.0001);
        assert!((f - 0.5).abs() < 0.0001);

        let (dst, f) = seg.signed_distance(p(1.0, -1.0));
        assert!((dst.distance - 1.0).abs() < 0.0001);
        assert!((f - 0.5).abs() < 0.0001);

        let (dst, f) = seg.signed_distance(p(-1.0, 0.0));
        assert!((dst.distance.abs() - 1.0).abs() < 0.0001);
        assert!((f + 0.5).abs() < 0.0001);

        let (dst, f) = seg.signed_distance(p(3.0, 0.0));
        assert!((dst.distance - 1.0).abs() < 0.0001);
        assert!((f - 1.5).abs() < 0.0001);
    }

    #[test]
    fn linear_signed_distance() {
        let seg = line_element(p(0.0, 0.0), p(1.0, 1.0));
        check_distance(&seg, 0.0, 0.0, 0.0, 0.707107, 0.0);
        check_distance(&seg, 1.0, 1.0, 0.0, 0.707107, 1.0);
        check_distance(&seg, 0.5, 0.5, 0.0, 0.0, 0.5);
        check_distance(&seg, 0.5, 10.0, -9.01388, 0.666795, 5.25);
        check_distance(&seg, 0.0, 0.5, -0.353553, 0.0, 0.25);

        let seg = line_element(p(8.0, 5.0), p(-10.0, 9.9));
        check_distance(&seg, 0.0, 0.0, -6.92575, 0.0, 0.343381);
        check_distance(&seg, 1.0, 1.0, -5.6982, 0.0, 0.305738);
        check_distance(&seg, 0.5, 0.5, -6.31197, 0.0, 0.32456);
        check_distance(&seg, 0.5, 10.0, 2.85446, 0.0, 0.45832);
        check_distance(&seg, 0.0, 0.5, -6.4433, 0.0, 0.350421);
    }

    #[test]
    fn quadratic_signed_distance() {
        let seg = EdgeSegment::quadratic(p(0.0, 0.0), p(-1.0, 2.0), p(1.0, 1.0), EdgeColor::WHITE);
        check_distance(&seg, 0.0, 0.0, 0.0, 0.0, 0.0);
        check_distance(&seg, 1.0, 1.0, 0.0, 0.0, 1.0);
        check_distance(&seg, 0.5, 0.5, 0.666667, 0.0, 0.940959);
        check_distance(&seg, 0.5, 10.0, -8.68, 0.0, 0.685411);
        check_distance(&seg, 0.0, 0.5, 0.206287, 0.0, 0.116204);

        let seg = EdgeSegment::quadratic(p(8.0, 5.0), p(3.0, 2.0), p(-10.0, 9.9), EdgeColor::WHITE);
        check_distance(&seg, 0.0, 0.0, -4.82327, 0.0, 0.48796);
        check_distance(&seg, 1.0, 1.0, -3.6148, 0.0, 0.454725);
        check_distance(&seg, 0.5, 0.5, -4.2161, 0.0, 0.471851);
        check_distance(&seg, 0.5, 10.0, 4.86498, 0.0, 0.616546);
        check_distance(&seg, 0.0, 0.5, -4.33974, 0.0, 0.49357);
    }

    #[test]
    fn directions() {
        let seg = line_element(p(8.0, 5.0), p(-10.0, 9.9));
        for t in [0.0, 0.25, 0.5, 1.0] {
            assert_eq!(seg.direction(t), Vector2::new(-18.0, 4.9));
        }

        let seg = EdgeSegment::quadratic(p(0.0, 0.0), p(-1.0, 2.0), p(1.0, 1.0), EdgeColor::WHITE);
        let expected = [
            (0.0, -1.0, 2.0),
            (0.25, -0.25, 1.25),
            (0.5, 0.5, 0.5),
            (0.75, 1.25, -0.25),
            (1.0, 2.0, -1.0),
        ];
        for (t, x, y) in expected {
            let d = seg.direction(t);
            assert!((d.x - x).abs() < EPSILON && (d.y - y).abs() < EPSILON, "{:?}", d);
        }
    }

    #[test]
    fn degenerate_controls_are_repaired() {
        let seg = EdgeSegment::quadratic(p(0.0, 0.0), p(0.0, 0.0), p(2.0, 2.0), EdgeColor::WHITE);
        match seg.segment {
            Segment::Quadratic(s) => assert_eq!(s.ctrl, p(1.0, 1.0)),
            _ => unreachable!(),
        }

        let seg = EdgeSegment::cubic(p(0.0, 0.0), p(0.0, 0.0), p(3.0, 0.0), p(3.0, 0.0), EdgeColor::WHITE);
        match seg.segment {
            Segment::Cubic(s) => {
                assert!((s.ctrl1 - p(1.0, 0.0)).length() < 1e-6);
                assert!((s.ctrl2 - p(2.0, 0.0)).length() < 1e-6);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn cubic_zero_tangent_falls_back_to_chord() {
        let seg = EdgeSegment::cubic(p(0.0, 0.0), p(0.0, 0.0), p(1.0, 1.0), p(2.0, 0.0), EdgeColor::WHITE);
        assert_eq!(seg.direction(0.0), Vector2::new(1.0, 1.0));
    }

    #[test]
    fn lengths() {
        let seg = line_element(p(0.0, 0.0), p(3.0, 4.0));
        assert_eq!(seg.length().unwrap(), 5.0);

        let seg = EdgeSegment::quadratic(p(0.0, 0.0), p(1.0, 1.0), p(2.0, 0.0), EdgeColor::WHITE);
        assert!((seg.length().unwrap() - 2.2956).abs() < 1e-3);

        let straight = EdgeSegment::quadratic(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), EdgeColor::WHITE);
        assert!((straight.length().unwrap() - 2.0).abs() < 1e-6);

        let cubic = EdgeSegment::cubic(p(0.0, 0.0), p(1.0, 1.0), p(2.0, 1.0), p(3.0, 0.0), EdgeColor::WHITE);
        assert!(matches!(cubic.length(), Err(Error::UnsupportedOperation(_))));
    }

    #[test]
    fn cubic_distance_to_circle_arc() {
        // Quarter circle of radius 1 around the origin, counter-clockwise
        let k = 0.552_284_8;
        let seg = EdgeSegment::cubic(p(1.0, 0.0), p(1.0, k), p(k, 1.0), p(0.0, 1.0), EdgeColor::WHITE);
        let (d, param) = seg.signed_distance(p(0.0, 0.0));
        assert!((d.distance.abs() - 1.0).abs() < 1e-3);
        assert!((0.0..=1.0).contains(&param));

        let outside = 2.0 * std::f32::consts::FRAC_1_SQRT_2;
        let (d_out, _) = seg.signed_distance(p(outside, outside));
        assert!((d_out.distance.abs() - 1.0).abs() < 1e-3);
        assert!(d.distance.signum() != d_out.distance.signum());
    }

    #[test]
    fn pseudo_distance_beyond_endpoint() {
        let seg = line_element(p(0.0, 0.0), p(1.0, 0.0));
        let origin = p(2.0, 1.0);
        let (mut d, param) = seg.signed_distance(origin);
        assert!(param > 1.0);
        assert!((d.distance.abs() - 2.0f32.sqrt()).abs() < 1e-5);
        seg.distance_to_pseudo_distance(&mut d, origin, param);
        assert!((d.distance + 1.0).abs() < 1e-6);
        assert_eq!(d.dot, 0.0);
    }

    #[test]
    fn line_scanline() {
        let up = line_element(p(0.0, 0.0), p(2.0, 2.0));
        assert_eq!(up.scanline_intersections(1.0).as_slice(), &[(1.0, 1)]);
        let mut down = up;
        down.reverse();
        assert_eq!(down.scanline_intersections(1.0).as_slice(), &[(1.0, -1)]);
        assert!(up.scanline_intersections(3.0).is_empty());
        // Half-open: the upper endpoint is not counted
        assert!(up.scanline_intersections(2.0).is_empty());
    }

    #[test]
    fn quadratic_scanline_through_arch() {
        let arch = EdgeSegment::quadratic(p(0.0, 0.0), p(1.0, 2.0), p(2.0, 0.0), EdgeColor::WHITE);
        let crossings = arch.scanline_intersections(0.5);
        assert_eq!(crossings.len(), 2);
        assert_eq!(crossings[0].1, 1);
        assert_eq!(crossings[1].1, -1);
        assert!(crossings[0].0 < crossings[1].0);
        assert!(arch.scanline_intersections(1.5).is_empty());
    }

    #[test]
    fn cubic_scanline_crossing() {
        let s = EdgeSegment::cubic(p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0), p(3.0, 3.0), EdgeColor::WHITE);
        let crossings = s.scanline_intersections(1.5);
        assert_eq!(crossings.len(), 1);
        assert!((crossings[0].0 - 1.5).abs() < 1e-3);
        assert_eq!(crossings[0].1, 1);
    }

    #[test]
    fn bounds_include_extrema() {
        let arch = EdgeSegment::quadratic(p(0.0, 0.0), p(1.0, 2.0), p(2.0, 0.0), EdgeColor::WHITE);
        let mut bound = Bound::default();
        arch.bound(&mut bound);
        assert_eq!(bound.left, 0.0);
        assert_eq!(bound.right, 2.0);
        assert!((bound.top - 1.0).abs() < 1e-6);

        let s = EdgeSegment::cubic(p(0.0, 0.0), p(0.0, 4.0), p(2.0, 4.0), p(2.0, 0.0), EdgeColor::WHITE);
        let mut bound = Bound::default();
        s.bound(&mut bound);
        assert!((bound.top - 3.0).abs() < 1e-4);
        assert_eq!(bound.bottom, 0.0);
    }

    #[test]
    fn reverse_and_move_points() {
        let mut s = EdgeSegment::cubic(p(0.0, 0.0), p(1.0, 1.0), p(2.0, 1.0), p(3.0, 0.0), EdgeColor::WHITE);
        s.reverse();
        assert_eq!(s.start(), p(3.0, 0.0));
        assert_eq!(s.end(), p(0.0, 0.0));
        s.move_start_point(p(4.0, 0.0));
        match s.segment {
            Segment::Cubic(c) => assert_eq!(c.ctrl1, p(3.0, 1.0)),
            _ => unreachable!(),
        }

        let mut q = EdgeSegment::quadratic(p(0.0, 0.0), p(1.0, 1.0), p(2.0, 0.0), EdgeColor::WHITE);
        q.move_end_point(p(2.0, 0.5));
        assert_eq!(q.end(), p(2.0, 0.5));
        // The start tangent is preserved
        let d = q.direction(0.0).normalize_or(false);
        assert!((d.x - d.y).abs() < 1e-5);

        let mut q = EdgeSegment::quadratic(p(0.0, 0.0), p(1.0, 1.0), p(2.0, 0.0), EdgeColor::WHITE);
        q.move_start_point(p(0.0, 0.5));
        assert_eq!(q.start(), p(0.0, 0.5));
        // The end tangent is preserved
        let d = q.direction(1.0).normalize_or(false);
        assert!((d.x + d.y).abs() < 1e-5);
    }

    #[test]
    fn thirds_cover_the_curve() {
        let edges = [
            line_element(p(0.0, 0.0), p(3.0, 3.0)),
            EdgeSegment::quadratic(p(0.0, 0.0), p(1.0, 2.0), p(2.0, 0.0), EdgeColor::RED),
            EdgeSegment::cubic(p(0.0, 0.0), p(0.0, 4.0), p(2.0, 4.0), p(2.0, 0.0), EdgeColor::BLUE),
        ];
        for edge in edges {
            let parts = edge.split_in_thirds();
            assert_eq!(parts[0].start(), edge.start());
            assert_eq!(parts[2].end(), edge.end());
            for (i, part) in parts.iter().enumerate() {
                assert_eq!(part.color, edge.color);
                for k in 0..=4 {
                    let t = k as f32 / 4.0;
                    let expected = edge.point((i as f32 + t) / 3.0);
                    assert!((part.point(t) - expected).length() < 1e-4);
                }
            }
        }
    }

    #[test]
    fn quadratic_to_cubic_is_exact() {
        let q = EdgeSegment::quadratic(p(0.0, 0.0), p(1.0, 2.0), p(2.0, 0.0), EdgeColor::GREEN);
        let c = q.convert_to_cubic();
        assert!(matches!(c.segment, Segment::Cubic(_)));
        assert_eq!(c.color, EdgeColor::GREEN);
        for k in 0..=8 {
            let t = k as f32 / 8.0;
            assert!((q.point(t) - c.point(t)).length() < 1e-5);
        }
    }

    #[test]
    fn deconverge_moves_only_the_requested_control() {
        let mut c = EdgeSegment::cubic(p(0.0, 0.0), p(1.0, 1.0), p(2.0, 1.0), p(3.0, 0.0), EdgeColor::WHITE);
        let before = c;
        c.deconverge(false, 0.1);
        match (before.segment, c.segment) {
            (Segment::Cubic(a), Segment::Cubic(b)) => {
                assert_ne!(a.ctrl1, b.ctrl1);
                assert_eq!(a.ctrl2, b.ctrl2);
                assert_eq!(a.from, b.from);
            }
            _ => unreachable!(),
        }
    }

    fn arb_point() -> impl Strategy<Value = Point2> {
        (-10.0f32..10.0, -10.0f32..10.0).prop_map(|(x, y)| Point2::new(x, y))
    }

    fn arb_edge() -> impl Strategy<Value = EdgeSegment> {
        prop_oneof![
            (arb_point(), arb_point()).prop_map(|(a, b)| EdgeSegment::line(a, b, EdgeColor::WHITE)),
            (arb_point(), arb_point(), arb_point())
                .prop_map(|(a, b, c)| EdgeSegment::quadratic(a, b, c, EdgeColor::WHITE)),
            (arb_point(), arb_point(), arb_point(), arb_point())
                .prop_map(|(a, b, c, d)| EdgeSegment::cubic(a, b, c, d, EdgeColor::WHITE)),
        ]
    }

    proptest! {
        #[test]
        fn points_on_a_line_have_zero_distance(a in arb_point(), b in arb_point(), t in 0.0f32..=1.0) {
            prop_assume!((b - a).length() > 1e-2);
            let edge = EdgeSegment::line(a, b, EdgeColor::WHITE);
            let (d, _) = edge.signed_distance(edge.point(t));
            prop_assert!(d.distance.abs() < 1e-3, "distance {}", d.distance);
        }

        #[test]
        fn endpoints_have_zero_distance(edge in arb_edge()) {
            for t in [0.0, 1.0] {
                let (d, _) = edge.signed_distance(edge.point(t));
                prop_assert!(d.distance.abs() < 1e-3, "distance {} at {}", d.distance, t);
            }
        }

        #[test]
        fn cubic_search_finds_points_at_its_starts(
            a in arb_point(),
            b in arb_point(),
            c in arb_point(),
            d in arb_point(),
            i in 1usize..CUBIC_SEARCH_STARTS,
        ) {
            let edge = EdgeSegment::cubic(a, b, c, d, EdgeColor::WHITE);
            let t = i as f32 / CUBIC_SEARCH_STARTS as f32;
            prop_assume!(edge.direction(t).length() > 0.5);
            let (dist, param) = edge.signed_distance(edge.point(t));
            prop_assert!(dist.distance.abs() < 1e-2, "distance {}", dist.distance);
            prop_assert!((0.0..=1.0).contains(&param));
        }

        #[test]
        fn direction_matches_finite_differences(edge in arb_edge(), t in 0.05f32..0.95) {
            let h = 1e-3;
            let numeric = (edge.point(t + h) - edge.point(t - h)) / (2.0 * h);
            let analytic = match edge.segment {
                Segment::Line(_) => edge.direction(t),
                Segment::Quadratic(_) => edge.direction(t) * 2.0,
                Segment::Cubic(_) => edge.direction(t) * 3.0,
            };
            let scale = 1.0 + analytic.length();
            prop_assert!((numeric - analytic).length() < 2e-2 * scale, "{:?} vs {:?}", numeric, analytic);
        }
    }
}
