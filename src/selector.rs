//! Edge selectors: accumulate the edges of a contour (or a whole shape)
//! seen from one point and report the distance value of the closest.
//!
//! Selectors are reused from one query point to the next together with a
//! per-edge cache. Moving the point by `d` can change any distance by at
//! most `d`, so an edge whose cached distance is too far from the current
//! best to catch up is skipped without being evaluated.

use std::fmt::Debug;

use crate::color::EdgeColor;
use crate::math::{median, non_zero_sign, Point2, Vector2, VectorExt};
use crate::segment::EdgeSegment;
use crate::utils::SignedDistance;

/// Slack applied to cached distances when the query point moves.
pub const DISTANCE_DELTA_FACTOR: f32 = 1.001;

/// What a selector reports for one point.
pub trait DistanceValue: Copy + Debug {
    /// Number of bitmap channels the value fills.
    const CHANNELS: usize;

    /// The single signed distance this value stands for.
    fn resolve(&self) -> f32;
    /// Stores the value in the samples of one pixel.
    fn write_to(&self, pixel: &mut [f32]);
}

impl DistanceValue for f32 {
    const CHANNELS: usize = 1;

    #[inline]
    fn resolve(&self) -> f32 {
        *self
    }

    fn write_to(&self, pixel: &mut [f32]) {
        pixel[0] = *self;
    }
}

/// One pseudo-distance per color channel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MultiDistance {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl DistanceValue for MultiDistance {
    const CHANNELS: usize = 3;

    #[inline]
    fn resolve(&self) -> f32 {
        median(self.r, self.g, self.b)
    }

    fn write_to(&self, pixel: &mut [f32]) {
        pixel.copy_from_slice(&[self.r, self.g, self.b]);
    }
}

/// Channel pseudo-distances plus the true distance in `a`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MultiAndTrueDistance {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl DistanceValue for MultiAndTrueDistance {
    const CHANNELS: usize = 4;

    #[inline]
    fn resolve(&self) -> f32 {
        median(self.r, self.g, self.b)
    }

    fn write_to(&self, pixel: &mut [f32]) {
        pixel.copy_from_slice(&[self.r, self.g, self.b, self.a]);
    }
}

/// Picks the relevant edge for a distance metric.
pub trait EdgeSelector: Default {
    type Distance: DistanceValue;
    /// Per-edge state kept between queries.
    type Cache: Default + Clone;

    /// Moves the selector to a new query point, keeping what it knows as
    /// upper bounds.
    fn reset(&mut self, p: Point2);
    fn add_edge(
        &mut self,
        cache: &mut Self::Cache,
        prev_edge: &EdgeSegment,
        edge: &EdgeSegment,
        next_edge: &EdgeSegment,
    );
    fn merge(&mut self, other: &Self);
    fn distance(&self) -> Self::Distance;
}

/// Selects the nearest edge by its true distance.
#[derive(Clone, Debug)]
pub struct TrueDistanceSelector {
    p: Point2,
    min_distance: SignedDistance,
}

impl Default for TrueDistanceSelector {
    fn default() -> Self {
        Self {
            p: Point2::origin(),
            min_distance: SignedDistance::default(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TrueDistanceCache {
    point: Point2,
    abs_distance: f32,
}

impl Default for TrueDistanceCache {
    fn default() -> Self {
        Self {
            point: Point2::origin(),
            abs_distance: 0.0,
        }
    }
}

impl EdgeSelector for TrueDistanceSelector {
    type Distance = f32;
    type Cache = TrueDistanceCache;

    fn reset(&mut self, p: Point2) {
        let delta = DISTANCE_DELTA_FACTOR * (p - self.p).length();
        self.min_distance.distance += non_zero_sign(self.min_distance.distance) * delta;
        self.p = p;
    }

    fn add_edge(
        &mut self,
        cache: &mut TrueDistanceCache,
        _prev_edge: &EdgeSegment,
        edge: &EdgeSegment,
        _next_edge: &EdgeSegment,
    ) {
        let delta = DISTANCE_DELTA_FACTOR * (self.p - cache.point).length();
        if cache.abs_distance - delta <= self.min_distance.distance.abs() {
            let (distance, _) = edge.signed_distance(self.p);
            if distance < self.min_distance {
                self.min_distance = distance;
            }
            cache.point = self.p;
            cache.abs_distance = distance.distance.abs();
        }
    }

    fn merge(&mut self, other: &Self) {
        if other.min_distance < self.min_distance {
            self.min_distance = other.min_distance;
        }
    }

    fn distance(&self) -> f32 {
        self.min_distance.distance
    }
}

/// Per-edge state of the pseudo-distance selectors.
#[derive(Clone, Copy, Debug)]
pub struct PseudoDistanceCache {
    point: Point2,
    abs_distance: f32,
    /// How far beyond the start of the edge the point lies, measured along
    /// the bisector with the previous edge.
    a_domain_distance: f32,
    /// Same as `a_domain_distance`, past the end of the edge.
    b_domain_distance: f32,
    a_pseudo_distance: f32,
    b_pseudo_distance: f32,
}

impl Default for PseudoDistanceCache {
    fn default() -> Self {
        Self {
            point: Point2::origin(),
            abs_distance: 0.0,
            a_domain_distance: 0.0,
            b_domain_distance: 0.0,
            a_pseudo_distance: 0.0,
            b_pseudo_distance: 0.0,
        }
    }
}

/// Distance to the line through an endpoint along `edge_dir`, when the
/// point lies ahead of it and the line is closer than `distance`.
fn pseudo_distance(distance: &mut f32, ep: Vector2, edge_dir: Vector2) -> bool {
    let ts = ep.dot(edge_dir);
    if ts > 0.0 {
        let pseudo_distance = ep.cross(edge_dir);
        if pseudo_distance.abs() < distance.abs() {
            *distance = pseudo_distance;
            return true;
        }
    }
    false
}

/// Refreshes the endpoint domains of `edge` in `cache`, reporting every
/// pseudo-distance that beats the true distance to `add_pseudo_distance`.
fn update_domains(
    cache: &mut PseudoDistanceCache,
    p: Point2,
    prev_edge: &EdgeSegment,
    edge: &EdgeSegment,
    next_edge: &EdgeSegment,
    distance: f32,
    mut add_pseudo_distance: impl FnMut(f32),
) {
    let ap = p - edge.point(0.0);
    let bp = p - edge.point(1.0);
    let a_dir = edge.direction(0.0).normalize_or(true);
    let b_dir = edge.direction(1.0).normalize_or(true);
    let prev_dir = prev_edge.direction(1.0).normalize_or(true);
    let next_dir = next_edge.direction(0.0).normalize_or(true);
    let add = ap.dot((prev_dir + a_dir).normalize_or(true));
    let bdd = -bp.dot((b_dir + next_dir).normalize_or(true));

    if add > 0.0 {
        let mut pd = distance;
        if pseudo_distance(&mut pd, ap, -a_dir) {
            pd = -pd;
            add_pseudo_distance(pd);
        }
        cache.a_pseudo_distance = pd;
    }
    if bdd > 0.0 {
        let mut pd = distance;
        if pseudo_distance(&mut pd, bp, b_dir) {
            add_pseudo_distance(pd);
        }
        cache.b_pseudo_distance = pd;
    }
    cache.a_domain_distance = add;
    cache.b_domain_distance = bdd;
}

/// Closest true distance and closest pseudo-distances on either side,
/// shared by the pseudo and multi-channel selectors.
#[derive(Clone, Copy, Debug)]
struct PseudoDistanceState {
    min_true_distance: SignedDistance,
    min_negative_pseudo_distance: f32,
    min_positive_pseudo_distance: f32,
    near_edge: Option<EdgeSegment>,
    near_edge_param: f32,
}

impl Default for PseudoDistanceState {
    fn default() -> Self {
        let min_true_distance = SignedDistance::default();
        Self {
            min_true_distance,
            min_negative_pseudo_distance: -min_true_distance.distance.abs(),
            min_positive_pseudo_distance: min_true_distance.distance.abs(),
            near_edge: None,
            near_edge_param: 0.0,
        }
    }
}

impl PseudoDistanceState {
    fn reset(&mut self, delta: f32) {
        self.min_true_distance.distance += non_zero_sign(self.min_true_distance.distance) * delta;
        self.min_negative_pseudo_distance = -self.min_true_distance.distance.abs();
        self.min_positive_pseudo_distance = self.min_true_distance.distance.abs();
        self.near_edge = None;
        self.near_edge_param = 0.0;
    }

    /// Whether the edge behind `cache` could still beat the current bests at `p`.
    fn is_edge_relevant(&self, cache: &PseudoDistanceCache, p: Point2) -> bool {
        let delta = DISTANCE_DELTA_FACTOR * (p - cache.point).length();
        let side_relevant = |domain: f32, pseudo: f32| {
            domain > 0.0
                && if pseudo < 0.0 {
                    pseudo + delta >= self.min_negative_pseudo_distance
                } else {
                    pseudo - delta <= self.min_positive_pseudo_distance
                }
        };
        cache.abs_distance - delta <= self.min_true_distance.distance.abs()
            || cache.a_domain_distance.abs() < delta
            || cache.b_domain_distance.abs() < delta
            || side_relevant(cache.a_domain_distance, cache.a_pseudo_distance)
            || side_relevant(cache.b_domain_distance, cache.b_pseudo_distance)
    }

    fn add_edge_true_distance(&mut self, edge: &EdgeSegment, distance: SignedDistance, param: f32) {
        if distance < self.min_true_distance {
            self.min_true_distance = distance;
            self.near_edge = Some(*edge);
            self.near_edge_param = param;
        }
    }

    fn add_edge_pseudo_distance(&mut self, distance: f32) {
        if distance <= 0.0 && distance > self.min_negative_pseudo_distance {
            self.min_negative_pseudo_distance = distance;
        }
        if distance >= 0.0 && distance < self.min_positive_pseudo_distance {
            self.min_positive_pseudo_distance = distance;
        }
    }

    fn merge(&mut self, other: &Self) {
        if other.min_true_distance < self.min_true_distance {
            self.min_true_distance = other.min_true_distance;
            self.near_edge = other.near_edge;
            self.near_edge_param = other.near_edge_param;
        }
        if other.min_negative_pseudo_distance > self.min_negative_pseudo_distance {
            self.min_negative_pseudo_distance = other.min_negative_pseudo_distance;
        }
        if other.min_positive_pseudo_distance < self.min_positive_pseudo_distance {
            self.min_positive_pseudo_distance = other.min_positive_pseudo_distance;
        }
    }

    fn compute_distance(&self, p: Point2) -> f32 {
        let mut min_distance = if self.min_true_distance.distance < 0.0 {
            self.min_negative_pseudo_distance
        } else {
            self.min_positive_pseudo_distance
        };
        if let Some(near_edge) = &self.near_edge {
            let mut distance = self.min_true_distance;
            near_edge.distance_to_pseudo_distance(&mut distance, p, self.near_edge_param);
            if distance.distance.abs() < min_distance.abs() {
                min_distance = distance.distance;
            }
        }
        min_distance
    }
}

/// Selects the nearest edge by its pseudo-distance.
#[derive(Clone, Debug)]
pub struct PseudoDistanceSelector {
    p: Point2,
    state: PseudoDistanceState,
}

impl Default for PseudoDistanceSelector {
    fn default() -> Self {
        Self {
            p: Point2::origin(),
            state: PseudoDistanceState::default(),
        }
    }
}

impl EdgeSelector for PseudoDistanceSelector {
    type Distance = f32;
    type Cache = PseudoDistanceCache;

    fn reset(&mut self, p: Point2) {
        let delta = DISTANCE_DELTA_FACTOR * (p - self.p).length();
        self.state.reset(delta);
        self.p = p;
    }

    fn add_edge(
        &mut self,
        cache: &mut PseudoDistanceCache,
        prev_edge: &EdgeSegment,
        edge: &EdgeSegment,
        next_edge: &EdgeSegment,
    ) {
        if !self.state.is_edge_relevant(cache, self.p) {
            return;
        }

        let (distance, param) = edge.signed_distance(self.p);
        self.state.add_edge_true_distance(edge, distance, param);
        cache.point = self.p;
        cache.abs_distance = distance.distance.abs();

        let state = &mut self.state;
        update_domains(cache, self.p, prev_edge, edge, next_edge, distance.distance, |pd| {
            state.add_edge_pseudo_distance(pd)
        });
    }

    fn merge(&mut self, other: &Self) {
        self.state.merge(&other.state);
    }

    fn distance(&self) -> f32 {
        self.state.compute_distance(self.p)
    }
}

/// Selects the nearest edge per color channel, by pseudo-distance.
#[derive(Clone, Debug)]
pub struct MultiDistanceSelector {
    p: Point2,
    channels: [PseudoDistanceState; 3],
}

impl Default for MultiDistanceSelector {
    fn default() -> Self {
        Self {
            p: Point2::origin(),
            channels: [PseudoDistanceState::default(); 3],
        }
    }
}

impl MultiDistanceSelector {
    /// The closest true distance over all channels.
    pub fn true_distance(&self) -> SignedDistance {
        let [r, g, b] = &self.channels;
        let mut distance = r.min_true_distance;
        if g.min_true_distance < distance {
            distance = g.min_true_distance;
        }
        if b.min_true_distance < distance {
            distance = b.min_true_distance;
        }
        distance
    }

    fn channel_states(&mut self, color: EdgeColor) -> impl Iterator<Item = &mut PseudoDistanceState> {
        self.channels
            .iter_mut()
            .enumerate()
            .filter(move |(i, _)| color.has_channel(*i))
            .map(|(_, state)| state)
    }
}

impl EdgeSelector for MultiDistanceSelector {
    type Distance = MultiDistance;
    type Cache = PseudoDistanceCache;

    fn reset(&mut self, p: Point2) {
        let delta = DISTANCE_DELTA_FACTOR * (p - self.p).length();
        for channel in &mut self.channels {
            channel.reset(delta);
        }
        self.p = p;
    }

    fn add_edge(
        &mut self,
        cache: &mut PseudoDistanceCache,
        prev_edge: &EdgeSegment,
        edge: &EdgeSegment,
        next_edge: &EdgeSegment,
    ) {
        let p = self.p;
        let relevant = self
            .channels
            .iter()
            .enumerate()
            .any(|(i, state)| edge.color.has_channel(i) && state.is_edge_relevant(cache, p));
        if !relevant {
            return;
        }

        let (distance, param) = edge.signed_distance(p);
        for state in self.channel_states(edge.color) {
            state.add_edge_true_distance(edge, distance, param);
        }
        cache.point = p;
        cache.abs_distance = distance.distance.abs();

        update_domains(cache, p, prev_edge, edge, next_edge, distance.distance, |pd| {
            for state in self.channel_states(edge.color) {
                state.add_edge_pseudo_distance(pd);
            }
        });
    }

    fn merge(&mut self, other: &Self) {
        for (channel, other) in self.channels.iter_mut().zip(&other.channels) {
            channel.merge(other);
        }
    }

    fn distance(&self) -> MultiDistance {
        let [r, g, b] = &self.channels;
        MultiDistance {
            r: r.compute_distance(self.p),
            g: g.compute_distance(self.p),
            b: b.compute_distance(self.p),
        }
    }
}

/// [`MultiDistanceSelector`] that also reports the true distance.
#[derive(Clone, Debug, Default)]
pub struct MultiAndTrueDistanceSelector {
    multi: MultiDistanceSelector,
}

impl EdgeSelector for MultiAndTrueDistanceSelector {
    type Distance = MultiAndTrueDistance;
    type Cache = PseudoDistanceCache;

    fn reset(&mut self, p: Point2) {
        self.multi.reset(p);
    }

    fn add_edge(
        &mut self,
        cache: &mut PseudoDistanceCache,
        prev_edge: &EdgeSegment,
        edge: &EdgeSegment,
        next_edge: &EdgeSegment,
    ) {
        self.multi.add_edge(cache, prev_edge, edge, next_edge);
    }

    fn merge(&mut self, other: &Self) {
        self.multi.merge(&other.multi);
    }

    fn distance(&self) -> MultiAndTrueDistance {
        let MultiDistance { r, g, b } = self.multi.distance();
        MultiAndTrueDistance {
            r,
            g,
            b,
            a: self.multi.true_distance().distance,
        }
    }
}
