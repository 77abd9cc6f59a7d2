//! Scalar and vector helpers shared by the distance computations.

use std::sync::OnceLock;

use lyon_path::math::{Point, Vector};

/// A displacement or direction in shape space.
pub type Vector2 = Vector;
/// A position in shape space.
pub type Point2 = Point;

pub const PI_F: f32 = std::f32::consts::PI;
pub const HALF_PI_F: f32 = std::f32::consts::FRAC_PI_2;
pub const ACOS_TABLE_SIZE: usize = 1024;

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Linear interpolation between two points.
#[inline]
pub fn mix_points(a: Point2, b: Point2, t: f32) -> Point2 {
    Point2::new(mix(a.x, b.x, t), mix(a.y, b.y, t))
}

/// Linear interpolation between two vectors.
#[inline]
pub fn mix_vectors(a: Vector2, b: Vector2, t: f32) -> Vector2 {
    Vector2::new(mix(a.x, b.x, t), mix(a.y, b.y, t))
}

/// -1 if negative, 1 otherwise (zero counts as positive).
#[inline]
pub fn non_zero_sign(v: f32) -> f32 {
    if v < 0.0 {
        -1.0
    } else {
        1.0
    }
}

pub fn median(a: f32, b: f32, c: f32) -> f32 {
    let min = |a: f32, b: f32| a.min(b);
    let max = |a: f32, b: f32| a.max(b);
    max(min(a, b), min(max(a, b), c))
}

/// The classic bit-twiddling approximation of `1 / sqrt(x)` with one Newton step.
pub fn fast_inv_sqrt(x: f32) -> f32 {
    let xhalf = 0.5 * x;
    let i = 0x5f37_59df_i32.wrapping_sub((x.to_bits() as i32) >> 1);
    let y = f32::from_bits(i as u32);
    y * (1.5 - xhalf * y * y)
}

fn acos_table() -> &'static [f32; ACOS_TABLE_SIZE + 1] {
    static TABLE: OnceLock<[f32; ACOS_TABLE_SIZE + 1]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [0.0f32; ACOS_TABLE_SIZE + 1];
        for (i, v) in table.iter_mut().enumerate() {
            *v = (i as f32 / ACOS_TABLE_SIZE as f32).min(1.0).acos();
        }
        table
    })
}

/// Table driven approximation of `acos(x)`.
///
/// Returns NaN when `x` is NaN or outside of `[-1, 1]`.
pub fn fast_acos(x: f32) -> f32 {
    if x.is_nan() || !(-1.0..=1.0).contains(&x) {
        return f32::NAN;
    }
    if x == 0.0 {
        return HALF_PI_F;
    }
    if x == 1.0 {
        return 0.0;
    }
    if x == -1.0 {
        return PI_F;
    }

    let table = acos_table();
    let f = x.abs() * ACOS_TABLE_SIZE as f32;
    let index = f as usize;
    let delta = f - index as f32;
    let v = mix(table[index], table[index + 1], delta);
    if x > 0.0 {
        v
    } else {
        PI_F - v
    }
}

/// Extra operations on [`Vector2`] that euclid doesn't provide with the
/// semantics the distance code needs.
pub trait VectorExt {
    /// Unit vector with the same direction. A zero vector becomes `(0, 1)`,
    /// or stays zero when `allow_zero` is set.
    fn normalize_or(self, allow_zero: bool) -> Vector2;
    /// Vector of the same length rotated by +90° (`polarity`) or -90°.
    fn orthogonal(self, polarity: bool) -> Vector2;
    /// Unit vector orthogonal to this one.
    fn orthonormal(self, polarity: bool, allow_zero: bool) -> Vector2;
    fn is_zero(self) -> bool;
}

impl VectorExt for Vector2 {
    #[inline]
    fn normalize_or(self, allow_zero: bool) -> Vector2 {
        if self.is_zero() {
            return Vector2::new(0.0, if allow_zero { 0.0 } else { 1.0 });
        }
        let inv_len = 1.0 / self.length();
        Vector2::new(self.x * inv_len, self.y * inv_len)
    }

    #[inline]
    fn orthogonal(self, polarity: bool) -> Vector2 {
        if polarity {
            Vector2::new(-self.y, self.x)
        } else {
            Vector2::new(self.y, -self.x)
        }
    }

    fn orthonormal(self, polarity: bool, allow_zero: bool) -> Vector2 {
        if self.is_zero() {
            let y = if allow_zero { 0.0 } else { 1.0 };
            return Vector2::new(0.0, if polarity { y } else { -y });
        }
        let inv_len = 1.0 / self.length();
        if polarity {
            Vector2::new(-self.y * inv_len, self.x * inv_len)
        } else {
            Vector2::new(self.y * inv_len, -self.x * inv_len)
        }
    }

    #[inline]
    fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 51e-3;

    #[test]
    fn sign_of_zero_is_positive() {
        assert_eq!(non_zero_sign(-114514.0), -1.0);
        assert_eq!(non_zero_sign(-0.1), -1.0);
        assert_eq!(non_zero_sign(0.0), 1.0);
        assert_eq!(non_zero_sign(0.1), 1.0);
        assert_eq!(non_zero_sign(114514.0), 1.0);
    }

    #[test]
    fn median_of_three() {
        assert_eq!(median(0.0, 0.0, 1.0), 0.0);
        assert_eq!(median(0.0, 1.0, 0.0), 0.0);
        assert_eq!(median(0.0, 1.0, 1.0), 1.0);
        assert_eq!(median(1.0, 0.0, 1.0), 1.0);
        assert_eq!(median(3.0, -2.0, 7.0), 3.0);
    }

    #[test]
    fn mix_interpolates() {
        assert_eq!(mix(0.0, 1.0, 0.5), 0.5);
        assert_eq!(mix(10.0, -10.0, 0.5), 0.0);
        assert_eq!(mix(10.0, -10.0, 0.75), -5.0);
        let p = mix_points(Point2::new(0.0, 0.0), Point2::new(2.0, 4.0), 0.25);
        assert_eq!(p, Point2::new(0.5, 1.0));
    }

    #[test]
    fn fast_acos_tracks_acos() {
        for x in [
            -1.0f32, -0.9995117, -0.99, -0.75, -0.5, -0.25, -0.01, 0.0, 0.01, 0.25, 0.5, 0.75,
            0.99, 0.9995117, 1.0,
        ] {
            assert!((fast_acos(x) - x.acos()).abs() < EPSILON, "acos({})", x);
        }
        assert!(fast_acos(1.01).is_nan());
        assert!(fast_acos(-1.01).is_nan());
        assert!(fast_acos(f32::NAN).is_nan());
    }

    #[test]
    fn fast_inv_sqrt_is_close() {
        for x in [0.25f32, 1.0, 2.0, 100.0, 12345.0] {
            let expected = 1.0 / x.sqrt();
            assert!((fast_inv_sqrt(x) - expected).abs() / expected < 2e-3);
        }
    }

    #[test]
    fn zero_vector_normalization() {
        assert_eq!(Vector2::zero().normalize_or(false), Vector2::new(0.0, 1.0));
        assert_eq!(Vector2::zero().normalize_or(true), Vector2::zero());
        let n = Vector2::new(3.0, 4.0).normalize_or(false);
        assert!((n.x - 0.6).abs() < 1e-6 && (n.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn orthonormal_directions() {
        let v = Vector2::new(2.0, 0.0);
        assert_eq!(v.orthonormal(true, false), Vector2::new(0.0, 1.0));
        assert_eq!(v.orthonormal(false, false), Vector2::new(0.0, -1.0));
        assert_eq!(v.orthogonal(true), Vector2::new(0.0, 2.0));
        assert_eq!(Vector2::zero().orthonormal(false, false), Vector2::new(0.0, -1.0));
    }
}
