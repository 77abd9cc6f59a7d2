//! Real roots of quadratic and cubic polynomials.

use arrayvec::ArrayVec;

use crate::math::{fast_acos, fast_inv_sqrt, PI_F};

/// The real solutions of a polynomial equation.
#[derive(Clone, Debug, PartialEq)]
pub enum Roots {
    /// The polynomial is identically zero: every x is a solution.
    Infinite,
    /// Zero or more distinct real roots, in no particular order.
    Finite(ArrayVec<f32, 3>),
}

impl Roots {
    fn none() -> Self {
        Roots::Finite(ArrayVec::new())
    }

    fn from_slice(roots: &[f32]) -> Self {
        Roots::Finite(roots.iter().copied().collect())
    }

    /// Number of roots, with -1 standing for [`Roots::Infinite`].
    pub fn count(&self) -> i32 {
        match self {
            Roots::Infinite => -1,
            Roots::Finite(r) => r.len() as i32,
        }
    }

    /// The roots as a slice. Empty for [`Roots::Infinite`].
    pub fn as_slice(&self) -> &[f32] {
        match self {
            Roots::Infinite => &[],
            Roots::Finite(r) => r.as_slice(),
        }
    }
}

/// Solves `a x² + b x + c = 0`.
pub fn solve_quadratic(a: f32, b: f32, c: f32) -> Roots {
    // Degenerates into a linear equation
    if a == 0.0 || b.abs() > 1e12 * a.abs() {
        if b == 0.0 {
            if c == 0.0 {
                return Roots::Infinite;
            }
            return Roots::none();
        }
        return Roots::from_slice(&[-c / b]);
    }

    let dscr = b * b - 4.0 * a * c;
    if dscr > 0.0 {
        let dscr = dscr.sqrt();
        Roots::from_slice(&[(-b + dscr) / (2.0 * a), (-b - dscr) / (2.0 * a)])
    } else if dscr == 0.0 {
        Roots::from_slice(&[-b / (2.0 * a)])
    } else {
        Roots::none()
    }
}

/// Solves `x³ + a x² + b x + c = 0`.
fn solve_cubic_normed(a: f32, b: f32, c: f32) -> Roots {
    let a2 = a * a;
    let q = (a2 - 3.0 * b) / 9.0;
    let r = (a * (2.0 * a2 - 9.0 * b) + 27.0 * c) / 54.0;
    let r2 = r * r;
    let q3 = q * q * q;
    let a = a / 3.0;

    if r2 < q3 {
        let t = (r * fast_inv_sqrt(q3)).clamp(-1.0, 1.0);
        let t = fast_acos(t);
        let q = -2.0 * q.sqrt();
        Roots::from_slice(&[
            q * (t / 3.0).cos() - a,
            q * ((t + 2.0 * PI_F) / 3.0).cos() - a,
            q * ((t - 2.0 * PI_F) / 3.0).cos() - a,
        ])
    } else {
        let u = if r < 0.0 { 1.0 } else { -1.0 } * (r.abs() + (r2 - q3).sqrt()).powf(1.0 / 3.0);
        let v = if u == 0.0 { 0.0 } else { q / u };
        let x0 = (u + v) - a;
        if u == v || (u - v).abs() < 1e-12 * (u + v).abs() {
            return Roots::from_slice(&[x0, -0.5 * (u + v) - a]);
        }
        Roots::from_slice(&[x0])
    }
}

/// Solves `a x³ + b x² + c x + d = 0`, falling back to the quadratic solver
/// when the leading coefficient is zero or negligible.
pub fn solve_cubic(a: f32, b: f32, c: f32, d: f32) -> Roots {
    if a != 0.0 {
        let bn = b / a;
        if bn.abs() < 1e6 {
            return solve_cubic_normed(bn, c / a, d / a);
        }
    }
    solve_quadratic(b, c, d)
}
