//! Scalar and vector helpers shared by the distance kernels.
//!
//! The polynomial solvers return only real roots and treat a vanishing leading
//! coefficient as a lower-degree equation.

use nalgebra::{Point2, Vector2};

/// Real roots of a polynomial of degree at most three.
///
/// At most three roots are stored. An identically zero polynomial has
/// infinitely many roots; it is reported through [`Roots::is_infinite`] and
/// yields an empty slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Roots {
    values: [f64; 3],
    count: usize,
    infinite: bool,
}

impl Roots {
    const fn none() -> Self {
        Self {
            values: [0.0; 3],
            count: 0,
            infinite: false,
        }
    }

    const fn infinite() -> Self {
        Self {
            values: [0.0; 3],
            count: 0,
            infinite: true,
        }
    }

    fn push(&mut self, value: f64) {
        if self.count < self.values.len() {
            self.values[self.count] = value;
            self.count += 1;
        }
    }

    /// The finite set of roots found.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.count]
    }

    /// Number of roots found.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Whether no finite roots were found.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether every value is a root (all coefficients were zero).
    #[must_use]
    pub const fn is_infinite(&self) -> bool {
        self.infinite
    }

    /// The roots sorted in ascending order.
    #[must_use]
    pub fn sorted(mut self) -> Self {
        let slice = &mut self.values[..self.count];
        slice.sort_by(f64::total_cmp);
        self
    }
}

/// Solve `a·x² + b·x + c = 0`.
#[must_use]
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Roots {
    let mut roots = Roots::none();
    // Nearly-linear equations lose more precision through the quadratic
    // formula than by dropping the leading term.
    if a == 0.0 || b.abs() > 1e12 * a.abs() {
        if b == 0.0 {
            return if c == 0.0 {
                Roots::infinite()
            } else {
                roots
            };
        }
        roots.push(-c / b);
        return roots;
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant > 0.0 {
        let sqrt = discriminant.sqrt();
        roots.push((-b + sqrt) / (2.0 * a));
        roots.push((-b - sqrt) / (2.0 * a));
    } else if discriminant == 0.0 {
        roots.push(-b / (2.0 * a));
    }
    roots
}

fn solve_cubic_normed(a: f64, b: f64, c: f64) -> Roots {
    let mut roots = Roots::none();
    let a2 = a * a;
    let mut q = (a2 - 3.0 * b) / 9.0;
    let r = (a * (2.0 * a2 - 9.0 * b) + 27.0 * c) / 54.0;
    let r2 = r * r;
    let q3 = q * q * q;
    let a = a / 3.0;
    if r2 < q3 {
        let t = (r / q3.sqrt()).clamp(-1.0, 1.0).acos();
        q = -2.0 * q.sqrt();
        roots.push(q * (t / 3.0).cos() - a);
        roots.push(q * ((t + 2.0 * std::f64::consts::PI) / 3.0).cos() - a);
        roots.push(q * ((t - 2.0 * std::f64::consts::PI) / 3.0).cos() - a);
    } else {
        let sign = if r < 0.0 { 1.0 } else { -1.0 };
        let u = sign * (r.abs() + (r2 - q3).sqrt()).cbrt();
        let v = if u == 0.0 { 0.0 } else { q / u };
        roots.push((u + v) - a);
        if u == v || (u - v).abs() < 1e-12 * (u + v).abs() {
            roots.push(-0.5 * (u + v) - a);
        }
    }
    roots
}

/// Solve `a·x³ + b·x² + c·x + d = 0`.
#[must_use]
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Roots {
    if a != 0.0 {
        let bn = b / a;
        // Past this ratio treating `a` as zero is the more accurate choice.
        if bn.abs() < 1e6 {
            return solve_cubic_normed(bn, c / a, d / a);
        }
    }
    solve_quadratic(b, c, d)
}

/// Median of three values.
#[must_use]
pub fn median<T: PartialOrd + Copy>(a: T, b: T, c: T) -> T {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    let hi = if c < hi { c } else { hi };
    if lo < hi { hi } else { lo }
}

/// Sign of `value`, mapping zero to `1.0`.
#[must_use]
pub fn non_zero_sign(value: f64) -> f64 {
    if value > 0.0 { 1.0 } else { -1.0 }
}

/// Two-dimensional cross product (z component of the 3D cross product).
#[must_use]
pub fn cross(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Linear interpolation between two points.
#[must_use]
pub fn mix_points(a: &Point2<f64>, b: &Point2<f64>, t: f64) -> Point2<f64> {
    a + (b - a) * t
}

/// Linear interpolation between two vectors.
#[must_use]
pub fn mix_vectors(a: &Vector2<f64>, b: &Vector2<f64>, t: f64) -> Vector2<f64> {
    a * (1.0 - t) + b * t
}

/// Normalize `v`. A zero vector becomes `(0, 1)` unless `allow_zero` is set,
/// in which case it stays zero.
#[must_use]
pub fn normalize_or(v: &Vector2<f64>, allow_zero: bool) -> Vector2<f64> {
    let len = v.norm();
    if len == 0.0 {
        return Vector2::new(0.0, if allow_zero { 0.0 } else { 1.0 });
    }
    v / len
}

/// Unit vector perpendicular to `v`.
///
/// With `polarity` set the result is `v` rotated counter-clockwise, otherwise
/// clockwise.
#[must_use]
pub fn orthonormal(v: &Vector2<f64>, polarity: bool, allow_zero: bool) -> Vector2<f64> {
    let len = v.norm();
    if len == 0.0 {
        let y = if allow_zero { 0.0 } else { 1.0 };
        return if polarity {
            Vector2::new(0.0, y)
        } else {
            Vector2::new(0.0, -y)
        };
    }
    if polarity {
        Vector2::new(-v.y / len, v.x / len)
    } else {
        Vector2::new(v.y / len, -v.x / len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quadratic_two_roots() {
        let roots = solve_quadratic(1.0, -3.0, 2.0).sorted();
        assert_eq!(roots.len(), 2);
        assert_relative_eq!(roots.as_slice()[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(roots.as_slice()[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn quadratic_degenerates_to_linear() {
        let roots = solve_quadratic(0.0, 2.0, -4.0);
        assert_eq!(roots.as_slice(), &[2.0]);
    }

    #[test]
    fn quadratic_all_zero_is_infinite() {
        let roots = solve_quadratic(0.0, 0.0, 0.0);
        assert!(roots.is_infinite());
        assert!(roots.is_empty());
    }

    #[test]
    fn quadratic_no_real_roots() {
        assert!(solve_quadratic(1.0, 0.0, 1.0).is_empty());
    }

    #[test]
    fn cubic_three_roots() {
        // (x - 1)(x - 2)(x - 3)
        let roots = solve_cubic(1.0, -6.0, 11.0, -6.0).sorted();
        assert_eq!(roots.len(), 3);
        for (root, expected) in roots.as_slice().iter().zip([1.0, 2.0, 3.0]) {
            assert_relative_eq!(*root, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn cubic_single_root() {
        // x³ + x + 2 has one real root at -1
        let roots = solve_cubic(1.0, 0.0, 1.0, 2.0);
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots.as_slice()[0], -1.0, epsilon = 1e-9);
    }

    #[test]
    fn median_of_three() {
        assert_eq!(median(1, 2, 3), 2);
        assert_eq!(median(3, 1, 2), 2);
        assert_eq!(median(2, 3, 1), 2);
        assert_relative_eq!(median(0.5_f32, -1.0, 4.0), 0.5);
    }

    #[test]
    fn orthonormal_rotation() {
        let v = Vector2::new(2.0, 0.0);
        assert_eq!(orthonormal(&v, true, false), Vector2::new(0.0, 1.0));
        assert_eq!(orthonormal(&v, false, false), Vector2::new(0.0, -1.0));
        assert_eq!(normalize_or(&Vector2::zeros(), false), Vector2::new(0.0, 1.0));
        assert_eq!(normalize_or(&Vector2::zeros(), true), Vector2::zeros());
    }
}
