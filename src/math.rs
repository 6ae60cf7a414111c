//! Shared numerical primitives anchored on `nalgebra`.

use nalgebra::Vector3;

/// Primary scalar type used across the crate.
pub type Scalar = f64;
/// Convenient alias for three-dimensional real vectors.
///
/// Axes follow the guideway convention: `x` is axial (direction of travel),
/// `y` is lateral and `z` is vertical.
pub type R3 = Vector3<Scalar>;

/// Index of the lateral component in an [`R3`].
pub const LATERAL: usize = 1;

/// Returns a vector pointing along the lateral axis with length `magnitude`.
#[inline]
#[must_use]
pub fn lateral(magnitude: Scalar) -> R3 {
    R3::new(0.0, magnitude, 0.0)
}

/// Numerical gradient of uniformly sampled data with spacing `dx`.
///
/// Interior samples use the second-order central difference
/// `(f[i+1] - f[i-1]) / (2 dx)`; the first and last samples use first-order
/// one-sided differences. Inputs shorter than two samples yield zeros.
#[must_use]
pub fn gradient(values: &[Scalar], dx: Scalar) -> Vec<Scalar> {
    let n = values.len();
    if n < 2 {
        return vec![0.0; n];
    }
    let mut out = Vec::with_capacity(n);
    out.push((values[1] - values[0]) / dx);
    out.extend(values.windows(3).map(|w| (w[2] - w[0]) / (2.0 * dx)));
    out.push((values[n - 1] - values[n - 2]) / dx);
    out
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn lateral_vector_has_only_y_component() {
        let v = lateral(2.5);
        assert_eq!(v[LATERAL], 2.5);
        assert_eq!(v.x, 0.0);
        assert_eq!(v.z, 0.0);
    }

    #[test]
    fn gradient_of_quadratic_is_exact_in_interior() {
        let dx = 0.5;
        let f: Vec<Scalar> = (0..6).map(|i| (i as Scalar * dx).powi(2)).collect();
        let g = gradient(&f, dx);
        assert_eq!(g.len(), f.len());
        for (i, value) in g.iter().enumerate().take(5).skip(1) {
            assert_relative_eq!(*value, 2.0 * i as Scalar * dx, epsilon = 1.0e-12);
        }
        // one-sided boundaries
        assert_relative_eq!(g[0], (f[1] - f[0]) / dx, epsilon = 1.0e-12);
        assert_relative_eq!(g[5], (f[5] - f[4]) / dx, epsilon = 1.0e-12);
    }

    #[test]
    fn gradient_of_two_samples_uses_forward_and_backward_difference() {
        let g = gradient(&[1.0, 3.0], 2.0);
        assert_eq!(g, vec![1.0, 1.0]);
    }

    #[test]
    fn gradient_of_short_input_is_zero() {
        assert!(gradient(&[], 1.0).is_empty());
        assert_eq!(gradient(&[4.0], 1.0), vec![0.0]);
    }
}
