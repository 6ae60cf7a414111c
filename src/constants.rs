//! Baseline physical constants.
//!
//! ## Accuracy
//!
//! [`VACUUM_PERMEABILITY`] is the measured CODATA 2018 value (12 significant figures).
//! [`CLASSICAL_VACUUM_PERMEABILITY`] is the pre-2019 defined value 4π × 10⁻⁷ H/m, which the
//! default maglev scenario uses so that results stay reproducible against the classic
//! reference runs. The two differ by roughly 5 × 10⁻¹⁰ relative.
//!
//! ## References
//!
//! - NIST Reference on Constants, Units, and Uncertainty: <https://physics.nist.gov/cuu/Constants/>
//! - CODATA 2018 values published May 20, 2019 (following 2019 SI redefinition)

use std::f64::consts::PI;

/// Vacuum permeability μ₀ in henries per meter (H/m).
/// Approximate value: 1.25663706212 × 10⁻⁶ H/m (12 significant figures).
pub const VACUUM_PERMEABILITY: f64 = 1.256_637_062_12e-6;

/// Vacuum permeability μ₀ as defined before the 2019 SI revision: exactly 4π × 10⁻⁷ H/m.
pub const CLASSICAL_VACUUM_PERMEABILITY: f64 = 4.0 * PI * 1.0e-7;

/// Returns the dipole prefactor μ/(4π) for a medium of permeability `mu`.
#[inline]
#[must_use]
pub fn dipole_prefactor(mu: f64) -> f64 {
    mu / (4.0 * PI)
}

/// Area of a circular loop of radius `radius` (m²).
#[inline]
#[must_use]
pub fn loop_area(radius: f64) -> f64 {
    PI * radius * radius
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn classical_prefactor_is_one_e_minus_seven() {
        assert_relative_eq!(
            dipole_prefactor(CLASSICAL_VACUUM_PERMEABILITY),
            1.0e-7,
            max_relative = 1.0e-15
        );
    }

    #[test]
    fn codata_permeability_is_close_to_classical() {
        assert_relative_eq!(
            VACUUM_PERMEABILITY,
            CLASSICAL_VACUUM_PERMEABILITY,
            max_relative = 1.0e-9
        );
    }
}
