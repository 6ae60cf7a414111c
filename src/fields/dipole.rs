use crate::constants::dipole_prefactor;
use crate::math::{R3, Scalar};

/// Ideal point magnetic dipole.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagneticDipole {
    /// Position in meters.
    pub position: R3,
    /// Dipole moment in A·m².
    pub moment: R3,
}

impl MagneticDipole {
    /// Creates a dipole at `position` with moment `moment`.
    #[must_use]
    pub const fn new(position: R3, moment: R3) -> Self {
        Self { position, moment }
    }

    /// Field produced by this dipole at `point` in a medium of permeability `mu`.
    #[must_use]
    pub fn field_at(&self, point: R3, mu: Scalar) -> R3 {
        magnetic_field_from_dipole(self.moment, point - self.position, mu)
    }
}

/// Magnetic flux density B (T) of a point dipole with moment `moment` at displacement
/// `separation` from the dipole:
///
/// `B = (μ/4π) · [3 (m·r) r / |r|⁵ − m / |r|³]`
///
/// A zero separation returns the zero vector instead of a singular value.
#[must_use]
pub fn magnetic_field_from_dipole(moment: R3, separation: R3, mu: Scalar) -> R3 {
    let r = separation.norm();
    if r == 0.0 {
        return R3::zeros();
    }
    let r3 = r * r * r;
    let r5 = r3 * r * r;
    let radial = separation * (3.0 * moment.dot(&separation) / r5);
    (radial - moment / r3) * dipole_prefactor(mu)
}

/// Potential energy `U = −m · B` of a dipole with moment `moment` sitting in field `field`.
#[inline]
#[must_use]
pub fn dipole_interaction_energy(moment: R3, field: R3) -> Scalar {
    -moment.dot(&field)
}
