use crate::math::Scalar;

/// Lumped resistor model.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resistor {
    resistance: Scalar,
}

impl Resistor {
    /// Creates a resistor of `resistance_ohms`.
    #[must_use]
    pub const fn new(resistance_ohms: Scalar) -> Self {
        Self { resistance: resistance_ohms }
    }

    /// Resistance magnitude in ohms.
    #[must_use]
    pub const fn resistance(&self) -> Scalar {
        self.resistance
    }

    /// Ohm's law: current driven by `voltage` across the resistor.
    #[inline]
    #[must_use]
    pub fn current(&self, voltage: Scalar) -> Scalar {
        voltage / self.resistance
    }
}
