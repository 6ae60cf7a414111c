//! Coil layout of the train and the guideway.
//!
//! The train carries four coils spaced one coil radius apart from the leading
//! edge, each modelled as a lateral dipole whose sign alternates with the coil
//! index. The guideway holds one figure-eight coil per side at two axial stations;
//! every coil has an upper and a lower loop, giving eight loop instances.
//!
//! Everything here is a pure function of [`SimulationParameters`] and time.

use crate::constants::loop_area;
use crate::fields::MagneticDipole;
use crate::math::{lateral, R3, Scalar};
use crate::simulation::SimulationParameters;

/// Number of train-mounted coils.
pub const TRAIN_COIL_COUNT: usize = 4;
/// Number of guideway loop instances (2 sides × 2 axial stations × 2 vertical loops).
pub const GUIDEWAY_LOOP_COUNT: usize = 8;

/// How the upper and lower loops of each guideway coil are connected.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindingMode {
    /// Figure-eight winding: the lower loop is wound opposite to the upper loop.
    #[default]
    Differential,
    /// Both loops wound in the same sense (no common-mode cancellation).
    Common,
}

/// Vertical position of a loop within its guideway coil.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPolarity {
    /// Loop centred above the guideway reference height.
    Upper,
    /// Loop centred below the guideway reference height.
    Lower,
}

impl LoopPolarity {
    /// Winding sign of this loop under `winding`.
    #[must_use]
    pub const fn sign(self, winding: WindingMode) -> Scalar {
        match (self, winding) {
            (Self::Lower, WindingMode::Differential) => -1.0,
            _ => 1.0,
        }
    }
}

/// Lateral side of the guideway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Negative lateral offset (−spacing/2).
    Left,
    /// Positive lateral offset (+spacing/2).
    Right,
}

/// One loop of the guideway array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuidewayLoop {
    /// Guideway side the loop belongs to.
    pub side: Side,
    /// Vertical polarity of the loop inside its coil.
    pub polarity: LoopPolarity,
    /// Loop centre in meters.
    pub position: R3,
    /// Winding sign applied to flux and to the loop's secondary dipole.
    pub sign: Scalar,
}

impl GuidewayLoop {
    /// Secondary lateral dipole of this loop carrying a moment of `moment` A·m²
    /// before the winding sign is applied.
    #[must_use]
    pub fn dipole(&self, moment: Scalar) -> MagneticDipole {
        MagneticDipole::new(self.position, lateral(self.sign * moment))
    }
}

/// One train coil at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainCoil {
    /// One-based coil index (1..=4).
    pub index: usize,
    /// Coil centre in meters.
    pub position: R3,
    /// Dipole moment in A·m².
    pub moment: R3,
}

impl TrainCoil {
    /// The coil as a point dipole.
    #[must_use]
    pub const fn dipole(&self) -> MagneticDipole {
        MagneticDipole::new(self.position, self.moment)
    }
}

/// Geometry derived from a validated parameter bundle.
#[derive(Debug, Clone, Copy)]
pub struct GeometryModel<'a> {
    params: &'a SimulationParameters,
}

impl<'a> GeometryModel<'a> {
    /// Wraps a parameter bundle.
    #[must_use]
    pub const fn new(params: &'a SimulationParameters) -> Self {
        Self { params }
    }

    /// Underlying parameters.
    #[must_use]
    pub const fn params(&self) -> &'a SimulationParameters {
        self.params
    }

    /// Axial position of the one-based train coil `index` at time `time`:
    /// `v t + (2 index − 1) R_train`.
    #[must_use]
    pub fn train_axial_position(&self, index: usize, time: Scalar) -> Scalar {
        let p = self.params;
        p.speed() * time + (2.0 * index as Scalar - 1.0) * p.train_radius()
    }

    /// Dipole moment of the one-based train coil `index`: `(−1)^index I π R_train²` along `y`.
    #[must_use]
    pub fn train_moment(&self, index: usize) -> R3 {
        let sign = if index % 2 == 0 { 1.0 } else { -1.0 };
        lateral(sign * self.train_moment_magnitude())
    }

    /// Base train dipole magnitude `I π R_train²` (A·m²).
    #[must_use]
    pub fn train_moment_magnitude(&self) -> Scalar {
        self.params.train_current() * loop_area(self.params.train_radius())
    }

    /// Area of one guideway loop (m²).
    #[must_use]
    pub fn guideway_loop_area(&self) -> Scalar {
        loop_area(self.params.guideway_radius())
    }

    /// The four train coils at time `time`, optionally displaced laterally by `lateral_shift`.
    #[must_use]
    pub fn train_coils_at(&self, time: Scalar, lateral_shift: Scalar) -> [TrainCoil; TRAIN_COIL_COUNT] {
        let p = self.params;
        std::array::from_fn(|k| {
            let index = k + 1;
            TrainCoil {
                index,
                position: R3::new(
                    self.train_axial_position(index, time),
                    p.train_lateral_offset() + lateral_shift,
                    p.train_height(),
                ),
                moment: self.train_moment(index),
            }
        })
    }

    /// The eight fixed guideway loops, ordered side → axial station → polarity.
    #[must_use]
    pub fn guideway_loops(&self) -> [GuidewayLoop; GUIDEWAY_LOOP_COUNT] {
        let p = self.params;
        let rg = p.guideway_radius();
        let half = 0.5 * p.lateral_spacing();
        let sides = [(Side::Left, -half), (Side::Right, half)];
        let axial = [rg, 3.0 * rg];
        let loops = [(LoopPolarity::Upper, rg), (LoopPolarity::Lower, -rg)];

        std::array::from_fn(|k| {
            let (side, y) = sides[k / 4];
            let x = axial[(k / 2) % 2];
            let (polarity, dz) = loops[k % 2];
            GuidewayLoop {
                side,
                polarity,
                position: R3::new(x, y, p.guideway_height() + dz),
                sign: polarity.sign(p.winding()),
            }
        })
    }
}
