//! Feedback of the induced guideway current onto the train.
//!
//! Each guideway loop is re-applied as a secondary lateral dipole of moment
//! `sign · i(t) · π R_g²`, and the interaction energy `−m · B` with every train
//! coil is summed over the same coil/loop pairs as the flux.
//!
//! The current comes from the flux of the train alone. The field of the induced
//! current is never fed back into the flux, so the result is a first-order,
//! non-self-consistent approximation.

use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};

use crate::fields::dipole_interaction_energy;
use crate::geometry::{GeometryModel, GuidewayLoop, TrainCoil};
use crate::math::Scalar;
use crate::simulation::{SimulationError, TimeGrid, TimeSeries};

/// Default lateral displacement (m) for differentiating the energy into a force.
pub const DEFAULT_FORCE_DISPLACEMENT: Scalar = 1.0e-3;

/// Checks that `delta` can be used as the lateral force displacement.
///
/// # Errors
///
/// Returns [`SimulationError::InvalidConfig`] unless `delta` is finite and positive.
pub fn validate_force_displacement(delta: Scalar) -> Result<Scalar, SimulationError> {
    if delta.is_finite() && delta > 0.0 {
        Ok(delta)
    } else {
        Err(SimulationError::InvalidConfig(format!(
            "force displacement must be finite and > 0, got {delta}"
        )))
    }
}

/// Accumulates the interaction energy between the train and the induced guideway dipoles.
#[derive(Debug, Clone, Copy)]
pub struct FeedbackEnergyCalculator<'a> {
    geometry: GeometryModel<'a>,
}

impl<'a> FeedbackEnergyCalculator<'a> {
    /// Creates a calculator over `geometry`.
    #[must_use]
    pub const fn new(geometry: GeometryModel<'a>) -> Self {
        Self { geometry }
    }

    /// Potential energy series for `current` sampled on `grid`.
    #[must_use]
    pub fn energy(&self, grid: &TimeGrid, current: &TimeSeries) -> TimeSeries {
        self.energy_shifted(grid, current, 0.0)
    }

    /// Energy with the train displaced laterally by `lateral_shift`, holding `current` fixed.
    #[must_use]
    pub fn energy_shifted(&self, grid: &TimeGrid, current: &TimeSeries, lateral_shift: Scalar) -> TimeSeries {
        debug_assert_eq!(grid.len(), current.len());
        let loops = self.geometry.guideway_loops();
        let values = grid
            .times()
            .par_iter()
            .zip(current.values().par_iter())
            .map(|(&t, &i)| self.energy_at(&self.geometry.train_coils_at(t, lateral_shift), &loops, i))
            .collect();
        TimeSeries::new(values)
    }

    /// Interaction energy for one train configuration and guideway current `current`.
    #[must_use]
    pub fn energy_at(&self, coils: &[TrainCoil], loops: &[GuidewayLoop], current: Scalar) -> Scalar {
        let mu = self.geometry.params().permeability();
        let moment = current * self.geometry.guideway_loop_area();
        coils
            .iter()
            .flat_map(|coil| loops.iter().map(move |l| (coil, l)))
            .map(|(coil, l)| {
                let b = l.dipole(moment).field_at(coil.position, mu);
                dipole_interaction_energy(coil.moment, b)
            })
            .sum()
    }

    /// Lateral guidance force `F_y = −∂U/∂y`, by central difference over a train
    /// displacement of `±delta` with the induced current held fixed.
    ///
    /// # Panics
    ///
    /// Panics if `delta` is not finite and positive; see [`validate_force_displacement`].
    #[must_use]
    pub fn lateral_force_series(&self, grid: &TimeGrid, current: &TimeSeries, delta: Scalar) -> TimeSeries {
        assert!(delta.is_finite() && delta > 0.0, "force displacement must be finite and > 0, got {delta}");
        let plus = self.energy_shifted(grid, current, delta);
        let minus = self.energy_shifted(grid, current, -delta);
        plus.iter()
            .zip(&minus)
            .map(|(up, down)| -(up - down) / (2.0 * delta))
            .collect::<Vec<_>>()
            .into()
    }
}
