//! Net flux linked by the guideway coil as the train passes.

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::geometry::{GeometryModel, GuidewayLoop, TrainCoil};
use crate::math::{Scalar, LATERAL};
use crate::simulation::{TimeGrid, TimeSeries};

/// Sums the lateral field of every train coil over every guideway loop.
#[derive(Debug, Clone, Copy)]
pub struct FluxAccumulator<'a> {
    geometry: GeometryModel<'a>,
}

impl<'a> FluxAccumulator<'a> {
    /// Creates an accumulator over `geometry`.
    #[must_use]
    pub const fn new(geometry: GeometryModel<'a>) -> Self {
        Self { geometry }
    }

    /// Flux time series on `grid`. Samples are computed in parallel; each sample's
    /// 32-term sum runs in a fixed order, so the result does not depend on scheduling.
    #[must_use]
    pub fn accumulate(&self, grid: &TimeGrid) -> TimeSeries {
        let loops = self.geometry.guideway_loops();
        let values = grid
            .times()
            .par_iter()
            .map(|&t| self.flux_at(&self.geometry.train_coils_at(t, 0.0), &loops))
            .collect();
        TimeSeries::new(values)
    }

    /// Flux through the guideway coil for one train configuration.
    #[must_use]
    pub fn flux_at(&self, coils: &[TrainCoil], loops: &[GuidewayLoop]) -> Scalar {
        let mu = self.geometry.params().permeability();
        let area = self.geometry.guideway_loop_area();
        coils
            .iter()
            .flat_map(|coil| loops.iter().map(move |l| (coil, l)))
            .map(|(coil, l)| {
                let b = coil.dipole().field_at(l.position, mu);
                b[LATERAL] * area * l.sign
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::WindingMode;
    use crate::math::R3;
    use crate::simulation::SimulationParameters;

    #[test]
    fn reference_flux_at_start() {
        let p = SimulationParameters::builder().build().expect("valid");
        let flux = FluxAccumulator::new(GeometryModel::new(&p)).accumulate(&p.time_grid());
        assert_eq!(flux.len(), 500);
        assert_relative_eq!(flux[0], -3.219_868_426_113_5, max_relative = 1.0e-9);
        assert_relative_eq!(flux[11], -9.361_199_891_459_883, max_relative = 1.0e-9);
    }

    #[test]
    fn common_winding_changes_the_linked_flux() {
        let differential = SimulationParameters::builder().build().expect("valid");
        let common = differential.to_builder().winding(WindingMode::Common).build().expect("valid");
        let d = FluxAccumulator::new(GeometryModel::new(&differential)).accumulate(&differential.time_grid());
        let c = FluxAccumulator::new(GeometryModel::new(&common)).accumulate(&common.time_grid());
        assert_relative_eq!(c[0], -2.606_333_715_931_137_7, max_relative = 1.0e-9);
        assert!((d[0] - c[0]).abs() > 0.1);
    }

    #[test]
    fn symmetric_loops_cancel_under_differential_winding() {
        // A coil at the guideway reference height sees mirror-image upper and lower loops.
        let p = SimulationParameters::builder().train_height(0.0).build().expect("valid");
        let geometry = GeometryModel::new(&p);
        let acc = FluxAccumulator::new(geometry);
        let flux = acc.flux_at(&geometry.train_coils_at(0.0, 0.0), &geometry.guideway_loops());
        assert_relative_eq!(flux, 0.0, epsilon = 1.0e-9);
    }

    #[test]
    fn coincident_coil_and_loop_contribute_nothing() {
        let p = SimulationParameters::builder().build().expect("valid");
        let geometry = GeometryModel::new(&p);
        let l = geometry.guideway_loops()[0];
        let coil = TrainCoil { index: 1, position: l.position, moment: R3::new(0.0, 1.0e6, 0.0) };
        let flux = FluxAccumulator::new(geometry).flux_at(&[coil], &[l]);
        assert_eq!(flux, 0.0);
    }
}
