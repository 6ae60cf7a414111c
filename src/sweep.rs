//! Parameter sweeps over full pipeline runs.

use tracing::{debug, warn};

use crate::feedback::validate_force_displacement;
use crate::math::Scalar;
use crate::simulation::{EdsPipeline, SimulationError, SimulationParameters, SimulationResult};

/// Generates `n` linearly spaced samples in [start, stop].
#[must_use]
pub fn linspace(start: Scalar, stop: Scalar, n: usize) -> Vec<Scalar> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n as Scalar - 1.0);
            (0..n).map(|i| start + step * i as Scalar).collect()
        }
    }
}

/// Peak response of one run in a lateral sweep.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LateralSweepPoint {
    /// Train lateral offset (m).
    pub offset: Scalar,
    /// Largest |current| over the window (A).
    pub peak_current: Scalar,
    /// Time of `peak_current` (s).
    pub peak_time: Scalar,
    /// Largest |energy| over the window (J).
    pub peak_energy: Scalar,
    /// Mean lateral force over the window (N).
    pub mean_lateral_force: Scalar,
}

impl LateralSweepPoint {
    fn from_result(offset: Scalar, result: &SimulationResult) -> Self {
        let (index, peak_current) = result.current.peak_abs().unwrap_or((0, 0.0));
        Self {
            offset,
            peak_current: peak_current.abs(),
            peak_time: result.grid.times().get(index).copied().unwrap_or(0.0),
            peak_energy: result.energy.peak_abs().map_or(0.0, |(_, u)| u.abs()),
            mean_lateral_force: result.lateral_force.mean().unwrap_or(0.0),
        }
    }
}

/// Applies `f` to each parameter variant and collects results.
#[must_use]
pub fn sweep_map<I, F, T>(variants: I, f: F) -> Vec<T>
where
    I: IntoIterator<Item = SimulationParameters>,
    F: FnMut(SimulationParameters) -> T,
{
    variants.into_iter().map(f).collect()
}

/// Runs the pipeline once per train lateral offset, all other parameters taken from `base`.
/// The lateral force of each run is differentiated over `±force_displacement`.
///
/// # Errors
///
/// Returns [`SimulationError::InvalidConfig`] if an offset is not finite or
/// `force_displacement` is not finite and positive.
pub fn lateral_offset_sweep(
    base: &SimulationParameters,
    offsets: &[Scalar],
    force_displacement: Scalar,
) -> Result<Vec<LateralSweepPoint>, SimulationError> {
    let force_displacement = validate_force_displacement(force_displacement)?;
    if offsets.is_empty() {
        warn!("lateral sweep requested with no offsets");
    }
    let variants = offsets
        .iter()
        .map(|&y| base.to_builder().train_lateral_offset(y).build())
        .collect::<Result<Vec<_>, _>>()?;

    sweep_map(variants, |params| -> Result<LateralSweepPoint, SimulationError> {
        let offset = params.train_lateral_offset();
        debug!(offset, force_displacement, "running lateral sweep point");
        let pipeline = EdsPipeline::new(params).with_force_displacement(force_displacement)?;
        Ok(LateralSweepPoint::from_result(offset, &pipeline.run()))
    })
    .into_iter()
    .collect()
}
