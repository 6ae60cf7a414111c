//! Parameter bundle, time grid and the end-to-end EDS pipeline.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::circuits::{CircuitSolver, InducedCircuit};
use crate::constants::CLASSICAL_VACUUM_PERMEABILITY;
use crate::errors::EdsError;
use crate::feedback::{validate_force_displacement, FeedbackEnergyCalculator, DEFAULT_FORCE_DISPLACEMENT};
use crate::flux::FluxAccumulator;
use crate::geometry::{GeometryModel, WindingMode};
use crate::math::Scalar;

/// Errors that can occur while configuring simulations.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// Raised when the configuration is physically or numerically invalid.
    #[error("configuration error: {0}")]
    InvalidConfig(String),
}

/// Relative slack applied to `duration / time_step` before flooring, so that
/// exact multiples such as `0.3 / 0.1` are not lost to representation error.
const SAMPLE_COUNT_GUARD: Scalar = 1.0e-9;

/// Immutable, validated configuration of one EDS run.
///
/// Construct through [`SimulationParameters::builder`]; every field has a getter
/// and none can be changed after [`SimulationParametersBuilder::build`] succeeds.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParameters {
    permeability: Scalar,
    train_radius: Scalar,
    guideway_radius: Scalar,
    lateral_spacing: Scalar,
    guideway_height: Scalar,
    train_height: Scalar,
    train_lateral_offset: Scalar,
    train_current: Scalar,
    resistance: Scalar,
    speed: Scalar,
    duration: Scalar,
    time_step: Scalar,
    winding: WindingMode,
    #[cfg_attr(feature = "serde", serde(skip))]
    sample_count: usize,
}

impl SimulationParameters {
    /// Starts a builder pre-filled with the reference scenario.
    #[must_use]
    pub fn builder() -> SimulationParametersBuilder {
        SimulationParametersBuilder::default()
    }

    /// Returns a builder holding a copy of these parameters, for deriving variants.
    #[must_use]
    pub fn to_builder(&self) -> SimulationParametersBuilder {
        SimulationParametersBuilder {
            permeability: self.permeability,
            train_radius: self.train_radius,
            guideway_radius: self.guideway_radius,
            lateral_spacing: self.lateral_spacing,
            guideway_height: self.guideway_height,
            train_height: self.train_height,
            train_lateral_offset: self.train_lateral_offset,
            train_current: self.train_current,
            resistance: self.resistance,
            speed: self.speed,
            duration: self.duration,
            time_step: self.time_step,
            winding: self.winding,
        }
    }

    /// Vacuum permeability μ₀ (H/m).
    #[must_use]
    pub const fn permeability(&self) -> Scalar { self.permeability }
    /// Train coil radius (m).
    #[must_use]
    pub const fn train_radius(&self) -> Scalar { self.train_radius }
    /// Guideway loop radius (m).
    #[must_use]
    pub const fn guideway_radius(&self) -> Scalar { self.guideway_radius }
    /// Lateral distance between the two guideway sides (m).
    #[must_use]
    pub const fn lateral_spacing(&self) -> Scalar { self.lateral_spacing }
    /// Vertical reference height of the guideway coils (m).
    #[must_use]
    pub const fn guideway_height(&self) -> Scalar { self.guideway_height }
    /// Vertical standoff height of the train coils (m).
    #[must_use]
    pub const fn train_height(&self) -> Scalar { self.train_height }
    /// Fixed lateral offset of the train (m).
    #[must_use]
    pub const fn train_lateral_offset(&self) -> Scalar { self.train_lateral_offset }
    /// Current in each train coil (A).
    #[must_use]
    pub const fn train_current(&self) -> Scalar { self.train_current }
    /// Guideway circuit resistance (Ω).
    #[must_use]
    pub const fn resistance(&self) -> Scalar { self.resistance }
    /// Train speed (m/s).
    #[must_use]
    pub const fn speed(&self) -> Scalar { self.speed }
    /// Simulated window length (s).
    #[must_use]
    pub const fn duration(&self) -> Scalar { self.duration }
    /// Sample spacing (s).
    #[must_use]
    pub const fn time_step(&self) -> Scalar { self.time_step }
    /// Guideway loop winding.
    #[must_use]
    pub const fn winding(&self) -> WindingMode { self.winding }
    /// Number of samples `floor(duration / time_step)`.
    #[must_use]
    pub const fn sample_count(&self) -> usize { self.sample_count }

    /// Discretised simulation window.
    #[must_use]
    pub fn time_grid(&self) -> TimeGrid {
        TimeGrid::new(self.time_step, self.sample_count)
    }
}

/// Builder for [`SimulationParameters`]. Defaults reproduce the reference scenario.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParametersBuilder {
    /// Vacuum permeability μ₀ (H/m).
    pub permeability: Scalar,
    /// Train coil radius (m).
    pub train_radius: Scalar,
    /// Guideway loop radius (m).
    pub guideway_radius: Scalar,
    /// Lateral distance between the guideway sides (m).
    pub lateral_spacing: Scalar,
    /// Guideway reference height (m).
    pub guideway_height: Scalar,
    /// Train standoff height (m).
    pub train_height: Scalar,
    /// Train lateral offset (m).
    pub train_lateral_offset: Scalar,
    /// Train coil current (A).
    pub train_current: Scalar,
    /// Guideway resistance (Ω).
    pub resistance: Scalar,
    /// Train speed (m/s).
    pub speed: Scalar,
    /// Window length (s).
    pub duration: Scalar,
    /// Sample spacing (s).
    pub time_step: Scalar,
    /// Guideway winding.
    pub winding: WindingMode,
}

impl Default for SimulationParametersBuilder {
    fn default() -> Self {
        Self {
            permeability: CLASSICAL_VACUUM_PERMEABILITY,
            train_radius: 1.5,
            guideway_radius: 1.0,
            lateral_spacing: 1.2,
            guideway_height: 0.0,
            train_height: 0.7,
            train_lateral_offset: 0.0,
            train_current: 7.0e5,
            resistance: 10.0,
            speed: 160.0,
            duration: 0.5,
            time_step: 1.0e-3,
            winding: WindingMode::Differential,
        }
    }
}

macro_rules! setter {
    ($($(#[$doc:meta])* $name:ident: $ty:ty),* $(,)?) => {
        $(
            $(#[$doc])*
            #[must_use]
            pub fn $name(mut self, value: $ty) -> Self {
                self.$name = value;
                self
            }
        )*
    };
}

impl SimulationParametersBuilder {
    setter! {
        /// Sets the vacuum permeability (H/m).
        permeability: Scalar,
        /// Sets the train coil radius (m).
        train_radius: Scalar,
        /// Sets the guideway loop radius (m).
        guideway_radius: Scalar,
        /// Sets the lateral spacing between guideway sides (m).
        lateral_spacing: Scalar,
        /// Sets the guideway reference height (m).
        guideway_height: Scalar,
        /// Sets the train standoff height (m).
        train_height: Scalar,
        /// Sets the train lateral offset (m).
        train_lateral_offset: Scalar,
        /// Sets the train coil current (A).
        train_current: Scalar,
        /// Sets the guideway resistance (Ω).
        resistance: Scalar,
        /// Sets the train speed (m/s).
        speed: Scalar,
        /// Sets the simulated window length (s).
        duration: Scalar,
        /// Sets the sample spacing (s).
        time_step: Scalar,
        /// Sets the guideway winding.
        winding: WindingMode,
    }

    /// Validates the bundle.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidConfig`] if any value is non-finite, if a radius,
    /// the permeability, resistance, duration or time step is not strictly positive, if
    /// spacing or speed is negative, or if the window holds fewer than two samples.
    pub fn build(self) -> Result<SimulationParameters, SimulationError> {
        let finite = [
            ("permeability", self.permeability),
            ("train_radius", self.train_radius),
            ("guideway_radius", self.guideway_radius),
            ("lateral_spacing", self.lateral_spacing),
            ("guideway_height", self.guideway_height),
            ("train_height", self.train_height),
            ("train_lateral_offset", self.train_lateral_offset),
            ("train_current", self.train_current),
            ("resistance", self.resistance),
            ("speed", self.speed),
            ("duration", self.duration),
            ("time_step", self.time_step),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SimulationError::InvalidConfig(format!("{name} must be finite, got {value}")));
            }
        }

        let positive = [
            ("permeability", self.permeability),
            ("train_radius", self.train_radius),
            ("guideway_radius", self.guideway_radius),
            ("resistance", self.resistance),
            ("duration", self.duration),
            ("time_step", self.time_step),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(SimulationError::InvalidConfig(format!("{name} must be > 0, got {value}")));
            }
        }

        for (name, value) in [("lateral_spacing", self.lateral_spacing), ("speed", self.speed)] {
            if value < 0.0 {
                return Err(SimulationError::InvalidConfig(format!("{name} must be >= 0, got {value}")));
            }
        }

        let ratio = self.duration / self.time_step;
        let samples = (ratio + ratio * SAMPLE_COUNT_GUARD).floor();
        if samples < 2.0 {
            return Err(SimulationError::InvalidConfig(format!(
                "duration {} with time_step {} yields {samples} samples; at least 2 are required",
                self.duration, self.time_step
            )));
        }
        if samples > usize::MAX as Scalar {
            return Err(SimulationError::InvalidConfig(format!("sample count {samples} is too large")));
        }

        Ok(SimulationParameters {
            permeability: self.permeability,
            train_radius: self.train_radius,
            guideway_radius: self.guideway_radius,
            lateral_spacing: self.lateral_spacing,
            guideway_height: self.guideway_height,
            train_height: self.train_height,
            train_lateral_offset: self.train_lateral_offset,
            train_current: self.train_current,
            resistance: self.resistance,
            speed: self.speed,
            duration: self.duration,
            time_step: self.time_step,
            winding: self.winding,
            sample_count: samples as usize,
        })
    }
}

/// Uniform sample grid `t_i = i · dt`, `i = 0..N`.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    time_step: Scalar,
    times: Vec<Scalar>,
}

impl TimeGrid {
    /// Creates a grid of `samples` points spaced `time_step` apart, starting at zero.
    #[must_use]
    pub fn new(time_step: Scalar, samples: usize) -> Self {
        let times = (0..samples).map(|i| i as Scalar * time_step).collect();
        Self { time_step, times }
    }

    /// Sample spacing (s).
    #[must_use]
    pub const fn time_step(&self) -> Scalar { self.time_step }

    /// Sample instants (s).
    #[must_use]
    pub fn times(&self) -> &[Scalar] { &self.times }

    /// Total samples.
    #[must_use]
    pub fn len(&self) -> usize { self.times.len() }

    /// True if the grid has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.times.is_empty() }
}

/// One physical quantity sampled on a [`TimeGrid`].
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    values: Vec<Scalar>,
}

impl TimeSeries {
    /// Wraps sampled values.
    #[must_use]
    pub const fn new(values: Vec<Scalar>) -> Self {
        Self { values }
    }

    /// Sampled values in time order.
    #[must_use]
    pub fn values(&self) -> &[Scalar] { &self.values }

    /// Total samples.
    #[must_use]
    pub fn len(&self) -> usize { self.values.len() }

    /// True if no samples recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    /// Iterator over the samples.
    pub fn iter(&self) -> std::slice::Iter<'_, Scalar> {
        self.values.iter()
    }

    /// Index and value of the sample with the largest magnitude (first one on ties).
    #[must_use]
    pub fn peak_abs(&self) -> Option<(usize, Scalar)> {
        self.values
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (i, v)| match best {
                Some((_, b)) if b.abs() >= v.abs() => best,
                _ => Some((i, v)),
            })
    }

    /// Arithmetic mean of the samples, or `None` when empty.
    #[must_use]
    pub fn mean(&self) -> Option<Scalar> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<Scalar>() / self.values.len() as Scalar)
    }

    /// True if every sample is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

impl From<Vec<Scalar>> for TimeSeries {
    fn from(values: Vec<Scalar>) -> Self {
        Self::new(values)
    }
}

impl std::ops::Index<usize> for TimeSeries {
    type Output = Scalar;

    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = &'a Scalar;
    type IntoIter = std::slice::Iter<'a, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Output of one pipeline run. All series share `grid`.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Shared sample grid.
    pub grid: TimeGrid,
    /// Net flux linked by the guideway coil (Wb).
    pub flux: TimeSeries,
    /// Induced EMF (V).
    pub emf: TimeSeries,
    /// Induced guideway current (A).
    pub current: TimeSeries,
    /// Feedback interaction energy on the train (J).
    pub energy: TimeSeries,
    /// Lateral guidance force on the train, `−∂U/∂y` (N).
    pub lateral_force: TimeSeries,
}

/// Single-pass EDS pipeline: geometry → flux → EMF/current → feedback energy.
///
/// The feedback stage reuses the current solved from the un-fed-back flux; there is
/// no iteration towards a self-consistent solution. That is a known physical
/// limitation of the model and the results depend on it.
#[derive(Debug, Clone)]
pub struct EdsPipeline {
    params: SimulationParameters,
    force_displacement: Scalar,
}

impl EdsPipeline {
    /// Creates a pipeline over validated parameters.
    #[must_use]
    pub const fn new(params: SimulationParameters) -> Self {
        Self { params, force_displacement: DEFAULT_FORCE_DISPLACEMENT }
    }

    /// Overrides the lateral displacement used to differentiate the energy (m).
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidConfig`] unless `delta` is finite and positive.
    pub fn with_force_displacement(mut self, delta: Scalar) -> Result<Self, SimulationError> {
        self.force_displacement = validate_force_displacement(delta)?;
        Ok(self)
    }

    /// Lateral displacement used to differentiate the energy (m).
    #[must_use]
    pub const fn force_displacement(&self) -> Scalar {
        self.force_displacement
    }

    /// Parameters the pipeline runs with.
    #[must_use]
    pub const fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// Runs every stage to completion and returns the sampled quantities.
    #[must_use]
    pub fn run(&self) -> SimulationResult {
        let grid = self.params.time_grid();
        let geometry = GeometryModel::new(&self.params);

        debug!(samples = grid.len(), "accumulating guideway flux");
        let flux = FluxAccumulator::new(geometry).accumulate(&grid);

        debug!(resistance = self.params.resistance(), "solving guideway circuit");
        let InducedCircuit { emf, current } =
            CircuitSolver::new(self.params.resistance()).solve(&flux, grid.time_step());

        debug!("computing feedback energy");
        let feedback = FeedbackEnergyCalculator::new(geometry);
        let energy = feedback.energy(&grid, &current);
        let lateral_force = feedback.lateral_force_series(&grid, &current, self.force_displacement);

        if let Some((index, peak)) = current.peak_abs() {
            info!(
                peak_current = peak,
                index,
                time = grid.times()[index],
                "EDS pipeline complete"
            );
        }

        SimulationResult { grid, flux, emf, current, energy, lateral_force }
    }
}

/// Writes every series of `result` as CSV with a shared time column.
pub fn write_result_csv<W: Write>(mut w: W, result: &SimulationResult) -> io::Result<()> {
    writeln!(w, "time,flux,emf,current,energy,lateral_force")?;
    for (idx, time) in result.grid.times().iter().enumerate() {
        writeln!(
            w,
            "{:.16e},{:.16e},{:.16e},{:.16e},{:.16e},{:.16e}",
            time,
            result.flux[idx],
            result.emf[idx],
            result.current[idx],
            result.energy[idx],
            result.lateral_force[idx],
        )?;
    }
    Ok(())
}

/// Writes `result` as CSV to the file at `path`, creating or truncating it.
///
/// # Errors
///
/// Returns [`EdsError::Io`] if the file cannot be created or written.
pub fn save_result_csv(path: impl AsRef<Path>, result: &SimulationResult) -> Result<(), EdsError> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_result_csv(&mut writer, result)?;
    writer.flush()?;
    Ok(())
}
