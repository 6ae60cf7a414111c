//! Convenience re-exports for building EDS experiments.

pub use crate::circuits::{CircuitSolver, InducedCircuit, Resistor};
pub use crate::constants::*;
pub use crate::errors::EdsError;
pub use crate::feedback::{validate_force_displacement, FeedbackEnergyCalculator, DEFAULT_FORCE_DISPLACEMENT};
pub use crate::fields::{dipole_interaction_energy, magnetic_field_from_dipole, MagneticDipole};
pub use crate::flux::FluxAccumulator;
pub use crate::geometry::{
    GeometryModel, GuidewayLoop, LoopPolarity, Side, TrainCoil, WindingMode, GUIDEWAY_LOOP_COUNT,
    TRAIN_COIL_COUNT,
};
pub use crate::math::{gradient, lateral, R3, Scalar};
pub use crate::simulation::{
    save_result_csv, write_result_csv, EdsPipeline, SimulationError, SimulationParameters,
    SimulationParametersBuilder, SimulationResult, TimeGrid, TimeSeries,
};
pub use crate::sweep::{lateral_offset_sweep, linspace, sweep_map, LateralSweepPoint};
