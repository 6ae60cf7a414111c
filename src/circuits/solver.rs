use super::component::Resistor;
use crate::math::{gradient, Scalar};
use crate::simulation::TimeSeries;

/// EMF and current induced in the guideway coil.
#[derive(Debug, Clone, PartialEq)]
pub struct InducedCircuit {
    /// `−dΦ/dt` per sample (V).
    pub emf: TimeSeries,
    /// `emf / R` per sample (A).
    pub current: TimeSeries,
}

/// Purely resistive guideway circuit. Self-inductance is not modelled, so the
/// current follows the EMF instantaneously.
#[derive(Debug, Clone, Copy)]
pub struct CircuitSolver {
    resistor: Resistor,
}

impl CircuitSolver {
    /// Creates a solver for a loop of `resistance` ohms (validated by the parameter builder).
    #[must_use]
    pub const fn new(resistance: Scalar) -> Self {
        Self { resistor: Resistor::new(resistance) }
    }

    /// Faraday's law on sampled flux: central differences inside, one-sided at both ends.
    #[must_use]
    pub fn emf(&self, flux: &TimeSeries, time_step: Scalar) -> TimeSeries {
        gradient(flux.values(), time_step).into_iter().map(|d| -d).collect::<Vec<_>>().into()
    }

    /// Solves EMF and current for `flux` sampled every `time_step` seconds.
    #[must_use]
    pub fn solve(&self, flux: &TimeSeries, time_step: Scalar) -> InducedCircuit {
        let emf = self.emf(flux, time_step);
        let current = emf.iter().map(|&e| self.resistor.current(e)).collect::<Vec<_>>().into();
        InducedCircuit { emf, current }
    }
}
