//! Guideway circuit: Faraday EMF and resistive current.

/// Lumped component definitions.
pub mod component;
/// Faraday/Ohm solve over sampled flux.
pub mod solver;

pub use component::Resistor;
pub use solver::{CircuitSolver, InducedCircuit};
