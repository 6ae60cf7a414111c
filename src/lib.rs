#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(clippy::all, clippy::cargo, clippy::nursery, missing_docs)]
#![doc = include_str!("../README.md")]

/// Fundamental physical constants used throughout the library.
pub mod constants;
/// Shared mathematical utilities (vectors, finite differences).
pub mod math;
/// Magnetic dipole fields and interaction energy.
pub mod fields;
/// Train and guideway coil layout.
pub mod geometry;
/// Flux linked by the guideway coil.
pub mod flux;
/// Guideway circuit components and the Faraday/Ohm solve.
pub mod circuits;
/// Feedback energy and guidance force on the train.
pub mod feedback;
/// Parameter sweeps over full pipeline runs.
pub mod sweep;
/// Parameters, time grid and the end-to-end pipeline.
pub mod simulation;
/// Error types shared between submodules.
pub mod errors;

/// Common exports for downstream crates.
pub mod prelude;
