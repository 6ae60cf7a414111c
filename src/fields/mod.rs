//! Magnetic field sources and helper utilities.

mod dipole;

pub use dipole::{dipole_interaction_energy, magnetic_field_from_dipole, MagneticDipole};
