//! Geometry generation: 2D depiction layout and 3D conformer embedding with
//! a small force field for refinement.

pub mod embed;
pub mod forcefield;
pub mod layout;
pub mod potentials;
