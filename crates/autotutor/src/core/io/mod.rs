//! Provides output functionality for structure files and images.
//!
//! Coordinate files are written through the [`traits::MolecularFile`]
//! interface; 2D depictions are rasterized by [`depiction`].

pub mod depiction;
pub mod sdf;
pub mod traits;
