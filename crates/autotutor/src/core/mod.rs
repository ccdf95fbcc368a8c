//! # Core Module
//!
//! The structure toolkit behind the tutorial generator: everything needed to
//! go from a line notation to coordinates, properties and files, without any
//! knowledge of tutorials or output bundles.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Elements, atoms, bonds, the structural graph and formulas
//! - **Line Notations** ([`smiles`], [`inchi`]) - Readers for SMILES and InChI, and a SMILES writer
//! - **Chemical Perception** ([`perception`]) - Implicit hydrogens, valence checks, kekulization, rings and bond-order assignment
//! - **Coordinates** ([`geometry`]) - 2D depiction layout and 3D conformer embedding with force-field refinement
//! - **File Output** ([`io`]) - MDL SDF records and PNG depictions
//!
//! All algorithms are deterministic for a given input and seed.

pub mod geometry;
pub mod inchi;
pub mod io;
pub mod models;
pub mod perception;
pub mod smiles;
