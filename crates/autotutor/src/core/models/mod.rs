//! # Core Models Module
//!
//! Data structures describing a molecule independently of how it was
//! written down.
//!
//! ## Key Components
//!
//! - [`element`] - Periodic table data: masses, radii, valences and colors
//! - [`atom`] - A single atom with charge, isotope and hydrogen bookkeeping
//! - [`topology`] - Bond orders and bonds between atom indices
//! - [`molecule`] - The structural graph with neighbor and ring queries
//! - [`stereo`] - Tetrahedral centers and double-bond configurations
//! - [`formula`] - Element counts, Hill notation, masses and unsaturation
//!
//! ## Usage
//!
//! ```ignore
//! use autotutor::core::models::{atom::Atom, element::Element, molecule::Molecule};
//! use autotutor::core::models::topology::BondOrder;
//!
//! let mut mol = Molecule::new();
//! let c = mol.add_atom(Atom::new(Element::C).with_hydrogens(3));
//! let o = mol.add_atom(Atom::new(Element::O).with_hydrogens(1));
//! mol.add_bond(c, o, BondOrder::Single)?;
//! ```

pub mod atom;
pub mod element;
pub mod formula;
pub mod molecule;
pub mod stereo;
pub mod topology;
