//! SMILES reading and writing.
//!
//! [`parse_smiles`] accepts the OpenSMILES organic subset, bracket atoms,
//! branches, ring closures and dot-separated components, and returns a
//! kekulized graph with implicit hydrogens. [`write_smiles`] produces a
//! Kekulé string suitable for display.

pub mod error;
pub mod parser;
pub mod tokenizer;
pub mod writer;

pub use error::SmilesError;
pub use parser::parse_smiles;
pub use writer::write_smiles;
