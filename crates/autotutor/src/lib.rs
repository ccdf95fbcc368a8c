//! # Autotutor Library
//!
//! Turns a single chemical identifier (IUPAC name, SMILES, InChI or molecular
//! formula) into a small static tutorial bundle: an interactive 3D viewer
//! page, an SDF model, a 2D depiction, a narration script with timed
//! captions, and a video description.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless chemistry: molecular graphs, SMILES and
//!   InChI readers, perception algorithms, 2D/3D coordinate generation and file writers.
//!
//! - **[`engine`]: The Logic Core.** Tutorial-specific building blocks: input resolution
//!   (including the external name converter), structure enrichment, narration, caption
//!   timing, page composition and atomic bundle staging, plus configuration, errors and
//!   progress reporting.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into a single
//!   run that takes a validated input to a finished output directory.

pub mod core;
pub mod engine;
pub mod workflows;
