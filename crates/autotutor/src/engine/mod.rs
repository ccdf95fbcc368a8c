//! # Engine Module
//!
//! Pipeline stages that sit between the structure toolkit in [`crate::core`]
//! and the tutorial workflow.
//!
//! ## Architecture
//!
//! - **Input** ([`input`]) - Selector validation and resolution into a structure source or a bare formula
//! - **Name Conversion** ([`converter`]) - The [`converter::NameResolver`] seam and the OPSIN subprocess adapter
//! - **Enrichment** ([`enricher`]) - Parsing, 2D layout, 3D conformer and property record
//! - **Teaching Notes** ([`teaching`]) - Heuristic bullets read off IUPAC names
//! - **Narration** ([`narration`]) - Voiceover script and SubRip captions
//! - **Composition** ([`composer`]) - HTML page and video description templates
//! - **Bundle Staging** ([`bundle`]) - All-or-nothing output directories
//! - **Configuration** ([`config`]), **Progress** ([`progress`]) and **Errors** ([`error`])

pub mod bundle;
pub mod composer;
pub mod config;
pub mod converter;
pub mod enricher;
pub mod error;
pub mod input;
pub mod narration;
pub mod progress;
pub mod slug;
pub mod teaching;
