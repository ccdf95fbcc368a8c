//! # Workflows Module
//!
//! Top-level entry points of the library. A workflow takes user-facing
//! selectors and configuration and drives the engine stages to a finished
//! output directory.
//!
//! ## Architecture
//!
//! - **Tutorial Workflow** ([`tutorial`]) - Resolve, enrich, narrate, compose and
//!   commit one tutorial bundle, reporting the stage at which a run fails.

pub mod tutorial;
