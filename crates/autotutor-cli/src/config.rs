//! Layered configuration: CLI flags over `-S KEY=VALUE` overrides over the
//! TOML file over built-in defaults.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod locations;
pub mod models;
