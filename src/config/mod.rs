//! Configuration handling for qdsm
//!
//! This module contains:
//! - [`EngineConfig`] - provider whitelist, extension allowlist and the
//!   missing-datasource policy, optionally loaded from a YAML file

pub mod engine;

pub use engine::{EngineConfig, MissingDatasource};
