//! Command implementations for qdsm CLI

pub mod completions;
pub mod convert;
pub mod helpers;
pub mod relocate;
pub mod scan;
pub mod version;
