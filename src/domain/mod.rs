//! Domain models for qdsm
//!
//! This module contains pure domain objects describing what a project file
//! references. These types carry no XML or file handling.

pub mod path_mode;
pub mod source;

pub use path_mode::PathMode;
pub use source::SourceRecord;
