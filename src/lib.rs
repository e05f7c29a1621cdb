//! qdsm - QGIS datasource manager
//!
//! Inventories the datasources referenced by QGIS project files (`.qgs`) and
//! rewrites them: absolute/relative path conversion anchored at each project
//! file, and bulk relocation from a mapping table. Everything the engine does
//! not understand in a project is written back untouched.
//!
//! ```no_run
//! use qdsm::project::ProjectDocument;
//!
//! let mut project = ProjectDocument::new("maps/city.qgs");
//! project.convert_to_relative()?;
//! for source in &project {
//!     println!("{} exists: {}", source.path, source.exists());
//! }
//! # Ok::<(), qdsm::error::QdsmError>(())
//! ```

pub mod cli;
pub mod commands;
pub mod common;
pub mod config;
pub mod domain;
pub mod error;
pub mod logger;
pub mod project;
pub mod ui;

pub use error::{QdsmError, Result};
