//! QGIS project files
//!
//! - [`xml`]: order-preserving XML tree the engine edits in place
//! - [`swap`]: path mapping tables
//! - [`document`]: one project, its sources and the rewrite operations
//! - [`collection`]: batches of projects discovered under folders
//! - [`sources`]: distinct sources across a batch

pub mod collection;
pub mod document;
pub mod sources;
pub mod swap;
pub mod xml;

pub use collection::ProjectCollection;
pub use document::ProjectDocument;
pub use sources::{SourceCollection, SourceFilter};
pub use swap::SwapTable;
