//! Input/output helpers.
//!
//! - pump data file import + validation (`ingest`)
//! - per-point result exports (CSV) (`export`)
//! - curve JSON read/write (`curve`)

pub mod curve;
pub mod export;
pub mod ingest;

pub use curve::*;
pub use export::*;
pub use ingest::*;
